use contracts::domain::a009_ticket::aggregate::{Ticket, TicketId, TicketListItem, TicketMessage};
use contracts::domain::common::{BaseAggregate, EntityMetadata};
use contracts::enums::{TaskPriority, TicketCategory, TicketStatus};
use contracts::shared::pagination::ListQuery;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use sea_orm::entity::prelude::*;
use sea_orm::{ColumnTrait, EntityTrait, FromQueryResult, QueryFilter, QueryOrder, Set, TransactionTrait};

use crate::shared::data::db::get_connection;
use crate::shared::data::query::{count_rows, fetch_rows, SqlFilter};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "a009_ticket")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub code: String,
    pub description: String,
    pub comment: Option<String>,
    pub category: String,
    pub priority: String,
    pub status: String,
    pub created_by: String,
    pub dealer_id: Option<String>,
    pub is_deleted: bool,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
    pub version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Строки переписки, табличная часть обращения
pub mod message {
    use sea_orm::entity::prelude::*;
    use serde::{Deserialize, Serialize};

    #[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
    #[sea_orm(table_name = "a009_ticket_message")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: String,
        pub ticket_id: String,
        pub line_no: i32,
        pub author_id: String,
        pub author_name: String,
        pub is_staff: bool,
        pub body: String,
        pub created_at: chrono::DateTime<chrono::Utc>,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}
}

fn to_aggregate(m: Model, lines: Vec<message::Model>) -> Ticket {
    let metadata = EntityMetadata::restore(m.created_at, m.updated_at, m.is_deleted, m.version);
    let uuid = Uuid::parse_str(&m.id).unwrap_or_else(|_| Uuid::new_v4());

    Ticket {
        base: BaseAggregate::with_metadata(TicketId(uuid), m.code, m.description, m.comment, metadata),
        category: TicketCategory::from_code(&m.category).unwrap_or_default(),
        priority: TaskPriority::from_code(&m.priority).unwrap_or_default(),
        status: TicketStatus::from_code(&m.status).unwrap_or_default(),
        created_by: m.created_by,
        dealer_id: m.dealer_id,
        messages: lines
            .into_iter()
            .map(|l| TicketMessage {
                author_id: l.author_id,
                author_name: l.author_name,
                is_staff: l.is_staff,
                body: l.body,
                created_at: l.created_at,
            })
            .collect(),
    }
}

#[derive(Debug, Clone, FromQueryResult)]
struct TicketRow {
    id: String,
    code: String,
    description: String,
    category: String,
    priority: String,
    status: String,
    created_by: String,
    created_by_name: Option<String>,
    messages: i64,
    updated_at: Option<String>,
}

impl From<TicketRow> for TicketListItem {
    fn from(r: TicketRow) -> Self {
        TicketListItem {
            id: r.id,
            code: r.code,
            subject: r.description,
            category: TicketCategory::from_code(&r.category).unwrap_or_default(),
            priority: TaskPriority::from_code(&r.priority).unwrap_or_default(),
            status: TicketStatus::from_code(&r.status).unwrap_or_default(),
            created_by: r.created_by,
            created_by_name: r.created_by_name.unwrap_or_default(),
            messages: r.messages,
            updated_at: r.updated_at.unwrap_or_default(),
        }
    }
}

fn conn() -> anyhow::Result<&'static DatabaseConnection> {
    get_connection()
}

fn active_model(aggregate: &Ticket) -> ActiveModel {
    ActiveModel {
        id: Set(aggregate.to_string_id()),
        code: Set(aggregate.base.code.clone()),
        description: Set(aggregate.base.description.clone()),
        comment: Set(aggregate.base.comment.clone()),
        category: Set(aggregate.category.code().to_string()),
        priority: Set(aggregate.priority.code().to_string()),
        status: Set(aggregate.status.code().to_string()),
        created_by: Set(aggregate.created_by.clone()),
        dealer_id: Set(aggregate.dealer_id.clone()),
        is_deleted: Set(aggregate.base.metadata.is_deleted),
        created_at: Set(Some(aggregate.base.metadata.created_at)),
        updated_at: Set(Some(aggregate.base.metadata.updated_at)),
        version: Set(aggregate.base.metadata.version),
    }
}

fn message_model(ticket_id: &str, line_no: usize, m: &TicketMessage) -> message::ActiveModel {
    message::ActiveModel {
        id: Set(Uuid::new_v4().to_string()),
        ticket_id: Set(ticket_id.to_string()),
        line_no: Set(line_no as i32),
        author_id: Set(m.author_id.clone()),
        author_name: Set(m.author_name.clone()),
        is_staff: Set(m.is_staff),
        body: Set(m.body.clone()),
        created_at: Set(m.created_at),
    }
}

const LIST_SELECT: &str = "t.id, t.code, t.description, t.category, t.priority, t.status, t.created_by, \
     COALESCE(u.full_name, u.username) AS created_by_name, \
     (SELECT COUNT(*) FROM a009_ticket_message m WHERE m.ticket_id = t.id) AS messages, \
     t.updated_at";

const LIST_FROM: &str = "a009_ticket t LEFT JOIN sys_users u ON u.id = t.created_by";

const SORTABLE: &[&str] = &["t.code", "t.status", "t.priority", "t.updated_at"];

/// `own_user_id` ограничивает список обращениями автора (не для поддержки)
pub async fn list_paged(query: &ListQuery, own_user_id: Option<&str>) -> anyhow::Result<(Vec<TicketListItem>, usize)> {
    let filter = SqlFilter::new()
        .raw("t.is_deleted = 0")
        .eq("t.status", query.status())
        .eq("t.created_by", own_user_id)
        .search(&["t.code", "t.description", "u.username", "u.full_name"], query.search_pattern());
    let total = count_rows(LIST_FROM, &filter).await?;
    let order = format!(
        "{} {}",
        query.sort_column(SORTABLE, "t.updated_at"),
        if query.sort_by.is_none() { "DESC" } else { query.sort_direction() }
    );
    let items = fetch_rows::<TicketRow>(LIST_SELECT, LIST_FROM, &filter, &order, query)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok((items, total))
}

pub async fn get_by_id(id: &str) -> anyhow::Result<Option<Ticket>> {
    let db = conn()?;
    let head = Entity::find_by_id(id.to_string())
        .filter(Column::IsDeleted.eq(false))
        .one(db)
        .await?;
    let Some(head) = head else {
        return Ok(None);
    };
    let lines = message::Entity::find()
        .filter(message::Column::TicketId.eq(id))
        .order_by_asc(message::Column::LineNo)
        .all(db)
        .await?;
    Ok(Some(to_aggregate(head, lines)))
}

/// Шапка и первое сообщение одной транзакцией
pub async fn insert(aggregate: &Ticket) -> anyhow::Result<String> {
    let id = aggregate.to_string_id();
    let txn = conn()?.begin().await?;
    active_model(aggregate).insert(&txn).await?;
    for (index, m) in aggregate.messages.iter().enumerate() {
        message_model(&id, index + 1, m).insert(&txn).await?;
    }
    txn.commit().await?;
    Ok(id)
}

/// Новый статус шапки и последнее сообщение переписки
pub async fn append_message(aggregate: &Ticket) -> anyhow::Result<()> {
    let id = aggregate.to_string_id();
    let txn = conn()?.begin().await?;
    let mut head = active_model(aggregate);
    head.created_at = sea_orm::ActiveValue::NotSet;
    head.update(&txn).await?;
    if let Some(last) = aggregate.messages.last() {
        message_model(&id, aggregate.messages.len(), last).insert(&txn).await?;
    }
    txn.commit().await?;
    Ok(())
}

pub async fn update(aggregate: &Ticket) -> anyhow::Result<()> {
    let mut active = active_model(aggregate);
    active.created_at = sea_orm::ActiveValue::NotSet;
    active.update(conn()?).await?;
    Ok(())
}
