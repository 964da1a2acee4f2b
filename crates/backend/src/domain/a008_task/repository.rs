use chrono::{NaiveDate, Utc};
use contracts::domain::a008_task::aggregate::{Task, TaskId};
use contracts::domain::common::{BaseAggregate, EntityMetadata};
use contracts::enums::{TaskPriority, TaskStatus};
use contracts::shared::pagination::ListQuery;
use contracts::system::roles::DataScope;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use sea_orm::entity::prelude::*;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, Set, Value};

use crate::shared::data::db::get_connection;
use crate::shared::data::query::{count_rows, fetch_models, SqlFilter};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "a008_task")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub code: String,
    pub description: String,
    pub comment: Option<String>,
    pub details: Option<String>,
    pub assignee_user_id: String,
    pub dealer_id: Option<String>,
    pub due_date: NaiveDate,
    pub priority: String,
    pub status: String,
    pub created_by: String,
    pub overdue_notified: bool,
    pub is_deleted: bool,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
    pub version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Task {
    fn from(m: Model) -> Self {
        let metadata = EntityMetadata::restore(m.created_at, m.updated_at, m.is_deleted, m.version);
        let uuid = Uuid::parse_str(&m.id).unwrap_or_else(|_| Uuid::new_v4());

        Task {
            base: BaseAggregate::with_metadata(TaskId(uuid), m.code, m.description, m.comment, metadata),
            details: m.details,
            assignee_user_id: m.assignee_user_id,
            dealer_id: m.dealer_id,
            due_date: m.due_date,
            priority: TaskPriority::from_code(&m.priority).unwrap_or_default(),
            status: TaskStatus::from_code(&m.status).unwrap_or_default(),
            created_by: m.created_by,
            overdue_notified: m.overdue_notified,
        }
    }
}

fn conn() -> anyhow::Result<&'static DatabaseConnection> {
    get_connection()
}

fn active_model(aggregate: &Task) -> ActiveModel {
    ActiveModel {
        id: Set(aggregate.to_string_id()),
        code: Set(aggregate.base.code.clone()),
        description: Set(aggregate.base.description.clone()),
        comment: Set(aggregate.base.comment.clone()),
        details: Set(aggregate.details.clone()),
        assignee_user_id: Set(aggregate.assignee_user_id.clone()),
        dealer_id: Set(aggregate.dealer_id.clone()),
        due_date: Set(aggregate.due_date),
        priority: Set(aggregate.priority.code().to_string()),
        status: Set(aggregate.status.code().to_string()),
        created_by: Set(aggregate.created_by.clone()),
        overdue_notified: Set(aggregate.overdue_notified),
        is_deleted: Set(aggregate.base.metadata.is_deleted),
        created_at: Set(Some(aggregate.base.metadata.created_at)),
        updated_at: Set(Some(aggregate.base.metadata.updated_at)),
        version: Set(aggregate.base.metadata.version),
    }
}

/// Дилер видит задачи своего дилера и назначенные на него лично
pub fn visibility(scope: &DataScope, user_id: &str) -> Option<(String, Vec<Value>)> {
    match scope {
        DataScope::All => None,
        DataScope::Dealer(dealer_id) => Some((
            "(t.dealer_id = ? OR t.assignee_user_id = ?)".to_string(),
            vec![dealer_id.clone().into(), user_id.into()],
        )),
        _ => Some(("t.assignee_user_id = ?".to_string(), vec![user_id.into()])),
    }
}

const SORTABLE: &[&str] = &["t.code", "t.due_date", "t.priority", "t.status", "t.updated_at"];

pub async fn list_paged(query: &ListQuery, scope: &DataScope, user_id: &str) -> anyhow::Result<(Vec<Task>, usize)> {
    let mut filter = SqlFilter::new()
        .raw("t.is_deleted = 0")
        .eq("t.status", query.status())
        .eq("t.dealer_id", query.dealer_id())
        .date_between("t.due_date", query.date_from(), query.date_to())
        .search(&["t.code", "t.description", "t.details"], query.search_pattern());
    if let Some((clause, values)) = visibility(scope, user_id) {
        filter = filter.push(&clause, values);
    }
    let from = "a008_task t";
    let total = count_rows(from, &filter).await?;
    let order = format!(
        "{} {}",
        query.sort_column(SORTABLE, "t.due_date"),
        query.sort_direction()
    );
    let items = fetch_models::<Entity>(from, &filter, &order, query)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok((items, total))
}

/// Незакрытые просроченные задачи без отправленного напоминания
pub async fn list_overdue_unnotified(today: NaiveDate) -> anyhow::Result<Vec<Task>> {
    let items = Entity::find()
        .filter(Column::IsDeleted.eq(false))
        .filter(Column::OverdueNotified.eq(false))
        .filter(Column::DueDate.lt(today))
        .filter(Column::Status.is_in([TaskStatus::Open.code(), TaskStatus::InProgress.code()]))
        .all(conn()?)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(items)
}

pub async fn get_by_id(id: &str) -> anyhow::Result<Option<Task>> {
    let result = Entity::find_by_id(id.to_string())
        .filter(Column::IsDeleted.eq(false))
        .one(conn()?)
        .await?;
    Ok(result.map(Into::into))
}

pub async fn insert(aggregate: &Task) -> anyhow::Result<String> {
    active_model(aggregate).insert(conn()?).await?;
    Ok(aggregate.to_string_id())
}

pub async fn update(aggregate: &Task) -> anyhow::Result<()> {
    let mut active = active_model(aggregate);
    active.created_at = sea_orm::ActiveValue::NotSet;
    active.update(conn()?).await?;
    Ok(())
}

pub async fn mark_overdue_notified(id: &str) -> anyhow::Result<()> {
    use sea_orm::sea_query::Expr;
    Entity::update_many()
        .col_expr(Column::OverdueNotified, Expr::value(true))
        .filter(Column::Id.eq(id))
        .exec(conn()?)
        .await?;
    Ok(())
}

pub async fn soft_delete(id: &str) -> anyhow::Result<bool> {
    use sea_orm::sea_query::Expr;
    let result = Entity::update_many()
        .col_expr(Column::IsDeleted, Expr::value(true))
        .col_expr(Column::UpdatedAt, Expr::value(Utc::now()))
        .filter(Column::Id.eq(id))
        .exec(conn()?)
        .await?;
    Ok(result.rows_affected > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visibility() {
        assert!(visibility(&DataScope::All, "u1").is_none());

        let (sql, values) = visibility(&DataScope::Dealer("d1".into()), "u1").unwrap();
        assert_eq!(sql, "(t.dealer_id = ? OR t.assignee_user_id = ?)");
        assert_eq!(values, vec![Value::from("d1"), Value::from("u1")]);

        let (sql, _) = visibility(&DataScope::Nothing, "u1").unwrap();
        assert_eq!(sql, "t.assignee_user_id = ?");
    }
}
