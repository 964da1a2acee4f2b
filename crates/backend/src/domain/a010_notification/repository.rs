use contracts::domain::a010_notification::aggregate::{NewNotification, Notification};
use contracts::enums::NotificationKind;
use contracts::shared::pagination::ListQuery;
use serde::{Deserialize, Serialize};

use sea_orm::entity::prelude::*;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, Set};

use crate::shared::data::db::get_connection;
use crate::shared::data::query::{count_rows, fetch_models, SqlFilter};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "a010_notification")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    pub kind: String,
    pub title: String,
    pub body: String,
    pub link: Option<String>,
    pub is_read: bool,
    pub created_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Notification {
    fn from(m: Model) -> Self {
        Notification {
            id: m.id,
            user_id: m.user_id,
            kind: NotificationKind::from_code(&m.kind).unwrap_or_default(),
            title: m.title,
            body: m.body,
            link: m.link,
            is_read: m.is_read,
            created_at: m.created_at,
        }
    }
}

fn conn() -> anyhow::Result<&'static DatabaseConnection> {
    get_connection()
}

pub async fn insert(notification: &NewNotification) -> anyhow::Result<String> {
    let id = uuid::Uuid::new_v4().to_string();
    let active = ActiveModel {
        id: Set(id.clone()),
        user_id: Set(notification.user_id.clone()),
        kind: Set(notification.kind.code().to_string()),
        title: Set(notification.title.clone()),
        body: Set(notification.body.clone()),
        link: Set(notification.link.clone()),
        is_read: Set(false),
        created_at: Set(chrono::Utc::now().to_rfc3339()),
    };
    active.insert(conn()?).await?;
    Ok(id)
}

pub async fn list_for_user(user_id: &str, query: &ListQuery) -> anyhow::Result<(Vec<Notification>, usize)> {
    let mut filter = SqlFilter::new().eq("t.user_id", Some(user_id));
    if query.unread_only {
        filter = filter.raw("t.is_read = 0");
    }
    let from = "a010_notification t";
    let total = count_rows(from, &filter).await?;
    let items = fetch_models::<Entity>(from, &filter, "t.created_at DESC", query)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok((items, total))
}

pub async fn count_unread(user_id: &str) -> anyhow::Result<u64> {
    let count = Entity::find()
        .filter(Column::UserId.eq(user_id))
        .filter(Column::IsRead.eq(false))
        .count(conn()?)
        .await?;
    Ok(count)
}

/// Только свои уведомления; false если записи нет или она чужая
pub async fn mark_read(user_id: &str, id: &str) -> anyhow::Result<bool> {
    use sea_orm::sea_query::Expr;
    let result = Entity::update_many()
        .col_expr(Column::IsRead, Expr::value(true))
        .filter(Column::Id.eq(id))
        .filter(Column::UserId.eq(user_id))
        .exec(conn()?)
        .await?;
    Ok(result.rows_affected > 0)
}

pub async fn mark_all_read(user_id: &str) -> anyhow::Result<u64> {
    use sea_orm::sea_query::Expr;
    let result = Entity::update_many()
        .col_expr(Column::IsRead, Expr::value(true))
        .filter(Column::UserId.eq(user_id))
        .filter(Column::IsRead.eq(false))
        .exec(conn()?)
        .await?;
    Ok(result.rows_affected)
}
