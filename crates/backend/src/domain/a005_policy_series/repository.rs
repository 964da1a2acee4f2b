use chrono::Utc;
use contracts::domain::a005_policy_series::aggregate::{PolicySeries, PolicySeriesId};
use contracts::domain::common::{BaseAggregate, EntityMetadata};
use contracts::enums::PolicyType;
use contracts::shared::pagination::ListQuery;
use contracts::system::roles::DataScope;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use sea_orm::entity::prelude::*;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

use crate::shared::data::db::get_connection;
use crate::shared::data::query::{count_rows, fetch_models, SqlFilter};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "a005_policy_series")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub code: String,
    pub description: String,
    pub comment: Option<String>,
    pub dealer_id: String,
    pub policy_type: String,
    pub prefix: String,
    pub range_start: i64,
    pub range_end: i64,
    pub next_number: i64,
    pub is_deleted: bool,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
    pub version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for PolicySeries {
    fn from(m: Model) -> Self {
        let metadata = EntityMetadata::restore(m.created_at, m.updated_at, m.is_deleted, m.version);
        let uuid = Uuid::parse_str(&m.id).unwrap_or_else(|_| Uuid::new_v4());

        PolicySeries {
            base: BaseAggregate::with_metadata(PolicySeriesId(uuid), m.code, m.description, m.comment, metadata),
            dealer_id: m.dealer_id,
            policy_type: PolicyType::from_code(&m.policy_type).unwrap_or_default(),
            prefix: m.prefix,
            range_start: m.range_start,
            range_end: m.range_end,
            next_number: m.next_number,
        }
    }
}

fn conn() -> anyhow::Result<&'static DatabaseConnection> {
    get_connection()
}

fn active_model(aggregate: &PolicySeries) -> ActiveModel {
    ActiveModel {
        id: Set(aggregate.to_string_id()),
        code: Set(aggregate.base.code.clone()),
        description: Set(aggregate.base.description.clone()),
        comment: Set(aggregate.base.comment.clone()),
        dealer_id: Set(aggregate.dealer_id.clone()),
        policy_type: Set(aggregate.policy_type.code().to_string()),
        prefix: Set(aggregate.prefix.clone()),
        range_start: Set(aggregate.range_start),
        range_end: Set(aggregate.range_end),
        next_number: Set(aggregate.next_number),
        is_deleted: Set(aggregate.base.metadata.is_deleted),
        created_at: Set(Some(aggregate.base.metadata.created_at)),
        updated_at: Set(Some(aggregate.base.metadata.updated_at)),
        version: Set(aggregate.base.metadata.version),
    }
}

const SORTABLE: &[&str] = &["t.prefix", "t.range_start", "t.policy_type", "t.updated_at"];

pub async fn list_paged(query: &ListQuery, scope: &DataScope) -> anyhow::Result<(Vec<PolicySeries>, usize)> {
    let filter = SqlFilter::new()
        .raw("t.is_deleted = 0")
        .eq("t.dealer_id", query.dealer_id())
        .eq("t.policy_type", query.policy_type())
        .search(&["t.prefix", "t.description"], query.search_pattern())
        .scope(scope, "t.dealer_id", None);
    let from = "a005_policy_series t";
    let total = count_rows(from, &filter).await?;
    let order = format!(
        "{} {}",
        query.sort_column(SORTABLE, "t.prefix"),
        query.sort_direction()
    );
    let items = fetch_models::<Entity>(from, &filter, &order, query)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok((items, total))
}

/// Серии с тем же префиксом, для проверки пересечения диапазонов
pub async fn list_by_prefix(prefix: &str) -> anyhow::Result<Vec<PolicySeries>> {
    let items = Entity::find()
        .filter(Column::Prefix.eq(prefix))
        .filter(Column::IsDeleted.eq(false))
        .all(conn()?)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(items)
}

/// Серии дилера для вида страхования, в порядке расходования
pub async fn list_for_dealer(dealer_id: &str, policy_type: PolicyType) -> anyhow::Result<Vec<PolicySeries>> {
    let items = Entity::find()
        .filter(Column::DealerId.eq(dealer_id))
        .filter(Column::PolicyType.eq(policy_type.code()))
        .filter(Column::IsDeleted.eq(false))
        .order_by_asc(Column::RangeStart)
        .all(conn()?)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(items)
}

pub async fn get_by_id(id: &str) -> anyhow::Result<Option<PolicySeries>> {
    let result = Entity::find_by_id(id.to_string())
        .filter(Column::IsDeleted.eq(false))
        .one(conn()?)
        .await?;
    Ok(result.map(Into::into))
}

pub async fn insert(aggregate: &PolicySeries) -> anyhow::Result<String> {
    active_model(aggregate).insert(conn()?).await?;
    Ok(aggregate.to_string_id())
}

pub async fn update(aggregate: &PolicySeries) -> anyhow::Result<()> {
    let mut active = active_model(aggregate);
    active.created_at = sea_orm::ActiveValue::NotSet;
    active.update(conn()?).await?;
    Ok(())
}

/// Сдвиг счётчика только если его не успел сдвинуть параллельный выпуск
pub async fn advance_next_number(id: &str, expected: i64, next: i64) -> anyhow::Result<bool> {
    use sea_orm::sea_query::Expr;
    let result = Entity::update_many()
        .col_expr(Column::NextNumber, Expr::value(next))
        .col_expr(Column::UpdatedAt, Expr::value(Utc::now()))
        .filter(Column::Id.eq(id))
        .filter(Column::NextNumber.eq(expected))
        .exec(conn()?)
        .await?;
    Ok(result.rows_affected == 1)
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
