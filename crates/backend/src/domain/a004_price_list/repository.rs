use chrono::{NaiveDate, Utc};
use contracts::domain::a004_price_list::aggregate::{PriceList, PriceListId, PriceRate};
use contracts::domain::common::{BaseAggregate, EntityMetadata};
use contracts::enums::{Currency, PolicyType};
use contracts::shared::pagination::ListQuery;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use sea_orm::entity::prelude::*;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, Set};

use crate::shared::data::db::get_connection;
use crate::shared::data::query::{count_rows, fetch_models, SqlFilter};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "a004_price_list")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub code: String,
    pub description: String,
    pub comment: Option<String>,
    pub policy_type: String,
    pub currency: String,
    pub valid_from: NaiveDate,
    pub valid_to: NaiveDate,
    pub list_version: i32,
    /// Тарифы `[{"tier": "...", "premium": ...}]`
    pub rates_json: String,
    pub is_deleted: bool,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
    pub version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for PriceList {
    fn from(m: Model) -> Self {
        let metadata = EntityMetadata::restore(m.created_at, m.updated_at, m.is_deleted, m.version);
        let uuid = Uuid::parse_str(&m.id).unwrap_or_else(|_| Uuid::new_v4());
        let rates: Vec<PriceRate> = serde_json::from_str(&m.rates_json).unwrap_or_else(|e| {
            tracing::warn!("Price list {} has unreadable rates: {}", m.code, e);
            Vec::new()
        });

        PriceList {
            base: BaseAggregate::with_metadata(PriceListId(uuid), m.code, m.description, m.comment, metadata),
            policy_type: PolicyType::from_code(&m.policy_type).unwrap_or_default(),
            currency: Currency::from_code(&m.currency).unwrap_or_default(),
            valid_from: m.valid_from,
            valid_to: m.valid_to,
            version: m.list_version,
            rates,
        }
    }
}

fn conn() -> anyhow::Result<&'static DatabaseConnection> {
    get_connection()
}

fn active_model(aggregate: &PriceList) -> anyhow::Result<ActiveModel> {
    Ok(ActiveModel {
        id: Set(aggregate.to_string_id()),
        code: Set(aggregate.base.code.clone()),
        description: Set(aggregate.base.description.clone()),
        comment: Set(aggregate.base.comment.clone()),
        policy_type: Set(aggregate.policy_type.code().to_string()),
        currency: Set(aggregate.currency.code().to_string()),
        valid_from: Set(aggregate.valid_from),
        valid_to: Set(aggregate.valid_to),
        list_version: Set(aggregate.version),
        rates_json: Set(serde_json::to_string(&aggregate.rates)?),
        is_deleted: Set(aggregate.base.metadata.is_deleted),
        created_at: Set(Some(aggregate.base.metadata.created_at)),
        updated_at: Set(Some(aggregate.base.metadata.updated_at)),
        version: Set(aggregate.base.metadata.version),
    })
}

const SORTABLE: &[&str] = &["t.code", "t.valid_from", "t.list_version", "t.policy_type"];

pub async fn list_paged(query: &ListQuery) -> anyhow::Result<(Vec<PriceList>, usize)> {
    let filter = SqlFilter::new()
        .raw("t.is_deleted = 0")
        .eq("t.policy_type", query.policy_type())
        .eq("t.currency", query.status())
        .search(&["t.code", "t.description"], query.search_pattern())
        .date_between("t.valid_to", query.date_from(), None)
        .date_between("t.valid_from", None, query.date_to());
    let from = "a004_price_list t";
    let total = count_rows(from, &filter).await?;
    let order = format!(
        "{} {}",
        query.sort_column(SORTABLE, "t.valid_from"),
        query.sort_direction()
    );
    let items = fetch_models::<Entity>(from, &filter, &order, query)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok((items, total))
}

/// Все живые прайс-листы вида и валюты: для версий и подбора цены
pub async fn list_for(policy_type: PolicyType, currency: Currency) -> anyhow::Result<Vec<PriceList>> {
    let items = Entity::find()
        .filter(Column::IsDeleted.eq(false))
        .filter(Column::PolicyType.eq(policy_type.code()))
        .filter(Column::Currency.eq(currency.code()))
        .all(conn()?)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(items)
}

pub async fn get_by_id(id: &str) -> anyhow::Result<Option<PriceList>> {
    let result = Entity::find_by_id(id.to_string())
        .filter(Column::IsDeleted.eq(false))
        .one(conn()?)
        .await?;
    Ok(result.map(Into::into))
}

pub async fn insert(aggregate: &PriceList) -> anyhow::Result<String> {
    active_model(aggregate)?.insert(conn()?).await?;
    Ok(aggregate.to_string_id())
}

pub async fn update(aggregate: &PriceList) -> anyhow::Result<()> {
    let mut active = active_model(aggregate)?;
    active.created_at = sea_orm::ActiveValue::NotSet;
    active.update(conn()?).await?;
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
