use chrono::Utc;
use contracts::domain::a001_dealer::aggregate::{Dealer, DealerId};
use contracts::domain::common::{BaseAggregate, EntityMetadata};
use contracts::shared::lookup::LookupItem;
use contracts::shared::pagination::ListQuery;
use contracts::system::roles::DataScope;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use sea_orm::entity::prelude::*;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

use crate::shared::data::db::get_connection;
use crate::shared::data::query::{count_rows, fetch_models, SqlFilter};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "a001_dealer")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub code: String,
    pub description: String,
    pub comment: Option<String>,
    pub tax_number: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub commission_rate: f64,
    pub observer_user_id: Option<String>,
    pub is_active: bool,
    pub is_deleted: bool,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
    pub version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Dealer {
    fn from(m: Model) -> Self {
        let metadata = EntityMetadata::restore(m.created_at, m.updated_at, m.is_deleted, m.version);
        let uuid = Uuid::parse_str(&m.id).unwrap_or_else(|_| Uuid::new_v4());

        Dealer {
            base: BaseAggregate::with_metadata(DealerId(uuid), m.code, m.description, m.comment, metadata),
            tax_number: m.tax_number,
            phone: m.phone,
            email: m.email,
            address: m.address,
            commission_rate: m.commission_rate,
            observer_user_id: m.observer_user_id,
            is_active: m.is_active,
        }
    }
}

fn conn() -> anyhow::Result<&'static DatabaseConnection> {
    get_connection()
}

fn active_model(aggregate: &Dealer) -> ActiveModel {
    ActiveModel {
        id: Set(aggregate.to_string_id()),
        code: Set(aggregate.base.code.clone()),
        description: Set(aggregate.base.description.clone()),
        comment: Set(aggregate.base.comment.clone()),
        tax_number: Set(aggregate.tax_number.clone()),
        phone: Set(aggregate.phone.clone()),
        email: Set(aggregate.email.clone()),
        address: Set(aggregate.address.clone()),
        commission_rate: Set(aggregate.commission_rate),
        observer_user_id: Set(aggregate.observer_user_id.clone()),
        is_active: Set(aggregate.is_active),
        is_deleted: Set(aggregate.base.metadata.is_deleted),
        created_at: Set(Some(aggregate.base.metadata.created_at)),
        updated_at: Set(Some(aggregate.base.metadata.updated_at)),
        version: Set(aggregate.base.metadata.version),
    }
}

const SORTABLE: &[&str] = &["t.code", "t.description", "t.commission_rate", "t.updated_at"];

fn list_filter(query: &ListQuery, scope: &DataScope) -> SqlFilter {
    SqlFilter::new()
        .raw("t.is_deleted = 0")
        .search(&["t.code", "t.description", "t.tax_number", "t.email"], query.search_pattern())
        .scope(scope, "t.id", None)
}

pub async fn list_paged(query: &ListQuery, scope: &DataScope) -> anyhow::Result<(Vec<Dealer>, usize)> {
    let filter = list_filter(query, scope);
    let from = "a001_dealer t";
    let total = count_rows(from, &filter).await?;
    let order = format!(
        "{} {}",
        query.sort_column(SORTABLE, "t.description"),
        query.sort_direction()
    );
    let items = fetch_models::<Entity>(from, &filter, &order, query)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok((items, total))
}

/// Активные дилеры для выпадающих списков
pub async fn lookup(scope: &DataScope) -> anyhow::Result<Vec<LookupItem>> {
    let mut select = Entity::find()
        .filter(Column::IsDeleted.eq(false))
        .filter(Column::IsActive.eq(true));
    match scope {
        DataScope::All => {}
        DataScope::Dealer(id) => select = select.filter(Column::Id.eq(id.as_str())),
        DataScope::Observer(user_id) => select = select.filter(Column::ObserverUserId.eq(user_id.as_str())),
        DataScope::Customer(_) | DataScope::Nothing => return Ok(Vec::new()),
    }
    let items = select
        .order_by_asc(Column::Description)
        .all(conn()?)
        .await?
        .into_iter()
        .map(|m| LookupItem {
            id: m.id,
            code: m.code,
            name: m.description,
        })
        .collect();
    Ok(items)
}

pub async fn get_by_id(id: &str) -> anyhow::Result<Option<Dealer>> {
    let result = Entity::find_by_id(id.to_string())
        .filter(Column::IsDeleted.eq(false))
        .one(conn()?)
        .await?;
    Ok(result.map(Into::into))
}

pub async fn get_by_tax_number(tax_number: &str) -> anyhow::Result<Option<Dealer>> {
    let result = Entity::find()
        .filter(Column::TaxNumber.eq(tax_number))
        .filter(Column::IsDeleted.eq(false))
        .one(conn()?)
        .await?;
    Ok(result.map(Into::into))
}

pub async fn insert(aggregate: &Dealer) -> anyhow::Result<String> {
    active_model(aggregate).insert(conn()?).await?;
    Ok(aggregate.to_string_id())
}

pub async fn update(aggregate: &Dealer) -> anyhow::Result<()> {
    let mut active = active_model(aggregate);
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
