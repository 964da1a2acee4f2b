use chrono::Utc;
use contracts::domain::a003_vehicle::aggregate::{Vehicle, VehicleId};
use contracts::domain::common::{BaseAggregate, EntityMetadata};
use contracts::enums::VehicleUsage;
use contracts::shared::lookup::LookupItem;
use contracts::shared::pagination::ListQuery;
use contracts::system::roles::DataScope;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use sea_orm::entity::prelude::*;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

use crate::shared::data::db::get_connection;
use crate::shared::data::query::{count_rows, fetch_models, SqlFilter};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "a003_vehicle")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub code: String,
    pub description: String,
    pub comment: Option<String>,
    pub customer_id: String,
    pub dealer_id: String,
    pub plate_number: String,
    pub vin: String,
    pub brand: String,
    pub model: String,
    pub model_year: i32,
    pub usage: String,
    pub is_deleted: bool,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
    pub version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Vehicle {
    fn from(m: Model) -> Self {
        let metadata = EntityMetadata::restore(m.created_at, m.updated_at, m.is_deleted, m.version);
        let uuid = Uuid::parse_str(&m.id).unwrap_or_else(|_| Uuid::new_v4());

        Vehicle {
            base: BaseAggregate::with_metadata(VehicleId(uuid), m.code, m.description, m.comment, metadata),
            customer_id: m.customer_id,
            dealer_id: m.dealer_id,
            plate_number: m.plate_number,
            vin: m.vin,
            brand: m.brand,
            model: m.model,
            model_year: m.model_year,
            usage: VehicleUsage::from_code(&m.usage).unwrap_or_default(),
        }
    }
}

fn conn() -> anyhow::Result<&'static DatabaseConnection> {
    get_connection()
}

fn active_model(aggregate: &Vehicle) -> ActiveModel {
    ActiveModel {
        id: Set(aggregate.to_string_id()),
        code: Set(aggregate.base.code.clone()),
        description: Set(aggregate.base.description.clone()),
        comment: Set(aggregate.base.comment.clone()),
        customer_id: Set(aggregate.customer_id.clone()),
        dealer_id: Set(aggregate.dealer_id.clone()),
        plate_number: Set(aggregate.plate_number.clone()),
        vin: Set(aggregate.vin.clone()),
        brand: Set(aggregate.brand.clone()),
        model: Set(aggregate.model.clone()),
        model_year: Set(aggregate.model_year),
        usage: Set(aggregate.usage.code().to_string()),
        is_deleted: Set(aggregate.base.metadata.is_deleted),
        created_at: Set(Some(aggregate.base.metadata.created_at)),
        updated_at: Set(Some(aggregate.base.metadata.updated_at)),
        version: Set(aggregate.base.metadata.version),
    }
}

const SORTABLE: &[&str] = &["t.plate_number", "t.brand", "t.model_year", "t.updated_at"];

pub async fn list_paged(query: &ListQuery, scope: &DataScope) -> anyhow::Result<(Vec<Vehicle>, usize)> {
    let filter = SqlFilter::new()
        .raw("t.is_deleted = 0")
        .eq("t.customer_id", query.customer_id())
        .eq("t.dealer_id", query.dealer_id())
        .eq("t.usage", query.status())
        .search(
            &["t.plate_number", "t.vin", "t.brand", "t.model"],
            query.search_pattern(),
        )
        .scope(scope, "t.dealer_id", Some("t.customer_id"));
    let from = "a003_vehicle t";
    let total = count_rows(from, &filter).await?;
    let order = format!(
        "{} {}",
        query.sort_column(SORTABLE, "t.plate_number"),
        query.sort_direction()
    );
    let items = fetch_models::<Entity>(from, &filter, &order, query)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok((items, total))
}

/// ТС клиента для выбора в форме полиса
pub async fn lookup_by_customer(customer_id: &str) -> anyhow::Result<Vec<LookupItem>> {
    let items = Entity::find()
        .filter(Column::CustomerId.eq(customer_id))
        .filter(Column::IsDeleted.eq(false))
        .order_by_asc(Column::PlateNumber)
        .all(conn()?)
        .await?
        .into_iter()
        .map(|m| LookupItem {
            id: m.id,
            code: m.plate_number,
            name: format!("{} {} ({})", m.brand, m.model, m.model_year),
        })
        .collect();
    Ok(items)
}

pub async fn get_by_id(id: &str) -> anyhow::Result<Option<Vehicle>> {
    let result = Entity::find_by_id(id.to_string())
        .filter(Column::IsDeleted.eq(false))
        .one(conn()?)
        .await?;
    Ok(result.map(Into::into))
}

pub async fn get_by_plate(plate_number: &str) -> anyhow::Result<Option<Vehicle>> {
    let result = Entity::find()
        .filter(Column::PlateNumber.eq(plate_number))
        .filter(Column::IsDeleted.eq(false))
        .one(conn()?)
        .await?;
    Ok(result.map(Into::into))
}

pub async fn get_by_vin(vin: &str) -> anyhow::Result<Option<Vehicle>> {
    let result = Entity::find()
        .filter(Column::Vin.eq(vin))
        .filter(Column::IsDeleted.eq(false))
        .one(conn()?)
        .await?;
    Ok(result.map(Into::into))
}

pub async fn insert(aggregate: &Vehicle) -> anyhow::Result<String> {
    active_model(aggregate).insert(conn()?).await?;
    Ok(aggregate.to_string_id())
}

pub async fn update(aggregate: &Vehicle) -> anyhow::Result<()> {
    let mut active = active_model(aggregate);
    active.created_at = sea_orm::ActiveValue::NotSet;
    active.update(conn()?).await?;
    Ok(())
}

/// Переносит все ТС клиента к новому дилеру, возвращает число строк
pub async fn reassign_dealer(customer_id: &str, dealer_id: &str) -> anyhow::Result<u64> {
    use sea_orm::sea_query::Expr;
    let result = Entity::update_many()
        .col_expr(Column::DealerId, Expr::value(dealer_id))
        .col_expr(Column::UpdatedAt, Expr::value(Utc::now()))
        .filter(Column::CustomerId.eq(customer_id))
        .exec(conn()?)
        .await?;
    Ok(result.rows_affected)
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
