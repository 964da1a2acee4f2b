use chrono::{NaiveDate, Utc};
use contracts::domain::a006_policy::aggregate::{Policy, PolicyId, PolicyListItem};
use contracts::domain::common::{BaseAggregate, EntityMetadata};
use contracts::enums::{Currency, PolicyStatus, PolicyType};
use contracts::shared::pagination::ListQuery;
use contracts::system::roles::DataScope;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use sea_orm::entity::prelude::*;
use sea_orm::{ColumnTrait, EntityTrait, FromQueryResult, PaginatorTrait, QueryFilter, Set};

use crate::shared::data::db::get_connection;
use crate::shared::data::query::{count_rows, fetch_rows, statement, SqlFilter};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "a006_policy")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub code: String,
    pub description: String,
    pub comment: Option<String>,
    pub policy_no: String,
    pub policy_type: String,
    pub customer_id: String,
    pub vehicle_id: Option<String>,
    pub dealer_id: String,
    pub price_list_id: Option<String>,
    pub currency: String,
    pub premium: f64,
    pub commission: f64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: String,
    pub issued_at: Option<chrono::DateTime<chrono::Utc>>,
    pub cancelled_at: Option<chrono::DateTime<chrono::Utc>>,
    pub cancel_reason: Option<String>,
    pub is_deleted: bool,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
    pub version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Policy {
    fn from(m: Model) -> Self {
        let metadata = EntityMetadata::restore(m.created_at, m.updated_at, m.is_deleted, m.version);
        let uuid = Uuid::parse_str(&m.id).unwrap_or_else(|_| Uuid::new_v4());

        Policy {
            base: BaseAggregate::with_metadata(PolicyId(uuid), m.code, m.description, m.comment, metadata),
            policy_no: m.policy_no,
            policy_type: PolicyType::from_code(&m.policy_type).unwrap_or_default(),
            customer_id: m.customer_id,
            vehicle_id: m.vehicle_id,
            dealer_id: m.dealer_id,
            price_list_id: m.price_list_id,
            currency: Currency::from_code(&m.currency).unwrap_or_default(),
            premium: m.premium,
            commission: m.commission,
            start_date: m.start_date,
            end_date: m.end_date,
            status: PolicyStatus::from_code(&m.status).unwrap_or_default(),
            issued_at: m.issued_at,
            cancelled_at: m.cancelled_at,
            cancel_reason: m.cancel_reason,
        }
    }
}

/// Строка списка с именами клиента/дилера и номером ТС
#[derive(Debug, Clone, FromQueryResult)]
pub struct PolicyRow {
    pub id: String,
    pub code: String,
    pub policy_no: String,
    pub policy_type: String,
    pub status: String,
    pub customer_id: String,
    pub customer_name: Option<String>,
    pub vehicle_plate: Option<String>,
    pub dealer_id: String,
    pub dealer_name: Option<String>,
    pub currency: String,
    pub premium: f64,
    pub commission: f64,
    pub start_date: String,
    pub end_date: String,
}

impl From<PolicyRow> for PolicyListItem {
    fn from(r: PolicyRow) -> Self {
        PolicyListItem {
            id: r.id,
            code: r.code,
            policy_no: r.policy_no,
            policy_type: PolicyType::from_code(&r.policy_type).unwrap_or_default(),
            status: PolicyStatus::from_code(&r.status).unwrap_or_default(),
            customer_id: r.customer_id,
            customer_name: r.customer_name.unwrap_or_default(),
            vehicle_plate: r.vehicle_plate,
            dealer_id: r.dealer_id,
            dealer_name: r.dealer_name.unwrap_or_default(),
            currency: Currency::from_code(&r.currency).unwrap_or_default(),
            premium: r.premium,
            commission: r.commission,
            start_date: r.start_date,
            end_date: r.end_date,
        }
    }
}

fn conn() -> anyhow::Result<&'static DatabaseConnection> {
    get_connection()
}

fn active_model(aggregate: &Policy) -> ActiveModel {
    ActiveModel {
        id: Set(aggregate.to_string_id()),
        code: Set(aggregate.base.code.clone()),
        description: Set(aggregate.base.description.clone()),
        comment: Set(aggregate.base.comment.clone()),
        policy_no: Set(aggregate.policy_no.clone()),
        policy_type: Set(aggregate.policy_type.code().to_string()),
        customer_id: Set(aggregate.customer_id.clone()),
        vehicle_id: Set(aggregate.vehicle_id.clone()),
        dealer_id: Set(aggregate.dealer_id.clone()),
        price_list_id: Set(aggregate.price_list_id.clone()),
        currency: Set(aggregate.currency.code().to_string()),
        premium: Set(aggregate.premium),
        commission: Set(aggregate.commission),
        start_date: Set(aggregate.start_date),
        end_date: Set(aggregate.end_date),
        status: Set(aggregate.status.code().to_string()),
        issued_at: Set(aggregate.issued_at),
        cancelled_at: Set(aggregate.cancelled_at),
        cancel_reason: Set(aggregate.cancel_reason.clone()),
        is_deleted: Set(aggregate.base.metadata.is_deleted),
        created_at: Set(Some(aggregate.base.metadata.created_at)),
        updated_at: Set(Some(aggregate.base.metadata.updated_at)),
        version: Set(aggregate.base.metadata.version),
    }
}

const LIST_SELECT: &str = "t.id, t.code, t.policy_no, t.policy_type, t.status, t.customer_id, \
     c.description AS customer_name, v.plate_number AS vehicle_plate, t.dealer_id, \
     d.description AS dealer_name, t.currency, t.premium, t.commission, t.start_date, t.end_date";

const LIST_FROM: &str = "a006_policy t \
     LEFT JOIN a002_customer c ON c.id = t.customer_id \
     LEFT JOIN a003_vehicle v ON v.id = t.vehicle_id \
     LEFT JOIN a001_dealer d ON d.id = t.dealer_id";

const SORTABLE: &[&str] = &[
    "t.code",
    "t.policy_no",
    "customer_name",
    "t.premium",
    "t.start_date",
    "t.end_date",
    "t.status",
];

pub fn list_filter(query: &ListQuery, scope: &DataScope) -> SqlFilter {
    SqlFilter::new()
        .raw("t.is_deleted = 0")
        .eq("t.status", query.status())
        .eq("t.policy_type", query.policy_type())
        .eq("t.dealer_id", query.dealer_id())
        .eq("t.customer_id", query.customer_id())
        .date_between("t.start_date", query.date_from(), query.date_to())
        .search(
            &["t.code", "t.policy_no", "c.description", "c.national_id", "v.plate_number"],
            query.search_pattern(),
        )
        .scope(scope, "t.dealer_id", Some("t.customer_id"))
}

fn order_by(query: &ListQuery) -> String {
    format!(
        "{} {}, t.code DESC",
        query.sort_column(SORTABLE, "t.start_date"),
        if query.sort_by.is_none() { "DESC" } else { query.sort_direction() }
    )
}

pub async fn list_paged(query: &ListQuery, scope: &DataScope) -> anyhow::Result<(Vec<PolicyListItem>, usize)> {
    let filter = list_filter(query, scope);
    let total = count_rows(LIST_FROM, &filter).await?;
    let items = fetch_rows::<PolicyRow>(LIST_SELECT, LIST_FROM, &filter, &order_by(query), query)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok((items, total))
}

/// Весь отфильтрованный список без пагинации (для CSV)
pub async fn list_all_items(query: &ListQuery, scope: &DataScope) -> anyhow::Result<Vec<PolicyListItem>> {
    let filter = list_filter(query, scope);
    let sql = format!(
        "SELECT {} FROM {} {} ORDER BY {}",
        LIST_SELECT,
        LIST_FROM,
        filter.where_sql(),
        order_by(query)
    );
    let rows = PolicyRow::find_by_statement(statement(&sql, filter.values()))
        .all(conn()?)
        .await?;
    Ok(rows.into_iter().map(Into::into).collect())
}

pub async fn get_by_id(id: &str) -> anyhow::Result<Option<Policy>> {
    let result = Entity::find_by_id(id.to_string())
        .filter(Column::IsDeleted.eq(false))
        .one(conn()?)
        .await?;
    Ok(result.map(Into::into))
}

/// Действующие полисы с истёкшим сроком
pub async fn list_due_for_expiry(today: NaiveDate) -> anyhow::Result<Vec<Policy>> {
    let items = Entity::find()
        .filter(Column::IsDeleted.eq(false))
        .filter(Column::Status.eq(PolicyStatus::Active.code()))
        .filter(Column::EndDate.lt(today))
        .all(conn()?)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(items)
}

async fn count_active_by(column: Column, value: &str) -> anyhow::Result<u64> {
    let count = Entity::find()
        .filter(Column::IsDeleted.eq(false))
        .filter(Column::Status.eq(PolicyStatus::Active.code()))
        .filter(column.eq(value))
        .count(conn()?)
        .await?;
    Ok(count)
}

pub async fn count_active_by_dealer(dealer_id: &str) -> anyhow::Result<u64> {
    count_active_by(Column::DealerId, dealer_id).await
}

pub async fn count_active_by_customer(customer_id: &str) -> anyhow::Result<u64> {
    count_active_by(Column::CustomerId, customer_id).await
}

pub async fn count_active_by_vehicle(vehicle_id: &str) -> anyhow::Result<u64> {
    count_active_by(Column::VehicleId, vehicle_id).await
}

pub async fn insert(aggregate: &Policy) -> anyhow::Result<String> {
    active_model(aggregate).insert(conn()?).await?;
    Ok(aggregate.to_string_id())
}

pub async fn update(aggregate: &Policy) -> anyhow::Result<()> {
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
