use chrono::NaiveDate;
use contracts::domain::a007_claim::aggregate::{Claim, ClaimId, ClaimListItem};
use contracts::domain::common::{BaseAggregate, EntityMetadata};
use contracts::enums::ClaimStatus;
use contracts::shared::pagination::ListQuery;
use contracts::system::roles::DataScope;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use sea_orm::entity::prelude::*;
use sea_orm::{ColumnTrait, EntityTrait, FromQueryResult, QueryFilter, Set};

use crate::shared::data::db::get_connection;
use crate::shared::data::query::{count_rows, fetch_rows, SqlFilter};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "a007_claim")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub code: String,
    pub description: String,
    pub comment: Option<String>,
    pub policy_id: String,
    pub customer_id: String,
    pub dealer_id: String,
    pub incident_date: NaiveDate,
    pub claimed_amount: f64,
    pub approved_amount: Option<f64>,
    pub status: String,
    pub resolution_note: Option<String>,
    pub decided_at: Option<chrono::DateTime<chrono::Utc>>,
    pub is_deleted: bool,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
    pub version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Claim {
    fn from(m: Model) -> Self {
        let metadata = EntityMetadata::restore(m.created_at, m.updated_at, m.is_deleted, m.version);
        let uuid = Uuid::parse_str(&m.id).unwrap_or_else(|_| Uuid::new_v4());

        Claim {
            base: BaseAggregate::with_metadata(ClaimId(uuid), m.code, m.description, m.comment, metadata),
            policy_id: m.policy_id,
            customer_id: m.customer_id,
            dealer_id: m.dealer_id,
            incident_date: m.incident_date,
            claimed_amount: m.claimed_amount,
            approved_amount: m.approved_amount,
            status: ClaimStatus::from_code(&m.status).unwrap_or_default(),
            resolution_note: m.resolution_note,
            decided_at: m.decided_at,
        }
    }
}

#[derive(Debug, Clone, FromQueryResult)]
struct ClaimRow {
    id: String,
    code: String,
    policy_id: String,
    policy_no: Option<String>,
    customer_id: String,
    customer_name: Option<String>,
    dealer_id: String,
    incident_date: String,
    claimed_amount: f64,
    approved_amount: Option<f64>,
    status: String,
    created_at: Option<String>,
}

impl From<ClaimRow> for ClaimListItem {
    fn from(r: ClaimRow) -> Self {
        ClaimListItem {
            id: r.id,
            code: r.code,
            policy_id: r.policy_id,
            policy_no: r.policy_no.unwrap_or_default(),
            customer_id: r.customer_id,
            customer_name: r.customer_name.unwrap_or_default(),
            dealer_id: r.dealer_id,
            incident_date: r.incident_date,
            claimed_amount: r.claimed_amount,
            approved_amount: r.approved_amount,
            status: ClaimStatus::from_code(&r.status).unwrap_or_default(),
            created_at: r.created_at.unwrap_or_default(),
        }
    }
}

fn conn() -> anyhow::Result<&'static DatabaseConnection> {
    get_connection()
}

fn active_model(aggregate: &Claim) -> ActiveModel {
    ActiveModel {
        id: Set(aggregate.to_string_id()),
        code: Set(aggregate.base.code.clone()),
        description: Set(aggregate.base.description.clone()),
        comment: Set(aggregate.base.comment.clone()),
        policy_id: Set(aggregate.policy_id.clone()),
        customer_id: Set(aggregate.customer_id.clone()),
        dealer_id: Set(aggregate.dealer_id.clone()),
        incident_date: Set(aggregate.incident_date),
        claimed_amount: Set(aggregate.claimed_amount),
        approved_amount: Set(aggregate.approved_amount),
        status: Set(aggregate.status.code().to_string()),
        resolution_note: Set(aggregate.resolution_note.clone()),
        decided_at: Set(aggregate.decided_at),
        is_deleted: Set(aggregate.base.metadata.is_deleted),
        created_at: Set(Some(aggregate.base.metadata.created_at)),
        updated_at: Set(Some(aggregate.base.metadata.updated_at)),
        version: Set(aggregate.base.metadata.version),
    }
}

const LIST_SELECT: &str = "t.id, t.code, t.policy_id, p.policy_no, t.customer_id, \
     c.description AS customer_name, t.dealer_id, t.incident_date, t.claimed_amount, \
     t.approved_amount, t.status, t.created_at";

const LIST_FROM: &str = "a007_claim t \
     LEFT JOIN a006_policy p ON p.id = t.policy_id \
     LEFT JOIN a002_customer c ON c.id = t.customer_id";

const SORTABLE: &[&str] = &["t.code", "t.incident_date", "t.claimed_amount", "t.status", "t.created_at"];

pub async fn list_paged(query: &ListQuery, scope: &DataScope) -> anyhow::Result<(Vec<ClaimListItem>, usize)> {
    let filter = SqlFilter::new()
        .raw("t.is_deleted = 0")
        .eq("t.status", query.status())
        .eq("t.dealer_id", query.dealer_id())
        .eq("t.customer_id", query.customer_id())
        .date_between("t.incident_date", query.date_from(), query.date_to())
        .search(
            &["t.code", "p.policy_no", "c.description", "t.description"],
            query.search_pattern(),
        )
        .scope(scope, "t.dealer_id", Some("t.customer_id"));
    let total = count_rows(LIST_FROM, &filter).await?;
    let order = format!(
        "{} {}",
        query.sort_column(SORTABLE, "t.created_at"),
        if query.sort_by.is_none() { "DESC" } else { query.sort_direction() }
    );
    let items = fetch_rows::<ClaimRow>(LIST_SELECT, LIST_FROM, &filter, &order, query)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok((items, total))
}

pub async fn get_by_id(id: &str) -> anyhow::Result<Option<Claim>> {
    let result = Entity::find_by_id(id.to_string())
        .filter(Column::IsDeleted.eq(false))
        .one(conn()?)
        .await?;
    Ok(result.map(Into::into))
}

pub async fn insert(aggregate: &Claim) -> anyhow::Result<String> {
    active_model(aggregate).insert(conn()?).await?;
    Ok(aggregate.to_string_id())
}

pub async fn update(aggregate: &Claim) -> anyhow::Result<()> {
    let mut active = active_model(aggregate);
    active.created_at = sea_orm::ActiveValue::NotSet;
    active.update(conn()?).await?;
    Ok(())
}
