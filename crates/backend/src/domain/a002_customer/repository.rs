use chrono::{NaiveDate, Utc};
use contracts::domain::a002_customer::aggregate::{Customer, CustomerId};
use contracts::domain::common::{BaseAggregate, EntityMetadata};
use contracts::enums::CustomerKind;
use contracts::shared::lookup::LookupItem;
use contracts::shared::pagination::ListQuery;
use contracts::system::roles::DataScope;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use sea_orm::entity::prelude::*;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, Set};

use crate::shared::data::db::get_connection;
use crate::shared::data::query::{count_rows, fetch_models, SqlFilter};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "a002_customer")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub code: String,
    pub description: String,
    pub comment: Option<String>,
    pub dealer_id: String,
    pub kind: String,
    pub national_id: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub is_deleted: bool,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: Option<chrono::DateTime<chrono::Utc>>,
    pub version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Customer {
    fn from(m: Model) -> Self {
        let metadata = EntityMetadata::restore(m.created_at, m.updated_at, m.is_deleted, m.version);
        let uuid = Uuid::parse_str(&m.id).unwrap_or_else(|_| Uuid::new_v4());

        Customer {
            base: BaseAggregate::with_metadata(CustomerId(uuid), m.code, m.description, m.comment, metadata),
            dealer_id: m.dealer_id,
            kind: CustomerKind::from_code(&m.kind).unwrap_or_default(),
            national_id: m.national_id,
            phone: m.phone,
            email: m.email,
            address: m.address,
            birth_date: m.birth_date,
        }
    }
}

fn conn() -> anyhow::Result<&'static DatabaseConnection> {
    get_connection()
}

fn active_model(aggregate: &Customer) -> ActiveModel {
    ActiveModel {
        id: Set(aggregate.to_string_id()),
        code: Set(aggregate.base.code.clone()),
        description: Set(aggregate.base.description.clone()),
        comment: Set(aggregate.base.comment.clone()),
        dealer_id: Set(aggregate.dealer_id.clone()),
        kind: Set(aggregate.kind.code().to_string()),
        national_id: Set(aggregate.national_id.clone()),
        phone: Set(aggregate.phone.clone()),
        email: Set(aggregate.email.clone()),
        address: Set(aggregate.address.clone()),
        birth_date: Set(aggregate.birth_date),
        is_deleted: Set(aggregate.base.metadata.is_deleted),
        created_at: Set(Some(aggregate.base.metadata.created_at)),
        updated_at: Set(Some(aggregate.base.metadata.updated_at)),
        version: Set(aggregate.base.metadata.version),
    }
}

const SORTABLE: &[&str] = &["t.code", "t.description", "t.national_id", "t.updated_at"];

fn list_filter(query: &ListQuery, scope: &DataScope) -> SqlFilter {
    SqlFilter::new()
        .raw("t.is_deleted = 0")
        .eq("t.dealer_id", query.dealer_id())
        .eq("t.kind", query.status())
        .search(
            &["t.code", "t.description", "t.national_id", "t.phone", "t.email"],
            query.search_pattern(),
        )
        .scope(scope, "t.dealer_id", Some("t.id"))
}

pub async fn list_paged(query: &ListQuery, scope: &DataScope) -> anyhow::Result<(Vec<Customer>, usize)> {
    let filter = list_filter(query, scope);
    let from = "a002_customer t";
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

/// Первые совпадения по имени/коду/номеру для выбора в форме полиса
pub async fn lookup(scope: &DataScope, search: Option<String>, dealer_id: Option<&str>) -> anyhow::Result<Vec<LookupItem>> {
    let query = ListQuery {
        page: 0,
        page_size: 50,
        search,
        dealer_id: dealer_id.map(String::from),
        ..Default::default()
    };
    let filter = list_filter(&query, scope);
    let items = fetch_models::<Entity>("a002_customer t", &filter, "t.description ASC", &query)
        .await?
        .into_iter()
        .map(|m| LookupItem {
            id: m.id,
            code: m.national_id,
            name: m.description,
        })
        .collect();
    Ok(items)
}

pub async fn get_by_id(id: &str) -> anyhow::Result<Option<Customer>> {
    let result = Entity::find_by_id(id.to_string())
        .filter(Column::IsDeleted.eq(false))
        .one(conn()?)
        .await?;
    Ok(result.map(Into::into))
}

pub async fn get_by_national_id(national_id: &str) -> anyhow::Result<Option<Customer>> {
    let result = Entity::find()
        .filter(Column::NationalId.eq(national_id))
        .filter(Column::IsDeleted.eq(false))
        .one(conn()?)
        .await?;
    Ok(result.map(Into::into))
}

pub async fn insert(aggregate: &Customer) -> anyhow::Result<String> {
    active_model(aggregate).insert(conn()?).await?;
    Ok(aggregate.to_string_id())
}

pub async fn update(aggregate: &Customer) -> anyhow::Result<()> {
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
