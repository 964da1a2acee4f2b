use axum::{
    extract::{Path, Query},
    http::StatusCode,
    Json,
};
use contracts::domain::a002_customer::aggregate::{Customer, CustomerDto};
use contracts::shared::lookup::LookupItem;
use contracts::shared::pagination::{ListQuery, Page};
use serde_json::json;

use crate::domain::a002_customer;
use crate::shared::error::AppResult;
use crate::system::auth::extractor::CurrentUser;

/// GET /api/customer
pub async fn list(CurrentUser(claims): CurrentUser, Query(query): Query<ListQuery>) -> AppResult<Json<Page<Customer>>> {
    Ok(Json(a002_customer::service::list(&claims, &query).await?))
}

/// GET /api/customer/lookup?search=..&dealer_id=..
pub async fn lookup(CurrentUser(claims): CurrentUser, Query(query): Query<ListQuery>) -> AppResult<Json<Vec<LookupItem>>> {
    Ok(Json(a002_customer::service::lookup(&claims, &query).await?))
}

/// GET /api/customer/:id
pub async fn get_by_id(CurrentUser(claims): CurrentUser, Path(id): Path<String>) -> AppResult<Json<Customer>> {
    Ok(Json(a002_customer::service::get_by_id(&claims, &id).await?))
}

/// POST /api/customer
pub async fn upsert(CurrentUser(claims): CurrentUser, Json(dto): Json<CustomerDto>) -> AppResult<Json<serde_json::Value>> {
    let id = match dto.id.clone() {
        Some(id) => {
            a002_customer::service::update(&claims, dto).await?;
            id
        }
        None => a002_customer::service::create(&claims, dto).await?,
    };
    Ok(Json(json!({"id": id})))
}

/// DELETE /api/customer/:id
pub async fn delete(CurrentUser(claims): CurrentUser, Path(id): Path<String>) -> AppResult<StatusCode> {
    a002_customer::service::delete(&claims, &id).await?;
    Ok(StatusCode::OK)
}
