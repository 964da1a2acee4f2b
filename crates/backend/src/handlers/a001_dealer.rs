use axum::{
    extract::{Path, Query},
    http::StatusCode,
    Json,
};
use contracts::domain::a001_dealer::aggregate::{Dealer, DealerDto};
use contracts::shared::lookup::LookupItem;
use contracts::shared::pagination::{ListQuery, Page};
use serde_json::json;

use crate::domain::a001_dealer;
use crate::shared::error::AppResult;
use crate::system::auth::extractor::CurrentUser;

/// GET /api/dealer
pub async fn list(CurrentUser(claims): CurrentUser, Query(query): Query<ListQuery>) -> AppResult<Json<Page<Dealer>>> {
    Ok(Json(a001_dealer::service::list(&claims, &query).await?))
}

/// GET /api/dealer/lookup
pub async fn lookup(CurrentUser(claims): CurrentUser) -> AppResult<Json<Vec<LookupItem>>> {
    Ok(Json(a001_dealer::service::lookup(&claims).await?))
}

/// GET /api/dealer/:id
pub async fn get_by_id(CurrentUser(claims): CurrentUser, Path(id): Path<String>) -> AppResult<Json<Dealer>> {
    Ok(Json(a001_dealer::service::get_by_id(&claims, &id).await?))
}

/// POST /api/dealer
pub async fn upsert(CurrentUser(claims): CurrentUser, Json(dto): Json<DealerDto>) -> AppResult<Json<serde_json::Value>> {
    let id = match dto.id.clone() {
        Some(id) => {
            a001_dealer::service::update(&claims, dto).await?;
            id
        }
        None => a001_dealer::service::create(&claims, dto).await?,
    };
    Ok(Json(json!({"id": id})))
}

/// DELETE /api/dealer/:id
pub async fn delete(CurrentUser(claims): CurrentUser, Path(id): Path<String>) -> AppResult<StatusCode> {
    a001_dealer::service::delete(&claims, &id).await?;
    Ok(StatusCode::OK)
}
