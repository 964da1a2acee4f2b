use axum::{
    extract::{Path, Query},
    Json,
};
use contracts::domain::a007_claim::aggregate::{Claim, ClaimDto, ClaimListItem, ClaimStatusChangeDto};
use contracts::shared::pagination::{ListQuery, Page};
use serde_json::json;

use crate::domain::a007_claim;
use crate::shared::error::AppResult;
use crate::system::auth::extractor::CurrentUser;

/// GET /api/claim
pub async fn list(
    CurrentUser(claims): CurrentUser,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Page<ClaimListItem>>> {
    Ok(Json(a007_claim::service::list(&claims, &query).await?))
}

/// GET /api/claim/:id
pub async fn get_by_id(CurrentUser(claims): CurrentUser, Path(id): Path<String>) -> AppResult<Json<Claim>> {
    Ok(Json(a007_claim::service::get_by_id(&claims, &id).await?))
}

/// POST /api/claim
pub async fn file(CurrentUser(claims): CurrentUser, Json(dto): Json<ClaimDto>) -> AppResult<Json<serde_json::Value>> {
    let id = a007_claim::service::file(&claims, dto).await?;
    Ok(Json(json!({"id": id})))
}

/// POST /api/claim/:id/status
pub async fn change_status(
    CurrentUser(claims): CurrentUser,
    Path(id): Path<String>,
    Json(dto): Json<ClaimStatusChangeDto>,
) -> AppResult<Json<Claim>> {
    Ok(Json(a007_claim::service::change_status(&claims, &id, dto).await?))
}
