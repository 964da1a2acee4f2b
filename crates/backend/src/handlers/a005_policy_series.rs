use axum::{
    extract::{Path, Query},
    http::StatusCode,
    Json,
};
use contracts::domain::a005_policy_series::aggregate::{PolicySeries, PolicySeriesDto};
use contracts::shared::pagination::{ListQuery, Page};
use serde_json::json;

use crate::domain::a005_policy_series;
use crate::shared::error::AppResult;
use crate::system::auth::extractor::CurrentUser;

/// GET /api/policy_series
pub async fn list(
    CurrentUser(claims): CurrentUser,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Page<PolicySeries>>> {
    Ok(Json(a005_policy_series::service::list(&claims, &query).await?))
}

/// GET /api/policy_series/:id
pub async fn get_by_id(CurrentUser(claims): CurrentUser, Path(id): Path<String>) -> AppResult<Json<PolicySeries>> {
    Ok(Json(a005_policy_series::service::get_by_id(&claims, &id).await?))
}

/// POST /api/policy_series
pub async fn upsert(
    CurrentUser(claims): CurrentUser,
    Json(dto): Json<PolicySeriesDto>,
) -> AppResult<Json<serde_json::Value>> {
    let id = match dto.id.clone() {
        Some(id) => {
            a005_policy_series::service::update(&claims, dto).await?;
            id
        }
        None => a005_policy_series::service::create(&claims, dto).await?,
    };
    Ok(Json(json!({"id": id})))
}

/// DELETE /api/policy_series/:id
pub async fn delete(CurrentUser(claims): CurrentUser, Path(id): Path<String>) -> AppResult<StatusCode> {
    a005_policy_series::service::delete(&claims, &id).await?;
    Ok(StatusCode::OK)
}
