use axum::{
    extract::{Path, Query},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use contracts::domain::a006_policy::aggregate::{CancelPolicyDto, Policy, PolicyDto, PolicyListItem};
use contracts::shared::pagination::{ListQuery, Page};
use serde_json::json;

use crate::domain::a006_policy;
use crate::shared::error::AppResult;
use crate::system::auth::extractor::CurrentUser;

/// GET /api/policy
pub async fn list(
    CurrentUser(claims): CurrentUser,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Page<PolicyListItem>>> {
    Ok(Json(a006_policy::service::list(&claims, &query).await?))
}

/// GET /api/policy/:id
pub async fn get_by_id(CurrentUser(claims): CurrentUser, Path(id): Path<String>) -> AppResult<Json<Policy>> {
    Ok(Json(a006_policy::service::get_by_id(&claims, &id).await?))
}

/// POST /api/policy - черновик
pub async fn upsert(CurrentUser(claims): CurrentUser, Json(dto): Json<PolicyDto>) -> AppResult<Json<serde_json::Value>> {
    let id = match dto.id.clone() {
        Some(id) => {
            a006_policy::service::update(&claims, dto).await?;
            id
        }
        None => a006_policy::service::create(&claims, dto).await?,
    };
    Ok(Json(json!({"id": id})))
}

/// DELETE /api/policy/:id
pub async fn delete(CurrentUser(claims): CurrentUser, Path(id): Path<String>) -> AppResult<StatusCode> {
    a006_policy::service::delete(&claims, &id).await?;
    Ok(StatusCode::OK)
}

/// POST /api/policy/:id/issue
pub async fn issue(CurrentUser(claims): CurrentUser, Path(id): Path<String>) -> AppResult<Json<Policy>> {
    Ok(Json(a006_policy::service::issue(&claims, &id).await?))
}

/// POST /api/policy/:id/cancel
pub async fn cancel(
    CurrentUser(claims): CurrentUser,
    Path(id): Path<String>,
    Json(dto): Json<CancelPolicyDto>,
) -> AppResult<Json<Policy>> {
    Ok(Json(a006_policy::service::cancel(&claims, &id, dto).await?))
}

/// GET /api/policy/export.csv, те же фильтры что и у списка, без пагинации
pub async fn export_csv(
    CurrentUser(claims): CurrentUser,
    Query(query): Query<ListQuery>,
) -> AppResult<impl IntoResponse> {
    let body = a006_policy::service::export_csv(&claims, &query).await?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (header::CONTENT_DISPOSITION, "attachment; filename=\"policies.csv\""),
        ],
        body,
    ))
}
