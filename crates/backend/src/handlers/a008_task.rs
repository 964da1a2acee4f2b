use axum::{
    extract::{Path, Query},
    http::StatusCode,
    Json,
};
use contracts::domain::a008_task::aggregate::{Task, TaskDto, TaskStatusDto};
use contracts::shared::pagination::{ListQuery, Page};
use serde_json::json;

use crate::domain::a008_task;
use crate::shared::error::AppResult;
use crate::system::auth::extractor::CurrentUser;

/// GET /api/task
pub async fn list(CurrentUser(claims): CurrentUser, Query(query): Query<ListQuery>) -> AppResult<Json<Page<Task>>> {
    Ok(Json(a008_task::service::list(&claims, &query).await?))
}

/// GET /api/task/:id
pub async fn get_by_id(CurrentUser(claims): CurrentUser, Path(id): Path<String>) -> AppResult<Json<Task>> {
    Ok(Json(a008_task::service::get_by_id(&claims, &id).await?))
}

/// POST /api/task
pub async fn upsert(CurrentUser(claims): CurrentUser, Json(dto): Json<TaskDto>) -> AppResult<Json<serde_json::Value>> {
    let id = match dto.id.clone() {
        Some(id) => {
            a008_task::service::update(&claims, dto).await?;
            id
        }
        None => a008_task::service::create(&claims, dto).await?,
    };
    Ok(Json(json!({"id": id})))
}

/// POST /api/task/:id/status
pub async fn set_status(
    CurrentUser(claims): CurrentUser,
    Path(id): Path<String>,
    Json(dto): Json<TaskStatusDto>,
) -> AppResult<Json<Task>> {
    Ok(Json(a008_task::service::set_status(&claims, &id, dto).await?))
}

/// DELETE /api/task/:id
pub async fn delete(CurrentUser(claims): CurrentUser, Path(id): Path<String>) -> AppResult<StatusCode> {
    a008_task::service::delete(&claims, &id).await?;
    Ok(StatusCode::OK)
}
