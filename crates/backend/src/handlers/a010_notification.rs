use axum::{
    extract::{Path, Query},
    http::StatusCode,
    Json,
};
use contracts::domain::a010_notification::aggregate::{Notification, UnreadCount};
use contracts::shared::pagination::{ListQuery, Page};
use serde_json::json;

use crate::domain::a010_notification;
use crate::shared::error::AppResult;
use crate::system::auth::extractor::CurrentUser;

/// GET /api/notification?unread_only=true
pub async fn list(
    CurrentUser(claims): CurrentUser,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Page<Notification>>> {
    Ok(Json(a010_notification::service::list(&claims, &query).await?))
}

/// GET /api/notification/unread-count
pub async fn unread_count(CurrentUser(claims): CurrentUser) -> AppResult<Json<UnreadCount>> {
    Ok(Json(a010_notification::service::unread_count(&claims).await?))
}

/// POST /api/notification/:id/read
pub async fn mark_read(CurrentUser(claims): CurrentUser, Path(id): Path<String>) -> AppResult<StatusCode> {
    a010_notification::service::mark_read(&claims, &id).await?;
    Ok(StatusCode::OK)
}

/// POST /api/notification/read-all
pub async fn mark_all_read(CurrentUser(claims): CurrentUser) -> AppResult<Json<serde_json::Value>> {
    let updated = a010_notification::service::mark_all_read(&claims).await?;
    Ok(Json(json!({"updated": updated})))
}
