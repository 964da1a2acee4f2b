use axum::{
    extract::{Path, Query},
    Json,
};
use contracts::domain::a009_ticket::aggregate::{NewTicketDto, Ticket, TicketListItem, TicketReplyDto};
use contracts::shared::pagination::{ListQuery, Page};
use serde_json::json;

use crate::domain::a009_ticket;
use crate::shared::error::AppResult;
use crate::system::auth::extractor::CurrentUser;

/// GET /api/ticket
pub async fn list(
    CurrentUser(claims): CurrentUser,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Page<TicketListItem>>> {
    Ok(Json(a009_ticket::service::list(&claims, &query).await?))
}

/// GET /api/ticket/:id - вместе с перепиской
pub async fn get_by_id(CurrentUser(claims): CurrentUser, Path(id): Path<String>) -> AppResult<Json<Ticket>> {
    Ok(Json(a009_ticket::service::get_by_id(&claims, &id).await?))
}

/// POST /api/ticket
pub async fn open(CurrentUser(claims): CurrentUser, Json(dto): Json<NewTicketDto>) -> AppResult<Json<serde_json::Value>> {
    let id = a009_ticket::service::open(&claims, dto).await?;
    Ok(Json(json!({"id": id})))
}

/// POST /api/ticket/:id/reply
pub async fn reply(
    CurrentUser(claims): CurrentUser,
    Path(id): Path<String>,
    Json(dto): Json<TicketReplyDto>,
) -> AppResult<Json<Ticket>> {
    Ok(Json(a009_ticket::service::reply(&claims, &id, dto).await?))
}

/// POST /api/ticket/:id/close
pub async fn close(CurrentUser(claims): CurrentUser, Path(id): Path<String>) -> AppResult<Json<Ticket>> {
    Ok(Json(a009_ticket::service::close(&claims, &id).await?))
}
