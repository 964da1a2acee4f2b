use contracts::domain::a009_ticket::aggregate::{NewTicketDto, Ticket, TicketListItem, TicketReplyDto};
use contracts::shared::pagination::{ListQuery, Page};

use crate::shared::api_utils;

pub async fn list(query: ListQuery) -> Result<Page<TicketListItem>, String> {
    api_utils::get_with_query("/api/ticket", &query).await
}

pub async fn get(id: &str) -> Result<Ticket, String> {
    api_utils::get(&format!("/api/ticket/{}", id)).await
}

pub async fn open(dto: &NewTicketDto) -> Result<String, String> {
    api_utils::save("/api/ticket", dto).await
}

pub async fn reply(id: &str, body: String) -> Result<Ticket, String> {
    api_utils::post(&format!("/api/ticket/{}/reply", id), &TicketReplyDto { body }).await
}

pub async fn close(id: &str) -> Result<Ticket, String> {
    api_utils::post_action(&format!("/api/ticket/{}/close", id)).await
}
