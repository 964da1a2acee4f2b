use contracts::domain::a010_notification::aggregate::{Notification, UnreadCount};
use contracts::shared::pagination::{ListQuery, Page};

use crate::shared::api_utils;

pub async fn list(query: ListQuery) -> Result<Page<Notification>, String> {
    api_utils::get_with_query("/api/notification", &query).await
}

pub async fn unread_count() -> Result<UnreadCount, String> {
    api_utils::get("/api/notification/unread-count").await
}

pub async fn mark_read(id: &str) -> Result<(), String> {
    api_utils::post_no_content(&format!("/api/notification/{}/read", id)).await
}

pub async fn mark_all_read() -> Result<(), String> {
    api_utils::post_action::<serde_json::Value>("/api/notification/read-all")
        .await
        .map(|_| ())
}
