use contracts::domain::a006_policy::aggregate::{CancelPolicyDto, Policy, PolicyDto, PolicyListItem};
use contracts::shared::pagination::{ListQuery, Page};

use crate::shared::api_utils;

pub async fn list(query: ListQuery) -> Result<Page<PolicyListItem>, String> {
    api_utils::get_with_query("/api/policy", &query).await
}

pub async fn get(id: &str) -> Result<Policy, String> {
    api_utils::get(&format!("/api/policy/{}", id)).await
}

/// Черновик: создание или изменение, ответ - id
pub async fn save(dto: &PolicyDto) -> Result<String, String> {
    api_utils::save("/api/policy", dto).await
}

pub async fn delete(id: &str) -> Result<(), String> {
    api_utils::delete(&format!("/api/policy/{}", id)).await
}

pub async fn issue(id: &str) -> Result<Policy, String> {
    api_utils::post_action(&format!("/api/policy/{}/issue", id)).await
}

pub async fn cancel(id: &str, reason: String) -> Result<Policy, String> {
    api_utils::post(&format!("/api/policy/{}/cancel", id), &CancelPolicyDto { reason }).await
}

/// CSV with the same filters as the list; paging is ignored by the server.
pub async fn export_csv(query: &ListQuery) -> Result<String, String> {
    api_utils::get_text("/api/policy/export.csv", query).await
}
