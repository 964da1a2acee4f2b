use contracts::domain::a007_claim::aggregate::{Claim, ClaimDto, ClaimListItem, ClaimStatusChangeDto};
use contracts::shared::pagination::{ListQuery, Page};

use crate::shared::api_utils;

pub async fn list(query: ListQuery) -> Result<Page<ClaimListItem>, String> {
    api_utils::get_with_query("/api/claim", &query).await
}

pub async fn get(id: &str) -> Result<Claim, String> {
    api_utils::get(&format!("/api/claim/{}", id)).await
}

pub async fn file(dto: &ClaimDto) -> Result<String, String> {
    api_utils::save("/api/claim", dto).await
}

pub async fn change_status(id: &str, change: &ClaimStatusChangeDto) -> Result<Claim, String> {
    api_utils::post(&format!("/api/claim/{}/status", id), change).await
}
