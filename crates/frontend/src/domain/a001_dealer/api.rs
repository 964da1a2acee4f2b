use contracts::domain::a001_dealer::aggregate::{Dealer, DealerDto};
use contracts::shared::lookup::LookupItem;
use contracts::shared::pagination::{ListQuery, Page};

use crate::shared::api_utils;

pub async fn list(query: ListQuery) -> Result<Page<Dealer>, String> {
    api_utils::get_with_query("/api/dealer", &query).await
}

pub async fn get(id: &str) -> Result<Dealer, String> {
    api_utils::get(&format!("/api/dealer/{}", id)).await
}

pub async fn save(dto: &DealerDto) -> Result<String, String> {
    api_utils::save("/api/dealer", dto).await
}

pub async fn delete(id: &str) -> Result<(), String> {
    api_utils::delete(&format!("/api/dealer/{}", id)).await
}

pub async fn lookup() -> Result<Vec<LookupItem>, String> {
    api_utils::get("/api/dealer/lookup").await
}
