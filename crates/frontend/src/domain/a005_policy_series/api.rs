use contracts::domain::a005_policy_series::aggregate::{PolicySeries, PolicySeriesDto};
use contracts::shared::pagination::{ListQuery, Page};

use crate::shared::api_utils;

pub async fn list(query: ListQuery) -> Result<Page<PolicySeries>, String> {
    api_utils::get_with_query("/api/policy_series", &query).await
}

pub async fn save(dto: &PolicySeriesDto) -> Result<String, String> {
    api_utils::save("/api/policy_series", dto).await
}

pub async fn delete(id: &str) -> Result<(), String> {
    api_utils::delete(&format!("/api/policy_series/{}", id)).await
}
