use contracts::domain::a003_vehicle::aggregate::{Vehicle, VehicleDto};
use contracts::shared::lookup::LookupItem;
use contracts::shared::pagination::{ListQuery, Page};

use crate::shared::api_utils;

pub async fn list(query: ListQuery) -> Result<Page<Vehicle>, String> {
    api_utils::get_with_query("/api/vehicle", &query).await
}

pub async fn get(id: &str) -> Result<Vehicle, String> {
    api_utils::get(&format!("/api/vehicle/{}", id)).await
}

pub async fn save(dto: &VehicleDto) -> Result<String, String> {
    api_utils::save("/api/vehicle", dto).await
}

pub async fn delete(id: &str) -> Result<(), String> {
    api_utils::delete(&format!("/api/vehicle/{}", id)).await
}

/// Vehicles of one customer, for the policy form.
pub async fn lookup_by_customer(customer_id: &str) -> Result<Vec<LookupItem>, String> {
    api_utils::get(&format!("/api/vehicle/lookup/{}", customer_id)).await
}
