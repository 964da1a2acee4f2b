use contracts::domain::a002_customer::aggregate::{Customer, CustomerDto};
use contracts::shared::lookup::LookupItem;
use contracts::shared::pagination::{ListQuery, Page};

use crate::shared::api_utils;

pub async fn list(query: ListQuery) -> Result<Page<Customer>, String> {
    api_utils::get_with_query("/api/customer", &query).await
}

pub async fn get(id: &str) -> Result<Customer, String> {
    api_utils::get(&format!("/api/customer/{}", id)).await
}

pub async fn save(dto: &CustomerDto) -> Result<String, String> {
    api_utils::save("/api/customer", dto).await
}

pub async fn delete(id: &str) -> Result<(), String> {
    api_utils::delete(&format!("/api/customer/{}", id)).await
}

/// Поиск по имени/коду/национальному номеру, опционально в пределах дилера
pub async fn lookup(search: Option<String>, dealer_id: Option<String>) -> Result<Vec<LookupItem>, String> {
    let query = ListQuery {
        search,
        dealer_id,
        ..Default::default()
    };
    api_utils::get_with_query("/api/customer/lookup", &query).await
}
