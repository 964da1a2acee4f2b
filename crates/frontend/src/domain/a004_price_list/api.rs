use contracts::domain::a004_price_list::aggregate::{
    PriceList, PriceListDto, QuoteRequest, QuoteResponse, RatesImportResult,
};
use contracts::shared::pagination::{ListQuery, Page};

use crate::shared::api_utils;

pub async fn list(query: ListQuery) -> Result<Page<PriceList>, String> {
    api_utils::get_with_query("/api/price_list", &query).await
}

pub async fn get(id: &str) -> Result<PriceList, String> {
    api_utils::get(&format!("/api/price_list/{}", id)).await
}

pub async fn save(dto: &PriceListDto) -> Result<String, String> {
    api_utils::save("/api/price_list", dto).await
}

pub async fn delete(id: &str) -> Result<(), String> {
    api_utils::delete(&format!("/api/price_list/{}", id)).await
}

pub async fn quote(request: &QuoteRequest) -> Result<QuoteResponse, String> {
    api_utils::post("/api/price_list/quote", request).await
}

/// CSV с колонками `tier,premium`; заменяет все тарифы прайс-листа
pub async fn import_csv(id: &str, csv: String) -> Result<RatesImportResult, String> {
    api_utils::post_text(&format!("/api/price_list/{}/import-csv", id), csv).await
}
