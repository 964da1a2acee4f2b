use axum::{
    extract::{Path, Query},
    http::StatusCode,
    Json,
};
use contracts::domain::a004_price_list::aggregate::{
    PriceList, PriceListDto, QuoteRequest, QuoteResponse, RatesImportResult,
};
use contracts::shared::pagination::{ListQuery, Page};
use serde_json::json;

use crate::domain::a004_price_list;
use crate::shared::error::AppResult;
use crate::system::auth::extractor::CurrentUser;

/// GET /api/price_list
pub async fn list(CurrentUser(claims): CurrentUser, Query(query): Query<ListQuery>) -> AppResult<Json<Page<PriceList>>> {
    Ok(Json(a004_price_list::service::list(&claims, &query).await?))
}

/// GET /api/price_list/:id
pub async fn get_by_id(CurrentUser(claims): CurrentUser, Path(id): Path<String>) -> AppResult<Json<PriceList>> {
    Ok(Json(a004_price_list::service::get_by_id(&claims, &id).await?))
}

/// POST /api/price_list
pub async fn upsert(CurrentUser(claims): CurrentUser, Json(dto): Json<PriceListDto>) -> AppResult<Json<serde_json::Value>> {
    let id = match dto.id.clone() {
        Some(id) => {
            a004_price_list::service::update(&claims, dto).await?;
            id
        }
        None => a004_price_list::service::create(&claims, dto).await?,
    };
    Ok(Json(json!({"id": id})))
}

/// DELETE /api/price_list/:id
pub async fn delete(CurrentUser(claims): CurrentUser, Path(id): Path<String>) -> AppResult<StatusCode> {
    a004_price_list::service::delete(&claims, &id).await?;
    Ok(StatusCode::OK)
}

/// POST /api/price_list/:id/import-csv, тело запроса - текст CSV
pub async fn import_csv(
    CurrentUser(claims): CurrentUser,
    Path(id): Path<String>,
    body: String,
) -> AppResult<Json<RatesImportResult>> {
    Ok(Json(a004_price_list::service::import_rates_csv(&claims, &id, &body).await?))
}

/// POST /api/price_list/quote
pub async fn quote(CurrentUser(claims): CurrentUser, Json(request): Json<QuoteRequest>) -> AppResult<Json<QuoteResponse>> {
    Ok(Json(a004_price_list::service::quote(&claims, &request).await?))
}
