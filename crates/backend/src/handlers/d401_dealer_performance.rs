use axum::{extract::Query, Json};
use contracts::dashboards::d401_dealer_performance::dto::{DealerPerformanceRequest, DealerPerformanceResponse};

use crate::dashboards::d401_dealer_performance::service;
use crate::shared::error::AppResult;
use crate::system::auth::extractor::CurrentUser;

/// GET /api/d401/dealer-performance?date_from=2024-01-01&date_to=2024-12-31
pub async fn get_dealer_performance(
    CurrentUser(claims): CurrentUser,
    Query(request): Query<DealerPerformanceRequest>,
) -> AppResult<Json<DealerPerformanceResponse>> {
    Ok(Json(service::get_dealer_performance(&claims, &request).await?))
}
