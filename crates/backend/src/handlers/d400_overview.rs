use axum::{extract::Query, Json};
use contracts::dashboards::d400_overview::dto::{OverviewRequest, OverviewResponse};

use crate::dashboards::d400_overview::service;
use crate::shared::error::AppResult;
use crate::system::auth::extractor::CurrentUser;

/// GET /api/d400/overview?months=12
pub async fn get_overview(
    CurrentUser(claims): CurrentUser,
    Query(request): Query<OverviewRequest>,
) -> AppResult<Json<OverviewResponse>> {
    Ok(Json(service::get_overview(&claims, &request).await?))
}
