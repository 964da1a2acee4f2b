use contracts::dashboards::d400_overview::dto::{OverviewRequest, OverviewResponse};

use crate::shared::api_utils;

const API_BASE: &str = "/api/d400";

/// Сводка по области видимости текущего пользователя
pub async fn get_overview(months: u32) -> Result<OverviewResponse, String> {
    api_utils::get_with_query(&format!("{}/overview", API_BASE), &OverviewRequest { months }).await
}
