use contracts::dashboards::d401_dealer_performance::dto::{
    DealerPerformanceRequest, DealerPerformanceResponse,
};

use crate::shared::api_utils;

const API_BASE: &str = "/api/d401";

pub async fn get_dealer_performance(
    date_from: String,
    date_to: String,
) -> Result<DealerPerformanceResponse, String> {
    api_utils::get_with_query(
        &format!("{}/dealer-performance", API_BASE),
        &DealerPerformanceRequest { date_from, date_to },
    )
    .await
}
