use chrono::NaiveDate;
use contracts::dashboards::d401_dealer_performance::dto::{DealerPerformanceRequest, DealerPerformanceResponse};
use contracts::system::auth::TokenClaims;
use contracts::system::roles::Permission;

use super::repository;
use crate::shared::error::{AppError, AppResult};
use crate::system::auth::guard;

/// Проверка периода отчёта: обе даты в формате YYYY-MM-DD, начало не позже конца
pub fn parse_period(request: &DealerPerformanceRequest) -> Result<(NaiveDate, NaiveDate), String> {
    let from = NaiveDate::parse_from_str(request.date_from.trim(), "%Y-%m-%d")
        .map_err(|_| "date_from: Expected a date in format YYYY-MM-DD".to_string())?;
    let to = NaiveDate::parse_from_str(request.date_to.trim(), "%Y-%m-%d")
        .map_err(|_| "date_to: Expected a date in format YYYY-MM-DD".to_string())?;
    if from > to {
        return Err("date_from: Start date must not be after end date".to_string());
    }
    Ok((from, to))
}

pub async fn get_dealer_performance(
    claims: &TokenClaims,
    request: &DealerPerformanceRequest,
) -> AppResult<DealerPerformanceResponse> {
    guard::require(claims, Permission::ViewReports)?;
    let (from, to) = parse_period(request).map_err(AppError::Validation)?;
    let date_from = from.format("%Y-%m-%d").to_string();
    let date_to = to.format("%Y-%m-%d").to_string();

    let rows = repository::dealer_totals(&guard::scope(claims), &date_from, &date_to).await?;
    tracing::info!(
        "Dealer performance {}..{} for {}: {} dealers",
        date_from,
        date_to,
        claims.username,
        rows.len()
    );
    Ok(DealerPerformanceResponse::new(date_from, date_to, rows))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(from: &str, to: &str) -> DealerPerformanceRequest {
        DealerPerformanceRequest {
            date_from: from.into(),
            date_to: to.into(),
        }
    }

    #[test]
    fn test_parse_period() {
        let (from, to) = parse_period(&request("2024-01-01", " 2024-03-31 ")).unwrap();
        assert_eq!(from, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert_eq!(to, NaiveDate::from_ymd_opt(2024, 3, 31).unwrap());

        assert!(parse_period(&request("2024-13-01", "2024-12-31")).is_err());
        assert!(parse_period(&request("", "2024-12-31")).unwrap_err().starts_with("date_from"));
        assert!(parse_period(&request("2024-05-01", "2024-04-30")).is_err());
    }
}
