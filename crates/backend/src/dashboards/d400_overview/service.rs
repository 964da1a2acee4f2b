use chrono::{NaiveDate, Utc};
use contracts::dashboards::d400_overview::dto::{
    fill_months, month_keys, window_start, OverviewRequest, OverviewResponse, StatusCount,
};
use contracts::enums::{ClaimStatus, PolicyStatus};
use contracts::system::auth::TokenClaims;
use contracts::system::roles::{Permission, Resource};

use super::repository::{self, StatusRow};
use crate::shared::error::AppResult;
use crate::system::auth::guard;

const OPEN_CLAIMS: &[ClaimStatus] = &[ClaimStatus::Submitted, ClaimStatus::UnderReview, ClaimStatus::Approved];

/// Все статусы в порядке перечисления, отсутствующие с нулём
pub fn status_counts<'a>(
    all: impl IntoIterator<Item = (&'a str, &'a str)>,
    rows: &[StatusRow],
) -> Vec<StatusCount> {
    all.into_iter()
        .map(|(code, label)| StatusCount {
            status: code.to_string(),
            label: label.to_string(),
            count: rows.iter().find(|r| r.status == code).map(|r| r.cnt).unwrap_or(0),
        })
        .collect()
}

pub async fn get_overview(claims: &TokenClaims, request: &OverviewRequest) -> AppResult<OverviewResponse> {
    guard::require_view(claims, Resource::Overview)?;
    let scope = guard::scope(claims);
    let today: NaiveDate = Utc::now().date_naive();
    let months = request.months();

    let keys = month_keys(today, months);
    let date_from = window_start(today, months).format("%Y-%m-%d").to_string();
    let monthly = repository::premium_by_month(&scope, &date_from).await?;

    let policy_rows = repository::count_by_status("a006_policy", &scope).await?;
    let claim_rows = repository::count_by_status("a007_claim", &scope).await?;
    let open_claim_codes: Vec<&str> = OPEN_CLAIMS.iter().map(|s| s.code()).collect();

    let own_tickets = if claims.role.has(Permission::ManageTickets) {
        None
    } else {
        Some(claims.sub.as_str())
    };

    let response = OverviewResponse {
        customers: repository::count_customers(&scope).await?,
        active_policies: repository::count_policies(&scope, PolicyStatus::Active.code()).await?,
        open_claims: repository::count_claims_in(&scope, &open_claim_codes).await?,
        open_tickets: repository::count_open_tickets(own_tickets).await?,
        premium_by_month: fill_months(&keys, &monthly),
        policies_by_status: status_counts(
            PolicyStatus::ALL.iter().map(|s| (s.code(), s.display_name())),
            &policy_rows,
        ),
        claims_by_status: status_counts(
            ClaimStatus::ALL.iter().map(|s| (s.code(), s.display_name())),
            &claim_rows,
        ),
    };
    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_counts_fill_missing() {
        let rows = vec![
            StatusRow {
                status: "active".into(),
                cnt: 4,
            },
            StatusRow {
                status: "unknown".into(),
                cnt: 9,
            },
        ];
        let counts = status_counts(PolicyStatus::ALL.iter().map(|s| (s.code(), s.display_name())), &rows);
        assert_eq!(counts.len(), PolicyStatus::ALL.len());
        assert_eq!(counts[0].status, "draft");
        assert_eq!(counts[0].count, 0);
        assert_eq!(counts[1].count, 4);
        assert_eq!(counts[1].label, "Active");
        assert_eq!(counts.iter().map(|c| c.count).sum::<i64>(), 4);
    }
}
