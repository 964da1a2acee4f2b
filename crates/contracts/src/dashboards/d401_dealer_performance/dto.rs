use serde::{Deserialize, Serialize};

use crate::shared::money::{loss_ratio, round_cents};

/// Request for the dealer performance report
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DealerPerformanceRequest {
    /// Start date in format "YYYY-MM-DD" (policy issue date)
    pub date_from: String,
    /// End date in format "YYYY-MM-DD"
    pub date_to: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DealerPerformanceRow {
    pub dealer_id: String,
    pub dealer_name: String,
    pub policies: i64,
    pub premium: f64,
    pub commission: f64,
    pub paid_claims: f64,
    /// paid_claims / premium
    pub loss_ratio: f64,
}

impl DealerPerformanceRow {
    pub fn new(
        dealer_id: String,
        dealer_name: String,
        policies: i64,
        premium: f64,
        commission: f64,
        paid_claims: f64,
    ) -> Self {
        Self {
            dealer_id,
            dealer_name,
            policies,
            premium: round_cents(premium),
            commission: round_cents(commission),
            paid_claims: round_cents(paid_claims),
            loss_ratio: loss_ratio(paid_claims, premium),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DealerPerformanceResponse {
    pub date_from: String,
    pub date_to: String,
    pub rows: Vec<DealerPerformanceRow>,
    pub total: DealerPerformanceRow,
}

impl DealerPerformanceResponse {
    /// Rows sorted by premium (largest first) plus a total row
    pub fn new(date_from: String, date_to: String, mut rows: Vec<DealerPerformanceRow>) -> Self {
        rows.sort_by(|a, b| {
            b.premium
                .partial_cmp(&a.premium)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.dealer_name.cmp(&b.dealer_name))
        });
        let total = totals(&rows);
        Self {
            date_from,
            date_to,
            rows,
            total,
        }
    }
}

pub fn totals(rows: &[DealerPerformanceRow]) -> DealerPerformanceRow {
    let policies = rows.iter().map(|r| r.policies).sum();
    let premium: f64 = rows.iter().map(|r| r.premium).sum();
    let commission: f64 = rows.iter().map(|r| r.commission).sum();
    let paid: f64 = rows.iter().map(|r| r.paid_claims).sum();
    DealerPerformanceRow::new(String::new(), "Total".to_string(), policies, premium, commission, paid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_sorted_and_totalled() {
        let rows = vec![
            DealerPerformanceRow::new("d1".into(), "Anka".into(), 2, 1000.0, 100.0, 250.0),
            DealerPerformanceRow::new("d2".into(), "Bora".into(), 5, 3000.0, 360.0, 0.0),
            DealerPerformanceRow::new("d3".into(), "Cem".into(), 0, 0.0, 0.0, 50.0),
        ];
        let response = DealerPerformanceResponse::new("2024-01-01".into(), "2024-12-31".into(), rows);
        assert_eq!(response.rows[0].dealer_id, "d2");
        assert_eq!(response.rows[2].dealer_id, "d3");
        assert_eq!(response.rows[1].loss_ratio, 0.25);
        assert_eq!(response.rows[2].loss_ratio, 0.0);
        assert_eq!(response.total.policies, 7);
        assert_eq!(response.total.premium, 4000.0);
        assert_eq!(response.total.loss_ratio, 0.075);
    }
}
