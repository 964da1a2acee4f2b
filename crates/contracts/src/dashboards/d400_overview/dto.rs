use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

pub const DEFAULT_MONTHS: u32 = 12;
pub const MAX_MONTHS: u32 = 36;

/// Request for the overview dashboard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverviewRequest {
    /// Number of months in the premium chart, current month included
    #[serde(default = "default_months")]
    pub months: u32,
}

fn default_months() -> u32 {
    DEFAULT_MONTHS
}

impl Default for OverviewRequest {
    fn default() -> Self {
        Self {
            months: DEFAULT_MONTHS,
        }
    }
}

impl OverviewRequest {
    pub fn months(&self) -> u32 {
        self.months.clamp(1, MAX_MONTHS)
    }
}

/// Response for the overview dashboard, already limited to the caller's scope
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OverviewResponse {
    pub customers: i64,
    pub active_policies: i64,
    pub open_claims: i64,
    pub open_tickets: i64,
    /// One entry per month, oldest first, gaps filled with zeros
    pub premium_by_month: Vec<MonthlyAmount>,
    pub policies_by_status: Vec<StatusCount>,
    pub claims_by_status: Vec<StatusCount>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyAmount {
    /// Period in format "YYYY-MM"
    pub month: String,
    pub premium: f64,
    pub policies: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusCount {
    pub status: String,
    pub label: String,
    pub count: i64,
}

/// "YYYY-MM" keys for the last `months` months ending with the month of `today`.
pub fn month_keys(today: NaiveDate, months: u32) -> Vec<String> {
    let mut year = today.year();
    let mut month = today.month();
    let mut keys = Vec::with_capacity(months as usize);
    for _ in 0..months {
        keys.push(format!("{:04}-{:02}", year, month));
        if month == 1 {
            month = 12;
            year -= 1;
        } else {
            month -= 1;
        }
    }
    keys.reverse();
    keys
}

/// First day of the oldest month in the window
pub fn window_start(today: NaiveDate, months: u32) -> NaiveDate {
    month_keys(today, months)
        .first()
        .and_then(|key| NaiveDate::parse_from_str(&format!("{}-01", key), "%Y-%m-%d").ok())
        .unwrap_or(today)
}

/// Aligns sparse SQL rows to the full month window.
pub fn fill_months(keys: &[String], rows: &[MonthlyAmount]) -> Vec<MonthlyAmount> {
    keys.iter()
        .map(|key| {
            rows.iter()
                .find(|r| &r.month == key)
                .cloned()
                .unwrap_or_else(|| MonthlyAmount {
                    month: key.clone(),
                    premium: 0.0,
                    policies: 0,
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_month_keys_cross_year() {
        let today = NaiveDate::from_ymd_opt(2024, 2, 15).unwrap();
        assert_eq!(month_keys(today, 4), vec!["2023-11", "2023-12", "2024-01", "2024-02"]);
        assert_eq!(window_start(today, 4), NaiveDate::from_ymd_opt(2023, 11, 1).unwrap());
    }

    #[test]
    fn test_fill_months() {
        let keys = vec!["2024-01".to_string(), "2024-02".to_string(), "2024-03".to_string()];
        let rows = vec![MonthlyAmount {
            month: "2024-02".into(),
            premium: 1500.0,
            policies: 3,
        }];
        let filled = fill_months(&keys, &rows);
        assert_eq!(filled.len(), 3);
        assert_eq!(filled[0].premium, 0.0);
        assert_eq!(filled[1].policies, 3);
        assert_eq!(filled[2].month, "2024-03");
    }

    #[test]
    fn test_months_clamped() {
        assert_eq!(OverviewRequest { months: 0 }.months(), 1);
        assert_eq!(OverviewRequest { months: 100 }.months(), MAX_MONTHS);
        assert_eq!(OverviewRequest::default().months(), 12);
    }
}
