use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::common::{uuid_aggregate_id, AggregateId, AggregateRoot, BaseAggregate, EntityMetadata};
use crate::enums::ClaimStatus;
use crate::shared::money::{is_positive_amount, round_cents};
use crate::shared::validation::{is_blank, parse_date, FieldErrors};

uuid_aggregate_id!(ClaimId);

/// Заявление о страховом случае по действующему полису
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claim {
    #[serde(flatten)]
    pub base: BaseAggregate<ClaimId>,

    pub policy_id: String,
    pub customer_id: String,
    pub dealer_id: String,
    pub incident_date: NaiveDate,
    pub claimed_amount: f64,
    pub approved_amount: Option<f64>,
    pub status: ClaimStatus,
    pub resolution_note: Option<String>,
    pub decided_at: Option<DateTime<Utc>>,
}

impl Claim {
    /// `customer_id`/`dealer_id` приходят из полиса, не из формы
    pub fn new_for_insert(code: String, dto: &ClaimDto, customer_id: String, dealer_id: String) -> Self {
        let base = BaseAggregate::new(ClaimId::new_v4(), code, dto.description.trim().to_string());
        Self {
            base,
            policy_id: dto.policy_id.trim().to_string(),
            customer_id,
            dealer_id,
            incident_date: parse_date(&dto.incident_date).unwrap_or(NaiveDate::MIN),
            claimed_amount: round_cents(dto.claimed_amount),
            approved_amount: None,
            status: ClaimStatus::Submitted,
            resolution_note: None,
            decided_at: None,
        }
    }

    pub fn to_string_id(&self) -> String {
        self.base.id.as_string()
    }

    pub fn before_write(&mut self) {
        self.base.touch();
    }

    /// Смена статуса по маршруту `ClaimStatus::can_transition_to`
    pub fn transition(&mut self, change: &ClaimStatusChangeDto, now: DateTime<Utc>) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        if !self.status.can_transition_to(change.status) {
            errors.add(
                "status",
                format!(
                    "Claim in status '{}' cannot become '{}'",
                    self.status.display_name(),
                    change.status.display_name()
                ),
            );
            return Err(errors);
        }

        match change.status {
            ClaimStatus::Approved => match change.approved_amount {
                None => errors.add("approved_amount", "Approved amount is required"),
                Some(amount) if !is_positive_amount(amount) => {
                    errors.add("approved_amount", "Approved amount must be positive")
                }
                Some(amount) if round_cents(amount) > self.claimed_amount => {
                    errors.add("approved_amount", "Approved amount cannot exceed the claimed amount")
                }
                Some(_) => {}
            },
            ClaimStatus::Rejected => {
                if change.note.as_deref().map(is_blank).unwrap_or(true) {
                    errors.add("note", "A rejection note is required");
                }
            }
            _ => {}
        }
        errors.into_result()?;

        if change.status == ClaimStatus::Approved {
            self.approved_amount = change.approved_amount.map(round_cents);
        }
        if let Some(note) = change.note.as_deref().filter(|n| !is_blank(n)) {
            self.resolution_note = Some(note.trim().to_string());
        }
        if matches!(change.status, ClaimStatus::Approved | ClaimStatus::Rejected) {
            self.decided_at = Some(now);
        }
        self.status = change.status;
        Ok(())
    }

    pub fn to_dto(&self) -> ClaimDto {
        ClaimDto {
            id: Some(self.to_string_id()),
            policy_id: self.policy_id.clone(),
            incident_date: self.incident_date.format("%Y-%m-%d").to_string(),
            description: self.base.description.clone(),
            claimed_amount: self.claimed_amount,
        }
    }
}

impl AggregateRoot for Claim {
    type Id = ClaimId;

    fn id(&self) -> Self::Id {
        self.base.id
    }

    fn code(&self) -> &str {
        &self.base.code
    }

    fn description(&self) -> &str {
        &self.base.description
    }

    fn metadata(&self) -> &EntityMetadata {
        &self.base.metadata
    }

    fn metadata_mut(&mut self) -> &mut EntityMetadata {
        &mut self.base.metadata
    }

    fn table_name() -> &'static str {
        "a007_claim"
    }

    fn list_name() -> &'static str {
        "Claims"
    }
}

/// Форма подачи заявления
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClaimDto {
    pub id: Option<String>,
    pub policy_id: String,
    pub incident_date: String,
    pub description: String,
    pub claimed_amount: f64,
}

impl ClaimDto {
    pub fn validate(&self, today: NaiveDate) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.require("policy_id", &self.policy_id, "Policy");
        errors.require("description", &self.description, "Description");
        if let Some(date) = errors.date("incident_date", &self.incident_date, "Incident date") {
            if date > today {
                errors.add("incident_date", "Incident date cannot be in the future");
            }
        }
        if !is_positive_amount(self.claimed_amount) {
            errors.add("claimed_amount", "Claimed amount must be positive");
        }
        errors.into_result()
    }

    /// Дата происшествия должна попадать в период полиса
    pub fn check_policy_period(&self, start: NaiveDate, end: NaiveDate) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        match parse_date(&self.incident_date) {
            Some(date) if date < start || date > end => errors.add(
                "incident_date",
                format!("Incident date must be within the policy period {} .. {}", start, end),
            ),
            _ => {}
        }
        errors.into_result()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimStatusChangeDto {
    pub status: ClaimStatus,
    #[serde(default)]
    pub approved_amount: Option<f64>,
    #[serde(default)]
    pub note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClaimListItem {
    pub id: String,
    pub code: String,
    pub policy_id: String,
    pub policy_no: String,
    pub customer_id: String,
    pub customer_name: String,
    pub dealer_id: String,
    pub incident_date: String,
    pub claimed_amount: f64,
    pub approved_amount: Option<f64>,
    pub status: ClaimStatus,
    pub created_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap()
    }

    fn date(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    fn claim() -> Claim {
        let dto = ClaimDto {
            policy_id: "p1".into(),
            incident_date: "2024-04-20".into(),
            description: "Rear bumper damage".into(),
            claimed_amount: 5000.0,
            ..Default::default()
        };
        Claim::new_for_insert("CLM-000001".into(), &dto, "c1".into(), "d1".into())
    }

    fn change(status: ClaimStatus, amount: Option<f64>, note: Option<&str>) -> ClaimStatusChangeDto {
        ClaimStatusChangeDto {
            status,
            approved_amount: amount,
            note: note.map(String::from),
        }
    }

    #[test]
    fn test_filing_rules() {
        let dto = claim().to_dto();
        assert!(dto.validate(date("2024-05-01")).is_ok());
        assert!(dto.validate(date("2024-04-01")).unwrap_err().get("incident_date").is_some());
        assert!(dto.check_policy_period(date("2024-01-01"), date("2024-12-31")).is_ok());
        assert!(dto.check_policy_period(date("2024-04-21"), date("2025-04-20")).is_err());
    }

    #[test]
    fn test_non_finite_amounts_are_rejected() {
        let mut dto = claim().to_dto();
        dto.claimed_amount = f64::INFINITY;
        assert!(dto.validate(date("2024-05-01")).unwrap_err().get("claimed_amount").is_some());

        let mut c = claim();
        c.transition(&change(ClaimStatus::UnderReview, None, None), now()).unwrap();
        let err = c
            .transition(&change(ClaimStatus::Approved, Some(f64::NAN), None), now())
            .unwrap_err();
        assert!(err.get("approved_amount").is_some());
    }

    #[test]
    fn test_happy_path_to_paid() {
        let mut c = claim();
        c.transition(&change(ClaimStatus::UnderReview, None, None), now()).unwrap();
        c.transition(&change(ClaimStatus::Approved, Some(4200.0), Some("Partial")), now()).unwrap();
        assert_eq!(c.approved_amount, Some(4200.0));
        assert_eq!(c.decided_at, Some(now()));
        c.transition(&change(ClaimStatus::Paid, None, None), now()).unwrap();
        assert_eq!(c.status, ClaimStatus::Paid);
        assert_eq!(c.resolution_note.as_deref(), Some("Partial"));
    }

    #[test]
    fn test_approval_amount_limits() {
        let mut c = claim();
        c.transition(&change(ClaimStatus::UnderReview, None, None), now()).unwrap();
        let err = c
            .transition(&change(ClaimStatus::Approved, Some(5000.01), None), now())
            .unwrap_err();
        assert!(err.get("approved_amount").is_some());
        assert!(c.transition(&change(ClaimStatus::Approved, None, None), now()).is_err());
        assert_eq!(c.status, ClaimStatus::UnderReview);
    }

    #[test]
    fn test_invalid_transitions() {
        let mut c = claim();
        assert!(c.transition(&change(ClaimStatus::Paid, None, None), now()).is_err());
        assert!(c.transition(&change(ClaimStatus::Rejected, None, None), now()).is_err());
        c.transition(&change(ClaimStatus::Rejected, None, Some("Not covered")), now()).unwrap();
        assert!(c.transition(&change(ClaimStatus::UnderReview, None, None), now()).is_err());
    }
}
