use chrono::{DateTime, Months, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::common::{uuid_aggregate_id, AggregateId, AggregateRoot, BaseAggregate, EntityMetadata};
use crate::enums::{Currency, PolicyStatus, PolicyType};
use crate::shared::money::percent_of;
use crate::shared::validation::{is_blank, parse_date, FieldErrors};

// ============================================================================
// ID Type
// ============================================================================

uuid_aggregate_id!(
    /// Уникальный идентификатор полиса
    PolicyId
);

// ============================================================================
// Aggregate Root
// ============================================================================

/// Полис страхования.
///
/// Жизненный цикл: `Draft` -> `Active` (выпуск с номером из серии) ->
/// `Cancelled` / `Expired`. Редактировать и удалять можно только черновик.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Policy {
    #[serde(flatten)]
    pub base: BaseAggregate<PolicyId>,

    /// Номер из серии, пустой до выпуска
    pub policy_no: String,
    pub policy_type: PolicyType,
    pub customer_id: String,
    pub vehicle_id: Option<String>,
    pub dealer_id: String,
    pub price_list_id: Option<String>,
    pub currency: Currency,
    pub premium: f64,
    pub commission: f64,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: PolicyStatus,
    pub issued_at: Option<DateTime<Utc>>,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub cancel_reason: Option<String>,
}

impl Policy {
    pub fn new_for_insert(code: String, dto: &PolicyDto) -> Self {
        let base = BaseAggregate::new(PolicyId::new_v4(), code, String::new());
        let mut policy = Self {
            base,
            policy_no: String::new(),
            policy_type: PolicyType::default(),
            customer_id: String::new(),
            vehicle_id: None,
            dealer_id: String::new(),
            price_list_id: None,
            currency: Currency::default(),
            premium: 0.0,
            commission: 0.0,
            start_date: NaiveDate::MIN,
            end_date: NaiveDate::MIN,
            status: PolicyStatus::Draft,
            issued_at: None,
            cancelled_at: None,
            cancel_reason: None,
        };
        policy.update(dto);
        policy
    }

    pub fn to_string_id(&self) -> String {
        self.base.id.as_string()
    }

    pub fn update(&mut self, dto: &PolicyDto) {
        self.policy_type = dto.policy_type;
        self.customer_id = dto.customer_id.trim().to_string();
        self.vehicle_id = dto.vehicle_id.clone().filter(|v| !is_blank(v));
        self.dealer_id = dto.dealer_id.trim().to_string();
        self.currency = dto.currency;
        self.start_date = parse_date(&dto.start_date).unwrap_or(NaiveDate::MIN);
        self.end_date = parse_date(&dto.end_date).unwrap_or(NaiveDate::MIN);
        self.base.set_comment(dto.comment.as_deref());
        self.refresh_description();
    }

    fn refresh_description(&mut self) {
        let number = if self.policy_no.is_empty() {
            &self.base.code
        } else {
            &self.policy_no
        };
        self.base.description = format!("{} {}", self.policy_type.display_name(), number);
    }

    pub fn validate(&self) -> Result<(), FieldErrors> {
        self.to_dto().validate()
    }

    pub fn before_write(&mut self) {
        self.base.touch();
    }

    pub fn is_editable(&self) -> bool {
        self.status == PolicyStatus::Draft
    }

    /// Цена из прайс-листа, фиксируется при каждой записи черновика
    pub fn apply_quote(&mut self, price_list_id: String, premium: f64) {
        self.price_list_id = Some(price_list_id);
        self.premium = premium;
    }

    /// Выпуск полиса: номер, комиссия дилера, статус `Active`
    pub fn issue(&mut self, policy_no: String, commission_rate: f64, now: DateTime<Utc>) -> Result<(), String> {
        self.ensure_transition(PolicyStatus::Active)?;
        if self.premium <= 0.0 {
            return Err("Policy has no premium; save the draft with a valid price list first".into());
        }
        self.policy_no = policy_no;
        self.commission = percent_of(self.premium, commission_rate);
        self.status = PolicyStatus::Active;
        self.issued_at = Some(now);
        self.refresh_description();
        Ok(())
    }

    pub fn cancel(&mut self, reason: &str, now: DateTime<Utc>) -> Result<(), String> {
        if is_blank(reason) {
            return Err("Cancellation reason is required".into());
        }
        self.ensure_transition(PolicyStatus::Cancelled)?;
        self.status = PolicyStatus::Cancelled;
        self.cancelled_at = Some(now);
        self.cancel_reason = Some(reason.trim().to_string());
        Ok(())
    }

    /// Returns true when the policy moved to `Expired`.
    pub fn expire_if_due(&mut self, today: NaiveDate) -> bool {
        if self.status == PolicyStatus::Active && self.end_date < today {
            self.status = PolicyStatus::Expired;
            true
        } else {
            false
        }
    }

    pub fn covers(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }

    fn ensure_transition(&self, next: PolicyStatus) -> Result<(), String> {
        if self.status.can_transition_to(next) {
            Ok(())
        } else {
            Err(format!(
                "Policy in status '{}' cannot become '{}'",
                self.status.display_name(),
                next.display_name()
            ))
        }
    }

    pub fn to_dto(&self) -> PolicyDto {
        PolicyDto {
            id: Some(self.to_string_id()),
            code: Some(self.base.code.clone()),
            policy_no: Some(self.policy_no.clone()).filter(|n| !n.is_empty()),
            policy_type: self.policy_type,
            customer_id: self.customer_id.clone(),
            vehicle_id: self.vehicle_id.clone(),
            dealer_id: self.dealer_id.clone(),
            currency: self.currency,
            start_date: self.start_date.format("%Y-%m-%d").to_string(),
            end_date: self.end_date.format("%Y-%m-%d").to_string(),
            premium: Some(self.premium),
            commission: Some(self.commission),
            status: Some(self.status),
            comment: self.base.comment.clone(),
        }
    }
}

impl AggregateRoot for Policy {
    type Id = PolicyId;

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
        "a006_policy"
    }

    fn list_name() -> &'static str {
        "Policies"
    }
}

// ============================================================================
// Forms / DTOs
// ============================================================================

/// Форма черновика полиса. Премия, номер и статус только для чтения.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PolicyDto {
    pub id: Option<String>,
    pub code: Option<String>,
    #[serde(default)]
    pub policy_no: Option<String>,
    pub policy_type: PolicyType,
    pub customer_id: String,
    pub vehicle_id: Option<String>,
    pub dealer_id: String,
    pub currency: Currency,
    pub start_date: String,
    pub end_date: String,
    #[serde(default)]
    pub premium: Option<f64>,
    #[serde(default)]
    pub commission: Option<f64>,
    #[serde(default)]
    pub status: Option<PolicyStatus>,
    pub comment: Option<String>,
}

impl PolicyDto {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.require("customer_id", &self.customer_id, "Customer");
        errors.require("dealer_id", &self.dealer_id, "Dealer");

        let has_vehicle = self.vehicle_id.as_deref().map(|v| !is_blank(v)).unwrap_or(false);
        if self.policy_type.requires_vehicle() && !has_vehicle {
            errors.add(
                "vehicle_id",
                format!("{} policies require a vehicle", self.policy_type.display_name()),
            );
        }

        if let Some((start, end)) = errors.date_range("start_date", &self.start_date, "end_date", &self.end_date) {
            if !term_within_year(start, end) {
                errors.add("end_date", "Policy term cannot exceed one year");
            }
        }
        errors.into_result()
    }
}

/// Срок не больше года: 2024-03-01..2025-03-01 допустим, на день больше уже нет
pub fn term_within_year(start: NaiveDate, end: NaiveDate) -> bool {
    match start.checked_add_months(Months::new(12)) {
        Some(limit) => end <= limit,
        None => false,
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CancelPolicyDto {
    pub reason: String,
}

/// Строка списка полисов с именами связанных записей (и для CSV-выгрузки)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyListItem {
    pub id: String,
    pub code: String,
    pub policy_no: String,
    pub policy_type: PolicyType,
    pub status: PolicyStatus,
    pub customer_id: String,
    pub customer_name: String,
    pub vehicle_plate: Option<String>,
    pub dealer_id: String,
    pub dealer_name: String,
    pub currency: Currency,
    pub premium: f64,
    pub commission: f64,
    pub start_date: String,
    pub end_date: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap()
    }

    fn draft() -> Policy {
        let dto = PolicyDto {
            policy_type: PolicyType::Traffic,
            customer_id: "c1".into(),
            vehicle_id: Some("v1".into()),
            dealer_id: "d1".into(),
            start_date: "2024-03-01".into(),
            end_date: "2025-03-01".into(),
            ..Default::default()
        };
        Policy::new_for_insert("POL-000001".into(), &dto)
    }

    #[test]
    fn test_validation_rules() {
        assert!(draft().validate().is_ok());

        let mut dto = draft().to_dto();
        dto.vehicle_id = None;
        dto.end_date = "2025-03-02".into();
        let errors = dto.validate().unwrap_err();
        assert!(errors.get("vehicle_id").is_some());
        assert_eq!(errors.get("end_date"), Some("Policy term cannot exceed one year"));

        dto.policy_type = PolicyType::Home;
        dto.end_date = "2024-12-31".into();
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn test_issue_sets_number_and_commission() {
        let mut policy = draft();
        assert!(policy.issue("TRF-00000001".into(), 10.0, now()).is_err());

        policy.apply_quote("pl1".into(), 1234.50);
        policy.issue("TRF-00000001".into(), 12.5, now()).unwrap();
        assert_eq!(policy.status, PolicyStatus::Active);
        assert_eq!(policy.policy_no, "TRF-00000001");
        assert_eq!(policy.commission, 154.31);
        assert_eq!(policy.base.description, "Compulsory traffic TRF-00000001");
        assert!(!policy.is_editable());
        assert!(policy.issue("TRF-00000002".into(), 12.5, now()).is_err());
    }

    #[test]
    fn test_cancel_needs_reason() {
        let mut policy = draft();
        assert!(policy.cancel("  ", now()).is_err());
        policy.cancel("Customer request", now()).unwrap();
        assert_eq!(policy.status, PolicyStatus::Cancelled);
        assert_eq!(policy.cancel_reason.as_deref(), Some("Customer request"));
        assert!(policy.cancel("again", now()).is_err());
    }

    #[test]
    fn test_expire_only_active_past_end() {
        let mut policy = draft();
        let after_end = NaiveDate::from_ymd_opt(2025, 3, 2).unwrap();
        assert!(!policy.expire_if_due(after_end));

        policy.apply_quote("pl1".into(), 100.0);
        policy.issue("TRF-00000001".into(), 10.0, now()).unwrap();
        assert!(!policy.expire_if_due(NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()));
        assert!(policy.expire_if_due(after_end));
        assert_eq!(policy.status, PolicyStatus::Expired);
    }
}
