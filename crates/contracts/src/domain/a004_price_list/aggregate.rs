use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::domain::common::{uuid_aggregate_id, AggregateId, AggregateRoot, BaseAggregate, EntityMetadata};
use crate::enums::{Currency, PolicyType};
use crate::shared::money::{is_positive_amount, round_cents};
use crate::shared::validation::{parse_date, FieldErrors};

uuid_aggregate_id!(
    /// Уникальный идентификатор прайс-листа
    PriceListId
);

/// Тариф, применяемый когда для тира нет своей строки
pub const DEFAULT_TIER: &str = "default";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRate {
    /// Тир: тип использования ТС (`private`, `taxi`, ...) либо `default`
    pub tier: String,
    pub premium: f64,
}

/// Версионированный прайс-лист по виду страхования и валюте
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceList {
    #[serde(flatten)]
    pub base: BaseAggregate<PriceListId>,

    pub policy_type: PolicyType,
    pub currency: Currency,
    pub valid_from: NaiveDate,
    pub valid_to: NaiveDate,
    /// Назначается сервером при пересечении окон
    pub version: i32,
    pub rates: Vec<PriceRate>,
}

impl PriceList {
    pub fn new_for_insert(code: String, dto: &PriceListDto) -> Self {
        let base = BaseAggregate::new(PriceListId::new_v4(), code, String::new());
        let mut list = Self {
            base,
            policy_type: PolicyType::default(),
            currency: Currency::default(),
            valid_from: NaiveDate::MIN,
            valid_to: NaiveDate::MIN,
            version: 1,
            rates: Vec::new(),
        };
        list.update(dto);
        list
    }

    pub fn to_string_id(&self) -> String {
        self.base.id.as_string()
    }

    pub fn update(&mut self, dto: &PriceListDto) {
        self.base.description = dto.description.trim().to_string();
        self.base.set_comment(dto.comment.as_deref());
        self.policy_type = dto.policy_type;
        self.currency = dto.currency;
        self.valid_from = parse_date(&dto.valid_from).unwrap_or(NaiveDate::MIN);
        self.valid_to = parse_date(&dto.valid_to).unwrap_or(NaiveDate::MIN);
        self.rates = normalize_rates(&dto.rates);
    }

    pub fn validate(&self) -> Result<(), FieldErrors> {
        self.to_dto().validate()
    }

    pub fn before_write(&mut self) {
        self.base.touch();
    }

    pub fn covers(&self, date: NaiveDate) -> bool {
        self.valid_from <= date && date <= self.valid_to
    }

    pub fn overlaps(&self, other: &PriceList) -> bool {
        self.policy_type == other.policy_type
            && self.currency == other.currency
            && self.valid_from <= other.valid_to
            && other.valid_from <= self.valid_to
    }

    /// Премия для тира; при отсутствии строки берётся `default`
    pub fn rate_for(&self, tier: Option<&str>) -> Option<f64> {
        let tier = tier.map(|t| t.trim().to_lowercase());
        tier.as_deref()
            .and_then(|t| self.rates.iter().find(|r| r.tier == t))
            .or_else(|| self.rates.iter().find(|r| r.tier == DEFAULT_TIER))
            .map(|r| r.premium)
    }

    pub fn to_dto(&self) -> PriceListDto {
        PriceListDto {
            id: Some(self.to_string_id()),
            code: Some(self.base.code.clone()),
            description: self.base.description.clone(),
            policy_type: self.policy_type,
            currency: self.currency,
            valid_from: self.valid_from.format("%Y-%m-%d").to_string(),
            valid_to: self.valid_to.format("%Y-%m-%d").to_string(),
            version: Some(self.version),
            rates: self.rates.clone(),
            comment: self.base.comment.clone(),
        }
    }
}

impl AggregateRoot for PriceList {
    type Id = PriceListId;

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
        "a004_price_list"
    }

    fn list_name() -> &'static str {
        "Price lists"
    }
}

/// Tier names are stored lower-case and trimmed; premiums in cents.
pub fn normalize_rates(rates: &[PriceRate]) -> Vec<PriceRate> {
    rates
        .iter()
        .map(|r| PriceRate {
            tier: r.tier.trim().to_lowercase(),
            premium: round_cents(r.premium),
        })
        .collect()
}

/// Version for a new list: one above the highest overlapping version.
pub fn next_version<'a>(candidate: &PriceList, existing: impl IntoIterator<Item = &'a PriceList>) -> i32 {
    existing
        .into_iter()
        .filter(|other| other.base.id != candidate.base.id && candidate.overlaps(other))
        .map(|other| other.version)
        .max()
        .map(|v| v + 1)
        .unwrap_or(1)
}

/// Highest version among the lists of this type and currency that cover `date`.
pub fn select_effective<'a>(
    lists: &'a [PriceList],
    policy_type: PolicyType,
    currency: Currency,
    date: NaiveDate,
) -> Option<&'a PriceList> {
    lists
        .iter()
        .filter(|l| l.policy_type == policy_type && l.currency == currency && l.covers(date))
        .max_by_key(|l| l.version)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceListDto {
    pub id: Option<String>,
    pub code: Option<String>,
    pub description: String,
    pub policy_type: PolicyType,
    pub currency: Currency,
    pub valid_from: String,
    pub valid_to: String,
    #[serde(default)]
    pub version: Option<i32>,
    pub rates: Vec<PriceRate>,
    pub comment: Option<String>,
}

impl Default for PriceListDto {
    fn default() -> Self {
        Self {
            id: None,
            code: None,
            description: String::new(),
            policy_type: PolicyType::default(),
            currency: Currency::default(),
            valid_from: String::new(),
            valid_to: String::new(),
            version: None,
            rates: vec![PriceRate {
                tier: DEFAULT_TIER.to_string(),
                premium: 0.0,
            }],
            comment: None,
        }
    }
}

impl PriceListDto {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.require("description", &self.description, "Name");
        errors.date_range("valid_from", &self.valid_from, "valid_to", &self.valid_to);

        if self.rates.is_empty() {
            errors.add("rates", "At least one rate is required");
        }
        let mut seen = HashSet::new();
        for rate in &self.rates {
            let tier = rate.tier.trim().to_lowercase();
            if tier.is_empty() {
                errors.add("rates", "Rate tier is required");
            } else if !seen.insert(tier.clone()) {
                errors.add("rates", format!("Duplicate tier '{}'", tier));
            }
            if !is_positive_amount(rate.premium) {
                errors.add("rates", format!("Premium for '{}' must be positive", tier));
            }
        }
        errors.into_result()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteRequest {
    pub policy_type: PolicyType,
    pub currency: Currency,
    /// Дата начала действия полиса
    pub date: String,
    #[serde(default)]
    pub tier: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteResponse {
    pub price_list_id: String,
    pub price_list_version: i32,
    pub premium: f64,
    pub currency: Currency,
}

/// Результат импорта тарифов из CSV
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatesImportResult {
    pub imported: usize,
    pub rates: Vec<PriceRate>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(from: &str, to: &str, version: i32, rates: &[(&str, f64)]) -> PriceList {
        let dto = PriceListDto {
            description: "Traffic".into(),
            valid_from: from.into(),
            valid_to: to.into(),
            rates: rates
                .iter()
                .map(|(t, p)| PriceRate {
                    tier: t.to_string(),
                    premium: *p,
                })
                .collect(),
            ..Default::default()
        };
        let mut l = PriceList::new_for_insert(format!("PL-{}", version), &dto);
        l.version = version;
        l
    }

    fn date(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    #[test]
    fn test_highest_version_wins() {
        let lists = vec![
            list("2024-01-01", "2024-12-31", 1, &[("default", 1000.0)]),
            list("2024-06-01", "2024-12-31", 2, &[("default", 1200.0)]),
        ];
        let effective = select_effective(&lists, PolicyType::Traffic, Currency::Try, date("2024-07-01")).unwrap();
        assert_eq!(effective.version, 2);
        let effective = select_effective(&lists, PolicyType::Traffic, Currency::Try, date("2024-03-01")).unwrap();
        assert_eq!(effective.version, 1);
        assert!(select_effective(&lists, PolicyType::Traffic, Currency::Try, date("2025-01-01")).is_none());
        assert!(select_effective(&lists, PolicyType::Casco, Currency::Try, date("2024-07-01")).is_none());
    }

    #[test]
    fn test_rate_falls_back_to_default() {
        let l = list("2024-01-01", "2024-12-31", 1, &[("Taxi ", 2500.0), ("default", 1000.0)]);
        assert_eq!(l.rate_for(Some("taxi")), Some(2500.0));
        assert_eq!(l.rate_for(Some("private")), Some(1000.0));
        assert_eq!(l.rate_for(None), Some(1000.0));

        let no_default = list("2024-01-01", "2024-12-31", 1, &[("taxi", 2500.0)]);
        assert_eq!(no_default.rate_for(Some("private")), None);
    }

    #[test]
    fn test_next_version_counts_only_overlaps() {
        let existing = vec![
            list("2023-01-01", "2023-12-31", 4, &[("default", 900.0)]),
            list("2024-01-01", "2024-06-30", 1, &[("default", 1000.0)]),
        ];
        let candidate = list("2024-03-01", "2024-12-31", 1, &[("default", 1100.0)]);
        assert_eq!(next_version(&candidate, &existing), 2);
        let isolated = list("2025-01-01", "2025-12-31", 1, &[("default", 1100.0)]);
        assert_eq!(next_version(&isolated, &existing), 1);
    }

    #[test]
    fn test_validation() {
        let mut dto = list("2024-01-01", "2024-12-31", 1, &[("default", 100.0)]).to_dto();
        assert!(dto.validate().is_ok());
        dto.rates.push(PriceRate {
            tier: "DEFAULT".into(),
            premium: 0.0,
        });
        dto.valid_to = "2023-01-01".into();
        let errors = dto.validate().unwrap_err();
        assert!(errors.get("rates").is_some());
        assert!(errors.get("valid_to").is_some());
        assert_eq!(errors.iter().filter(|e| e.field == "rates").count(), 2);
    }

    #[test]
    fn test_infinite_premium_is_rejected() {
        let mut dto = list("2024-01-01", "2024-12-31", 1, &[("default", 100.0)]).to_dto();
        dto.rates[0].premium = "inf".parse().unwrap();
        assert!(dto.validate().unwrap_err().get("rates").is_some());
    }
}
