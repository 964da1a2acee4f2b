use serde::{Deserialize, Serialize};

use crate::domain::common::{uuid_aggregate_id, AggregateId, AggregateRoot, BaseAggregate, EntityMetadata};
use crate::enums::PolicyType;
use crate::shared::validation::FieldErrors;

uuid_aggregate_id!(PolicySeriesId);

/// Диапазон номеров полисов, выделенный дилеру под вид страхования
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicySeries {
    #[serde(flatten)]
    pub base: BaseAggregate<PolicySeriesId>,

    pub dealer_id: String,
    pub policy_type: PolicyType,
    pub prefix: String,
    pub range_start: i64,
    pub range_end: i64,
    pub next_number: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllocateError {
    Exhausted { prefix: String, range_end: i64 },
}

impl std::fmt::Display for AllocateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AllocateError::Exhausted { prefix, range_end } => {
                write!(f, "Policy series {} is exhausted (last number {})", prefix, range_end)
            }
        }
    }
}

impl PolicySeries {
    pub fn new_for_insert(dto: &PolicySeriesDto) -> Self {
        let prefix = dto.prefix.trim().to_uppercase();
        let base = BaseAggregate::new(PolicySeriesId::new_v4(), prefix, String::new());
        let mut series = Self {
            base,
            dealer_id: String::new(),
            policy_type: PolicyType::default(),
            prefix: String::new(),
            range_start: dto.range_start,
            range_end: dto.range_end,
            next_number: dto.range_start,
        };
        series.update(dto);
        series
    }

    pub fn to_string_id(&self) -> String {
        self.base.id.as_string()
    }

    /// Пока серия не использована, диапазон можно менять целиком
    pub fn update(&mut self, dto: &PolicySeriesDto) {
        let unused = self.used_count() == 0;
        self.dealer_id = dto.dealer_id.trim().to_string();
        self.policy_type = dto.policy_type;
        self.prefix = dto.prefix.trim().to_uppercase();
        self.range_end = dto.range_end;
        if unused {
            self.range_start = dto.range_start;
            self.next_number = dto.range_start;
        }
        self.base.code = self.prefix.clone();
        self.base.description = format!(
            "{} {}..{}",
            self.prefix,
            format_policy_number(&self.prefix, self.range_start),
            format_policy_number(&self.prefix, self.range_end)
        );
        self.base.set_comment(dto.comment.as_deref());
    }

    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = match self.to_dto().validate() {
            Ok(()) => FieldErrors::new(),
            Err(e) => e,
        };
        if self.next_number - 1 > self.range_end {
            errors.add("range_end", "Range end cannot be below numbers already issued");
        }
        errors.into_result()
    }

    pub fn before_write(&mut self) {
        self.base.touch();
    }

    pub fn used_count(&self) -> i64 {
        (self.next_number - self.range_start).max(0)
    }

    pub fn remaining(&self) -> i64 {
        (self.range_end - self.next_number + 1).max(0)
    }

    pub fn is_exhausted(&self) -> bool {
        self.next_number > self.range_end
    }

    /// Выдать следующий номер и сдвинуть счётчик
    pub fn allocate(&mut self) -> Result<String, AllocateError> {
        if self.is_exhausted() {
            return Err(AllocateError::Exhausted {
                prefix: self.prefix.clone(),
                range_end: self.range_end,
            });
        }
        let number = format_policy_number(&self.prefix, self.next_number);
        self.next_number += 1;
        Ok(number)
    }

    pub fn overlaps(&self, other: &PolicySeries) -> bool {
        self.base.id != other.base.id
            && self.prefix == other.prefix
            && self.range_start <= other.range_end
            && other.range_start <= self.range_end
    }

    pub fn to_dto(&self) -> PolicySeriesDto {
        PolicySeriesDto {
            id: Some(self.to_string_id()),
            dealer_id: self.dealer_id.clone(),
            policy_type: self.policy_type,
            prefix: self.prefix.clone(),
            range_start: self.range_start,
            range_end: self.range_end,
            next_number: Some(self.next_number),
            comment: self.base.comment.clone(),
        }
    }
}

impl AggregateRoot for PolicySeries {
    type Id = PolicySeriesId;

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
        "a005_policy_series"
    }

    fn list_name() -> &'static str {
        "Policy series"
    }
}

/// `TRF-00000042`
pub fn format_policy_number(prefix: &str, number: i64) -> String {
    format!("{}-{:08}", prefix, number)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicySeriesDto {
    pub id: Option<String>,
    pub dealer_id: String,
    pub policy_type: PolicyType,
    pub prefix: String,
    pub range_start: i64,
    pub range_end: i64,
    #[serde(default)]
    pub next_number: Option<i64>,
    pub comment: Option<String>,
}

impl Default for PolicySeriesDto {
    fn default() -> Self {
        Self {
            id: None,
            dealer_id: String::new(),
            policy_type: PolicyType::default(),
            prefix: String::new(),
            range_start: 1,
            range_end: 1000,
            next_number: None,
            comment: None,
        }
    }
}

impl PolicySeriesDto {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.require("dealer_id", &self.dealer_id, "Dealer");
        let prefix = self.prefix.trim();
        if !(2..=6).contains(&prefix.len()) || !prefix.chars().all(|c| c.is_ascii_alphabetic()) {
            errors.add("prefix", "Prefix must be 2 to 6 latin letters");
        }
        if self.range_start < 1 {
            errors.add("range_start", "Range must start at 1 or above");
        }
        if self.range_end < self.range_start {
            errors.add("range_end", "Range end must not be below range start");
        }
        if self.range_end > 99_999_999 {
            errors.add("range_end", "Range end must fit in 8 digits");
        }
        errors.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(prefix: &str, start: i64, end: i64) -> PolicySeries {
        PolicySeries::new_for_insert(&PolicySeriesDto {
            dealer_id: "d1".into(),
            prefix: prefix.into(),
            range_start: start,
            range_end: end,
            ..Default::default()
        })
    }

    #[test]
    fn test_allocate_until_exhausted() {
        let mut s = series("trf", 41, 42);
        assert_eq!(s.prefix, "TRF");
        assert_eq!(s.allocate().unwrap(), "TRF-00000041");
        assert_eq!(s.allocate().unwrap(), "TRF-00000042");
        assert!(s.is_exhausted());
        assert_eq!(s.remaining(), 0);
        assert_eq!(
            s.allocate(),
            Err(AllocateError::Exhausted {
                prefix: "TRF".into(),
                range_end: 42
            })
        );
        assert_eq!(s.next_number, 43);
    }

    #[test]
    fn test_overlap_same_prefix_only() {
        let a = series("TRF", 1, 100);
        let b = series("TRF", 100, 200);
        let c = series("CAS", 1, 100);
        let d = series("TRF", 101, 200);
        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&c));
        assert!(!a.overlaps(&d));
        assert!(!a.overlaps(&a));
    }

    #[test]
    fn test_used_series_keeps_counter() {
        let mut s = series("TRF", 1, 100);
        s.allocate().unwrap();
        s.allocate().unwrap();
        let mut dto = s.to_dto();
        dto.range_start = 50;
        dto.range_end = 1;
        s.update(&dto);
        assert_eq!(s.range_start, 1);
        assert_eq!(s.next_number, 3);
        assert!(s.validate().is_err());
    }

    #[test]
    fn test_prefix_rules() {
        let mut dto = series("TRF", 1, 10).to_dto();
        dto.prefix = "T".into();
        assert!(dto.validate().unwrap_err().get("prefix").is_some());
        dto.prefix = "TR1".into();
        assert!(dto.validate().is_err());
        dto.prefix = "CASCOX".into();
        assert!(dto.validate().is_ok());
    }
}
