//! Field-level validation shared by the forms and the backend services.
//!
//! Every DTO exposes `validate() -> Result<(), FieldErrors>`; the frontend
//! shows the messages next to inputs, the backend maps them to HTTP 422.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0.push(FieldError {
            field: field.to_string(),
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// First message recorded for `field`.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    pub fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }

    pub fn require(&mut self, field: &str, value: &str, label: &str) {
        if is_blank(value) {
            self.add(field, format!("{} is required", label));
        }
    }

    pub fn optional_email(&mut self, field: &str, value: Option<&str>) {
        if let Some(v) = value.filter(|v| !is_blank(v)) {
            if !is_valid_email(v) {
                self.add(field, "Invalid email address");
            }
        }
    }

    pub fn optional_phone(&mut self, field: &str, value: Option<&str>) {
        if let Some(v) = value.filter(|v| !is_blank(v)) {
            if !is_valid_phone(v) {
                self.add(field, "Invalid phone number");
            }
        }
    }

    /// Parses a `YYYY-MM-DD` value, recording an error when missing or malformed.
    pub fn date(&mut self, field: &str, value: &str, label: &str) -> Option<NaiveDate> {
        if is_blank(value) {
            self.add(field, format!("{} is required", label));
            return None;
        }
        match parse_date(value) {
            Some(d) => Some(d),
            None => {
                self.add(field, format!("{} must be a date (YYYY-MM-DD)", label));
                None
            }
        }
    }

    pub fn date_range(
        &mut self,
        from_field: &str,
        from: &str,
        to_field: &str,
        to: &str,
    ) -> Option<(NaiveDate, NaiveDate)> {
        let start = self.date(from_field, from, "Start date");
        let end = self.date(to_field, to, "End date");
        match (start, end) {
            (Some(s), Some(e)) if e < s => {
                self.add(to_field, "End date must not be before start date");
                None
            }
            (Some(s), Some(e)) => Some((s, e)),
            _ => None,
        }
    }
}

impl std::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect();
        f.write_str(&parts.join("; "))
    }
}

impl std::error::Error for FieldErrors {}

pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

pub fn digits_only(value: &str) -> String {
    value.chars().filter(|c| c.is_ascii_digit()).collect()
}

pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

pub fn is_valid_email(value: &str) -> bool {
    let value = value.trim();
    if value.contains(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && domain.split('.').all(|part| !part.is_empty())
}

/// Digits with optional leading `+` and the usual separators; 10 to 15 digits.
pub fn is_valid_phone(value: &str) -> bool {
    let value = value.trim();
    let body = value.strip_prefix('+').unwrap_or(value);
    let allowed = body
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, ' ' | '-' | '(' | ')'));
    let digits = digits_only(body).len();
    allowed && (10..=15).contains(&digits)
}

/// 17 characters, latin letters and digits, never I, O or Q.
pub fn is_valid_vin(value: &str) -> bool {
    let value = value.trim();
    value.len() == 17
        && value
            .chars()
            .all(|c| c.is_ascii_digit() || (c.is_ascii_uppercase() && !matches!(c, 'I' | 'O' | 'Q')))
}

pub fn normalize_plate(value: &str) -> String {
    value
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect::<String>()
        .to_uppercase()
}

pub fn is_valid_plate(value: &str) -> bool {
    let plate = normalize_plate(value);
    (5..=10).contains(&plate.len()) && plate.chars().all(|c| c.is_ascii_alphanumeric())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email() {
        assert!(is_valid_email("agent@example.com"));
        assert!(!is_valid_email("agent@example"));
        assert!(!is_valid_email("agent example@x.com"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("a@b@c.com"));
        assert!(!is_valid_email("a@example..com"));
    }

    #[test]
    fn test_phone() {
        assert!(is_valid_phone("+90 (532) 123-45-67"));
        assert!(is_valid_phone("05321234567"));
        assert!(!is_valid_phone("12345"));
        assert!(!is_valid_phone("0532 ABC 4567"));
    }

    #[test]
    fn test_vin_and_plate() {
        assert!(is_valid_vin("WVWZZZ1JZXW000001"));
        assert!(!is_valid_vin("WVWZZZ1JZXW00000I"));
        assert!(!is_valid_vin("SHORT"));
        assert_eq!(normalize_plate("34 abc-123"), "34ABC123");
        assert!(is_valid_plate("34 ABC 123"));
        assert!(!is_valid_plate("34"));
    }

    #[test]
    fn test_field_errors_collect_and_display() {
        let mut errors = FieldErrors::new();
        errors.require("description", "  ", "Name");
        errors.optional_email("email", Some("broken"));
        errors.optional_phone("phone", None);
        assert_eq!(errors.len(), 2);
        assert_eq!(errors.get("description"), Some("Name is required"));
        assert_eq!(
            errors.to_string(),
            "description: Name is required; email: Invalid email address"
        );
        assert!(errors.into_result().is_err());
    }

    #[test]
    fn test_date_range() {
        let mut errors = FieldErrors::new();
        assert!(errors
            .date_range("start_date", "2025-02-01", "end_date", "2025-01-01")
            .is_none());
        assert_eq!(
            errors.get("end_date"),
            Some("End date must not be before start date")
        );

        let mut errors = FieldErrors::new();
        let range = errors.date_range("start_date", "2025-01-01", "end_date", "2025-12-31");
        assert!(range.is_some());
        assert!(errors.is_empty());

        let mut errors = FieldErrors::new();
        assert!(errors.date("d", "01.01.2025", "Date").is_none());
        assert!(errors.get("d").is_some());
    }
}
