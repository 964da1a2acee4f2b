use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::common::{uuid_aggregate_id, AggregateId, AggregateRoot, BaseAggregate, EntityMetadata};
use crate::enums::CustomerKind;
use crate::shared::validation::{digits_only, is_blank, parse_date, FieldErrors};

uuid_aggregate_id!(
    /// Уникальный идентификатор клиента
    CustomerId
);

/// Клиент (страхователь): физическое или юридическое лицо
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    #[serde(flatten)]
    pub base: BaseAggregate<CustomerId>,

    pub dealer_id: String,
    pub kind: CustomerKind,
    /// ИНН / национальный идентификатор
    pub national_id: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub birth_date: Option<NaiveDate>,
}

impl Customer {
    pub fn new_for_insert(code: String, dto: &CustomerDto) -> Self {
        let base = BaseAggregate::new(CustomerId::new_v4(), code, String::new());
        let mut customer = Self {
            base,
            dealer_id: String::new(),
            kind: CustomerKind::default(),
            national_id: String::new(),
            phone: None,
            email: None,
            address: None,
            birth_date: None,
        };
        customer.update(dto);
        customer
    }

    pub fn to_string_id(&self) -> String {
        self.base.id.as_string()
    }

    pub fn update(&mut self, dto: &CustomerDto) {
        self.base.description = dto.description.trim().to_string();
        self.base.set_comment(dto.comment.as_deref());
        self.dealer_id = dto.dealer_id.trim().to_string();
        self.kind = dto.kind;
        self.national_id = dto.national_id.trim().to_string();
        self.phone = dto.phone.clone().filter(|v| !is_blank(v));
        self.email = dto.email.clone().filter(|v| !is_blank(v));
        self.address = dto.address.clone().filter(|v| !is_blank(v));
        // корпоративным клиентам дата рождения не нужна
        self.birth_date = match dto.kind {
            CustomerKind::Individual => dto.birth_date.as_deref().and_then(parse_date),
            CustomerKind::Corporate => None,
        };
    }

    pub fn validate(&self, today: NaiveDate) -> Result<(), FieldErrors> {
        self.to_dto().validate(today)
    }

    pub fn before_write(&mut self) {
        self.base.touch();
    }

    pub fn to_dto(&self) -> CustomerDto {
        CustomerDto {
            id: Some(self.to_string_id()),
            code: Some(self.base.code.clone()),
            description: self.base.description.clone(),
            dealer_id: self.dealer_id.clone(),
            kind: self.kind,
            national_id: self.national_id.clone(),
            phone: self.phone.clone(),
            email: self.email.clone(),
            address: self.address.clone(),
            birth_date: self.birth_date.map(|d| d.format("%Y-%m-%d").to_string()),
            comment: self.base.comment.clone(),
        }
    }
}

impl AggregateRoot for Customer {
    type Id = CustomerId;

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
        "a002_customer"
    }

    fn list_name() -> &'static str {
        "Customers"
    }
}

/// Форма клиента, общая для создания и редактирования
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomerDto {
    pub id: Option<String>,
    pub code: Option<String>,
    pub description: String,
    pub dealer_id: String,
    pub kind: CustomerKind,
    pub national_id: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub birth_date: Option<String>,
    pub comment: Option<String>,
}

impl CustomerDto {
    pub fn validate(&self, today: NaiveDate) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.require("description", &self.description, "Full name");
        errors.require("dealer_id", &self.dealer_id, "Dealer");

        let national_id = self.national_id.trim();
        let expected = self.kind.national_id_len();
        if national_id.is_empty() {
            errors.add("national_id", "National id is required");
        } else if digits_only(national_id) != national_id || national_id.len() != expected {
            errors.add(
                "national_id",
                format!("National id must be {} digits for {} customers", expected, self.kind.display_name().to_lowercase()),
            );
        }

        errors.optional_email("email", self.email.as_deref());
        errors.optional_phone("phone", self.phone.as_deref());

        if self.kind == CustomerKind::Individual {
            if let Some(raw) = self.birth_date.as_deref().filter(|v| !is_blank(v)) {
                if let Some(date) = errors.date("birth_date", raw, "Birth date") {
                    if date > today {
                        errors.add("birth_date", "Birth date cannot be in the future");
                    }
                }
            }
        }
        errors.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    fn individual() -> CustomerDto {
        CustomerDto {
            description: "Ayse Yilmaz".into(),
            dealer_id: "d1".into(),
            kind: CustomerKind::Individual,
            national_id: "12345678901".into(),
            birth_date: Some("1990-04-12".into()),
            ..Default::default()
        }
    }

    #[test]
    fn test_national_id_length_depends_on_kind() {
        assert!(individual().validate(today()).is_ok());

        let mut corporate = individual();
        corporate.kind = CustomerKind::Corporate;
        assert!(corporate.validate(today()).unwrap_err().get("national_id").is_some());
        corporate.national_id = "1234567890".into();
        assert!(corporate.validate(today()).is_ok());

        let mut letters = individual();
        letters.national_id = "1234567890A".into();
        assert!(letters.validate(today()).is_err());
    }

    #[test]
    fn test_birth_date_not_in_future() {
        let mut dto = individual();
        dto.birth_date = Some("2030-01-01".into());
        let errors = dto.validate(today()).unwrap_err();
        assert_eq!(errors.get("birth_date"), Some("Birth date cannot be in the future"));

        dto.birth_date = Some("01.01.1990".into());
        assert!(dto.validate(today()).is_err());
    }

    #[test]
    fn test_corporate_drops_birth_date() {
        let mut dto = individual();
        dto.kind = CustomerKind::Corporate;
        dto.national_id = "1234567890".into();
        let customer = Customer::new_for_insert("CUS-0001".into(), &dto);
        assert_eq!(customer.birth_date, None);
        assert_eq!(customer.to_dto().birth_date, None);
    }
}
