use serde::{Deserialize, Serialize};

use crate::domain::common::{uuid_aggregate_id, AggregateId, AggregateRoot, BaseAggregate, EntityMetadata};
use crate::shared::validation::FieldErrors;

// ============================================================================
// ID Type
// ============================================================================

uuid_aggregate_id!(
    /// Уникальный идентификатор дилера (агентства)
    DealerId
);

// ============================================================================
// Aggregate Root
// ============================================================================

/// Дилер: посредник, продающий полисы от имени страховой
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dealer {
    #[serde(flatten)]
    pub base: BaseAggregate<DealerId>,

    pub tax_number: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    /// Комиссия дилера, % от премии
    pub commission_rate: f64,
    /// Пользователь-наблюдатель, курирующий дилера
    pub observer_user_id: Option<String>,
    pub is_active: bool,
}

impl Dealer {
    pub fn new_for_insert(code: String, dto: &DealerDto) -> Self {
        let mut base = BaseAggregate::new(DealerId::new_v4(), code, dto.description.trim().to_string());
        let mut dealer = Self {
            base,
            tax_number: String::new(),
            phone: None,
            email: None,
            address: None,
            commission_rate: 0.0,
            observer_user_id: None,
            is_active: true,
        };
        dealer.update(dto);
        dealer
    }

    pub fn to_string_id(&self) -> String {
        self.base.id.as_string()
    }

    /// Обновить данные из DTO
    pub fn update(&mut self, dto: &DealerDto) {
        self.base.set_code_from(dto.code.as_deref());
        self.base.description = dto.description.trim().to_string();
        self.base.set_comment(dto.comment.as_deref());
        self.tax_number = dto.tax_number.trim().to_string();
        self.phone = dto.phone.clone().filter(|v| !v.trim().is_empty());
        self.email = dto.email.clone().filter(|v| !v.trim().is_empty());
        self.address = dto.address.clone().filter(|v| !v.trim().is_empty());
        self.commission_rate = dto.commission_rate;
        self.observer_user_id = dto.observer_user_id.clone().filter(|v| !v.trim().is_empty());
        self.is_active = dto.is_active;
    }

    pub fn validate(&self) -> Result<(), FieldErrors> {
        self.to_dto().validate()
    }

    /// Хук перед записью
    pub fn before_write(&mut self) {
        self.base.touch();
    }

    pub fn to_dto(&self) -> DealerDto {
        DealerDto {
            id: Some(self.to_string_id()),
            code: Some(self.base.code.clone()),
            description: self.base.description.clone(),
            tax_number: self.tax_number.clone(),
            phone: self.phone.clone(),
            email: self.email.clone(),
            address: self.address.clone(),
            commission_rate: self.commission_rate,
            observer_user_id: self.observer_user_id.clone(),
            is_active: self.is_active,
            comment: self.base.comment.clone(),
        }
    }
}

impl AggregateRoot for Dealer {
    type Id = DealerId;

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
        "a001_dealer"
    }

    fn list_name() -> &'static str {
        "Dealers"
    }
}

// ============================================================================
// Forms / DTOs
// ============================================================================

/// DTO для создания/обновления дилера
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DealerDto {
    pub id: Option<String>,
    pub code: Option<String>,
    pub description: String,
    pub tax_number: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub commission_rate: f64,
    pub observer_user_id: Option<String>,
    pub is_active: bool,
    pub comment: Option<String>,
}

impl Default for DealerDto {
    fn default() -> Self {
        Self {
            id: None,
            code: None,
            description: String::new(),
            tax_number: String::new(),
            phone: None,
            email: None,
            address: None,
            commission_rate: 10.0,
            observer_user_id: None,
            is_active: true,
            comment: None,
        }
    }
}

impl DealerDto {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.require("description", &self.description, "Name");
        errors.require("tax_number", &self.tax_number, "Tax number");
        let digits = crate::shared::validation::digits_only(&self.tax_number);
        if !self.tax_number.trim().is_empty() && (digits.len() != 10 || digits.len() != self.tax_number.trim().len()) {
            errors.add("tax_number", "Tax number must be 10 digits");
        }
        errors.optional_email("email", self.email.as_deref());
        errors.optional_phone("phone", self.phone.as_deref());
        if !(0.0..=100.0).contains(&self.commission_rate) {
            errors.add("commission_rate", "Commission must be between 0 and 100 percent");
        }
        errors.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_dto() -> DealerDto {
        DealerDto {
            description: "Anka Sigorta Aracilik".into(),
            tax_number: "1234567890".into(),
            email: Some("info@anka.example".into()),
            commission_rate: 12.5,
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_dealer() {
        assert!(valid_dto().validate().is_ok());
    }

    #[test]
    fn test_invalid_dealer_fields() {
        let mut dto = valid_dto();
        dto.tax_number = "12345".into();
        dto.commission_rate = 150.0;
        dto.description = " ".into();
        let errors = dto.validate().unwrap_err();
        assert!(errors.get("tax_number").is_some());
        assert!(errors.get("commission_rate").is_some());
        assert!(errors.get("description").is_some());
    }

    #[test]
    fn test_update_normalizes_blank_optionals() {
        let mut dto = valid_dto();
        dto.phone = Some("   ".into());
        dto.code = Some("DLR-0007".into());
        let dealer = Dealer::new_for_insert("DLR-0001".into(), &dto);
        assert_eq!(dealer.phone, None);
        assert_eq!(dealer.base.code, "DLR-0007");
        assert_eq!(dealer.to_dto().commission_rate, 12.5);
        assert_eq!(Dealer::table_name(), "a001_dealer");
    }
}
