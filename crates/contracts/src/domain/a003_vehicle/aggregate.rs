use serde::{Deserialize, Serialize};

use crate::domain::common::{uuid_aggregate_id, AggregateId, AggregateRoot, BaseAggregate, EntityMetadata};
use crate::enums::VehicleUsage;
use crate::shared::validation::{is_blank, is_valid_plate, is_valid_vin, normalize_plate, FieldErrors};

uuid_aggregate_id!(VehicleId);

pub const MIN_MODEL_YEAR: i32 = 1950;

/// Транспортное средство клиента
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vehicle {
    #[serde(flatten)]
    pub base: BaseAggregate<VehicleId>,

    pub customer_id: String,
    /// Копируется из клиента при записи
    pub dealer_id: String,
    pub plate_number: String,
    pub vin: String,
    pub brand: String,
    pub model: String,
    pub model_year: i32,
    pub usage: VehicleUsage,
}

impl Vehicle {
    pub fn new_for_insert(dto: &VehicleDto) -> Self {
        let plate = normalize_plate(&dto.plate_number);
        let base = BaseAggregate::new(VehicleId::new_v4(), plate, String::new());
        let mut vehicle = Self {
            base,
            customer_id: String::new(),
            dealer_id: String::new(),
            plate_number: String::new(),
            vin: String::new(),
            brand: String::new(),
            model: String::new(),
            model_year: 0,
            usage: VehicleUsage::default(),
        };
        vehicle.update(dto);
        vehicle
    }

    pub fn to_string_id(&self) -> String {
        self.base.id.as_string()
    }

    pub fn update(&mut self, dto: &VehicleDto) {
        self.customer_id = dto.customer_id.trim().to_string();
        self.plate_number = normalize_plate(&dto.plate_number);
        self.vin = dto.vin.trim().to_uppercase();
        self.brand = dto.brand.trim().to_string();
        self.model = dto.model.trim().to_string();
        self.model_year = dto.model_year;
        self.usage = dto.usage;
        self.base.code = self.plate_number.clone();
        self.base.description = self.title();
        self.base.set_comment(dto.comment.as_deref());
    }

    /// "34ABC123 Toyota Corolla (2019)"
    pub fn title(&self) -> String {
        format!("{} {} {} ({})", self.plate_number, self.brand, self.model, self.model_year)
    }

    pub fn validate(&self, current_year: i32) -> Result<(), FieldErrors> {
        self.to_dto().validate(current_year)
    }

    pub fn before_write(&mut self) {
        self.base.touch();
    }

    pub fn to_dto(&self) -> VehicleDto {
        VehicleDto {
            id: Some(self.to_string_id()),
            customer_id: self.customer_id.clone(),
            dealer_id: Some(self.dealer_id.clone()),
            plate_number: self.plate_number.clone(),
            vin: self.vin.clone(),
            brand: self.brand.clone(),
            model: self.model.clone(),
            model_year: self.model_year,
            usage: self.usage,
            comment: self.base.comment.clone(),
        }
    }
}

impl AggregateRoot for Vehicle {
    type Id = VehicleId;

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
        "a003_vehicle"
    }

    fn list_name() -> &'static str {
        "Vehicles"
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VehicleDto {
    pub id: Option<String>,
    pub customer_id: String,
    /// Только для чтения: сервер берёт дилера из клиента
    #[serde(default)]
    pub dealer_id: Option<String>,
    pub plate_number: String,
    pub vin: String,
    pub brand: String,
    pub model: String,
    pub model_year: i32,
    pub usage: VehicleUsage,
    pub comment: Option<String>,
}

impl VehicleDto {
    pub fn validate(&self, current_year: i32) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.require("customer_id", &self.customer_id, "Customer");
        if is_blank(&self.plate_number) {
            errors.add("plate_number", "Plate number is required");
        } else if !is_valid_plate(&self.plate_number) {
            errors.add("plate_number", "Plate number must be 5-10 letters or digits");
        }
        if !is_valid_vin(&self.vin.to_uppercase()) {
            errors.add("vin", "VIN must be 17 characters without I, O or Q");
        }
        errors.require("brand", &self.brand, "Brand");
        errors.require("model", &self.model, "Model");
        if self.model_year < MIN_MODEL_YEAR || self.model_year > current_year + 1 {
            errors.add(
                "model_year",
                format!("Model year must be between {} and {}", MIN_MODEL_YEAR, current_year + 1),
            );
        }
        errors.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dto() -> VehicleDto {
        VehicleDto {
            customer_id: "c1".into(),
            plate_number: "34 abc-123".into(),
            vin: "jtdbr32e720123456".into(),
            brand: "Toyota".into(),
            model: "Corolla".into(),
            model_year: 2019,
            ..Default::default()
        }
    }

    #[test]
    fn test_plate_is_normalized() {
        let vehicle = Vehicle::new_for_insert(&dto());
        assert_eq!(vehicle.plate_number, "34ABC123");
        assert_eq!(vehicle.base.code, "34ABC123");
        assert_eq!(vehicle.vin, "JTDBR32E720123456");
        assert_eq!(vehicle.base.description, "34ABC123 Toyota Corolla (2019)");
        assert!(vehicle.validate(2024).is_ok());
    }

    #[test]
    fn test_model_year_bounds() {
        let mut d = dto();
        d.model_year = 2026;
        assert!(d.validate(2024).unwrap_err().get("model_year").is_some());
        d.model_year = 2025;
        assert!(d.validate(2024).is_ok());
        d.model_year = 1949;
        assert!(d.validate(2024).is_err());
    }

    #[test]
    fn test_vin_rules() {
        let mut d = dto();
        d.vin = "JTDBR32E72012345O".into();
        assert!(d.validate(2024).unwrap_err().get("vin").is_some());
        d.vin = "SHORT".into();
        assert!(d.validate(2024).is_err());
    }
}
