use super::code_enum;

code_enum! {
    /// Вид страхования
    pub enum PolicyType {
        Traffic => ("traffic", "Compulsory traffic"),
        Casco => ("casco", "Casco"),
        Home => ("home", "Home"),
        Health => ("health", "Health"),
        Travel => ("travel", "Travel"),
    }
}

impl PolicyType {
    /// Motor products are written against a specific vehicle.
    pub fn requires_vehicle(&self) -> bool {
        matches!(self, PolicyType::Traffic | PolicyType::Casco)
    }
}

code_enum! {
    pub enum Currency {
        Try => ("TRY", "TRY"),
        Usd => ("USD", "USD"),
        Eur => ("EUR", "EUR"),
    }
}

code_enum! {
    /// Тип использования ТС, он же тариф в прайс-листе
    pub enum VehicleUsage {
        Private => ("private", "Private"),
        Commercial => ("commercial", "Commercial"),
        Taxi => ("taxi", "Taxi"),
    }
}

code_enum! {
    pub enum CustomerKind {
        Individual => ("individual", "Individual"),
        Corporate => ("corporate", "Corporate"),
    }
}

impl CustomerKind {
    /// Required length of the national identifier for this kind of customer.
    pub fn national_id_len(&self) -> usize {
        match self {
            CustomerKind::Individual => 11,
            CustomerKind::Corporate => 10,
        }
    }
}

code_enum! {
    /// Статус полиса
    pub enum PolicyStatus {
        Draft => ("draft", "Draft"),
        Active => ("active", "Active"),
        Cancelled => ("cancelled", "Cancelled"),
        Expired => ("expired", "Expired"),
    }
}

impl PolicyStatus {
    pub fn can_transition_to(&self, next: PolicyStatus) -> bool {
        use PolicyStatus::*;
        matches!(
            (self, next),
            (Draft, Active) | (Draft, Cancelled) | (Active, Cancelled) | (Active, Expired)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_round_trip_through_from_code() {
        for t in PolicyType::ALL {
            assert_eq!(PolicyType::from_code(t.code()), Some(*t));
        }
        assert_eq!(Currency::from_code("USD"), Some(Currency::Usd));
        assert_eq!(VehicleUsage::from_code("truck"), None);
    }

    #[test]
    fn test_serde_uses_codes() {
        let json = serde_json::to_string(&PolicyStatus::Cancelled).unwrap();
        assert_eq!(json, "\"cancelled\"");
        let parsed: Currency = serde_json::from_str("\"EUR\"").unwrap();
        assert_eq!(parsed, Currency::Eur);
    }

    #[test]
    fn test_policy_status_transitions() {
        assert!(PolicyStatus::Draft.can_transition_to(PolicyStatus::Active));
        assert!(PolicyStatus::Active.can_transition_to(PolicyStatus::Expired));
        assert!(!PolicyStatus::Expired.can_transition_to(PolicyStatus::Active));
        assert!(!PolicyStatus::Cancelled.can_transition_to(PolicyStatus::Active));
        assert!(!PolicyStatus::Draft.can_transition_to(PolicyStatus::Expired));
    }

    #[test]
    fn test_vehicle_requirement() {
        assert!(PolicyType::Traffic.requires_vehicle());
        assert!(!PolicyType::Travel.requires_vehicle());
        assert_eq!(PolicyType::default(), PolicyType::Traffic);
    }
}
