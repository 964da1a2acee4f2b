//! Проверки прав в сервисах.

use contracts::system::auth::TokenClaims;
use contracts::system::roles::{DataScope, Permission, Resource};

use crate::shared::error::{AppError, AppResult};

pub fn require(claims: &TokenClaims, permission: Permission) -> AppResult<()> {
    if claims.role.has(permission) {
        Ok(())
    } else {
        Err(AppError::forbidden())
    }
}

pub fn require_view(claims: &TokenClaims, resource: Resource) -> AppResult<()> {
    if claims.role.can_view(resource) {
        Ok(())
    } else {
        Err(AppError::forbidden())
    }
}

pub fn scope(claims: &TokenClaims) -> DataScope {
    DataScope::for_claims(claims)
}

/// Дилер пишет только от своего имени; остальным нужен явный dealer_id
pub fn writable_dealer(claims: &TokenClaims, requested: &str) -> AppResult<String> {
    match scope(claims) {
        DataScope::All => Ok(requested.trim().to_string()),
        DataScope::Dealer(own) => Ok(own),
        _ => Err(AppError::forbidden()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::system::roles::Role;

    fn claims(role: Role, dealer: Option<&str>) -> TokenClaims {
        TokenClaims {
            sub: "u1".into(),
            username: "u".into(),
            role,
            dealer_id: dealer.map(String::from),
            customer_id: None,
            exp: 0,
            iat: 0,
        }
    }

    #[test]
    fn test_require() {
        assert!(require(&claims(Role::Admin, None), Permission::ManageUsers).is_ok());
        let err = require(&claims(Role::Observer, None), Permission::ManageCustomers).unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
        assert!(require_view(&claims(Role::Customer, None), Resource::Customers).is_err());
    }

    #[test]
    fn test_writable_dealer_forces_own_dealer() {
        assert_eq!(
            writable_dealer(&claims(Role::Dealer, Some("d1")), "d2").unwrap(),
            "d1"
        );
        assert_eq!(writable_dealer(&claims(Role::Admin, None), " d2 ").unwrap(), "d2");
        assert!(writable_dealer(&claims(Role::Observer, None), "d2").is_err());
        assert!(writable_dealer(&claims(Role::Dealer, None), "d2").is_err());
    }
}
