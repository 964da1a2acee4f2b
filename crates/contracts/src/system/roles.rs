//! Роли, права и область видимости данных.
//!
//! Матрица прав одна на backend и frontend: сервер проверяет её в сервисах,
//! клиент по ней строит меню и прячет кнопки.

use crate::enums::code_enum;
use crate::system::auth::TokenClaims;
use serde::{Deserialize, Serialize};

code_enum! {
    pub enum Role {
        Customer => ("customer", "Customer"),
        SuperAdmin => ("super_admin", "Super administrator"),
        Admin => ("admin", "Administrator"),
        Dealer => ("dealer", "Dealer"),
        Observer => ("observer", "Observer"),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Permission {
    ManageUsers,
    ManageDealers,
    ManageCustomers,
    ManageVehicles,
    ManagePriceLists,
    ManagePolicySeries,
    IssuePolicies,
    FileClaims,
    ProcessClaims,
    ManageTasks,
    ManageTickets,
    ViewReports,
    ManageMaintenance,
}

impl Permission {
    pub const ALL: &'static [Permission] = &[
        Permission::ManageUsers,
        Permission::ManageDealers,
        Permission::ManageCustomers,
        Permission::ManageVehicles,
        Permission::ManagePriceLists,
        Permission::ManagePolicySeries,
        Permission::IssuePolicies,
        Permission::FileClaims,
        Permission::ProcessClaims,
        Permission::ManageTasks,
        Permission::ManageTickets,
        Permission::ViewReports,
        Permission::ManageMaintenance,
    ];
}

/// Разделы приложения, доступные на чтение
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Resource {
    Overview,
    Reports,
    Dealers,
    Customers,
    Vehicles,
    PriceLists,
    PolicySeries,
    Policies,
    Claims,
    Tasks,
    Tickets,
    Notifications,
    Users,
    SystemStatus,
}

impl Role {
    pub fn has(&self, permission: Permission) -> bool {
        use Permission::*;
        match self {
            Role::SuperAdmin => true,
            Role::Admin => permission != ManageMaintenance,
            Role::Dealer => matches!(
                permission,
                ManageCustomers | ManageVehicles | IssuePolicies | FileClaims | ManageTasks | ViewReports
            ),
            Role::Customer => permission == FileClaims,
            Role::Observer => permission == ViewReports,
        }
    }

    pub fn permissions(&self) -> Vec<Permission> {
        Permission::ALL
            .iter()
            .copied()
            .filter(|p| self.has(*p))
            .collect()
    }

    /// Сотрудники страховой: видят все данные
    pub fn is_staff(&self) -> bool {
        matches!(self, Role::SuperAdmin | Role::Admin)
    }

    pub fn can_view(&self, resource: Resource) -> bool {
        use Resource::*;
        match resource {
            Overview | Vehicles | Policies | Claims | Tickets | Notifications => true,
            Customers => *self != Role::Customer,
            Dealers => matches!(self, Role::SuperAdmin | Role::Admin | Role::Observer),
            PriceLists | PolicySeries => matches!(self, Role::SuperAdmin | Role::Admin | Role::Dealer),
            Tasks => self.has(Permission::ManageTasks),
            Reports => self.has(Permission::ViewReports),
            Users => self.has(Permission::ManageUsers),
            SystemStatus => self.is_staff(),
        }
    }

    /// Roles a user with this role may assign when creating accounts.
    pub fn assignable_roles(&self) -> Vec<Role> {
        match self {
            Role::SuperAdmin => Role::ALL.to_vec(),
            Role::Admin => vec![Role::Dealer, Role::Customer, Role::Observer],
            _ => Vec::new(),
        }
    }
}

/// Область видимости записей для текущего пользователя
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataScope {
    All,
    Dealer(String),
    Customer(String),
    /// Дилеры, за которыми закреплён наблюдатель (id пользователя)
    Observer(String),
    /// Учётная запись без привязки: не видит ничего
    Nothing,
}

impl DataScope {
    pub fn for_claims(claims: &TokenClaims) -> Self {
        match claims.role {
            Role::SuperAdmin | Role::Admin => DataScope::All,
            Role::Dealer => claims
                .dealer_id
                .clone()
                .map(DataScope::Dealer)
                .unwrap_or(DataScope::Nothing),
            Role::Customer => claims
                .customer_id
                .clone()
                .map(DataScope::Customer)
                .unwrap_or(DataScope::Nothing),
            Role::Observer => DataScope::Observer(claims.sub.clone()),
        }
    }

    pub fn dealer_id(&self) -> Option<&str> {
        match self {
            DataScope::Dealer(id) => Some(id),
            _ => None,
        }
    }

    pub fn customer_id(&self) -> Option<&str> {
        match self {
            DataScope::Customer(id) => Some(id),
            _ => None,
        }
    }

    /// Checks a record owned by `dealer_id` (and optionally `customer_id`).
    ///
    /// Observer ownership needs the dealer's observer link, passed in by the caller.
    pub fn allows(
        &self,
        dealer_id: &str,
        customer_id: Option<&str>,
        dealer_observer: Option<&str>,
    ) -> bool {
        match self {
            DataScope::All => true,
            DataScope::Dealer(own) => own == dealer_id,
            DataScope::Customer(own) => customer_id == Some(own.as_str()),
            DataScope::Observer(user_id) => dealer_observer == Some(user_id.as_str()),
            DataScope::Nothing => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(role: Role, dealer: Option<&str>, customer: Option<&str>) -> TokenClaims {
        TokenClaims {
            sub: "u1".into(),
            username: "user".into(),
            role,
            dealer_id: dealer.map(String::from),
            customer_id: customer.map(String::from),
            exp: 0,
            iat: 0,
        }
    }

    #[test]
    fn test_permission_matrix() {
        assert!(Role::SuperAdmin.has(Permission::ManageMaintenance));
        assert!(!Role::Admin.has(Permission::ManageMaintenance));
        assert!(Role::Admin.has(Permission::ProcessClaims));
        assert!(Role::Dealer.has(Permission::IssuePolicies));
        assert!(!Role::Dealer.has(Permission::ManagePriceLists));
        assert_eq!(Role::Customer.permissions(), vec![Permission::FileClaims]);
        assert_eq!(Role::Observer.permissions(), vec![Permission::ViewReports]);
        assert_eq!(Role::SuperAdmin.permissions().len(), Permission::ALL.len());
    }

    #[test]
    fn test_view_rules() {
        assert!(!Role::Customer.can_view(Resource::Customers));
        assert!(Role::Customer.can_view(Resource::Policies));
        assert!(Role::Observer.can_view(Resource::Dealers));
        assert!(!Role::Observer.can_view(Resource::PriceLists));
        assert!(!Role::Dealer.can_view(Resource::Users));
        assert!(Role::Dealer.can_view(Resource::Tasks));
        assert!(!Role::Observer.can_view(Resource::SystemStatus));
    }

    #[test]
    fn test_scope_from_claims() {
        assert_eq!(
            DataScope::for_claims(&claims(Role::Admin, None, None)),
            DataScope::All
        );
        assert_eq!(
            DataScope::for_claims(&claims(Role::Dealer, Some("d1"), None)),
            DataScope::Dealer("d1".into())
        );
        assert_eq!(
            DataScope::for_claims(&claims(Role::Dealer, None, None)),
            DataScope::Nothing
        );
        assert_eq!(
            DataScope::for_claims(&claims(Role::Observer, None, None)),
            DataScope::Observer("u1".into())
        );
    }

    #[test]
    fn test_scope_allows() {
        let dealer = DataScope::Dealer("d1".into());
        assert!(dealer.allows("d1", None, None));
        assert!(!dealer.allows("d2", None, None));

        let customer = DataScope::Customer("c1".into());
        assert!(customer.allows("d1", Some("c1"), None));
        assert!(!customer.allows("d1", Some("c2"), None));
        assert!(!customer.allows("d1", None, None));

        let observer = DataScope::Observer("u9".into());
        assert!(observer.allows("d1", None, Some("u9")));
        assert!(!observer.allows("d1", None, None));

        assert!(!DataScope::Nothing.allows("d1", Some("c1"), None));
    }

    #[test]
    fn test_assignable_roles() {
        assert!(Role::SuperAdmin.assignable_roles().contains(&Role::Admin));
        assert!(!Role::Admin.assignable_roles().contains(&Role::Admin));
        assert!(Role::Dealer.assignable_roles().is_empty());
    }
}
