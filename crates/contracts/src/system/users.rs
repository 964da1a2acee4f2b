use serde::{Deserialize, Serialize};

use crate::shared::validation::{is_blank, FieldErrors};
use crate::system::roles::Role;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub role: Role,
    pub dealer_id: Option<String>,
    pub customer_id: Option<String>,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
    pub last_login_at: Option<String>,
    pub created_by: Option<String>,
}

impl User {
    pub fn display_name(&self) -> String {
        self.full_name
            .clone()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| self.username.clone())
    }
}

/// Пользователь в выпадающих списках (исполнитель задачи, наблюдатель дилера)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserOption {
    pub id: String,
    pub name: String,
    pub role: Role,
}

impl From<&User> for UserOption {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            name: user.display_name(),
            role: user.role,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateUserDto {
    pub username: String,
    pub password: String,
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub role: Role,
    pub dealer_id: Option<String>,
    pub customer_id: Option<String>,
}

impl CreateUserDto {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.require("username", &self.username, "Username");
        if self.username.contains(char::is_whitespace) {
            errors.add("username", "Username must not contain spaces");
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            errors.add(
                "password",
                format!("Password must be at least {} characters", MIN_PASSWORD_LEN),
            );
        }
        errors.optional_email("email", self.email.as_deref());
        check_role_links(
            &mut errors,
            self.role,
            self.dealer_id.as_deref(),
            self.customer_id.as_deref(),
        );
        errors.into_result()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateUserDto {
    pub id: String,
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub role: Role,
    pub dealer_id: Option<String>,
    pub customer_id: Option<String>,
    pub is_active: bool,
}

impl UpdateUserDto {
    pub fn validate(&self) -> Result<(), FieldErrors> {
        let mut errors = FieldErrors::new();
        errors.optional_email("email", self.email.as_deref());
        check_role_links(
            &mut errors,
            self.role,
            self.dealer_id.as_deref(),
            self.customer_id.as_deref(),
        );
        errors.into_result()
    }
}

impl From<&User> for UpdateUserDto {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            email: user.email.clone(),
            full_name: user.full_name.clone(),
            role: user.role,
            dealer_id: user.dealer_id.clone(),
            customer_id: user.customer_id.clone(),
            is_active: user.is_active,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangePasswordDto {
    pub user_id: String,
    pub old_password: Option<String>, // None if admin changing someone else's password
    pub new_password: String,
}

pub const MIN_PASSWORD_LEN: usize = 6;

/// Dealer accounts need a dealer, customer accounts need a customer.
fn check_role_links(
    errors: &mut FieldErrors,
    role: Role,
    dealer_id: Option<&str>,
    customer_id: Option<&str>,
) {
    let present = |v: Option<&str>| v.map(|s| !is_blank(s)).unwrap_or(false);
    if role == Role::Dealer && !present(dealer_id) {
        errors.add("dealer_id", "Dealer accounts must be linked to a dealer");
    }
    if role == Role::Customer && !present(customer_id) {
        errors.add("customer_id", "Customer accounts must be linked to a customer");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dto(role: Role) -> CreateUserDto {
        CreateUserDto {
            username: "agent1".into(),
            password: "secret1".into(),
            role,
            ..Default::default()
        }
    }

    #[test]
    fn test_role_links_required() {
        let errors = dto(Role::Dealer).validate().unwrap_err();
        assert!(errors.get("dealer_id").is_some());

        let errors = dto(Role::Customer).validate().unwrap_err();
        assert!(errors.get("customer_id").is_some());

        assert!(dto(Role::Observer).validate().is_ok());

        let mut linked = dto(Role::Dealer);
        linked.dealer_id = Some("d1".into());
        assert!(linked.validate().is_ok());
    }

    #[test]
    fn test_username_and_password_rules() {
        let mut bad = dto(Role::Admin);
        bad.username = "two words".into();
        bad.password = "123".into();
        let errors = bad.validate().unwrap_err();
        assert!(errors.get("username").is_some());
        assert!(errors.get("password").is_some());
    }
}
