use serde::{Deserialize, Serialize};

use crate::system::roles::Role;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub user: UserInfo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshResponse {
    pub access_token: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: String,
    pub username: String,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub role: Role,
    /// Дилер, к которому привязан пользователь (для роли Dealer)
    pub dealer_id: Option<String>,
    /// Клиент, к которому привязан пользователь (для роли Customer)
    pub customer_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenClaims {
    pub sub: String, // user_id
    pub username: String,
    pub role: Role,
    #[serde(default)]
    pub dealer_id: Option<String>,
    #[serde(default)]
    pub customer_id: Option<String>,
    pub exp: usize, // expiration timestamp
    pub iat: usize, // issued at
}

impl UserInfo {
    /// ФИО, если заполнено, иначе логин
    pub fn display_name(&self) -> &str {
        self.full_name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(&self.username)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(full_name: Option<&str>) -> UserInfo {
        UserInfo {
            id: "u1".into(),
            username: "dealer1".into(),
            full_name: full_name.map(str::to_string),
            email: None,
            role: Role::Dealer,
            dealer_id: Some("d1".into()),
            customer_id: None,
        }
    }

    #[test]
    fn test_display_name() {
        assert_eq!(user(Some("Ayse Kaya")).display_name(), "Ayse Kaya");
        assert_eq!(user(Some("  ")).display_name(), "dealer1");
        assert_eq!(user(None).display_name(), "dealer1");
    }

    #[test]
    fn test_claims_without_links_deserialize() {
        let json = r#"{"sub":"u1","username":"obs","role":"observer","exp":200,"iat":100}"#;
        let claims: TokenClaims = serde_json::from_str(json).unwrap();
        assert_eq!(claims.role, Role::Observer);
        assert_eq!(claims.dealer_id, None);
        assert_eq!(claims.exp, 200);
    }
}
