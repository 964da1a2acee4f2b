use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use contracts::system::auth::TokenClaims;
use contracts::system::users::User;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use rand::Rng;

use crate::shared::config;
use crate::shared::data::settings;

const JWT_SECRET_KEY: &str = "jwt_secret";

/// Claims for `user`, valid for `lifetime_hours` from `now`
pub fn claims_for(user: &User, now: DateTime<Utc>, lifetime_hours: i64) -> TokenClaims {
    TokenClaims {
        sub: user.id.clone(),
        username: user.username.clone(),
        role: user.role,
        dealer_id: user.dealer_id.clone(),
        customer_id: user.customer_id.clone(),
        exp: (now + chrono::Duration::hours(lifetime_hours)).timestamp() as usize,
        iat: now.timestamp() as usize,
    }
}

pub fn encode_claims(claims: &TokenClaims, secret: &str) -> Result<String> {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .context("Failed to encode JWT token")
}

pub fn decode_claims(token: &str, secret: &str) -> Result<TokenClaims> {
    let token_data = decode::<TokenClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .context("Failed to decode JWT token")?;
    Ok(token_data.claims)
}

/// Generate JWT access token for the user
pub async fn generate_access_token(user: &User) -> Result<String> {
    let hours = config::current().auth.access_token_hours;
    let claims = claims_for(user, Utc::now(), hours);
    let secret = get_jwt_secret().await?;
    encode_claims(&claims, &secret)
}

/// Validate JWT token and extract claims
pub async fn validate_token(token: &str) -> Result<TokenClaims> {
    let secret = get_jwt_secret().await?;
    decode_claims(token, &secret)
}

/// Generate refresh token (UUID-based)
pub fn generate_refresh_token() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Get or create JWT secret from database
pub async fn get_jwt_secret() -> Result<String> {
    if let Some(secret) = settings::get(JWT_SECRET_KEY).await? {
        return Ok(secret);
    }
    let secret = generate_jwt_secret();
    settings::put(
        JWT_SECRET_KEY,
        &secret,
        "Auto-generated JWT secret for authentication",
    )
    .await?;
    tracing::info!("Generated new JWT secret");
    Ok(secret)
}

/// Generate a cryptographically secure JWT secret (256 bits)
fn generate_jwt_secret() -> String {
    use base64::{engine::general_purpose, Engine as _};
    let mut rng = rand::thread_rng();
    let random_bytes: Vec<u8> = (0..32).map(|_| rng.gen::<u8>()).collect();
    general_purpose::STANDARD.encode(&random_bytes)
}

/// Calculate refresh token expiration timestamp
pub fn calculate_refresh_token_expiration() -> String {
    let days = config::current().auth.refresh_token_days;
    let exp = Utc::now() + chrono::Duration::days(days);
    exp.to_rfc3339()
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::system::roles::Role;

    fn user() -> User {
        User {
            id: "u1".into(),
            username: "dealer1".into(),
            email: None,
            full_name: None,
            role: Role::Dealer,
            dealer_id: Some("d1".into()),
            customer_id: None,
            is_active: true,
            created_at: String::new(),
            updated_at: String::new(),
            last_login_at: None,
            created_by: None,
        }
    }

    #[test]
    fn test_round_trip() {
        let claims = claims_for(&user(), Utc::now(), 1);
        let token = encode_claims(&claims, "secret").unwrap();
        let decoded = decode_claims(&token, "secret").unwrap();
        assert_eq!(decoded, claims);
        assert_eq!(decoded.role, Role::Dealer);
        assert_eq!(decoded.dealer_id.as_deref(), Some("d1"));
    }

    #[test]
    fn test_wrong_secret_and_expired_rejected() {
        let claims = claims_for(&user(), Utc::now(), 1);
        let token = encode_claims(&claims, "secret").unwrap();
        assert!(decode_claims(&token, "other").is_err());

        let expired = claims_for(&user(), Utc::now() - chrono::Duration::hours(5), 1);
        let token = encode_claims(&expired, "secret").unwrap();
        assert!(decode_claims(&token, "secret").is_err());
    }

    #[test]
    fn test_secret_is_random_base64() {
        let a = generate_jwt_secret();
        let b = generate_jwt_secret();
        assert_ne!(a, b);
        assert_eq!(a.len(), 44);
    }
}
