//! Refresh-токены: в базе хранится только SHA-256 хеш.

use chrono::Utc;
use sea_orm::ConnectionTrait;
use sha2::{Digest, Sha256};

use super::jwt;
use crate::shared::data::db::get_connection;
use crate::shared::data::query::statement;

pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

pub async fn store(user_id: &str, token: &str) -> anyhow::Result<()> {
    get_connection()?
        .execute(statement(
            "INSERT INTO sys_refresh_tokens (id, user_id, token_hash, expires_at, created_at)
             VALUES (?, ?, ?, ?, ?)",
            vec![
                uuid::Uuid::new_v4().to_string().into(),
                user_id.into(),
                hash_token(token).into(),
                jwt::calculate_refresh_token_expiration().into(),
                Utc::now().to_rfc3339().into(),
            ],
        ))
        .await?;
    Ok(())
}

/// id пользователя для действующего, не отозванного токена
pub async fn validate(token: &str) -> anyhow::Result<Option<String>> {
    let row = get_connection()?
        .query_one(statement(
            "SELECT user_id FROM sys_refresh_tokens
             WHERE token_hash = ? AND expires_at > ? AND revoked_at IS NULL",
            vec![hash_token(token).into(), Utc::now().to_rfc3339().into()],
        ))
        .await?;
    match row {
        Some(r) => Ok(Some(r.try_get("", "user_id")?)),
        None => Ok(None),
    }
}

pub async fn revoke(token: &str) -> anyhow::Result<()> {
    get_connection()?
        .execute(statement(
            "UPDATE sys_refresh_tokens SET revoked_at = ? WHERE token_hash = ? AND revoked_at IS NULL",
            vec![Utc::now().to_rfc3339().into(), hash_token(token).into()],
        ))
        .await?;
    Ok(())
}

/// При деактивации или удалении пользователя
pub async fn revoke_all_for_user(user_id: &str) -> anyhow::Result<u64> {
    let result = get_connection()?
        .execute(statement(
            "UPDATE sys_refresh_tokens SET revoked_at = ? WHERE user_id = ? AND revoked_at IS NULL",
            vec![Utc::now().to_rfc3339().into(), user_id.into()],
        ))
        .await?;
    Ok(result.rows_affected())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_token() {
        let h = hash_token("abc");
        assert_eq!(h.len(), 64);
        assert_eq!(h, hash_token("abc"));
        assert_ne!(h, hash_token("abd"));
        assert_eq!(
            h,
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }
}
