//! Ключ-значение в таблице `sys_settings`.

use chrono::Utc;
use sea_orm::ConnectionTrait;

use super::db::get_connection;
use super::query::statement;

pub async fn get(key: &str) -> anyhow::Result<Option<String>> {
    let db = get_connection()?;
    let row = db
        .query_one(statement(
            "SELECT value FROM sys_settings WHERE key = ?",
            vec![key.into()],
        ))
        .await?;
    match row {
        Some(r) => Ok(Some(r.try_get("", "value")?)),
        None => Ok(None),
    }
}

pub async fn put(key: &str, value: &str, description: &str) -> anyhow::Result<()> {
    let db = get_connection()?;
    let now = Utc::now().to_rfc3339();
    db.execute(statement(
        "INSERT INTO sys_settings (key, value, description, created_at, updated_at)
         VALUES (?, ?, ?, ?, ?)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at",
        vec![
            key.into(),
            value.into(),
            description.into(),
            now.clone().into(),
            now.into(),
        ],
    ))
    .await?;
    Ok(())
}
