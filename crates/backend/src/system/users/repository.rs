use anyhow::{Context, Result};
use contracts::shared::pagination::ListQuery;
use contracts::system::roles::Role;
use contracts::system::users::User;
use sea_orm::{ConnectionTrait, QueryResult};

use crate::shared::data::db::get_connection;
use crate::shared::data::query::{count_rows, page_sql, statement, SqlFilter};

const USER_COLUMNS: &str = "id, username, email, full_name, role, dealer_id, customer_id, is_active, created_at, updated_at, last_login_at, created_by";

fn map_row(row: &QueryResult) -> Result<User> {
    let role_code: String = row.try_get("", "role")?;
    Ok(User {
        id: row.try_get("", "id")?,
        username: row.try_get("", "username")?,
        email: row.try_get("", "email")?,
        full_name: row.try_get("", "full_name")?,
        role: Role::from_code(&role_code).unwrap_or_default(),
        dealer_id: row.try_get("", "dealer_id")?,
        customer_id: row.try_get("", "customer_id")?,
        is_active: row.try_get::<i32>("", "is_active")? != 0,
        created_at: row.try_get("", "created_at")?,
        updated_at: row.try_get("", "updated_at")?,
        last_login_at: row.try_get("", "last_login_at")?,
        created_by: row.try_get("", "created_by")?,
    })
}

async fn query_users(sql: &str, values: Vec<sea_orm::Value>) -> Result<Vec<User>> {
    let rows = get_connection()?.query_all(statement(sql, values)).await?;
    rows.iter().map(map_row).collect()
}

async fn query_user(sql: &str, values: Vec<sea_orm::Value>) -> Result<Option<User>> {
    Ok(query_users(sql, values).await?.into_iter().next())
}

/// Create user with password hash
pub async fn create_with_password(user: &User, password_hash: &str) -> Result<()> {
    get_connection()?
        .execute(statement(
            "INSERT INTO sys_users (id, username, email, password_hash, full_name, role, dealer_id, customer_id, is_active, created_at, updated_at, last_login_at, created_by)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            vec![
                user.id.clone().into(),
                user.username.clone().into(),
                user.email.clone().into(),
                password_hash.to_string().into(),
                user.full_name.clone().into(),
                user.role.code().into(),
                user.dealer_id.clone().into(),
                user.customer_id.clone().into(),
                (if user.is_active { 1 } else { 0 }).into(),
                user.created_at.clone().into(),
                user.updated_at.clone().into(),
                user.last_login_at.clone().into(),
                user.created_by.clone().into(),
            ],
        ))
        .await
        .context("Failed to insert user")?;
    Ok(())
}

pub async fn get_by_id(id: &str) -> Result<Option<User>> {
    let sql = format!("SELECT {} FROM sys_users WHERE id = ?", USER_COLUMNS);
    query_user(&sql, vec![id.into()]).await
}

pub async fn get_by_username(username: &str) -> Result<Option<User>> {
    let sql = format!("SELECT {} FROM sys_users WHERE username = ?", USER_COLUMNS);
    query_user(&sql, vec![username.into()]).await
}

pub async fn get_password_hash(user_id: &str) -> Result<Option<String>> {
    let row = get_connection()?
        .query_one(statement(
            "SELECT password_hash FROM sys_users WHERE id = ?",
            vec![user_id.into()],
        ))
        .await?;
    match row {
        Some(r) => Ok(Some(r.try_get("", "password_hash")?)),
        None => Ok(None),
    }
}

/// Страница пользователей: поиск по логину и имени, фильтр роли в `status`
pub async fn list_paged(query: &ListQuery) -> Result<(Vec<User>, usize)> {
    let filter = SqlFilter::new()
        .search(&["username", "full_name", "email"], query.search_pattern())
        .eq("role", query.status())
        .eq("dealer_id", query.dealer_id());
    let total = count_rows("sys_users", &filter).await?;
    let sort = query.sort_column(&["username", "full_name", "role", "created_at", "last_login_at"], "username");
    let order = format!("{} {}", sort, query.sort_direction());
    let stmt = page_sql(USER_COLUMNS, "sys_users", &filter, &order, query);
    let rows = get_connection()?.query_all(stmt).await?;
    let users = rows.iter().map(map_row).collect::<Result<Vec<_>>>()?;
    Ok((users, total))
}

pub async fn list_active(dealer_id: Option<&str>) -> Result<Vec<User>> {
    let filter = SqlFilter::new().raw("is_active = 1").eq("dealer_id", dealer_id);
    let sql = format!(
        "SELECT {} FROM sys_users {} ORDER BY COALESCE(full_name, username)",
        USER_COLUMNS,
        filter.where_sql()
    );
    query_users(&sql, filter.values()).await
}

/// Активные пользователи, привязанные к клиенту
pub async fn list_by_customer(customer_id: &str) -> Result<Vec<User>> {
    let sql = format!(
        "SELECT {} FROM sys_users WHERE customer_id = ? AND is_active = 1",
        USER_COLUMNS
    );
    query_users(&sql, vec![customer_id.into()]).await
}

pub async fn list_by_roles(roles: &[Role]) -> Result<Vec<User>> {
    if roles.is_empty() {
        return Ok(Vec::new());
    }
    let placeholders = vec!["?"; roles.len()].join(", ");
    let sql = format!(
        "SELECT {} FROM sys_users WHERE is_active = 1 AND role IN ({})",
        USER_COLUMNS, placeholders
    );
    let values = roles.iter().map(|r| r.code().into()).collect();
    query_users(&sql, values).await
}

pub async fn update(user: &User) -> Result<()> {
    get_connection()?
        .execute(statement(
            "UPDATE sys_users
             SET email = ?, full_name = ?, role = ?, dealer_id = ?, customer_id = ?, is_active = ?, updated_at = ?
             WHERE id = ?",
            vec![
                user.email.clone().into(),
                user.full_name.clone().into(),
                user.role.code().into(),
                user.dealer_id.clone().into(),
                user.customer_id.clone().into(),
                (if user.is_active { 1 } else { 0 }).into(),
                user.updated_at.clone().into(),
                user.id.clone().into(),
            ],
        ))
        .await
        .context("Failed to update user")?;
    Ok(())
}

/// Delete user (hard delete), refresh tokens go by cascade
pub async fn delete(id: &str) -> Result<bool> {
    let result = get_connection()?
        .execute(statement("DELETE FROM sys_users WHERE id = ?", vec![id.into()]))
        .await
        .context("Failed to delete user")?;
    Ok(result.rows_affected() > 0)
}

pub async fn update_last_login(id: &str) -> Result<()> {
    let now = chrono::Utc::now().to_rfc3339();
    get_connection()?
        .execute(statement(
            "UPDATE sys_users SET last_login_at = ? WHERE id = ?",
            vec![now.into(), id.into()],
        ))
        .await
        .context("Failed to update last login")?;
    Ok(())
}

pub async fn count_users() -> Result<usize> {
    count_rows("sys_users", &SqlFilter::new()).await
}

pub async fn update_password(id: &str, password_hash: &str) -> Result<()> {
    get_connection()?
        .execute(statement(
            "UPDATE sys_users SET password_hash = ?, updated_at = ? WHERE id = ?",
            vec![
                password_hash.into(),
                chrono::Utc::now().to_rfc3339().into(),
                id.into(),
            ],
        ))
        .await
        .context("Failed to update password")?;
    Ok(())
}
