use chrono::Utc;
use contracts::shared::pagination::{ListQuery, Page};
use contracts::system::auth::TokenClaims;
use contracts::system::roles::{DataScope, Permission, Role};
use contracts::system::users::{ChangePasswordDto, CreateUserDto, UpdateUserDto, User, UserOption};

use super::repository;
use crate::domain::{a001_dealer, a002_customer};
use crate::shared::error::{AppError, AppResult};
use crate::system::auth::{guard, password, refresh_token};

/// Учётные записи с этой ролью может вести только тот, кому роль назначаема
fn ensure_can_manage_role(claims: &TokenClaims, role: Role) -> AppResult<()> {
    if claims.role.assignable_roles().contains(&role) {
        Ok(())
    } else {
        Err(AppError::Forbidden(format!(
            "You cannot manage {} accounts",
            role.display_name()
        )))
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Ссылки на дилера/клиента должны вести на существующие записи
async fn check_links(role: Role, dealer_id: Option<&str>, customer_id: Option<&str>) -> AppResult<()> {
    if role == Role::Dealer {
        if let Some(id) = dealer_id {
            if a001_dealer::repository::get_by_id(id).await?.is_none() {
                return Err(AppError::Validation("dealer_id: Dealer not found".into()));
            }
        }
    }
    if role == Role::Customer {
        if let Some(id) = customer_id {
            if a002_customer::repository::get_by_id(id).await?.is_none() {
                return Err(AppError::Validation("customer_id: Customer not found".into()));
            }
        }
    }
    Ok(())
}

/// Create a new user
pub async fn create(claims: &TokenClaims, dto: CreateUserDto) -> AppResult<String> {
    guard::require(claims, Permission::ManageUsers)?;
    ensure_can_manage_role(claims, dto.role)?;
    create_unchecked(dto, Some(claims.sub.clone())).await
}

/// Без проверки прав: первичная учётная запись при старте
pub async fn create_unchecked(dto: CreateUserDto, created_by: Option<String>) -> AppResult<String> {
    dto.validate()?;
    let username = dto.username.trim().to_string();

    if repository::get_by_username(&username).await?.is_some() {
        return Err(AppError::Conflict("Username already exists".into()));
    }

    let dealer_id = non_blank(dto.dealer_id).filter(|_| dto.role == Role::Dealer);
    let customer_id = non_blank(dto.customer_id).filter(|_| dto.role == Role::Customer);
    check_links(dto.role, dealer_id.as_deref(), customer_id.as_deref()).await?;

    password::validate_password_strength(&dto.password).map_err(|e| AppError::Validation(e.to_string()))?;
    let password_hash = password::hash_password(&dto.password)?;

    let user_id = uuid::Uuid::new_v4().to_string();
    let now = Utc::now().to_rfc3339();

    let user = User {
        id: user_id.clone(),
        username,
        email: non_blank(dto.email),
        full_name: non_blank(dto.full_name),
        role: dto.role,
        dealer_id,
        customer_id,
        is_active: true,
        created_at: now.clone(),
        updated_at: now,
        last_login_at: None,
        created_by,
    };

    repository::create_with_password(&user, &password_hash).await?;
    tracing::info!("User '{}' created with role {}", user.username, user.role);

    Ok(user_id)
}

pub async fn update(claims: &TokenClaims, dto: UpdateUserDto) -> AppResult<()> {
    guard::require(claims, Permission::ManageUsers)?;
    dto.validate()?;

    let mut user = repository::get_by_id(&dto.id).await?.ok_or(AppError::NotFound)?;
    if user.id != claims.sub {
        ensure_can_manage_role(claims, user.role)?;
    }
    if dto.role != user.role {
        ensure_can_manage_role(claims, dto.role)?;
    }
    if user.id == claims.sub && (!dto.is_active || dto.role != user.role) {
        return Err(AppError::Validation(
            "You cannot deactivate your own account or change your own role".into(),
        ));
    }

    let dealer_id = non_blank(dto.dealer_id).filter(|_| dto.role == Role::Dealer);
    let customer_id = non_blank(dto.customer_id).filter(|_| dto.role == Role::Customer);
    check_links(dto.role, dealer_id.as_deref(), customer_id.as_deref()).await?;

    user.email = non_blank(dto.email);
    user.full_name = non_blank(dto.full_name);
    user.role = dto.role;
    user.dealer_id = dealer_id;
    user.customer_id = customer_id;
    user.is_active = dto.is_active;
    user.updated_at = Utc::now().to_rfc3339();

    repository::update(&user).await?;
    if !user.is_active {
        refresh_token::revoke_all_for_user(&user.id).await?;
    }
    Ok(())
}

pub async fn delete(claims: &TokenClaims, id: &str) -> AppResult<()> {
    guard::require(claims, Permission::ManageUsers)?;
    if id == claims.sub {
        return Err(AppError::Validation("You cannot delete your own account".into()));
    }
    let user = repository::get_by_id(id).await?.ok_or(AppError::NotFound)?;
    ensure_can_manage_role(claims, user.role)?;
    refresh_token::revoke_all_for_user(id).await?;
    if repository::delete(id).await? {
        tracing::info!("User '{}' deleted by {}", user.username, claims.username);
        Ok(())
    } else {
        Err(AppError::NotFound)
    }
}

/// Свою запись видит каждый, чужие только с ManageUsers
pub async fn get_by_id(claims: &TokenClaims, id: &str) -> AppResult<User> {
    if id != claims.sub {
        guard::require(claims, Permission::ManageUsers)?;
    }
    repository::get_by_id(id).await?.ok_or(AppError::NotFound)
}

pub async fn list(claims: &TokenClaims, query: &ListQuery) -> AppResult<Page<User>> {
    guard::require(claims, Permission::ManageUsers)?;
    let (items, total) = repository::list_paged(query).await?;
    Ok(Page::new(items, total, query))
}

/// Исполнители для задач: дилер видит только своих пользователей
pub async fn options(claims: &TokenClaims) -> AppResult<Vec<UserOption>> {
    let users = match guard::scope(claims) {
        DataScope::All => repository::list_active(None).await?,
        DataScope::Dealer(dealer_id) => repository::list_active(Some(&dealer_id)).await?,
        _ => return Err(AppError::forbidden()),
    };
    Ok(users.iter().map(UserOption::from).collect())
}

/// Change user password
pub async fn change_password(claims: &TokenClaims, dto: ChangePasswordDto) -> AppResult<()> {
    let user = repository::get_by_id(&dto.user_id).await?.ok_or(AppError::NotFound)?;

    if dto.user_id != claims.sub {
        guard::require(claims, Permission::ManageUsers)?;
        ensure_can_manage_role(claims, user.role)?;
    } else {
        let old_password = dto
            .old_password
            .as_deref()
            .filter(|p| !p.is_empty())
            .ok_or_else(|| AppError::Validation("old_password: Current password is required".into()))?;
        let current_hash = repository::get_password_hash(&dto.user_id)
            .await?
            .ok_or(AppError::NotFound)?;
        if !password::verify_password(old_password, &current_hash)? {
            return Err(AppError::Validation("old_password: Current password is incorrect".into()));
        }
    }

    password::validate_password_strength(&dto.new_password)
        .map_err(|e| AppError::Validation(format!("new_password: {}", e)))?;
    let new_hash = password::hash_password(&dto.new_password)?;
    repository::update_password(&dto.user_id, &new_hash).await?;
    tracing::info!("Password changed for user '{}'", user.username);
    Ok(())
}

/// Verify user credentials (for login)
pub async fn verify_credentials(username: &str, password: &str) -> AppResult<User> {
    let user = repository::get_by_username(username.trim())
        .await?
        .ok_or(AppError::Unauthorized)?;

    let password_hash = repository::get_password_hash(&user.id)
        .await?
        .ok_or(AppError::Unauthorized)?;

    if !password::verify_password(password, &password_hash)? {
        tracing::warn!("Failed login attempt for '{}'", user.username);
        return Err(AppError::Unauthorized);
    }

    if !user.is_active {
        return Err(AppError::Forbidden("User account is inactive".into()));
    }

    if let Err(e) = repository::update_last_login(&user.id).await {
        tracing::warn!("Failed to update last login for '{}': {}", user.username, e);
    }

    Ok(user)
}
