use axum::{extract::Json, http::StatusCode};
use contracts::system::auth::{LoginRequest, LoginResponse, RefreshRequest, RefreshResponse, UserInfo};
use contracts::system::users::User;

use crate::shared::error::{AppError, AppResult};
use crate::system::auth::extractor::CurrentUser;
use crate::system::auth::{jwt, refresh_token};
use crate::system::users::{repository as users_repository, service as user_service};

fn user_info(user: User) -> UserInfo {
    UserInfo {
        id: user.id,
        username: user.username,
        full_name: user.full_name,
        email: user.email,
        role: user.role,
        dealer_id: user.dealer_id,
        customer_id: user.customer_id,
    }
}

/// POST /api/system/auth/login
pub async fn login(Json(request): Json<LoginRequest>) -> AppResult<Json<LoginResponse>> {
    let user = user_service::verify_credentials(&request.username, &request.password).await?;

    let access_token = jwt::generate_access_token(&user).await?;
    let refresh_token = jwt::generate_refresh_token();
    refresh_token::store(&user.id, &refresh_token).await?;

    tracing::info!("User '{}' logged in as {}", user.username, user.role);
    Ok(Json(LoginResponse {
        access_token,
        refresh_token,
        user: user_info(user),
    }))
}

/// POST /api/system/auth/refresh
///
/// Роль и привязки берутся из базы заново: изменения вступают в силу без перелогина.
pub async fn refresh(Json(request): Json<RefreshRequest>) -> AppResult<Json<RefreshResponse>> {
    let user_id = refresh_token::validate(&request.refresh_token)
        .await?
        .ok_or(AppError::Unauthorized)?;

    let user = users_repository::get_by_id(&user_id)
        .await?
        .filter(|u| u.is_active)
        .ok_or(AppError::Unauthorized)?;

    let access_token = jwt::generate_access_token(&user).await?;
    Ok(Json(RefreshResponse { access_token }))
}

/// POST /api/system/auth/logout
pub async fn logout(Json(request): Json<RefreshRequest>) -> AppResult<StatusCode> {
    refresh_token::revoke(&request.refresh_token).await?;
    Ok(StatusCode::OK)
}

/// GET /api/system/auth/me
pub async fn current_user(CurrentUser(claims): CurrentUser) -> AppResult<Json<UserInfo>> {
    let user = users_repository::get_by_id(&claims.sub)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(Json(user_info(user)))
}
