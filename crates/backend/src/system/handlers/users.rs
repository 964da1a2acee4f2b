use axum::{
    extract::{Json, Path, Query},
    http::StatusCode,
};
use contracts::shared::pagination::{ListQuery, Page};
use contracts::system::users::{ChangePasswordDto, CreateUserDto, UpdateUserDto, User, UserOption};

use crate::shared::error::AppResult;
use crate::system::auth::extractor::CurrentUser;
use crate::system::users::service;

/// GET /api/system/users
pub async fn list(
    CurrentUser(claims): CurrentUser,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Page<User>>> {
    Ok(Json(service::list(&claims, &query).await?))
}

/// GET /api/system/users/options
pub async fn options(CurrentUser(claims): CurrentUser) -> AppResult<Json<Vec<UserOption>>> {
    Ok(Json(service::options(&claims).await?))
}

pub async fn get_by_id(CurrentUser(claims): CurrentUser, Path(id): Path<String>) -> AppResult<Json<User>> {
    Ok(Json(service::get_by_id(&claims, &id).await?))
}

pub async fn create(
    CurrentUser(claims): CurrentUser,
    Json(dto): Json<CreateUserDto>,
) -> AppResult<Json<serde_json::Value>> {
    let id = service::create(&claims, dto).await?;
    Ok(Json(serde_json::json!({ "id": id })))
}

pub async fn update(
    CurrentUser(claims): CurrentUser,
    Path(id): Path<String>,
    Json(mut dto): Json<UpdateUserDto>,
) -> AppResult<StatusCode> {
    dto.id = id;
    service::update(&claims, dto).await?;
    Ok(StatusCode::OK)
}

pub async fn delete(CurrentUser(claims): CurrentUser, Path(id): Path<String>) -> AppResult<StatusCode> {
    service::delete(&claims, &id).await?;
    Ok(StatusCode::OK)
}

/// POST /api/system/users/:id/change-password
pub async fn change_password(
    CurrentUser(claims): CurrentUser,
    Path(id): Path<String>,
    Json(mut dto): Json<ChangePasswordDto>,
) -> AppResult<StatusCode> {
    dto.user_id = id;
    service::change_password(&claims, dto).await?;
    Ok(StatusCode::OK)
}
