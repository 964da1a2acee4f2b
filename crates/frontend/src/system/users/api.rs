use contracts::shared::pagination::{ListQuery, Page};
use contracts::system::users::{ChangePasswordDto, CreateUserDto, UpdateUserDto, User, UserOption};

use crate::shared::api_utils;

pub async fn list(query: ListQuery) -> Result<Page<User>, String> {
    api_utils::get_with_query("/api/system/users", &query).await
}

pub async fn get(id: &str) -> Result<User, String> {
    api_utils::get(&format!("/api/system/users/{}", id)).await
}

/// Returns the id of the new user.
pub async fn create(dto: &CreateUserDto) -> Result<String, String> {
    api_utils::save("/api/system/users", dto).await
}

pub async fn update(dto: &UpdateUserDto) -> Result<(), String> {
    api_utils::put_no_content(&format!("/api/system/users/{}", dto.id), dto).await
}

pub async fn delete(id: &str) -> Result<(), String> {
    api_utils::delete(&format!("/api/system/users/{}", id)).await
}

pub async fn change_password(dto: &ChangePasswordDto) -> Result<(), String> {
    api_utils::post_json_no_content(
        &format!("/api/system/users/{}/change-password", dto.user_id),
        dto,
    )
    .await
}

/// Исполнители задач и наблюдатели дилеров
pub async fn options() -> Result<Vec<UserOption>, String> {
    api_utils::get("/api/system/users/options").await
}
