use contracts::domain::a008_task::aggregate::{Task, TaskDto, TaskStatusDto};
use contracts::enums::TaskStatus;
use contracts::shared::lookup::LookupItem;
use contracts::shared::pagination::{ListQuery, Page};

use crate::shared::api_utils;
use crate::system::users;

pub async fn list(query: ListQuery) -> Result<Page<Task>, String> {
    api_utils::get_with_query("/api/task", &query).await
}

pub async fn save(dto: &TaskDto) -> Result<String, String> {
    api_utils::save("/api/task", dto).await
}

pub async fn delete(id: &str) -> Result<(), String> {
    api_utils::delete(&format!("/api/task/{}", id)).await
}

pub async fn set_status(id: &str, status: TaskStatus) -> Result<Task, String> {
    api_utils::post(&format!("/api/task/{}/status", id), &TaskStatusDto { status }).await
}

/// Пользователи, которым можно назначить задачу (дилер видит только своих).
pub async fn assignees() -> Result<Vec<LookupItem>, String> {
    let options = users::api::options().await?;
    Ok(options
        .into_iter()
        .map(|o| LookupItem {
            id: o.id,
            code: String::new(),
            name: format!("{} ({})", o.name, o.role.display_name()),
        })
        .collect())
}
