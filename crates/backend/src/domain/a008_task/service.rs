use chrono::NaiveDate;
use contracts::domain::a008_task::aggregate::{Task, TaskDto, TaskStatusDto};
use contracts::domain::a010_notification::aggregate::NewNotification;
use contracts::domain::common::AggregateRoot;
use contracts::enums::NotificationKind;
use contracts::shared::pagination::{ListQuery, Page};
use contracts::system::auth::TokenClaims;
use contracts::system::roles::{DataScope, Permission, Resource};

use super::repository;
use crate::domain::a010_notification::service as notifications;
use crate::shared::data::query::next_code;
use crate::shared::error::{AppError, AppResult};
use crate::system::auth::guard;
use crate::system::users::repository as users_repository;

fn can_see(claims: &TokenClaims, task: &Task) -> bool {
    match guard::scope(claims) {
        DataScope::All => true,
        DataScope::Dealer(dealer_id) => {
            task.dealer_id.as_deref() == Some(dealer_id.as_str()) || task.assignee_user_id == claims.sub
        }
        _ => task.assignee_user_id == claims.sub,
    }
}

async fn load_visible(claims: &TokenClaims, id: &str) -> AppResult<Task> {
    let task = repository::get_by_id(id).await?.ok_or(AppError::NotFound)?;
    if can_see(claims, &task) {
        Ok(task)
    } else {
        Err(AppError::NotFound)
    }
}

/// Дилер ставит задачи только от имени своего дилера и только своим пользователям
async fn prepare_dto(claims: &TokenClaims, dto: &mut TaskDto) -> AppResult<()> {
    let assignee = users_repository::get_by_id(dto.assignee_user_id.trim())
        .await?
        .filter(|u| u.is_active)
        .ok_or_else(|| AppError::Validation("assignee_user_id: Assignee must be an active user".into()))?;

    if let DataScope::Dealer(own) = guard::scope(claims) {
        if assignee.dealer_id.as_deref() != Some(own.as_str()) {
            return Err(AppError::Validation(
                "assignee_user_id: Tasks can only be assigned to users of your dealer".into(),
            ));
        }
        dto.dealer_id = Some(own);
    }
    Ok(())
}

async fn notify_assignee(claims: &TokenClaims, task: &Task) {
    if task.assignee_user_id == claims.sub {
        return;
    }
    notifications::send(
        NewNotification::new(
            task.assignee_user_id.clone(),
            NotificationKind::TaskAssigned,
            format!("Task {}: {}", task.base.code, task.base.description),
        )
        .body(format!(
            "Assigned by {}, due {}",
            claims.username,
            task.due_date.format("%d.%m.%Y")
        ))
        .link("a008_task"),
    )
    .await;
}

pub async fn create(claims: &TokenClaims, mut dto: TaskDto) -> AppResult<String> {
    guard::require(claims, Permission::ManageTasks)?;
    dto.validate()?;
    prepare_dto(claims, &mut dto).await?;

    let code = next_code(&Task::table_name(), "TSK").await?;
    let mut aggregate = Task::new_for_insert(code, &dto, claims.sub.clone());
    aggregate.validate()?;

    aggregate.before_write();
    let id = repository::insert(&aggregate).await?;
    notify_assignee(claims, &aggregate).await;
    Ok(id)
}

pub async fn update(claims: &TokenClaims, mut dto: TaskDto) -> AppResult<()> {
    guard::require(claims, Permission::ManageTasks)?;
    let id = dto.id.clone().ok_or(AppError::NotFound)?;
    let mut aggregate = load_visible(claims, &id).await?;
    dto.validate()?;
    prepare_dto(claims, &mut dto).await?;

    let reassigned = aggregate.update(&dto);
    aggregate.validate()?;

    aggregate.before_write();
    aggregate.base.metadata.increment_version();
    repository::update(&aggregate).await?;
    if reassigned {
        notify_assignee(claims, &aggregate).await;
    }
    Ok(())
}

pub async fn set_status(claims: &TokenClaims, id: &str, dto: TaskStatusDto) -> AppResult<Task> {
    guard::require(claims, Permission::ManageTasks)?;
    let mut aggregate = load_visible(claims, id).await?;

    aggregate.status = dto.status;
    aggregate.before_write();
    aggregate.base.metadata.increment_version();
    repository::update(&aggregate).await?;
    Ok(aggregate)
}

pub async fn delete(claims: &TokenClaims, id: &str) -> AppResult<()> {
    guard::require(claims, Permission::ManageTasks)?;
    let task = load_visible(claims, id).await?;
    if !claims.role.is_staff() && task.created_by != claims.sub {
        return Err(AppError::Forbidden("Only the author can delete this task".into()));
    }
    if repository::soft_delete(id).await? {
        Ok(())
    } else {
        Err(AppError::NotFound)
    }
}

pub async fn get_by_id(claims: &TokenClaims, id: &str) -> AppResult<Task> {
    guard::require_view(claims, Resource::Tasks)?;
    load_visible(claims, id).await
}

pub async fn list(claims: &TokenClaims, query: &ListQuery) -> AppResult<Page<Task>> {
    guard::require_view(claims, Resource::Tasks)?;
    let (items, total) = repository::list_paged(query, &guard::scope(claims), &claims.sub).await?;
    Ok(Page::new(items, total, query))
}

/// Housekeeping: одно напоминание на каждую просроченную задачу
pub async fn notify_overdue(today: NaiveDate) -> anyhow::Result<usize> {
    let mut sent = 0;
    for task in repository::list_overdue_unnotified(today).await? {
        if !task.needs_overdue_notice(today) {
            continue;
        }
        notifications::send(
            NewNotification::new(
                task.assignee_user_id.clone(),
                NotificationKind::TaskOverdue,
                format!("Task {} is overdue", task.base.code),
            )
            .body(format!(
                "{} was due {}",
                task.base.description,
                task.due_date.format("%d.%m.%Y")
            ))
            .link("a008_task"),
        )
        .await;
        repository::mark_overdue_notified(&task.to_string_id()).await?;
        sent += 1;
    }
    Ok(sent)
}
