use contracts::domain::a010_notification::aggregate::{NewNotification, Notification, UnreadCount};
use contracts::shared::pagination::{ListQuery, Page};
use contracts::system::auth::TokenClaims;
use contracts::system::roles::Role;

use super::repository;
use crate::shared::error::{AppError, AppResult};
use crate::system::users::repository as users_repository;

/// Записать уведомление. Ошибка только логируется: основное действие уже выполнено.
pub async fn send(notification: NewNotification) {
    if notification.user_id.is_empty() {
        return;
    }
    if let Err(e) = repository::insert(&notification).await {
        tracing::error!(
            "Failed to store notification '{}' for user {}: {}",
            notification.title,
            notification.user_id,
            e
        );
    }
}

pub async fn send_all(notifications: Vec<NewNotification>) {
    for n in notifications {
        send(n).await;
    }
}

/// Всем пользователям, привязанным к клиенту
pub async fn notify_customer(customer_id: &str, template: NewNotification) {
    match users_repository::list_by_customer(customer_id).await {
        Ok(users) => {
            let batch = users
                .into_iter()
                .filter(|u| u.is_active)
                .map(|u| NewNotification {
                    user_id: u.id,
                    ..template.clone()
                })
                .collect();
            send_all(batch).await;
        }
        Err(e) => tracing::error!("Failed to load users of customer {}: {}", customer_id, e),
    }
}

/// Сотрудникам страховой (админам), кроме автора действия
pub async fn notify_staff(except_user_id: &str, template: NewNotification) {
    match users_repository::list_by_roles(&[Role::SuperAdmin, Role::Admin]).await {
        Ok(users) => {
            let batch = users
                .into_iter()
                .filter(|u| u.is_active && u.id != except_user_id)
                .map(|u| NewNotification {
                    user_id: u.id,
                    ..template.clone()
                })
                .collect();
            send_all(batch).await;
        }
        Err(e) => tracing::error!("Failed to load staff users: {}", e),
    }
}

pub async fn list(claims: &TokenClaims, query: &ListQuery) -> AppResult<Page<Notification>> {
    let (items, total) = repository::list_for_user(&claims.sub, query).await?;
    Ok(Page::new(items, total, query))
}

pub async fn unread_count(claims: &TokenClaims) -> AppResult<UnreadCount> {
    let unread = repository::count_unread(&claims.sub).await?;
    Ok(UnreadCount { unread: unread as i64 })
}

pub async fn mark_read(claims: &TokenClaims, id: &str) -> AppResult<()> {
    if repository::mark_read(&claims.sub, id).await? {
        Ok(())
    } else {
        Err(AppError::NotFound)
    }
}

pub async fn mark_all_read(claims: &TokenClaims) -> AppResult<u64> {
    Ok(repository::mark_all_read(&claims.sub).await?)
}
