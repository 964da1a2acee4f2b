use chrono::Utc;
use contracts::domain::a009_ticket::aggregate::{NewTicketDto, Ticket, TicketListItem, TicketMessage, TicketReplyDto};
use contracts::domain::a010_notification::aggregate::NewNotification;
use contracts::domain::common::AggregateRoot;
use contracts::enums::NotificationKind;
use contracts::shared::pagination::{ListQuery, Page};
use contracts::system::auth::TokenClaims;
use contracts::system::navigation::detail_key;
use contracts::system::roles::{Permission, Resource};

use super::repository;
use crate::domain::a010_notification::service as notifications;
use crate::shared::data::query::next_code;
use crate::shared::error::{AppError, AppResult};
use crate::shared::html::{plain_preview, sanitize_message};
use crate::system::auth::guard;
use crate::system::users::repository as users_repository;

const PREVIEW_CHARS: usize = 160;

fn is_support(claims: &TokenClaims) -> bool {
    claims.role.has(Permission::ManageTickets)
}

async fn load_accessible(claims: &TokenClaims, id: &str) -> AppResult<Ticket> {
    let ticket = repository::get_by_id(id).await?.ok_or(AppError::NotFound)?;
    if ticket.can_access(&claims.sub, is_support(claims)) {
        Ok(ticket)
    } else {
        Err(AppError::NotFound)
    }
}

/// Сообщение от текущего пользователя; пустой после очистки текст не принимается
async fn compose(claims: &TokenClaims, raw: &str) -> AppResult<TicketMessage> {
    let body = sanitize_message(raw);
    if plain_preview(&body, 1).is_empty() {
        return Err(AppError::Validation("body: Message is empty after cleanup".into()));
    }
    let author_name = users_repository::get_by_id(&claims.sub)
        .await?
        .map(|u| u.display_name())
        .unwrap_or_else(|| claims.username.clone());
    Ok(TicketMessage {
        author_id: claims.sub.clone(),
        author_name,
        is_staff: is_support(claims),
        body,
        created_at: Utc::now(),
    })
}

pub async fn open(claims: &TokenClaims, dto: NewTicketDto) -> AppResult<String> {
    guard::require_view(claims, Resource::Tickets)?;
    dto.validate()?;
    let first = compose(claims, &dto.body).await?;

    let code = next_code(&Ticket::table_name(), "TCK").await?;
    let mut aggregate = Ticket::open(code, &dto, first, claims.dealer_id.clone());
    aggregate.before_write();
    let id = repository::insert(&aggregate).await?;
    tracing::info!("Ticket {} opened by {}", aggregate.base.code, claims.username);

    let preview = aggregate
        .messages
        .first()
        .map(|m| plain_preview(&m.body, PREVIEW_CHARS))
        .unwrap_or_default();
    notifications::notify_staff(
        &claims.sub,
        NewNotification::new(
            "",
            NotificationKind::System,
            format!("New ticket {}: {}", aggregate.base.code, aggregate.subject()),
        )
        .body(preview)
        .link(detail_key("a009_ticket", &id)),
    )
    .await;
    Ok(id)
}

/// Ответ в переписку. Ответ поддержки уведомляет автора обращения.
pub async fn reply(claims: &TokenClaims, id: &str, dto: TicketReplyDto) -> AppResult<Ticket> {
    guard::require_view(claims, Resource::Tickets)?;
    dto.validate()?;
    let mut aggregate = load_accessible(claims, id).await?;
    let message = compose(claims, &dto.body).await?;
    let preview = plain_preview(&message.body, PREVIEW_CHARS);

    aggregate.reply(message).map_err(AppError::Conflict)?;
    aggregate.before_write();
    aggregate.base.metadata.increment_version();
    repository::append_message(&aggregate).await?;

    if is_support(claims) && aggregate.created_by != claims.sub {
        notifications::send(
            NewNotification::new(
                aggregate.created_by.clone(),
                NotificationKind::TicketReplied,
                format!("Reply to ticket {}", aggregate.base.code),
            )
            .body(preview)
            .link(detail_key("a009_ticket", &aggregate.to_string_id())),
        )
        .await;
    }
    Ok(aggregate)
}

pub async fn close(claims: &TokenClaims, id: &str) -> AppResult<Ticket> {
    guard::require_view(claims, Resource::Tickets)?;
    let mut aggregate = load_accessible(claims, id).await?;

    aggregate.close().map_err(AppError::Conflict)?;
    aggregate.before_write();
    aggregate.base.metadata.increment_version();
    repository::update(&aggregate).await?;
    tracing::info!("Ticket {} closed by {}", aggregate.base.code, claims.username);
    Ok(aggregate)
}

pub async fn get_by_id(claims: &TokenClaims, id: &str) -> AppResult<Ticket> {
    guard::require_view(claims, Resource::Tickets)?;
    load_accessible(claims, id).await
}

pub async fn list(claims: &TokenClaims, query: &ListQuery) -> AppResult<Page<TicketListItem>> {
    guard::require_view(claims, Resource::Tickets)?;
    let own = if is_support(claims) { None } else { Some(claims.sub.as_str()) };
    let (items, total) = repository::list_paged(query, own).await?;
    Ok(Page::new(items, total, query))
}
