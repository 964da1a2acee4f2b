use chrono::Utc;
use contracts::domain::a007_claim::aggregate::{Claim, ClaimDto, ClaimListItem, ClaimStatusChangeDto};
use contracts::domain::a010_notification::aggregate::NewNotification;
use contracts::domain::common::AggregateRoot;
use contracts::enums::{ClaimStatus, NotificationKind, PolicyStatus};
use contracts::shared::pagination::{ListQuery, Page};
use contracts::system::auth::TokenClaims;
use contracts::system::navigation::detail_key;
use contracts::system::roles::{Permission, Resource};

use super::repository;
use crate::domain::a006_policy::repository as policy_repository;
use crate::domain::a010_notification::service as notifications;
use crate::shared::data::query::next_code;
use crate::shared::error::{AppError, AppResult};
use crate::shared::scope::ensure_visible;
use crate::system::auth::guard;

async fn load_visible(claims: &TokenClaims, id: &str) -> AppResult<Claim> {
    let claim = repository::get_by_id(id).await?.ok_or(AppError::NotFound)?;
    ensure_visible(&guard::scope(claims), &claim.dealer_id, Some(&claim.customer_id)).await?;
    Ok(claim)
}

fn status_message(claim: &Claim) -> String {
    match claim.status {
        ClaimStatus::Approved => format!(
            "Approved amount: {:.2}",
            claim.approved_amount.unwrap_or_default()
        ),
        _ => claim.resolution_note.clone().unwrap_or_default(),
    }
}

/// Подача заявления по действующему полису из своей области видимости
pub async fn file(claims: &TokenClaims, dto: ClaimDto) -> AppResult<String> {
    guard::require(claims, Permission::FileClaims)?;
    dto.validate(Utc::now().date_naive())?;

    let policy = policy_repository::get_by_id(dto.policy_id.trim())
        .await?
        .ok_or_else(|| AppError::Validation("policy_id: Policy not found".into()))?;
    ensure_visible(&guard::scope(claims), &policy.dealer_id, Some(&policy.customer_id))
        .await
        .map_err(|_| AppError::Validation("policy_id: Policy not found".into()))?;
    if policy.status != PolicyStatus::Active {
        return Err(AppError::Validation(
            "policy_id: Claims can only be filed against active policies".into(),
        ));
    }
    dto.check_policy_period(policy.start_date, policy.end_date)?;

    let code = next_code(&Claim::table_name(), "CLM").await?;
    let mut aggregate = Claim::new_for_insert(code, &dto, policy.customer_id.clone(), policy.dealer_id.clone());
    aggregate.before_write();
    let id = repository::insert(&aggregate).await?;
    tracing::info!(
        "Claim {} filed on policy {} by {}",
        aggregate.base.code,
        policy.policy_no,
        claims.username
    );

    notifications::notify_staff(
        &claims.sub,
        NewNotification::new("", NotificationKind::ClaimUpdated, format!("New claim {}", aggregate.base.code))
            .body(format!("Policy {}: {:.2} {}", policy.policy_no, aggregate.claimed_amount, policy.currency))
            .link(detail_key("a007_claim", &id)),
    )
    .await;
    Ok(id)
}

/// Смена статуса по маршруту рассмотрения, с уведомлением клиента
pub async fn change_status(claims: &TokenClaims, id: &str, dto: ClaimStatusChangeDto) -> AppResult<Claim> {
    guard::require(claims, Permission::ProcessClaims)?;
    let mut aggregate = load_visible(claims, id).await?;

    aggregate.transition(&dto, Utc::now())?;
    aggregate.before_write();
    aggregate.base.metadata.increment_version();
    repository::update(&aggregate).await?;
    tracing::info!(
        "Claim {} moved to {} by {}",
        aggregate.base.code,
        aggregate.status,
        claims.username
    );

    notifications::notify_customer(
        &aggregate.customer_id,
        NewNotification::new(
            "",
            NotificationKind::ClaimUpdated,
            format!("Claim {}: {}", aggregate.base.code, aggregate.status.display_name()),
        )
        .body(status_message(&aggregate))
        .link(detail_key("a007_claim", &aggregate.to_string_id())),
    )
    .await;

    Ok(aggregate)
}

pub async fn get_by_id(claims: &TokenClaims, id: &str) -> AppResult<Claim> {
    guard::require_view(claims, Resource::Claims)?;
    load_visible(claims, id).await
}

pub async fn list(claims: &TokenClaims, query: &ListQuery) -> AppResult<Page<ClaimListItem>> {
    guard::require_view(claims, Resource::Claims)?;
    let (items, total) = repository::list_paged(query, &guard::scope(claims)).await?;
    Ok(Page::new(items, total, query))
}
