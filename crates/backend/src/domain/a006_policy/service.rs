use chrono::{NaiveDate, Utc};
use contracts::domain::a006_policy::aggregate::{CancelPolicyDto, Policy, PolicyDto, PolicyListItem};
use contracts::domain::a010_notification::aggregate::NewNotification;
use contracts::domain::common::AggregateRoot;
use contracts::enums::{NotificationKind, PolicyStatus};
use contracts::shared::pagination::{ListQuery, Page};
use contracts::system::auth::TokenClaims;
use contracts::system::navigation::detail_key;
use contracts::system::roles::{Permission, Resource};

use super::repository;
use crate::domain::a001_dealer::repository as dealer_repository;
use crate::domain::a002_customer::repository as customer_repository;
use crate::domain::a003_vehicle::repository as vehicle_repository;
use crate::domain::a004_price_list::service as price_list_service;
use crate::domain::a005_policy_series::service as series_service;
use crate::domain::a010_notification::service as notifications;
use crate::shared::data::query::next_code;
use crate::shared::error::{AppError, AppResult};
use crate::shared::scope::ensure_visible;
use crate::system::auth::guard;

async fn load_visible(claims: &TokenClaims, id: &str) -> AppResult<Policy> {
    let policy = repository::get_by_id(id).await?.ok_or(AppError::NotFound)?;
    ensure_visible(&guard::scope(claims), &policy.dealer_id, Some(&policy.customer_id)).await?;
    Ok(policy)
}

/// Клиент и ТС должны принадлежать дилеру полиса; возвращает тир для цены
async fn check_parties(claims: &TokenClaims, policy: &Policy) -> AppResult<Option<String>> {
    let customer = customer_repository::get_by_id(&policy.customer_id)
        .await?
        .ok_or_else(|| AppError::Validation("customer_id: Customer not found".into()))?;
    ensure_visible(&guard::scope(claims), &customer.dealer_id, Some(&policy.customer_id))
        .await
        .map_err(|_| AppError::Validation("customer_id: Customer not found".into()))?;
    if customer.dealer_id != policy.dealer_id {
        return Err(AppError::Validation(
            "customer_id: Customer belongs to another dealer".into(),
        ));
    }

    match policy.vehicle_id.as_deref() {
        Some(vehicle_id) => {
            let vehicle = vehicle_repository::get_by_id(vehicle_id)
                .await?
                .ok_or_else(|| AppError::Validation("vehicle_id: Vehicle not found".into()))?;
            if vehicle.customer_id != policy.customer_id {
                return Err(AppError::Validation(
                    "vehicle_id: Vehicle belongs to another customer".into(),
                ));
            }
            Ok(Some(vehicle.usage.code().to_string()))
        }
        None => Ok(None),
    }
}

/// Цена фиксируется на дату начала действия
async fn requote(policy: &mut Policy, tier: Option<&str>) -> AppResult<()> {
    let quote = price_list_service::quote_for(policy.policy_type, policy.currency, policy.start_date, tier).await?;
    policy.apply_quote(quote.price_list_id, quote.premium);
    Ok(())
}

pub async fn create(claims: &TokenClaims, mut dto: PolicyDto) -> AppResult<String> {
    guard::require(claims, Permission::IssuePolicies)?;
    dto.dealer_id = guard::writable_dealer(claims, &dto.dealer_id)?;
    dto.validate()?;

    let code = next_code(&Policy::table_name(), "POL").await?;
    let mut aggregate = Policy::new_for_insert(code, &dto);
    let tier = check_parties(claims, &aggregate).await?;
    requote(&mut aggregate, tier.as_deref()).await?;

    aggregate.before_write();
    let id = repository::insert(&aggregate).await?;
    tracing::info!(
        "Draft policy {} created by {} (premium {:.2} {})",
        aggregate.base.code,
        claims.username,
        aggregate.premium,
        aggregate.currency
    );
    Ok(id)
}

pub async fn update(claims: &TokenClaims, mut dto: PolicyDto) -> AppResult<()> {
    guard::require(claims, Permission::IssuePolicies)?;
    let id = dto.id.clone().ok_or(AppError::NotFound)?;
    let mut aggregate = load_visible(claims, &id).await?;
    if !aggregate.is_editable() {
        return Err(AppError::Conflict(format!(
            "Policy in status '{}' cannot be edited",
            aggregate.status.display_name()
        )));
    }

    dto.dealer_id = guard::writable_dealer(claims, &dto.dealer_id)?;
    dto.validate()?;
    aggregate.update(&dto);
    let tier = check_parties(claims, &aggregate).await?;
    requote(&mut aggregate, tier.as_deref()).await?;

    aggregate.before_write();
    aggregate.base.metadata.increment_version();
    repository::update(&aggregate).await?;
    Ok(())
}

/// Выпуск черновика: новая цена, номер из серии дилера, комиссия
pub async fn issue(claims: &TokenClaims, id: &str) -> AppResult<Policy> {
    guard::require(claims, Permission::IssuePolicies)?;
    let mut aggregate = load_visible(claims, id).await?;
    if aggregate.status != PolicyStatus::Draft {
        return Err(AppError::Conflict(format!(
            "Policy in status '{}' cannot be issued",
            aggregate.status.display_name()
        )));
    }

    let tier = check_parties(claims, &aggregate).await?;
    requote(&mut aggregate, tier.as_deref()).await?;

    let dealer = dealer_repository::get_by_id(&aggregate.dealer_id)
        .await?
        .ok_or_else(|| AppError::Validation("dealer_id: Dealer not found".into()))?;
    if !dealer.is_active {
        return Err(AppError::Validation("dealer_id: Dealer is inactive".into()));
    }

    // пробный выпуск до расхода номера из серии
    let now = Utc::now();
    aggregate
        .clone()
        .issue(String::new(), dealer.commission_rate, now)
        .map_err(AppError::Conflict)?;

    let policy_no = series_service::allocate(&aggregate.dealer_id, aggregate.policy_type).await?;
    aggregate
        .issue(policy_no, dealer.commission_rate, now)
        .map_err(AppError::Conflict)?;

    aggregate.before_write();
    aggregate.base.metadata.increment_version();
    repository::update(&aggregate).await?;
    tracing::info!(
        "Policy {} issued as {} by {}",
        aggregate.base.code,
        aggregate.policy_no,
        claims.username
    );

    notifications::notify_customer(
        &aggregate.customer_id,
        NewNotification::new("", NotificationKind::PolicyIssued, format!("Policy {} issued", aggregate.policy_no))
            .body(format!(
                "{} policy valid {} to {}, premium {:.2} {}",
                aggregate.policy_type.display_name(),
                aggregate.start_date.format("%d.%m.%Y"),
                aggregate.end_date.format("%d.%m.%Y"),
                aggregate.premium,
                aggregate.currency
            ))
            .link(detail_key("a006_policy", &aggregate.to_string_id())),
    )
    .await;

    Ok(aggregate)
}

pub async fn cancel(claims: &TokenClaims, id: &str, dto: CancelPolicyDto) -> AppResult<Policy> {
    guard::require(claims, Permission::IssuePolicies)?;
    let mut aggregate = load_visible(claims, id).await?;
    let was_active = aggregate.status == PolicyStatus::Active;

    aggregate.cancel(&dto.reason, Utc::now()).map_err(|e| {
        if dto.reason.trim().is_empty() {
            AppError::Validation(format!("reason: {}", e))
        } else {
            AppError::Conflict(e)
        }
    })?;

    aggregate.before_write();
    aggregate.base.metadata.increment_version();
    repository::update(&aggregate).await?;
    tracing::info!("Policy {} cancelled by {}", aggregate.base.code, claims.username);

    if was_active {
        notifications::notify_customer(
            &aggregate.customer_id,
            NewNotification::new("", NotificationKind::System, format!("Policy {} cancelled", aggregate.policy_no))
                .body(dto.reason.trim().to_string())
                .link(detail_key("a006_policy", &aggregate.to_string_id())),
        )
        .await;
    }
    Ok(aggregate)
}

/// Удалять можно только черновики
pub async fn delete(claims: &TokenClaims, id: &str) -> AppResult<()> {
    guard::require(claims, Permission::IssuePolicies)?;
    let policy = load_visible(claims, id).await?;
    if !policy.is_editable() {
        return Err(AppError::Conflict("Only draft policies can be deleted".into()));
    }
    if repository::soft_delete(id).await? {
        Ok(())
    } else {
        Err(AppError::NotFound)
    }
}

pub async fn get_by_id(claims: &TokenClaims, id: &str) -> AppResult<Policy> {
    guard::require_view(claims, Resource::Policies)?;
    load_visible(claims, id).await
}

pub async fn list(claims: &TokenClaims, query: &ListQuery) -> AppResult<Page<PolicyListItem>> {
    guard::require_view(claims, Resource::Policies)?;
    let (items, total) = repository::list_paged(query, &guard::scope(claims)).await?;
    Ok(Page::new(items, total, query))
}

/// CSV по тем же фильтрам, что и список
pub async fn export_csv(claims: &TokenClaims, query: &ListQuery) -> AppResult<String> {
    guard::require_view(claims, Resource::Policies)?;
    let items = repository::list_all_items(query, &guard::scope(claims)).await?;
    let csv = write_csv(&items)?;
    tracing::info!("Exported {} policies for {}", items.len(), claims.username);
    Ok(csv)
}

pub fn write_csv(items: &[PolicyListItem]) -> anyhow::Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record([
        "code",
        "policy_no",
        "policy_type",
        "status",
        "customer",
        "vehicle",
        "dealer",
        "currency",
        "premium",
        "commission",
        "start_date",
        "end_date",
    ])?;
    for item in items {
        writer.write_record([
            item.code.clone(),
            item.policy_no.clone(),
            item.policy_type.display_name().to_string(),
            item.status.display_name().to_string(),
            item.customer_name.clone(),
            item.vehicle_plate.clone().unwrap_or_default(),
            item.dealer_name.clone(),
            item.currency.code().to_string(),
            format!("{:.2}", item.premium),
            format!("{:.2}", item.commission),
            item.start_date.clone(),
            item.end_date.clone(),
        ])?;
    }
    let bytes = writer.into_inner().map_err(|e| anyhow::anyhow!("CSV flush failed: {}", e))?;
    Ok(String::from_utf8(bytes)?)
}

/// Housekeeping: перевод просроченных полисов в `Expired`
pub async fn expire_due(today: NaiveDate) -> anyhow::Result<usize> {
    let mut expired = 0;
    for mut policy in repository::list_due_for_expiry(today).await? {
        if policy.expire_if_due(today) {
            policy.before_write();
            policy.base.metadata.increment_version();
            repository::update(&policy).await?;
            expired += 1;
        }
    }
    Ok(expired)
}

#[cfg(test)]
mod tests {
    use super::*;
    use contracts::enums::{Currency, PolicyType};

    fn item(code: &str, customer: &str) -> PolicyListItem {
        PolicyListItem {
            id: "1".into(),
            code: code.into(),
            policy_no: "TRF-00000001".into(),
            policy_type: PolicyType::Traffic,
            status: PolicyStatus::Active,
            customer_id: "c1".into(),
            customer_name: customer.into(),
            vehicle_plate: Some("34ABC123".into()),
            dealer_id: "d1".into(),
            dealer_name: "Anka".into(),
            currency: Currency::Try,
            premium: 1200.5,
            commission: 120.05,
            start_date: "2024-03-01".into(),
            end_date: "2025-03-01".into(),
        }
    }

    #[test]
    fn test_write_csv_quotes_fields() {
        let csv = write_csv(&[item("POL-000001", "Yilmaz, Ayse")]).unwrap();
        let mut lines = csv.lines();
        assert!(lines.next().unwrap().starts_with("code,policy_no,policy_type,status"));
        let row = lines.next().unwrap();
        assert!(row.contains("\"Yilmaz, Ayse\""));
        assert!(row.contains("1200.50,120.05"));
        assert!(lines.next().is_none());
    }

    #[test]
    fn test_write_csv_empty_has_header_only() {
        let csv = write_csv(&[]).unwrap();
        assert_eq!(csv.lines().count(), 1);
    }
}
