use chrono::Utc;
use contracts::domain::a002_customer::aggregate::{Customer, CustomerDto};
use contracts::domain::common::AggregateRoot;
use contracts::shared::lookup::LookupItem;
use contracts::shared::pagination::{ListQuery, Page};
use contracts::system::auth::TokenClaims;
use contracts::system::roles::{Permission, Resource};

use super::repository;
use crate::domain::a001_dealer::repository as dealer_repository;
use crate::domain::a003_vehicle::repository as vehicle_repository;
use crate::domain::a006_policy::repository as policy_repository;
use crate::shared::data::query::next_code;
use crate::shared::error::{AppError, AppResult};
use crate::shared::scope::ensure_visible;
use crate::system::auth::guard;

async fn check_dealer(dealer_id: &str) -> AppResult<()> {
    match dealer_repository::get_by_id(dealer_id).await? {
        Some(dealer) if dealer.is_active => Ok(()),
        Some(_) => Err(AppError::Validation("dealer_id: Dealer is inactive".into())),
        None => Err(AppError::Validation("dealer_id: Dealer not found".into())),
    }
}

async fn check_national_id_unique(customer: &Customer) -> AppResult<()> {
    if let Some(other) = repository::get_by_national_id(&customer.national_id).await? {
        if other.base.id != customer.base.id {
            return Err(AppError::Conflict(
                "A customer with this national id is already registered".into(),
            ));
        }
    }
    Ok(())
}

async fn load_visible(claims: &TokenClaims, id: &str) -> AppResult<Customer> {
    let customer = repository::get_by_id(id).await?.ok_or(AppError::NotFound)?;
    let customer_id = customer.to_string_id();
    ensure_visible(&guard::scope(claims), &customer.dealer_id, Some(&customer_id)).await?;
    Ok(customer)
}

pub async fn create(claims: &TokenClaims, mut dto: CustomerDto) -> AppResult<String> {
    guard::require(claims, Permission::ManageCustomers)?;
    dto.dealer_id = guard::writable_dealer(claims, &dto.dealer_id)?;
    dto.validate(Utc::now().date_naive())?;
    check_dealer(&dto.dealer_id).await?;

    let code = next_code(&Customer::table_name(), "CUS").await?;
    let mut aggregate = Customer::new_for_insert(code, &dto);
    check_national_id_unique(&aggregate).await?;

    aggregate.before_write();
    let id = repository::insert(&aggregate).await?;
    tracing::info!("Customer {} created by {}", aggregate.base.code, claims.username);
    Ok(id)
}

/// При переносе клиента к другому дилеру его ТС переезжают вместе с ним
pub async fn update(claims: &TokenClaims, mut dto: CustomerDto) -> AppResult<()> {
    guard::require(claims, Permission::ManageCustomers)?;
    let id = dto.id.clone().ok_or(AppError::NotFound)?;
    let mut aggregate = load_visible(claims, &id).await?;

    dto.dealer_id = guard::writable_dealer(claims, &dto.dealer_id)?;
    dto.validate(Utc::now().date_naive())?;
    let dealer_changed = aggregate.dealer_id != dto.dealer_id.trim();
    if dealer_changed {
        check_dealer(&dto.dealer_id).await?;
    }

    aggregate.update(&dto);
    check_national_id_unique(&aggregate).await?;

    aggregate.before_write();
    aggregate.base.metadata.increment_version();
    repository::update(&aggregate).await?;

    if dealer_changed {
        let moved = vehicle_repository::reassign_dealer(&id, &aggregate.dealer_id).await?;
        tracing::info!(
            "Customer {} moved to dealer {} with {} vehicles",
            aggregate.base.code,
            aggregate.dealer_id,
            moved
        );
    }
    Ok(())
}

pub async fn delete(claims: &TokenClaims, id: &str) -> AppResult<()> {
    guard::require(claims, Permission::ManageCustomers)?;
    let customer = load_visible(claims, id).await?;

    let active = policy_repository::count_active_by_customer(id).await?;
    if active > 0 {
        return Err(AppError::Conflict(format!(
            "Customer {} still has {} active policies",
            customer.base.code, active
        )));
    }

    if repository::soft_delete(id).await? {
        tracing::info!("Customer {} deleted by {}", customer.base.code, claims.username);
        Ok(())
    } else {
        Err(AppError::NotFound)
    }
}

pub async fn get_by_id(claims: &TokenClaims, id: &str) -> AppResult<Customer> {
    guard::require_view(claims, Resource::Customers)?;
    load_visible(claims, id).await
}

pub async fn list(claims: &TokenClaims, query: &ListQuery) -> AppResult<Page<Customer>> {
    guard::require_view(claims, Resource::Customers)?;
    let (items, total) = repository::list_paged(query, &guard::scope(claims)).await?;
    Ok(Page::new(items, total, query))
}

pub async fn lookup(claims: &TokenClaims, query: &ListQuery) -> AppResult<Vec<LookupItem>> {
    guard::require_view(claims, Resource::Customers)?;
    Ok(repository::lookup(&guard::scope(claims), query.search.clone(), query.dealer_id()).await?)
}
