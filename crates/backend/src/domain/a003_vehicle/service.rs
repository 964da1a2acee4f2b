use chrono::{Datelike, Utc};
use contracts::domain::a003_vehicle::aggregate::{Vehicle, VehicleDto};
use contracts::shared::lookup::LookupItem;
use contracts::shared::pagination::{ListQuery, Page};
use contracts::system::auth::TokenClaims;
use contracts::system::roles::{Permission, Resource};

use super::repository;
use crate::domain::a002_customer::repository as customer_repository;
use crate::domain::a006_policy::repository as policy_repository;
use crate::shared::error::{AppError, AppResult};
use crate::shared::scope::ensure_visible;
use crate::system::auth::guard;

fn current_year() -> i32 {
    Utc::now().year()
}

/// Клиент должен существовать и быть в области видимости; дилер берётся из него
async fn owner_dealer(claims: &TokenClaims, customer_id: &str) -> AppResult<String> {
    let customer = customer_repository::get_by_id(customer_id.trim())
        .await?
        .ok_or_else(|| AppError::Validation("customer_id: Customer not found".into()))?;
    ensure_visible(&guard::scope(claims), &customer.dealer_id, Some(customer_id.trim()))
        .await
        .map_err(|_| AppError::Validation("customer_id: Customer not found".into()))?;
    Ok(customer.dealer_id)
}

async fn check_unique(vehicle: &Vehicle) -> AppResult<()> {
    if let Some(other) = repository::get_by_plate(&vehicle.plate_number).await? {
        if other.base.id != vehicle.base.id {
            return Err(AppError::Conflict(format!(
                "Plate number {} is already registered",
                vehicle.plate_number
            )));
        }
    }
    if let Some(other) = repository::get_by_vin(&vehicle.vin).await? {
        if other.base.id != vehicle.base.id {
            return Err(AppError::Conflict(format!("VIN {} is already registered", vehicle.vin)));
        }
    }
    Ok(())
}

async fn load_visible(claims: &TokenClaims, id: &str) -> AppResult<Vehicle> {
    let vehicle = repository::get_by_id(id).await?.ok_or(AppError::NotFound)?;
    ensure_visible(&guard::scope(claims), &vehicle.dealer_id, Some(&vehicle.customer_id)).await?;
    Ok(vehicle)
}

pub async fn create(claims: &TokenClaims, dto: VehicleDto) -> AppResult<String> {
    guard::require(claims, Permission::ManageVehicles)?;
    dto.validate(current_year())?;
    let dealer_id = owner_dealer(claims, &dto.customer_id).await?;

    let mut aggregate = Vehicle::new_for_insert(&dto);
    aggregate.dealer_id = dealer_id;
    check_unique(&aggregate).await?;

    aggregate.before_write();
    let id = repository::insert(&aggregate).await?;
    tracing::info!("Vehicle {} registered by {}", aggregate.plate_number, claims.username);
    Ok(id)
}

pub async fn update(claims: &TokenClaims, dto: VehicleDto) -> AppResult<()> {
    guard::require(claims, Permission::ManageVehicles)?;
    let id = dto.id.clone().ok_or(AppError::NotFound)?;
    let mut aggregate = load_visible(claims, &id).await?;

    dto.validate(current_year())?;
    let dealer_id = owner_dealer(claims, &dto.customer_id).await?;

    aggregate.update(&dto);
    aggregate.dealer_id = dealer_id;
    check_unique(&aggregate).await?;

    aggregate.before_write();
    aggregate.base.metadata.increment_version();
    repository::update(&aggregate).await?;
    Ok(())
}

pub async fn delete(claims: &TokenClaims, id: &str) -> AppResult<()> {
    guard::require(claims, Permission::ManageVehicles)?;
    let vehicle = load_visible(claims, id).await?;

    if policy_repository::count_active_by_vehicle(id).await? > 0 {
        return Err(AppError::Conflict(format!(
            "Vehicle {} is insured by an active policy",
            vehicle.plate_number
        )));
    }

    if repository::soft_delete(id).await? {
        Ok(())
    } else {
        Err(AppError::NotFound)
    }
}

pub async fn get_by_id(claims: &TokenClaims, id: &str) -> AppResult<Vehicle> {
    guard::require_view(claims, Resource::Vehicles)?;
    load_visible(claims, id).await
}

pub async fn list(claims: &TokenClaims, query: &ListQuery) -> AppResult<Page<Vehicle>> {
    guard::require_view(claims, Resource::Vehicles)?;
    let (items, total) = repository::list_paged(query, &guard::scope(claims)).await?;
    Ok(Page::new(items, total, query))
}

pub async fn lookup_by_customer(claims: &TokenClaims, customer_id: &str) -> AppResult<Vec<LookupItem>> {
    let customer = customer_repository::get_by_id(customer_id)
        .await?
        .ok_or(AppError::NotFound)?;
    ensure_visible(&guard::scope(claims), &customer.dealer_id, Some(customer_id)).await?;
    Ok(repository::lookup_by_customer(customer_id).await?)
}
