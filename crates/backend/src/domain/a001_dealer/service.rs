use contracts::domain::a001_dealer::aggregate::{Dealer, DealerDto};
use contracts::domain::common::AggregateRoot;
use contracts::shared::lookup::LookupItem;
use contracts::shared::pagination::{ListQuery, Page};
use contracts::system::auth::TokenClaims;
use contracts::system::roles::{Permission, Resource, Role};

use super::repository;
use crate::domain::a006_policy::repository as policy_repository;
use crate::shared::data::query::next_code;
use crate::shared::error::{AppError, AppResult};
use crate::shared::scope::ensure_visible;
use crate::system::auth::guard;
use crate::system::users::repository as users_repository;

/// Наблюдатель дилера должен быть активным пользователем с ролью Observer
async fn check_observer(observer_user_id: Option<&str>) -> AppResult<()> {
    if let Some(id) = observer_user_id {
        match users_repository::get_by_id(id).await? {
            Some(user) if user.role == Role::Observer && user.is_active => {}
            _ => {
                return Err(AppError::Validation(
                    "observer_user_id: Observer must be an active user with the Observer role".into(),
                ))
            }
        }
    }
    Ok(())
}

async fn check_tax_number_unique(dealer: &Dealer) -> AppResult<()> {
    if let Some(other) = repository::get_by_tax_number(&dealer.tax_number).await? {
        if other.base.id != dealer.base.id {
            return Err(AppError::Conflict(format!(
                "Dealer {} already uses tax number {}",
                other.base.code, dealer.tax_number
            )));
        }
    }
    Ok(())
}

/// Создание нового дилера
pub async fn create(claims: &TokenClaims, dto: DealerDto) -> AppResult<String> {
    guard::require(claims, Permission::ManageDealers)?;

    let code = next_code(&Dealer::table_name(), "DLR").await?;
    let mut aggregate = Dealer::new_for_insert(code, &dto);

    aggregate.validate()?;
    check_observer(aggregate.observer_user_id.as_deref()).await?;
    check_tax_number_unique(&aggregate).await?;

    aggregate.before_write();
    let id = repository::insert(&aggregate).await?;
    tracing::info!("Dealer {} created by {}", aggregate.base.code, claims.username);
    Ok(id)
}

/// Обновление существующего дилера
pub async fn update(claims: &TokenClaims, dto: DealerDto) -> AppResult<()> {
    guard::require(claims, Permission::ManageDealers)?;
    let id = dto.id.clone().ok_or(AppError::NotFound)?;
    let mut aggregate = repository::get_by_id(&id).await?.ok_or(AppError::NotFound)?;

    aggregate.update(&dto);
    aggregate.validate()?;
    check_observer(aggregate.observer_user_id.as_deref()).await?;
    check_tax_number_unique(&aggregate).await?;

    aggregate.before_write();
    aggregate.base.metadata.increment_version();
    repository::update(&aggregate).await?;
    Ok(())
}

/// Дилера с действующими полисами удалить нельзя
pub async fn delete(claims: &TokenClaims, id: &str) -> AppResult<()> {
    guard::require(claims, Permission::ManageDealers)?;
    let dealer = repository::get_by_id(id).await?.ok_or(AppError::NotFound)?;

    let active = policy_repository::count_active_by_dealer(id).await?;
    if active > 0 {
        return Err(AppError::Conflict(format!(
            "Dealer {} still has {} active policies",
            dealer.base.code, active
        )));
    }

    if repository::soft_delete(id).await? {
        tracing::info!("Dealer {} deleted by {}", dealer.base.code, claims.username);
        Ok(())
    } else {
        Err(AppError::NotFound)
    }
}

pub async fn get_by_id(claims: &TokenClaims, id: &str) -> AppResult<Dealer> {
    guard::require_view(claims, Resource::Dealers)?;
    let dealer = repository::get_by_id(id).await?.ok_or(AppError::NotFound)?;
    ensure_visible(&guard::scope(claims), &dealer.to_string_id(), None).await?;
    Ok(dealer)
}

pub async fn list(claims: &TokenClaims, query: &ListQuery) -> AppResult<Page<Dealer>> {
    guard::require_view(claims, Resource::Dealers)?;
    let (items, total) = repository::list_paged(query, &guard::scope(claims)).await?;
    Ok(Page::new(items, total, query))
}

/// Для выбора дилера в формах: каждый видит дилеров своей области
pub async fn lookup(claims: &TokenClaims) -> AppResult<Vec<LookupItem>> {
    Ok(repository::lookup(&guard::scope(claims)).await?)
}
