use contracts::domain::a005_policy_series::aggregate::{PolicySeries, PolicySeriesDto};
use contracts::enums::PolicyType;
use contracts::shared::pagination::{ListQuery, Page};
use contracts::system::auth::TokenClaims;
use contracts::system::roles::{Permission, Resource};

use super::repository;
use crate::domain::a001_dealer::repository as dealer_repository;
use crate::shared::error::{AppError, AppResult};
use crate::shared::scope::ensure_visible;
use crate::system::auth::guard;

/// Параллельные выпуски у одного дилера редки, несколько попыток хватает
const ALLOCATE_ATTEMPTS: usize = 5;

async fn check_dealer(dealer_id: &str) -> AppResult<()> {
    if dealer_repository::get_by_id(dealer_id).await?.is_none() {
        return Err(AppError::Validation("dealer_id: Dealer not found".into()));
    }
    Ok(())
}

async fn check_overlaps(series: &PolicySeries) -> AppResult<()> {
    let same_prefix = repository::list_by_prefix(&series.prefix).await?;
    if let Some(other) = same_prefix.iter().find(|other| series.overlaps(other)) {
        return Err(AppError::Conflict(format!(
            "Range overlaps series {} ({}..{})",
            other.prefix, other.range_start, other.range_end
        )));
    }
    Ok(())
}

pub async fn create(claims: &TokenClaims, dto: PolicySeriesDto) -> AppResult<String> {
    guard::require(claims, Permission::ManagePolicySeries)?;
    dto.validate()?;
    check_dealer(dto.dealer_id.trim()).await?;

    let mut aggregate = PolicySeries::new_for_insert(&dto);
    aggregate.validate()?;
    check_overlaps(&aggregate).await?;

    aggregate.before_write();
    let id = repository::insert(&aggregate).await?;
    tracing::info!("Policy series {} created by {}", aggregate.base.description, claims.username);
    Ok(id)
}

pub async fn update(claims: &TokenClaims, dto: PolicySeriesDto) -> AppResult<()> {
    guard::require(claims, Permission::ManagePolicySeries)?;
    let id = dto.id.clone().ok_or(AppError::NotFound)?;
    let mut aggregate = repository::get_by_id(&id).await?.ok_or(AppError::NotFound)?;
    dto.validate()?;
    check_dealer(dto.dealer_id.trim()).await?;

    if aggregate.used_count() > 0
        && (aggregate.prefix != dto.prefix.trim().to_uppercase() || aggregate.dealer_id != dto.dealer_id.trim())
    {
        return Err(AppError::Conflict(
            "Prefix and dealer of a series in use cannot be changed".into(),
        ));
    }

    aggregate.update(&dto);
    aggregate.validate()?;
    check_overlaps(&aggregate).await?;

    aggregate.before_write();
    aggregate.base.metadata.increment_version();
    repository::update(&aggregate).await?;
    Ok(())
}

/// Удалить можно только серию, из которой ещё не выдано ни одного номера
pub async fn delete(claims: &TokenClaims, id: &str) -> AppResult<()> {
    guard::require(claims, Permission::ManagePolicySeries)?;
    let series = repository::get_by_id(id).await?.ok_or(AppError::NotFound)?;
    if series.used_count() > 0 {
        return Err(AppError::Conflict(format!(
            "Series {} has already issued {} numbers",
            series.prefix,
            series.used_count()
        )));
    }
    if repository::soft_delete(id).await? {
        Ok(())
    } else {
        Err(AppError::NotFound)
    }
}

pub async fn get_by_id(claims: &TokenClaims, id: &str) -> AppResult<PolicySeries> {
    guard::require_view(claims, Resource::PolicySeries)?;
    let series = repository::get_by_id(id).await?.ok_or(AppError::NotFound)?;
    ensure_visible(&guard::scope(claims), &series.dealer_id, None).await?;
    Ok(series)
}

pub async fn list(claims: &TokenClaims, query: &ListQuery) -> AppResult<Page<PolicySeries>> {
    guard::require_view(claims, Resource::PolicySeries)?;
    let (items, total) = repository::list_paged(query, &guard::scope(claims)).await?;
    Ok(Page::new(items, total, query))
}

/// Первая серия дилера, в которой остались номера
pub fn first_available(series: Vec<PolicySeries>) -> Option<PolicySeries> {
    series.into_iter().find(|s| !s.is_exhausted())
}

/// Следующий номер полиса из серий дилера для вида страхования
pub async fn allocate(dealer_id: &str, policy_type: PolicyType) -> AppResult<String> {
    for _ in 0..ALLOCATE_ATTEMPTS {
        let candidates = repository::list_for_dealer(dealer_id, policy_type).await?;
        let mut series = first_available(candidates).ok_or_else(|| {
            AppError::Validation(format!(
                "No policy number series with free numbers for {} policies of this dealer",
                policy_type.display_name()
            ))
        })?;
        let expected = series.next_number;
        let number = series
            .allocate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        if repository::advance_next_number(&series.to_string_id(), expected, series.next_number).await? {
            if series.remaining() == 0 {
                tracing::warn!("Policy series {} is now exhausted", series.prefix);
            }
            return Ok(number);
        }
        tracing::debug!("Series {} moved concurrently, retrying allocation", series.prefix);
    }
    Err(AppError::Conflict(
        "Could not allocate a policy number, please retry".into(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(prefix: &str, start: i64, end: i64, next: i64) -> PolicySeries {
        let mut s = PolicySeries::new_for_insert(&PolicySeriesDto {
            dealer_id: "d1".into(),
            prefix: prefix.into(),
            range_start: start,
            range_end: end,
            ..Default::default()
        });
        s.next_number = next;
        s
    }

    #[test]
    fn test_first_available_skips_exhausted() {
        let picked = first_available(vec![series("TRF", 1, 10, 11), series("TRF", 11, 20, 15)]).unwrap();
        assert_eq!(picked.range_start, 11);
        assert!(first_available(vec![series("TRF", 1, 2, 3)]).is_none());
        assert!(first_available(Vec::new()).is_none());
    }

    #[test]
    fn test_allocation_sequence_from_picked_series() {
        let mut picked = first_available(vec![series("CAS", 5, 6, 5)]).unwrap();
        assert_eq!(picked.allocate().unwrap(), "CAS-00000005");
        assert_eq!(picked.allocate().unwrap(), "CAS-00000006");
        assert!(picked.allocate().is_err());
    }
}
