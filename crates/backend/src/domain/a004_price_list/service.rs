use chrono::NaiveDate;
use contracts::domain::a004_price_list::aggregate::{
    next_version, normalize_rates, select_effective, PriceList, PriceListDto, PriceRate, QuoteRequest,
    QuoteResponse, RatesImportResult,
};
use contracts::domain::common::AggregateRoot;
use contracts::enums::{Currency, PolicyType};
use contracts::shared::pagination::{ListQuery, Page};
use contracts::shared::validation::parse_date;
use contracts::system::auth::TokenClaims;
use contracts::system::roles::{Permission, Resource};

use super::repository;
use crate::shared::data::query::next_code;
use crate::shared::error::{AppError, AppResult};
use crate::system::auth::guard;

/// Версия не должна совпадать с пересекающимся листом того же вида и валюты
async fn assign_version(aggregate: &mut PriceList, keep_current: bool) -> AppResult<()> {
    let existing = repository::list_for(aggregate.policy_type, aggregate.currency).await?;
    let clash = existing
        .iter()
        .any(|other| other.base.id != aggregate.base.id && aggregate.overlaps(other) && other.version == aggregate.version);
    if !keep_current || clash {
        aggregate.version = next_version(aggregate, existing.iter());
    }
    Ok(())
}

pub async fn create(claims: &TokenClaims, dto: PriceListDto) -> AppResult<String> {
    guard::require(claims, Permission::ManagePriceLists)?;
    dto.validate()?;

    let code = next_code(&PriceList::table_name(), "PRL").await?;
    let mut aggregate = PriceList::new_for_insert(code, &dto);
    aggregate.validate()?;
    assign_version(&mut aggregate, false).await?;

    aggregate.before_write();
    let id = repository::insert(&aggregate).await?;
    tracing::info!(
        "Price list {} v{} created for {} {}",
        aggregate.base.code,
        aggregate.version,
        aggregate.policy_type,
        aggregate.currency
    );
    Ok(id)
}

pub async fn update(claims: &TokenClaims, dto: PriceListDto) -> AppResult<()> {
    guard::require(claims, Permission::ManagePriceLists)?;
    let id = dto.id.clone().ok_or(AppError::NotFound)?;
    let mut aggregate = repository::get_by_id(&id).await?.ok_or(AppError::NotFound)?;
    dto.validate()?;

    aggregate.update(&dto);
    aggregate.validate()?;
    assign_version(&mut aggregate, true).await?;

    aggregate.before_write();
    aggregate.base.metadata.increment_version();
    repository::update(&aggregate).await?;
    Ok(())
}

pub async fn delete(claims: &TokenClaims, id: &str) -> AppResult<()> {
    guard::require(claims, Permission::ManagePriceLists)?;
    if repository::soft_delete(id).await? {
        tracing::info!("Price list {} deleted by {}", id, claims.username);
        Ok(())
    } else {
        Err(AppError::NotFound)
    }
}

pub async fn get_by_id(claims: &TokenClaims, id: &str) -> AppResult<PriceList> {
    guard::require_view(claims, Resource::PriceLists)?;
    repository::get_by_id(id).await?.ok_or(AppError::NotFound)
}

pub async fn list(claims: &TokenClaims, query: &ListQuery) -> AppResult<Page<PriceList>> {
    guard::require_view(claims, Resource::PriceLists)?;
    let (items, total) = repository::list_paged(query).await?;
    Ok(Page::new(items, total, query))
}

/// Заменяет тарифы листа содержимым CSV с заголовком `tier,premium`
pub async fn import_rates_csv(claims: &TokenClaims, id: &str, text: &str) -> AppResult<RatesImportResult> {
    guard::require(claims, Permission::ManagePriceLists)?;
    let mut aggregate = repository::get_by_id(id).await?.ok_or(AppError::NotFound)?;

    let rates = parse_rates_csv(text).map_err(AppError::Validation)?;
    aggregate.rates = normalize_rates(&rates);
    aggregate.validate()?;

    aggregate.before_write();
    aggregate.base.metadata.increment_version();
    repository::update(&aggregate).await?;
    tracing::info!(
        "Imported {} rates into price list {}",
        aggregate.rates.len(),
        aggregate.base.code
    );
    Ok(RatesImportResult {
        imported: aggregate.rates.len(),
        rates: aggregate.rates,
    })
}

/// Цена по действующему прайс-листу
pub async fn quote(claims: &TokenClaims, request: &QuoteRequest) -> AppResult<QuoteResponse> {
    if !claims.role.has(Permission::IssuePolicies) && !claims.role.can_view(Resource::PriceLists) {
        return Err(AppError::forbidden());
    }
    let date = parse_date(&request.date)
        .ok_or_else(|| AppError::Validation("date: Invalid date".into()))?;
    quote_for(request.policy_type, request.currency, date, request.tier.as_deref()).await
}

/// Без проверки прав: используется при записи и выпуске полиса
pub async fn quote_for(
    policy_type: PolicyType,
    currency: Currency,
    date: NaiveDate,
    tier: Option<&str>,
) -> AppResult<QuoteResponse> {
    let lists = repository::list_for(policy_type, currency).await?;
    quote_from(&lists, policy_type, currency, date, tier).map_err(AppError::Validation)
}

pub fn quote_from(
    lists: &[PriceList],
    policy_type: PolicyType,
    currency: Currency,
    date: NaiveDate,
    tier: Option<&str>,
) -> Result<QuoteResponse, String> {
    let list = select_effective(lists, policy_type, currency, date).ok_or_else(|| {
        format!(
            "No {} price list in {} covers {}",
            policy_type.display_name(),
            currency.code(),
            date.format("%Y-%m-%d")
        )
    })?;
    let premium = list.rate_for(tier).ok_or_else(|| {
        format!(
            "Price list {} has no rate for tier '{}' and no default rate",
            list.base.code,
            tier.unwrap_or("default")
        )
    })?;
    Ok(QuoteResponse {
        price_list_id: list.to_string_id(),
        price_list_version: list.version,
        premium,
        currency,
    })
}

/// Разбор CSV тарифов. Пустые строки пропускаются, ошибки собираются по номерам строк.
pub fn parse_rates_csv(text: &str) -> Result<Vec<PriceRate>, String> {
    let text = text.trim_start_matches('\u{FEFF}');
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| format!("Failed to read CSV headers: {}", e))?
        .clone();
    let column = |name: &str| headers.iter().position(|h| h.eq_ignore_ascii_case(name));
    let (tier_col, premium_col) = match (column("tier"), column("premium")) {
        (Some(t), Some(p)) => (t, p),
        _ => return Err("CSV must have 'tier' and 'premium' columns".into()),
    };

    let mut rates = Vec::new();
    let mut problems = Vec::new();
    for (index, result) in reader.records().enumerate() {
        // строка 1 - заголовок
        let line = index + 2;
        let record = match result {
            Ok(r) => r,
            Err(e) => {
                problems.push(format!("line {}: {}", line, e));
                continue;
            }
        };
        if record.iter().all(|v| v.is_empty()) {
            continue;
        }
        let tier = record.get(tier_col).unwrap_or("").to_string();
        let raw_premium = record.get(premium_col).unwrap_or("");
        match raw_premium.replace(',', ".").parse::<f64>() {
            Ok(premium) if premium.is_finite() => rates.push(PriceRate { tier, premium }),
            _ => problems.push(format!("line {}: invalid premium '{}'", line, raw_premium)),
        }
    }

    if !problems.is_empty() {
        return Err(problems.join("; "));
    }
    if rates.is_empty() {
        return Err("CSV contains no rates".into());
    }
    Ok(rates)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(code: &str, version: i32, from: &str, to: &str, rates: &[(&str, f64)]) -> PriceList {
        let dto = PriceListDto {
            description: code.into(),
            policy_type: PolicyType::Traffic,
            currency: Currency::Try,
            valid_from: from.into(),
            valid_to: to.into(),
            rates: rates
                .iter()
                .map(|(tier, premium)| PriceRate {
                    tier: tier.to_string(),
                    premium: *premium,
                })
                .collect(),
            ..Default::default()
        };
        let mut list = PriceList::new_for_insert(code.into(), &dto);
        list.version = version;
        list
    }

    fn date(s: &str) -> NaiveDate {
        parse_date(s).unwrap()
    }

    #[test]
    fn test_parse_rates_csv() {
        let text = "\u{FEFF}Tier,Premium\nprivate,1200.50\n\ntaxi, 3400\ndefault,\"1500,75\"\n";
        let rates = parse_rates_csv(text).unwrap();
        assert_eq!(rates.len(), 3);
        assert_eq!(rates[0].tier, "private");
        assert_eq!(rates[1].premium, 3400.0);
        assert_eq!(rates[2].premium, 1500.75);
    }

    #[test]
    fn test_parse_rates_csv_reports_bad_lines() {
        let err = parse_rates_csv("tier,premium\nprivate,abc\ntaxi,10\n").unwrap_err();
        assert!(err.contains("line 2"));
        assert!(parse_rates_csv("name,price\nx,1\n").is_err());
        assert!(parse_rates_csv("tier,premium\n").is_err());
    }

    #[test]
    fn test_parse_rates_csv_rejects_non_finite_premium() {
        for bad in ["inf", "-inf", "NaN", "infinity"] {
            let err = parse_rates_csv(&format!("tier,premium\ndefault,{}\n", bad)).unwrap_err();
            assert!(err.contains("line 2"), "{}", err);
        }
    }

    #[test]
    fn test_quote_picks_highest_version_and_tier() {
        let lists = vec![
            list("PRL-1", 1, "2024-01-01", "2024-12-31", &[("default", 1000.0), ("taxi", 2500.0)]),
            list("PRL-2", 2, "2024-06-01", "2024-12-31", &[("default", 1100.0)]),
        ];
        let early = quote_from(&lists, PolicyType::Traffic, Currency::Try, date("2024-03-01"), Some("taxi")).unwrap();
        assert_eq!(early.premium, 2500.0);
        assert_eq!(early.price_list_version, 1);

        let late = quote_from(&lists, PolicyType::Traffic, Currency::Try, date("2024-07-01"), Some("taxi")).unwrap();
        assert_eq!(late.premium, 1100.0);
        assert_eq!(late.price_list_version, 2);
    }

    #[test]
    fn test_quote_without_match_is_error() {
        let lists = vec![list("PRL-1", 1, "2024-01-01", "2024-12-31", &[("taxi", 2500.0)])];
        assert!(quote_from(&lists, PolicyType::Traffic, Currency::Try, date("2025-01-01"), None).is_err());
        assert!(quote_from(&lists, PolicyType::Traffic, Currency::Usd, date("2024-03-01"), None).is_err());
        assert!(quote_from(&lists, PolicyType::Traffic, Currency::Try, date("2024-03-01"), Some("private")).is_err());
    }
}
