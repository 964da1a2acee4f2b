//! Область видимости данных в SQL и проверка отдельных записей.

use contracts::system::roles::DataScope;
use sea_orm::{EntityTrait, Value};

use crate::domain::a001_dealer::repository as dealer_repository;
use crate::shared::error::{AppError, AppResult};

/// Условие на строки, видимые в `scope`; `None` - без ограничений.
///
/// Без колонки клиента клиент не видит ничего.
pub fn scope_condition(
    scope: &DataScope,
    dealer_col: &str,
    customer_col: Option<&str>,
) -> Option<(String, Vec<Value>)> {
    match scope {
        DataScope::All => None,
        DataScope::Dealer(id) => Some((format!("{} = ?", dealer_col), vec![id.clone().into()])),
        DataScope::Customer(id) => match customer_col {
            Some(col) => Some((format!("{} = ?", col), vec![id.clone().into()])),
            None => Some(("1 = 0".to_string(), Vec::new())),
        },
        DataScope::Observer(user_id) => Some((
            format!(
                "{} IN (SELECT id FROM a001_dealer WHERE observer_user_id = ? AND is_deleted = 0)",
                dealer_col
            ),
            vec![user_id.clone().into()],
        )),
        DataScope::Nothing => Some(("1 = 0".to_string(), Vec::new())),
    }
}

/// Чужие записи не раскрываем: вне области видимости это 404
pub async fn ensure_visible(
    scope: &DataScope,
    dealer_id: &str,
    customer_id: Option<&str>,
) -> AppResult<()> {
    let observer = match scope {
        DataScope::Observer(_) => dealer_repository::Entity::find_by_id(dealer_id.to_string())
            .one(crate::shared::data::db::get_connection()?)
            .await?
            .and_then(|d| d.observer_user_id),
        _ => None,
    };
    if scope.allows(dealer_id, customer_id, observer.as_deref()) {
        Ok(())
    } else {
        Err(AppError::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_has_no_condition() {
        assert!(scope_condition(&DataScope::All, "t.dealer_id", None).is_none());
    }

    #[test]
    fn test_dealer_and_customer_conditions() {
        let (sql, values) =
            scope_condition(&DataScope::Dealer("d1".into()), "t.dealer_id", Some("t.customer_id")).unwrap();
        assert_eq!(sql, "t.dealer_id = ?");
        assert_eq!(values, vec![Value::from("d1")]);

        let (sql, _) =
            scope_condition(&DataScope::Customer("c1".into()), "t.dealer_id", Some("t.customer_id")).unwrap();
        assert_eq!(sql, "t.customer_id = ?");

        let (sql, values) = scope_condition(&DataScope::Customer("c1".into()), "t.id", None).unwrap();
        assert_eq!(sql, "1 = 0");
        assert!(values.is_empty());
    }

    #[test]
    fn test_observer_uses_dealer_link() {
        let (sql, values) = scope_condition(&DataScope::Observer("u7".into()), "t.dealer_id", None).unwrap();
        assert!(sql.starts_with("t.dealer_id IN (SELECT id FROM a001_dealer WHERE observer_user_id = ?"));
        assert_eq!(values, vec![Value::from("u7")]);
        assert_eq!(
            scope_condition(&DataScope::Nothing, "t.dealer_id", None).map(|(s, _)| s),
            Some("1 = 0".to_string())
        );
    }
}
