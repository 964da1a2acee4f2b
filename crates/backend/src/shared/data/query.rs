//! Параметризованные фильтры для серверных списков.
//!
//! Имена колонок и таблиц всегда из кода, значения только через `?`.

use contracts::shared::pagination::ListQuery;
use contracts::system::roles::DataScope;
use sea_orm::{
    ConnectionTrait, DatabaseBackend, EntityTrait, FromQueryResult, Statement, Value,
};

use super::db::get_connection;
use crate::shared::scope::scope_condition;

pub fn statement(sql: &str, values: Vec<Value>) -> Statement {
    Statement::from_sql_and_values(DatabaseBackend::Sqlite, sql, values)
}

#[derive(Debug, Clone, Default)]
pub struct SqlFilter {
    clauses: Vec<String>,
    values: Vec<Value>,
}

impl SqlFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Условие без параметров, например `t.is_deleted = 0`
    pub fn raw(mut self, clause: &str) -> Self {
        self.clauses.push(clause.to_string());
        self
    }

    pub fn push(mut self, clause: &str, values: Vec<Value>) -> Self {
        self.clauses.push(clause.to_string());
        self.values.extend(values);
        self
    }

    pub fn eq(self, column: &str, value: Option<&str>) -> Self {
        match value {
            Some(v) => {
                let clause = format!("{} = ?", column);
                self.push(&clause, vec![v.into()])
            }
            None => self,
        }
    }

    pub fn eq_bool(self, column: &str, value: bool) -> Self {
        let clause = format!("{} = ?", column);
        self.push(&clause, vec![value.into()])
    }

    /// `(LOWER(a) LIKE ? OR LOWER(b) LIKE ?)` for a `%term%` pattern
    pub fn search(self, columns: &[&str], pattern: Option<String>) -> Self {
        match pattern {
            Some(p) if !columns.is_empty() => {
                let parts: Vec<String> = columns
                    .iter()
                    .map(|c| format!("LOWER(COALESCE({}, '')) LIKE ? ESCAPE '\\'", c))
                    .collect();
                let clause = format!("({})", parts.join(" OR "));
                let values = columns.iter().map(|_| Value::from(p.clone())).collect();
                self.push(&clause, values)
            }
            _ => self,
        }
    }

    pub fn date_between(self, column: &str, from: Option<&str>, to: Option<&str>) -> Self {
        let with_from = match from {
            Some(f) => {
                let clause = format!("{} >= ?", column);
                self.push(&clause, vec![f.into()])
            }
            None => self,
        };
        match to {
            Some(t) => {
                let clause = format!("{} <= ?", column);
                with_from.push(&clause, vec![t.into()])
            }
            None => with_from,
        }
    }

    /// Ограничение области видимости текущего пользователя
    pub fn scope(self, scope: &DataScope, dealer_col: &str, customer_col: Option<&str>) -> Self {
        match scope_condition(scope, dealer_col, customer_col) {
            Some((clause, values)) => self.push(&clause, values),
            None => self,
        }
    }

    pub fn where_sql(&self) -> String {
        if self.clauses.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", self.clauses.join(" AND "))
        }
    }

    pub fn values(&self) -> Vec<Value> {
        self.values.clone()
    }
}

/// `SELECT COUNT(*)` over `from` (table with alias and joins).
pub async fn count_rows(from: &str, filter: &SqlFilter) -> anyhow::Result<usize> {
    let sql = format!("SELECT COUNT(*) AS cnt FROM {} {}", from, filter.where_sql());
    let db = get_connection()?;
    let row = db.query_one(statement(&sql, filter.values())).await?;
    let count: i64 = match row {
        Some(r) => r.try_get("", "cnt")?,
        None => 0,
    };
    Ok(count.max(0) as usize)
}

/// Page query for rows mapped by `FromQueryResult`.
pub fn page_sql(select: &str, from: &str, filter: &SqlFilter, order_by: &str, query: &ListQuery) -> Statement {
    let sql = format!(
        "SELECT {} FROM {} {} ORDER BY {} LIMIT ? OFFSET ?",
        select,
        from,
        filter.where_sql(),
        order_by
    );
    let mut values = filter.values();
    values.push((query.limit() as i64).into());
    values.push((query.offset() as i64).into());
    statement(&sql, values)
}

/// Page of entity models, `from` must alias the entity table as `t`.
pub async fn fetch_models<E: EntityTrait>(
    from: &str,
    filter: &SqlFilter,
    order_by: &str,
    query: &ListQuery,
) -> anyhow::Result<Vec<E::Model>> {
    let stmt = page_sql("t.*", from, filter, order_by, query);
    let models = E::find().from_raw_sql(stmt).all(get_connection()?).await?;
    Ok(models)
}

pub async fn fetch_rows<R: FromQueryResult>(
    select: &str,
    from: &str,
    filter: &SqlFilter,
    order_by: &str,
    query: &ListQuery,
) -> anyhow::Result<Vec<R>> {
    let stmt = page_sql(select, from, filter, order_by, query);
    let rows = R::find_by_statement(stmt).all(get_connection()?).await?;
    Ok(rows)
}

/// Next sequential code: `POL-000042`
pub async fn next_code(table: &str, prefix: &str) -> anyhow::Result<String> {
    let sql = format!(
        "SELECT MAX(CAST(SUBSTR(code, {}) AS INTEGER)) AS last FROM {} WHERE code LIKE ?",
        prefix.len() + 2,
        table
    );
    let db = get_connection()?;
    let row = db
        .query_one(statement(&sql, vec![format!("{}-%", prefix).into()]))
        .await?;
    let last: Option<i64> = match row {
        Some(r) => r.try_get("", "last")?,
        None => None,
    };
    Ok(format_code(prefix, last.unwrap_or(0) + 1))
}

pub fn format_code(prefix: &str, n: i64) -> String {
    format!("{}-{:06}", prefix, n)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_builds_where_and_values() {
        let filter = SqlFilter::new()
            .raw("t.is_deleted = 0")
            .eq("t.status", Some("active"))
            .eq("t.dealer_id", None)
            .search(&["t.code", "c.description"], Some("%ab%".into()))
            .date_between("t.start_date", Some("2024-01-01"), None);
        assert_eq!(
            filter.where_sql(),
            "WHERE t.is_deleted = 0 AND t.status = ? AND (LOWER(COALESCE(t.code, '')) LIKE ? ESCAPE '\\' OR LOWER(COALESCE(c.description, '')) LIKE ? ESCAPE '\\') AND t.start_date >= ?"
        );
        assert_eq!(filter.values().len(), 4);
    }

    #[test]
    fn test_empty_filter() {
        assert_eq!(SqlFilter::new().where_sql(), "");
        assert!(SqlFilter::new().search(&["t.code"], None).values().is_empty());
    }

    #[test]
    fn test_page_sql_appends_limit_offset() {
        let query = ListQuery {
            page: 2,
            page_size: 20,
            ..Default::default()
        };
        let stmt = page_sql("t.*", "a001_dealer t", &SqlFilter::new(), "t.code ASC", &query);
        assert_eq!(stmt.sql, "SELECT t.* FROM a001_dealer t  ORDER BY t.code ASC LIMIT ? OFFSET ?");
        let values = stmt.values.map(|v| v.0).unwrap_or_default();
        assert_eq!(values, vec![Value::from(20i64), Value::from(40i64)]);
    }

    #[test]
    fn test_page_sql_offset_for_huge_page() {
        let query = ListQuery {
            page: usize::MAX,
            page_size: 50,
            ..Default::default()
        };
        let stmt = page_sql("t.*", "a001_dealer t", &SqlFilter::new(), "t.code ASC", &query);
        let values = stmt.values.map(|v| v.0).unwrap_or_default();
        assert_eq!(values[1], Value::from(i32::MAX as i64));
    }

    #[test]
    fn test_format_code() {
        assert_eq!(format_code("POL", 42), "POL-000042");
        assert_eq!(format_code("DLR", 1_234_567), "DLR-1234567");
    }
}
