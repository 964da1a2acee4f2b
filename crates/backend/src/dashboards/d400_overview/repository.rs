use anyhow::Result;
use contracts::dashboards::d400_overview::dto::MonthlyAmount;
use contracts::system::roles::DataScope;
use sea_orm::FromQueryResult;

use crate::shared::data::db::get_connection;
use crate::shared::data::query::{count_rows, statement, SqlFilter};

#[derive(Debug, FromQueryResult)]
struct MonthRow {
    month: Option<String>,
    premium: f64,
    policies: i64,
}

#[derive(Debug, FromQueryResult)]
pub struct StatusRow {
    pub status: String,
    pub cnt: i64,
}

pub async fn count_customers(scope: &DataScope) -> Result<i64> {
    let filter = SqlFilter::new()
        .raw("t.is_deleted = 0")
        .scope(scope, "t.dealer_id", Some("t.id"));
    Ok(count_rows("a002_customer t", &filter).await? as i64)
}

pub async fn count_policies(scope: &DataScope, status: &str) -> Result<i64> {
    let filter = SqlFilter::new()
        .raw("t.is_deleted = 0")
        .eq("t.status", Some(status))
        .scope(scope, "t.dealer_id", Some("t.customer_id"));
    Ok(count_rows("a006_policy t", &filter).await? as i64)
}

pub async fn count_claims_in(scope: &DataScope, statuses: &[&str]) -> Result<i64> {
    let placeholders = vec!["?"; statuses.len()].join(", ");
    let filter = SqlFilter::new()
        .raw("t.is_deleted = 0")
        .push(
            &format!("t.status IN ({})", placeholders),
            statuses.iter().map(|s| (*s).into()).collect(),
        )
        .scope(scope, "t.dealer_id", Some("t.customer_id"));
    Ok(count_rows("a007_claim t", &filter).await? as i64)
}

/// `own_user_id` - только свои обращения (не поддержка)
pub async fn count_open_tickets(own_user_id: Option<&str>) -> Result<i64> {
    let filter = SqlFilter::new()
        .raw("t.is_deleted = 0")
        .raw("t.status <> 'closed'")
        .eq("t.created_by", own_user_id);
    Ok(count_rows("a009_ticket t", &filter).await? as i64)
}

/// Премия по месяцам выпуска начиная с `date_from`; черновики не считаются
pub async fn premium_by_month(scope: &DataScope, date_from: &str) -> Result<Vec<MonthlyAmount>> {
    let filter = SqlFilter::new()
        .raw("t.is_deleted = 0")
        .raw("t.status <> 'draft'")
        .push(
            "substr(COALESCE(t.issued_at, t.created_at), 1, 10) >= ?",
            vec![date_from.into()],
        )
        .scope(scope, "t.dealer_id", Some("t.customer_id"));

    let sql = format!(
        "SELECT substr(COALESCE(t.issued_at, t.created_at), 1, 7) AS month,
                CAST(COALESCE(SUM(t.premium), 0) AS REAL) AS premium,
                COUNT(*) AS policies
         FROM a006_policy t {}
         GROUP BY month
         ORDER BY month",
        filter.where_sql()
    );
    let rows = MonthRow::find_by_statement(statement(&sql, filter.values()))
        .all(get_connection()?)
        .await?;
    Ok(rows
        .into_iter()
        .filter_map(|r| {
            r.month.map(|month| MonthlyAmount {
                month,
                premium: r.premium,
                policies: r.policies,
            })
        })
        .collect())
}

/// `table` только из кода: a006_policy или a007_claim
pub async fn count_by_status(table: &str, scope: &DataScope) -> Result<Vec<StatusRow>> {
    let filter = SqlFilter::new()
        .raw("t.is_deleted = 0")
        .scope(scope, "t.dealer_id", Some("t.customer_id"));
    let sql = format!(
        "SELECT t.status AS status, COUNT(*) AS cnt FROM {} t {} GROUP BY t.status",
        table,
        filter.where_sql()
    );
    let rows = StatusRow::find_by_statement(statement(&sql, filter.values()))
        .all(get_connection()?)
        .await?;
    Ok(rows)
}
