use anyhow::Result;
use contracts::dashboards::d401_dealer_performance::dto::DealerPerformanceRow;
use contracts::system::roles::DataScope;
use sea_orm::{FromQueryResult, Value};

use crate::shared::data::db::get_connection;
use crate::shared::data::query::{statement, SqlFilter};

#[derive(Debug, FromQueryResult)]
struct PerformanceRow {
    dealer_id: String,
    dealer_name: String,
    policies: i64,
    premium: f64,
    commission: f64,
    paid_claims: f64,
}

/// Выпущенные (не черновики) полисы по дате выпуска и оплаченные убытки
/// по дате происшествия, за период включительно
pub async fn dealer_totals(scope: &DataScope, date_from: &str, date_to: &str) -> Result<Vec<DealerPerformanceRow>> {
    let filter = SqlFilter::new()
        .raw("d.is_deleted = 0")
        .scope(scope, "d.id", None);

    let sql = format!(
        r#"
        SELECT
            d.id AS dealer_id,
            d.description AS dealer_name,
            (SELECT COUNT(*) FROM a006_policy p
              WHERE p.dealer_id = d.id AND p.is_deleted = 0 AND p.status <> 'draft'
                AND substr(p.issued_at, 1, 10) BETWEEN ? AND ?) AS policies,
            (SELECT CAST(COALESCE(SUM(p.premium), 0) AS REAL) FROM a006_policy p
              WHERE p.dealer_id = d.id AND p.is_deleted = 0 AND p.status <> 'draft'
                AND substr(p.issued_at, 1, 10) BETWEEN ? AND ?) AS premium,
            (SELECT CAST(COALESCE(SUM(p.commission), 0) AS REAL) FROM a006_policy p
              WHERE p.dealer_id = d.id AND p.is_deleted = 0 AND p.status <> 'draft'
                AND substr(p.issued_at, 1, 10) BETWEEN ? AND ?) AS commission,
            (SELECT CAST(COALESCE(SUM(c.approved_amount), 0) AS REAL) FROM a007_claim c
              WHERE c.dealer_id = d.id AND c.is_deleted = 0 AND c.status = 'paid'
                AND c.incident_date BETWEEN ? AND ?) AS paid_claims
        FROM a001_dealer d
        {}
        "#,
        filter.where_sql()
    );

    let mut values: Vec<Value> = Vec::new();
    for _ in 0..4 {
        values.push(date_from.into());
        values.push(date_to.into());
    }
    values.extend(filter.values());

    let rows = PerformanceRow::find_by_statement(statement(&sql, values))
        .all(get_connection()?)
        .await?;

    Ok(rows
        .into_iter()
        .map(|r| {
            DealerPerformanceRow::new(
                r.dealer_id,
                r.dealer_name,
                r.policies,
                r.premium,
                r.commission,
                r.paid_claims,
            )
        })
        .collect())
}
