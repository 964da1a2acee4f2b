use chrono::{DateTime, Utc};
use contracts::domain::a001_dealer::aggregate::Dealer;
use contracts::domain::a002_customer::aggregate::Customer;
use contracts::domain::a003_vehicle::aggregate::Vehicle;
use contracts::domain::a006_policy::aggregate::Policy;
use contracts::domain::a007_claim::aggregate::Claim;
use contracts::domain::a008_task::aggregate::Task;
use contracts::domain::a009_ticket::aggregate::Ticket;
use contracts::domain::common::AggregateRoot;
use contracts::system::maintenance::{RecordCount, SystemStatus};
use once_cell::sync::Lazy;
use sea_orm::ConnectionTrait;

use crate::shared::data::db::get_connection;
use crate::shared::data::query::{count_rows, statement, SqlFilter};
use crate::system::maintenance;

static STARTED_AT: Lazy<DateTime<Utc>> = Lazy::new(Utc::now);

/// `(подпись, таблица, есть мягкое удаление)`
fn counted_tables() -> Vec<(&'static str, &'static str, bool)> {
    fn soft<A: AggregateRoot>() -> (&'static str, &'static str, bool) {
        (A::list_name(), A::table_name(), true)
    }
    vec![
        ("Users", "sys_users", false),
        soft::<Dealer>(),
        soft::<Customer>(),
        soft::<Vehicle>(),
        soft::<Policy>(),
        soft::<Claim>(),
        soft::<Task>(),
        soft::<Ticket>(),
        ("Notifications", "a010_notification", false),
    ]
}

/// Фиксирует момент старта для uptime
pub fn mark_started() {
    Lazy::force(&STARTED_AT);
}

async fn ping_database() -> anyhow::Result<i64> {
    let started = std::time::Instant::now();
    get_connection()?
        .query_one(statement("SELECT 1 AS ok", Vec::new()))
        .await?;
    Ok(started.elapsed().as_millis() as i64)
}

async fn record_counts() -> anyhow::Result<Vec<RecordCount>> {
    let tables = counted_tables();
    let mut counts = Vec::with_capacity(tables.len());
    for (name, table, soft_deleted) in tables {
        let filter = if soft_deleted {
            SqlFilter::new().raw("is_deleted = 0")
        } else {
            SqlFilter::new()
        };
        counts.push(RecordCount {
            name: name.to_string(),
            count: count_rows(table, &filter).await? as i64,
        });
    }
    Ok(counts)
}

/// Статус отдаётся и при недоступной БД: `database_ok = false`
pub async fn system_status() -> SystemStatus {
    let now = Utc::now();
    let (database_ok, latency, counts) = match ping_database().await {
        Ok(latency) => match record_counts().await {
            Ok(counts) => (true, latency, counts),
            Err(e) => {
                tracing::error!("Failed to count records: {}", e);
                (true, latency, Vec::new())
            }
        },
        Err(e) => {
            tracing::error!("Database ping failed: {}", e);
            (false, -1, Vec::new())
        }
    };
    SystemStatus {
        version: env!("CARGO_PKG_VERSION").to_string(),
        started_at: STARTED_AT.to_rfc3339(),
        uptime_seconds: (now - *STARTED_AT).num_seconds(),
        database_ok,
        database_latency_ms: latency,
        maintenance: maintenance::current(),
        record_counts: counts,
    }
}
