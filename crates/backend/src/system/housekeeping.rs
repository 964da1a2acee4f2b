//! Фоновое обслуживание: истечение полисов и напоминания о просроченных задачах.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use cron::Schedule;
use tracing::{error, info, warn};

use crate::domain::{a006_policy, a008_task};

/// Результат одного прохода
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct HousekeepingReport {
    pub expired_policies: usize,
    pub overdue_notices: usize,
}

pub fn parse_schedule(expression: &str) -> anyhow::Result<Schedule> {
    Schedule::from_str(expression.trim())
        .map_err(|e| anyhow::anyhow!("Invalid housekeeping schedule '{}': {}", expression, e))
}

/// Ждать до следующего срабатывания; None если расписание исчерпано
pub fn next_delay(schedule: &Schedule, now: DateTime<Utc>) -> Option<std::time::Duration> {
    schedule
        .after(&now)
        .next()
        .map(|at| (at - now).to_std().unwrap_or_default())
}

/// Один проход. Ошибка одного шага не отменяет второй.
pub async fn run_once(today: NaiveDate) -> HousekeepingReport {
    let mut report = HousekeepingReport::default();

    match a006_policy::service::expire_due(today).await {
        Ok(count) => report.expired_policies = count,
        Err(e) => error!("Housekeeping: policy expiry failed: {:?}", e),
    }
    match a008_task::service::notify_overdue(today).await {
        Ok(count) => report.overdue_notices = count,
        Err(e) => error!("Housekeeping: overdue task notices failed: {:?}", e),
    }

    info!(
        "Housekeeping for {}: {} policies expired, {} overdue notices sent",
        today, report.expired_policies, report.overdue_notices
    );
    report
}

/// Цикл по cron-расписанию; первый проход сразу после старта
pub async fn run_loop(schedule: Schedule) {
    info!("Housekeeping worker started");
    run_once(Utc::now().date_naive()).await;

    loop {
        let Some(delay) = next_delay(&schedule, Utc::now()) else {
            warn!("Housekeeping schedule has no upcoming runs, worker stopped");
            return;
        };
        tokio::time::sleep(delay).await;
        run_once(Utc::now().date_naive()).await;
    }
}

/// Запуск воркера в фоне по расписанию из конфигурации
pub fn spawn(expression: &str) -> anyhow::Result<()> {
    let schedule = parse_schedule(expression)?;
    info!("Housekeeping schedule: {}", expression);
    tokio::spawn(run_loop(schedule));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_schedule() {
        assert!(parse_schedule("0 */15 * * * *").is_ok());
        assert!(parse_schedule("every five minutes").is_err());
    }

    #[test]
    fn test_next_delay() {
        let schedule = parse_schedule("0 */15 * * * *").unwrap();
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 10, 7, 30).unwrap();
        let delay = next_delay(&schedule, now).unwrap();
        assert_eq!(delay.as_secs(), 7 * 60 + 30);

        let exact = Utc.with_ymd_and_hms(2024, 3, 1, 10, 15, 0).unwrap();
        assert_eq!(next_delay(&schedule, exact).unwrap().as_secs(), 15 * 60);
    }
}
