//! Форматирование дат для таблиц и подписей графиков.

use chrono::{Datelike, Local, NaiveDate};

/// "2024-03-15T14:02:26.123Z" -> "15.03.2024 14:02"
pub fn format_datetime(datetime_str: &str) -> String {
    if let Some((date_part, time_part)) = datetime_str.split_once('T') {
        let time: String = time_part.chars().take(5).collect();
        return format!("{} {}", format_date(date_part), time);
    }
    datetime_str.to_string()
}

/// "2024-03-15" -> "15.03.2024"
pub fn format_date(date_str: &str) -> String {
    let date_part = date_str.split('T').next().unwrap_or(date_str);
    match NaiveDate::parse_from_str(date_part, "%Y-%m-%d") {
        Ok(date) => date.format("%d.%m.%Y").to_string(),
        Err(_) => date_str.to_string(),
    }
}

pub fn format_date_opt(date_str: &Option<String>) -> String {
    date_str
        .as_deref()
        .map(format_date)
        .unwrap_or_else(|| "-".to_string())
}

/// Подпись месяца для оси графика: "2024-03" -> "Mar 24"
pub fn month_label(month: &str) -> String {
    match NaiveDate::parse_from_str(&format!("{}-01", month), "%Y-%m-%d") {
        Ok(date) => date.format("%b %y").to_string(),
        Err(_) => month.to_string(),
    }
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn today_iso() -> String {
    today().format("%Y-%m-%d").to_string()
}

pub fn current_year() -> i32 {
    today().year()
}

/// First day of the current year, the default start of report periods.
pub fn year_start_iso() -> String {
    format!("{}-01-01", current_year())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_datetime() {
        assert_eq!(
            format_datetime("2024-03-15T14:02:26.123Z"),
            "15.03.2024 14:02"
        );
        assert_eq!(format_datetime("2024-12-31T23:59:59+00:00"), "31.12.2024 23:59");
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date("2024-03-15"), "15.03.2024");
        assert_eq!(format_date("2024-03-15T14:02:26.123Z"), "15.03.2024");
        assert_eq!(format_date_opt(&None), "-");
    }

    #[test]
    fn test_invalid_values_pass_through() {
        assert_eq!(format_datetime("invalid"), "invalid");
        assert_eq!(format_date("2024-13-40"), "2024-13-40");
        assert_eq!(month_label("bad"), "bad");
    }

    #[test]
    fn test_month_label() {
        assert_eq!(month_label("2024-03"), "Mar 24");
    }
}
