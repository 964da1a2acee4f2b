/// Round to cents, half away from zero.
pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Finite and above zero. NaN and infinity do not survive a JSON round trip.
pub fn is_positive_amount(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

/// `rate` percent of `amount`, in cents.
pub fn percent_of(amount: f64, rate: f64) -> f64 {
    round_cents(amount * rate / 100.0)
}

/// Paid claims over written premium; zero when nothing was written.
pub fn loss_ratio(paid_claims: f64, premium: f64) -> f64 {
    if premium <= 0.0 {
        0.0
    } else {
        (paid_claims / premium * 10_000.0).round() / 10_000.0
    }
}

pub fn format_amount(value: f64) -> String {
    let cents = (value.abs() * 100.0).round() as i64;
    let int_part = (cents / 100).to_string();
    let mut grouped = String::new();
    for (i, ch) in int_part.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(ch);
    }
    let int_grouped: String = grouped.chars().rev().collect();
    let sign = if value < 0.0 && cents != 0 { "-" } else { "" };
    format!("{}{}.{:02}", sign, int_grouped, cents % 100)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_and_percent() {
        assert_eq!(round_cents(10.126), 10.13);
        assert_eq!(round_cents(-3.333), -3.33);
        assert_eq!(percent_of(1234.0, 12.5), 154.25);
        assert_eq!(percent_of(100.0, 0.0), 0.0);
    }

    #[test]
    fn test_positive_amount_rejects_non_finite() {
        assert!(is_positive_amount(0.01));
        assert!(!is_positive_amount(0.0));
        assert!(!is_positive_amount(-5.0));
        assert!(!is_positive_amount(f64::NAN));
        assert!(!is_positive_amount(f64::INFINITY));
    }

    #[test]
    fn test_loss_ratio() {
        assert_eq!(loss_ratio(500.0, 0.0), 0.0);
        assert_eq!(loss_ratio(250.0, 1000.0), 0.25);
        assert_eq!(loss_ratio(1.0, 3.0), 0.3333);
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(0.0), "0.00");
        assert_eq!(format_amount(1234567.5), "1 234 567.50");
        assert_eq!(format_amount(-42.1), "-42.10");
    }
}
