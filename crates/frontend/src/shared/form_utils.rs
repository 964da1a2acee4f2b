//! Преобразования значений полей ввода в поля DTO.

/// Trimmed text, `None` when blank.
pub fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

pub fn or_empty(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

/// Accepts both `1234.5` and `1234,5`; spaces are ignored.
pub fn parse_number(label: &str, value: &str) -> Result<f64, String> {
    let cleaned: String = value
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| if c == ',' { '.' } else { c })
        .collect();
    if cleaned.is_empty() {
        return Ok(0.0);
    }
    cleaned
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| format!("{}: not a number", label))
}

pub fn parse_int(label: &str, value: &str) -> Result<i32, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(0);
    }
    trimmed
        .parse::<i32>()
        .map_err(|_| format!("{}: not a whole number", label))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_empty() {
        assert_eq!(non_empty("  a ".into()), Some("a".to_string()));
        assert_eq!(non_empty("   ".into()), None);
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number("Price", "1 234,50"), Ok(1234.5));
        assert_eq!(parse_number("Price", ""), Ok(0.0));
        assert_eq!(parse_number("Price", "abc"), Err("Price: not a number".to_string()));
        assert!(parse_number("Price", "inf").is_err());
    }

    #[test]
    fn test_parse_int() {
        assert_eq!(parse_int("Year", " 2020 "), Ok(2020));
        assert!(parse_int("Year", "20.5").is_err());
    }
}
