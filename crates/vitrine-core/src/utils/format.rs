/// Format an amount in Brazilian reais: `R$ 1.234,56`
pub fn format_brl(amount: f64) -> String {
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();
    let fraction = cents % 100;

    // Group the integer part in thousands with dots
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, c) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }

    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    format!("{}R$ {},{:02}", sign, grouped, fraction)
}

/// Format a percentage change with a direction arrow
pub fn format_change(percent: f64) -> String {
    if percent > 0.0 {
        format!("↑ {:.2}%", percent)
    } else if percent < 0.0 {
        format!("↓ {:.2}%", percent.abs())
    } else {
        "0.00%".to_string()
    }
}

/// Truncate a string to a maximum number of characters, adding ellipsis if needed
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}

/// Format an optional string, returning a default if None
pub fn format_optional(value: &Option<String>, default: &str) -> String {
    value.as_deref().unwrap_or(default).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_brl() {
        assert_eq!(format_brl(0.0), "R$ 0,00");
        assert_eq!(format_brl(29.9), "R$ 29,90");
        assert_eq!(format_brl(1234.56), "R$ 1.234,56");
        assert_eq!(format_brl(1_000_000.0), "R$ 1.000.000,00");
        assert_eq!(format_brl(-15.5), "-R$ 15,50");
    }

    #[test]
    fn test_format_change() {
        assert_eq!(format_change(26.714), "↑ 26.71%");
        assert_eq!(format_change(-3.5), "↓ 3.50%");
        assert_eq!(format_change(0.0), "0.00%");
    }

    #[test]
    fn test_truncate_string() {
        assert_eq!(truncate_string("Body", 10), "Body");
        assert_eq!(truncate_string("Body manga curta", 8), "Body ...");
        assert_eq!(truncate_string("Calçados", 8), "Calçados");
        assert_eq!(truncate_string("Hi", 2), "Hi");
    }

    #[test]
    fn test_format_optional() {
        assert_eq!(format_optional(&None, "-"), "-");
        assert_eq!(format_optional(&Some("0-3m".to_string()), "-"), "0-3m");
    }
}
