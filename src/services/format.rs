//! Display formatting for amounts, volumes and shares

/// Format with thousand separators: 1234567 -> "1,234,567"
pub fn format_number(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let len = digits.len();
    let mut result = String::with_capacity(len + len / 3 + 1);
    if n < 0 {
        result.push('-');
    }

    // Digits are ASCII, so byte indexing is safe
    for (i, ch) in digits.bytes().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            result.push(',');
        }
        result.push(ch as char);
    }

    result
}

/// Peso amount rounded to whole units: "₱1,245,600"
pub fn format_currency(v: f64) -> String {
    format!("₱{}", format_number(v.round() as i64))
}

/// Metric tons with two decimals: "12.50 MT"
pub fn format_volume(v: f64) -> String {
    format!("{:.2} MT", v)
}

/// One-decimal percentage: "28.0%"
pub fn format_percent(v: f64) -> String {
    format!("{:.1}%", v)
}

/// Compact axis label: 1_245_600 -> "1.2M", 70_100 -> "70.1K"
pub fn format_compact(v: f64) -> String {
    let abs = v.abs();
    if abs >= 1_000_000.0 {
        format!("{:.1}M", v / 1_000_000.0)
    } else if abs >= 1_000.0 {
        format!("{:.1}K", v / 1_000.0)
    } else if v.fract() == 0.0 {
        format!("{}", v as i64)
    } else {
        format!("{:.2}", v)
    }
}
