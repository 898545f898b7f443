//! Number formatting for chart labels.

/// Group integer digits the Indian way: last three, then pairs
/// (`1234567` → `12,34,567`).
fn group_en_in(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }
    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(2);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();
    format!("{},{}", groups.join(","), tail)
}

/// Amount with en-IN digit grouping and at most two decimals, trailing
/// zeros dropped (`123456.5` → `1,23,456.5`).
pub fn format_amount(value: f64) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }
    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let frac = frac_part.trim_end_matches('0');
    let sign = if value < 0.0 && fixed != "0.00" { "-" } else { "" };
    if frac.is_empty() {
        format!("{sign}{}", group_en_in(int_part))
    } else {
        format!("{sign}{}.{frac}", group_en_in(int_part))
    }
}

/// `symbol` followed by [`format_amount`].
pub fn format_currency(symbol: &str, value: f64) -> String {
    format!("{symbol}{}", format_amount(value))
}

/// `symbol` followed by the value with exactly `decimals` places.
pub fn format_currency_fixed(symbol: &str, value: f64, decimals: usize) -> String {
    format!("{symbol}{value:.decimals$}")
}

/// A percentage with one decimal and a trailing `%`.
pub fn format_percentage(percentage: f64) -> String {
    format!("{percentage:.1}%")
}
