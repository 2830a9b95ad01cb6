//! Indian-rupee display formatting for predicted charges.
//!
//! Indian digit grouping: the last three integer digits form one group,
//! every group to the left of it has two digits (`12,34,567.89`).

/// Format `value` as rupees with two decimals, e.g. `₹12,34,567.89`.
pub fn format_inr(value: f64) -> String {
    if !value.is_finite() {
        return format!("₹{value}");
    }

    let fixed = format!("{:.2}", value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let sign = if value < 0.0 && fixed != "0.00" { "-" } else { "" };

    format!("{sign}₹{}.{frac_part}", group_indian(int_part))
}

fn group_indian(digits: &str) -> String {
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

    format!("{},{tail}", groups.join(","))
}
