use chrono::NaiveDate;

/// Returns "$1,234.56"; negative amounts as "-$12.00".
pub fn format_currency(amount: f64) -> String {
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();
    let frac = cents % 100;

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, ch) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    format!("{}${}.{:02}", sign, grouped, frac)
}

/// Returns "42.1%".
pub fn format_percent(percent: f64) -> String {
    format!("{:.1}%", percent)
}

/// Returns "[████░░░░░░░░]" where █ = used portion, ░ = headroom.
pub fn format_usage_bar(used_percent: f64, width: usize) -> String {
    let used_percent = used_percent.clamp(0.0, 100.0);
    let used_blocks = ((used_percent / 100.0) * width as f64).round() as usize;
    let free_blocks = width.saturating_sub(used_blocks);

    format!("[{}{}]", "█".repeat(used_blocks), "░".repeat(free_blocks))
}

/// Horizontal bar proportional to `value / max`, without brackets.
pub fn format_bar(value: f64, max: f64, width: usize) -> String {
    if max <= 0.0 || value <= 0.0 {
        return String::new();
    }
    let blocks = ((value / max).min(1.0) * width as f64).round() as usize;
    "█".repeat(blocks.max(1))
}

/// Returns "Jan 05".
pub fn format_day_short(date: &NaiveDate) -> String {
    date.format("%b %d").to_string()
}

/// Shortens an API timestamp to "YYYY-MM-DD HH:MM"; empty becomes "never".
pub fn format_timestamp(ts: &str) -> String {
    if ts.is_empty() {
        return "never".to_string();
    }
    match (ts.get(..10), ts.get(11..16)) {
        (Some(day), Some(time)) => format!("{} {}", day, time),
        _ => ts.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_currency_groups_thousands() {
        assert_eq!(format_currency(0.0), "$0.00");
        assert_eq!(format_currency(5.0), "$5.00");
        assert_eq!(format_currency(123.456), "$123.46");
        assert_eq!(format_currency(1234.5), "$1,234.50");
        assert_eq!(format_currency(1234567.891), "$1,234,567.89");
    }

    #[test]
    fn format_currency_negative() {
        assert_eq!(format_currency(-12.0), "-$12.00");
        assert_eq!(format_currency(-0.001), "$0.00");
    }

    #[test]
    fn format_percent_one_decimal() {
        assert_eq!(format_percent(42.06), "42.1%");
        assert_eq!(format_percent(0.0), "0.0%");
        // 42.05 is stored as 42.0499.., so it rounds down
        assert_eq!(format_percent(42.05), "42.0%");
    }

    #[test]
    fn format_usage_bar_width() {
        assert_eq!(format_usage_bar(0.0, 12), "[░░░░░░░░░░░░]");
        assert_eq!(format_usage_bar(100.0, 12), "[████████████]");
        assert_eq!(format_usage_bar(50.0, 12), "[██████░░░░░░]");
        assert_eq!(format_usage_bar(140.0, 4), "[████]");
    }

    #[test]
    fn format_bar_scales_to_max() {
        assert_eq!(format_bar(50.0, 100.0, 10), "█████");
        assert_eq!(format_bar(100.0, 100.0, 10), "██████████");
        assert_eq!(format_bar(0.1, 100.0, 10), "█");
        assert_eq!(format_bar(0.0, 100.0, 10), "");
        assert_eq!(format_bar(5.0, 0.0, 10), "");
    }

    #[test]
    fn format_day_short_month_and_day() {
        let d = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        assert_eq!(format_day_short(&d), "Jan 05");
    }

    #[test]
    fn format_timestamp_variants() {
        assert_eq!(format_timestamp(""), "never");
        assert_eq!(
            format_timestamp("2024-03-01T10:15:42.123456+00:00"),
            "2024-03-01 10:15"
        );
        assert_eq!(format_timestamp("2024-03-01"), "2024-03-01");
    }
}
