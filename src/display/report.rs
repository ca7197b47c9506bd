//! Period report formatting
//!
//! Renders grouped totals as one line per period with a proportional bar.

use crate::config::Settings;
use crate::ledger::PeriodTotals;
use crate::models::Granularity;

const BAR_WIDTH: usize = 30;

/// Create a simple bar chart representation
pub fn format_bar(value: f64, max_value: f64, width: usize) -> String {
    if max_value <= 0.0 || value <= 0.0 {
        return " ".repeat(width);
    }

    let filled = ((value / max_value) * width as f64).round() as usize;
    let filled = filled.min(width);

    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

/// Format a separator line
pub fn separator(width: usize) -> String {
    "─".repeat(width)
}

/// Truncate a string to a maximum number of characters with ellipsis
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        ".".repeat(max_len)
    } else {
        let kept: String = s.chars().take(max_len - 3).collect();
        format!("{}...", kept)
    }
}

fn period_label(granularity: Granularity) -> &'static str {
    match granularity {
        Granularity::Day => "Day",
        Granularity::Month => "Month",
        Granularity::Year => "Year",
    }
}

/// Format per-period totals, oldest period first
pub fn format_period_report(
    totals: &PeriodTotals,
    granularity: Granularity,
    settings: &Settings,
) -> String {
    if totals.is_empty() {
        return "No expenses in the selected range.\n".to_string();
    }

    let max = totals.values().cloned().fold(0.0_f64, f64::max);
    let grand_total: f64 = totals.values().sum();
    let width = 12 + 16 + BAR_WIDTH + 2;

    let mut output = String::new();
    output.push_str(&format!(
        "{:<12}{:>16}  {}\n",
        period_label(granularity),
        "Total",
        "",
    ));
    output.push_str(&separator(width));
    output.push('\n');

    for (period, total) in totals {
        output.push_str(&format!(
            "{:<12}{:>16}  {}\n",
            period,
            settings.format_amount(*total),
            format_bar(*total, max, BAR_WIDTH)
        ));
    }

    output.push_str(&separator(width));
    output.push('\n');
    output.push_str(&format!(
        "{:<12}{:>16}\n",
        "All",
        settings.format_amount(grand_total)
    ));

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bar() {
        assert_eq!(format_bar(5.0, 10.0, 4), "██░░");
        assert_eq!(format_bar(0.0, 10.0, 3), "   ");
        assert_eq!(format_bar(20.0, 10.0, 2), "██");
    }

    #[test]
    fn test_truncate_counts_chars() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("añoañoaño", 6), "año...");
        assert_eq!(truncate("abcdef", 2), "..");
    }

    #[test]
    fn test_period_report() {
        let mut totals = PeriodTotals::new();
        totals.insert("2024-02".to_string(), 7.0);
        totals.insert("2024-01".to_string(), 15.0);

        let report = format_period_report(&totals, Granularity::Month, &Settings::default());
        let lines: Vec<&str> = report.lines().collect();

        assert!(lines[0].starts_with("Month"));
        assert!(lines[2].starts_with("2024-01"));
        assert!(lines[2].contains("15.00 €"));
        assert!(lines[3].starts_with("2024-02"));
        assert!(report.contains("22.00 €"));
    }

    #[test]
    fn test_empty_report() {
        let report = format_period_report(&PeriodTotals::new(), Granularity::Day, &Settings::default());
        assert_eq!(report, "No expenses in the selected range.\n");
    }
}
