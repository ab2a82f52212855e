//! Formatted terminal output: run summary, impact table, EDA summary,
//! diagnostics.
//!
//! We keep formatting code in one place so:
//! - the analysis code stays clean and testable
//! - output changes are localized (important for future snapshot tests)

use crate::analysis::eda::{CleanReport, EdaSummary};
use crate::analysis::stats::TestResult;
use crate::domain::{EventImpact, PriceSeries};

/// Format the run header: source, cleaning, and series coverage.
pub fn format_run_summary(
    source: &str,
    eda: &EdaSummary,
    clean: &CleanReport,
    series: &PriceSeries,
) -> String {
    let mut out = String::new();

    out.push_str("=== oilev - Oil Price Event Impact ===\n");
    out.push_str(&format!("Source: {source}\n"));
    out.push_str(&format!(
        "Rows: {} | missing prices: {} | duplicate dates: {} | outliers (IQR): {}\n",
        eda.rows,
        eda.missing_prices,
        eda.duplicate_dates,
        eda.outliers.rows.len()
    ));
    out.push_str(&format!(
        "Cleaning: removed {} duplicates, filled {}, dropped {}\n",
        clean.duplicates_removed, clean.filled, clean.dropped
    ));

    let prices: Vec<f64> = series.points().iter().map(|p| p.price).collect();
    let min = prices.iter().copied().fold(f64::INFINITY, f64::min);
    let max = prices.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    out.push_str(&format!(
        "Series: n={} | dates=[{}, {}] | price=[{min:.2}, {max:.2}]\n",
        series.len(),
        series.first_date(),
        series.last_date()
    ));

    out
}

/// Format the impact table, one row per event, absent metrics as `-`.
pub fn format_impact_table(rows: &[EventImpact]) -> String {
    let mut out = String::new();

    out.push_str(
        format!(
            "{:<28} {:>10} {:>9} {:>9} {:>9} {:>11} {:>11}\n",
            "Event", "Date", "1M %", "3M %", "6M %", "CumRet<", "CumRet>"
        )
        .trim_end(),
    );
    out.push('\n');
    out.push_str(
        format!(
            "{:-<28} {:-<10} {:-<9} {:-<9} {:-<9} {:-<11} {:-<11}\n",
            "", "", "", "", "", "", ""
        )
        .trim_end(),
    );
    out.push('\n');

    for row in rows {
        out.push_str(
            format!(
                "{:<28} {:>10} {:>9} {:>9} {:>9} {:>11} {:>11}\n",
                truncate(&row.label, 28),
                row.date.to_string(),
                fmt_opt(row.change_1m, 2),
                fmt_opt(row.change_3m, 2),
                fmt_opt(row.change_6m, 2),
                fmt_opt(row.cum_return_before, 4),
                fmt_opt(row.cum_return_after, 4),
            )
            .trim_end(),
        );
        out.push('\n');
    }

    out
}

/// Format the standalone EDA summary (used by the `eda` subcommand).
pub fn format_eda_summary(eda: &EdaSummary) -> String {
    let mut out = String::new();

    out.push_str("=== oilev - EDA Summary ===\n");
    out.push_str(&format!("Rows: {}\n", eda.rows));
    out.push_str(&format!("Missing prices: {}\n", eda.missing_prices));
    out.push_str(&format!("Duplicate dates: {}\n", eda.duplicate_dates));

    let outliers = &eda.outliers;
    if outliers.rows.is_empty() {
        out.push_str("Outliers (IQR): none\n");
    } else {
        out.push_str(&format!(
            "Outliers (IQR): {} outside [{:.2}, {:.2}]\n",
            outliers.rows.len(),
            outliers.lower_bound,
            outliers.upper_bound
        ));
        for row in outliers.rows.iter().take(10) {
            let price = row.price.map(|p| format!("{p:.2}")).unwrap_or_default();
            out.push_str(&format!("  {} {price}\n", row.date));
        }
        if outliers.rows.len() > 10 {
            out.push_str(&format!("  ... and {} more\n", outliers.rows.len() - 10));
        }
    }

    out
}

/// Format the diagnostics section: series-level ADF plus per-event return
/// comparisons.
pub fn format_diagnostics(adf: &TestResult, event_tests: &[(String, TestResult)]) -> String {
    let mut out = String::new();

    out.push_str("Diagnostics:\n");
    out.push_str(&format!("- {}\n", format_test(adf)));
    for (label, test) in event_tests {
        out.push_str(&format!("- {}: {}\n", truncate(label, 28), format_test(test)));
    }

    out
}

fn format_test(test: &TestResult) -> String {
    if test.statistic.is_nan() {
        return format!("{}: insufficient data", test.test_name);
    }
    let marker = if test.is_significant { " *" } else { "" };
    format!(
        "{}: stat={:.3} p~{:.3}{marker}",
        test.test_name, test.statistic, test.p_value
    )
}

fn fmt_opt(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(v) => format!("{v:.decimals$}"),
        None => "-".to_string(),
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    for (i, ch) in s.chars().enumerate() {
        if i + 1 >= max {
            break;
        }
        out.push(ch);
    }
    out.push('.');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn impact(change_1m: Option<f64>) -> EventImpact {
        EventImpact {
            label: "Invasion of Iraq".to_string(),
            date: NaiveDate::from_ymd_opt(2003, 3, 20).unwrap(),
            change_1m,
            change_3m: None,
            change_6m: Some(-3.25),
            cum_return_before: Some(0.1234),
            cum_return_after: None,
        }
    }

    #[test]
    fn table_renders_absent_metrics_as_dashes() {
        let table = format_impact_table(&[impact(None)]);
        assert!(table.contains("Invasion of Iraq"));
        assert!(table.contains("2003-03-20"));
        assert!(table.contains(" - "));
        assert!(table.contains("-3.25"));
        assert!(table.contains("0.1234"));
    }

    #[test]
    fn table_renders_present_changes_with_two_decimals() {
        let table = format_impact_table(&[impact(Some(12.5))]);
        assert!(table.contains("12.50"));
    }

    #[test]
    fn long_labels_are_truncated() {
        assert_eq!(truncate("abcdef", 4), "abc.");
        assert_eq!(truncate("abc", 4), "abc");
    }

    #[test]
    fn diagnostics_mark_significant_tests() {
        let test = TestResult {
            test_name: "ADF Test".to_string(),
            statistic: -4.2,
            p_value: 0.004,
            critical_values: vec![],
            is_significant: true,
        };
        let out = format_diagnostics(&test, &[]);
        assert!(out.contains("ADF Test"));
        assert!(out.contains('*'));
    }

    #[test]
    fn diagnostics_report_unavailable_tests() {
        let out = format_diagnostics(&TestResult::unavailable("ADF Test"), &[]);
        assert!(out.contains("insufficient data"));
    }
}
