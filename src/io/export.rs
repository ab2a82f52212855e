//! Export the cleaned series and the impact table to CSV.
//!
//! The exports are meant to be easy to consume in spreadsheets or downstream
//! scripts, and the series export round-trips through `ingest`.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::domain::{Dataset, EventImpact};
use crate::error::AppError;

/// Write a cleaned dataset back to the shared `Date,Price` format.
///
/// Dates are ISO; still-missing prices become empty cells.
pub fn write_series_csv(path: &Path, dataset: &Dataset) -> Result<(), AppError> {
    let mut file = File::create(path).map_err(|e| {
        AppError::usage(format!("Failed to create CSV '{}': {e}", path.display()))
    })?;

    writeln!(file, "Date,Price")
        .map_err(|e| AppError::usage(format!("Failed to write CSV header: {e}")))?;
    for row in &dataset.rows {
        let price = row.price.map(|p| format!("{p:.4}")).unwrap_or_default();
        writeln!(file, "{},{price}", row.date)
            .map_err(|e| AppError::usage(format!("Failed to write CSV row: {e}")))?;
    }

    Ok(())
}

/// Write the impact table to CSV, one row per event.
pub fn write_impact_csv(path: &Path, rows: &[EventImpact]) -> Result<(), AppError> {
    let mut file = File::create(path).map_err(|e| {
        AppError::usage(format!("Failed to create CSV '{}': {e}", path.display()))
    })?;

    writeln!(
        file,
        "Event,Date,Change_1M,Change_3M,Change_6M,Cumulative_Return_Before,Cumulative_Return_After"
    )
    .map_err(|e| AppError::usage(format!("Failed to write CSV header: {e}")))?;
    for row in rows {
        writeln!(file, "{}", impact_csv_row(row))
            .map_err(|e| AppError::usage(format!("Failed to write CSV row: {e}")))?;
    }

    Ok(())
}

fn impact_csv_row(row: &EventImpact) -> String {
    format!(
        "{},{},{},{},{},{},{}",
        csv_quote(&row.label),
        row.date,
        fmt_opt(row.change_1m),
        fmt_opt(row.change_3m),
        fmt_opt(row.change_6m),
        fmt_opt(row.cum_return_before),
        fmt_opt(row.cum_return_after),
    )
}

/// Absent metrics export as empty cells.
fn fmt_opt(value: Option<f64>) -> String {
    value.map(|v| format!("{v:.6}")).unwrap_or_default()
}

fn csv_quote(s: &str) -> String {
    if s.contains(',') || s.contains('"') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn impact_row_renders_absent_metrics_as_empty_cells() {
        let row = EventImpact {
            label: "9/11 Terrorist Attacks".to_string(),
            date: NaiveDate::from_ymd_opt(2001, 9, 11).unwrap(),
            change_1m: Some(50.0),
            change_3m: None,
            change_6m: None,
            cum_return_before: Some(0.25),
            cum_return_after: None,
        };
        assert_eq!(
            impact_csv_row(&row),
            "9/11 Terrorist Attacks,2001-09-11,50.000000,,,0.250000,"
        );
    }

    #[test]
    fn labels_with_commas_are_quoted() {
        assert_eq!(csv_quote("a,b"), "\"a,b\"");
        assert_eq!(csv_quote("plain"), "plain");
    }
}
