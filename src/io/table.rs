//! Read/write impact-table JSON files.
//!
//! Impact JSON is the "portable" representation of a batch run:
//! - the computed per-event rows
//! - the window settings needed to interpret them
//! - the source file they were computed from
//!
//! The schema is defined by `domain::ImpactFile`.

use std::fs::File;
use std::path::Path;

use crate::domain::ImpactFile;
use crate::error::AppError;

/// Write an impact JSON file.
pub fn write_impact_json(path: &Path, table: &ImpactFile) -> Result<(), AppError> {
    let file = File::create(path).map_err(|e| {
        AppError::usage(format!("Failed to create impact JSON '{}': {e}", path.display()))
    })?;

    serde_json::to_writer_pretty(file, table)
        .map_err(|e| AppError::usage(format!("Failed to write impact JSON: {e}")))?;

    Ok(())
}

/// Read an impact JSON file.
pub fn read_impact_json(path: &Path) -> Result<ImpactFile, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::usage(format!("Failed to open impact JSON '{}': {e}", path.display()))
    })?;
    let table: ImpactFile = serde_json::from_reader(file)
        .map_err(|e| AppError::usage(format!("Invalid impact JSON: {e}")))?;
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::EventImpact;
    use chrono::NaiveDate;

    #[test]
    fn impact_file_round_trips_through_serde() {
        let table = ImpactFile {
            tool: "oilev".to_string(),
            source: "prices.csv".to_string(),
            days_before: 180,
            days_after: 180,
            rows: vec![EventImpact {
                label: "Start-Gulf War".to_string(),
                date: NaiveDate::from_ymd_opt(1990, 8, 2).unwrap(),
                change_1m: Some(-12.5),
                change_3m: None,
                change_6m: Some(4.0),
                cum_return_before: None,
                cum_return_after: Some(0.1),
            }],
        };

        let json = serde_json::to_string(&table).unwrap();
        // Absent metrics serialize as nulls, not omissions or NaN.
        assert!(json.contains("\"change_3m\":null"));
        let back: ImpactFile = serde_json::from_str(&json).unwrap();
        assert_eq!(back.rows, table.rows);
    }
}
