//! CSV ingest and validation.
//!
//! This module turns a `Date,Price` CSV into a `Dataset` ready for EDA.
//!
//! Design goals:
//! - **Strict schema** for required columns (clear errors + exit code 2)
//! - **Fail fast on malformed rows**: a bad date or unparsable price aborts
//!   the load with its line number instead of silently dropping the row
//! - **Missing is not malformed**: an empty price cell loads as a missing
//!   value for the EDA layer to handle

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use csv::StringRecord;

use crate::domain::{Dataset, RawObservation};
use crate::error::AppError;

/// Load a `Date,Price` CSV from disk.
pub fn load_dataset(path: &Path) -> Result<Dataset, AppError> {
    let file = File::open(path).map_err(|e| {
        AppError::usage(format!("Failed to open CSV '{}': {e}", path.display()))
    })?;
    read_dataset(file)
}

/// Parse a `Date,Price` CSV from any reader.
pub fn read_dataset<R: Read>(reader: R) -> Result<Dataset, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| AppError::usage(format!("Failed to read CSV headers: {e}")))?
        .clone();
    let header_map = build_header_map(&headers);

    let date_idx = *header_map
        .get("date")
        .ok_or_else(|| AppError::usage("Missing required column: `date`"))?;
    let price_idx = *header_map
        .get("price")
        .ok_or_else(|| AppError::usage("Missing required column: `price`"))?;

    let mut rows = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        // +2 because:
        // - records() starts at line 1 after headers
        // - CSV is 1-based line numbers
        let line = idx + 2;
        let record =
            result.map_err(|e| AppError::usage(format!("CSV parse error at line {line}: {e}")))?;

        let date = parse_date_field(&record, date_idx, line)?;
        let price = parse_price_field(&record, price_idx, line)?;
        rows.push(RawObservation { date, price });
    }

    Ok(Dataset::from_rows(rows))
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Excel and other tools sometimes emit UTF-8 CSVs with a BOM prefix on the
    // first header (e.g. "﻿Date"). If we don't strip it, schema validation
    // will incorrectly report missing columns.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

fn parse_date_field(record: &StringRecord, idx: usize, line: usize) -> Result<NaiveDate, AppError> {
    let raw = record
        .get(idx)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::usage(format!("Missing date value at line {line}")))?;
    parse_date(raw).map_err(|msg| AppError::usage(format!("{msg} (line {line})")))
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    // Historical price exports commonly use `DD-Mon-YY` (e.g. `20-May-87`);
    // we also accept ISO dates. Parsing stays deterministic: a fixed format
    // list, first match wins.
    const FMTS: [&str; 3] = ["%d-%b-%y", "%Y-%m-%d", "%d/%m/%Y"];
    for fmt in FMTS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(d);
        }
    }
    Err(format!(
        "Invalid date '{s}'. Expected one of: DD-Mon-YY, YYYY-MM-DD, DD/MM/YYYY."
    ))
}

fn parse_price_field(
    record: &StringRecord,
    idx: usize,
    line: usize,
) -> Result<Option<f64>, AppError> {
    let Some(raw) = record.get(idx).map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };
    let value = raw
        .parse::<f64>()
        .map_err(|_| AppError::usage(format!("Invalid price '{raw}' at line {line}")))?;
    if !value.is_finite() {
        return Err(AppError::usage(format!(
            "Non-finite price '{raw}' at line {line}"
        )));
    }
    Ok(Some(value))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn reads_iso_and_mon_yy_dates() {
        let csv = "Date,Price\n2001-09-11,27.5\n20-May-87,18.63\n";
        let ds = read_dataset(csv.as_bytes()).unwrap();
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.rows[0].date, d(2001, 9, 11));
        assert_eq!(ds.rows[1].date, d(1987, 5, 20));
        assert_eq!(ds.rows[1].price, Some(18.63));
    }

    #[test]
    fn empty_price_cell_is_missing_not_an_error() {
        let csv = "Date,Price\n2001-09-11,\n2001-09-12,28.0\n";
        let ds = read_dataset(csv.as_bytes()).unwrap();
        assert_eq!(ds.rows[0].price, None);
        assert_eq!(ds.rows[1].price, Some(28.0));
    }

    #[test]
    fn malformed_date_fails_with_line_number() {
        let csv = "Date,Price\n2001-09-11,27.5\nnot-a-date,28.0\n";
        let err = read_dataset(csv.as_bytes()).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("line 3"));
    }

    #[test]
    fn unparsable_price_fails_with_line_number() {
        let csv = "Date,Price\n2001-09-11,abc\n";
        let err = read_dataset(csv.as_bytes()).unwrap_err();
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn missing_required_column_is_fatal() {
        let csv = "Date,Close\n2001-09-11,27.5\n";
        let err = read_dataset(csv.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("`price`"));
    }

    #[test]
    fn bom_and_case_in_headers_are_tolerated() {
        let csv = "\u{feff}DATE,price\n2001-09-11,27.5\n";
        let ds = read_dataset(csv.as_bytes()).unwrap();
        assert_eq!(ds.len(), 1);
    }
}
