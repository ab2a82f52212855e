//! Dataset hygiene: missing values, duplicate dates, outliers, cleaning.
//!
//! These operations work on the raw, file-ordered `Dataset` so that reported
//! counts reflect the input as the user supplied it. They are independent,
//! stateless helpers; the pipeline composes them according to the chosen
//! `CleanMethod`.

use std::collections::HashSet;

use chrono::NaiveDate;

use crate::domain::{CleanMethod, Dataset, RawObservation};

/// Number of rows with a missing price.
pub fn missing_values(dataset: &Dataset) -> usize {
    dataset.rows.iter().filter(|r| r.price.is_none()).count()
}

/// Number of rows whose date already appeared earlier in the dataset.
pub fn duplicate_dates(dataset: &Dataset) -> usize {
    let mut seen: HashSet<NaiveDate> = HashSet::with_capacity(dataset.rows.len());
    dataset
        .rows
        .iter()
        .filter(|r| !seen.insert(r.date))
        .count()
}

/// Drop rows whose date appeared earlier, keeping the first occurrence.
/// Returns the number of rows removed.
pub fn remove_duplicates(dataset: &mut Dataset) -> usize {
    let before = dataset.rows.len();
    let mut seen: HashSet<NaiveDate> = HashSet::with_capacity(before);
    dataset.rows.retain(|r| seen.insert(r.date));
    before - dataset.rows.len()
}

/// Fill interior missing prices linearly between the nearest priced
/// neighbors, in row order. Leading and trailing gaps are left missing.
/// Returns the number of values filled.
pub fn interpolate_missing(dataset: &mut Dataset) -> usize {
    let rows = &mut dataset.rows;
    let mut filled = 0usize;
    let mut prev_priced: Option<usize> = None;

    let mut i = 0;
    while i < rows.len() {
        if rows[i].price.is_some() {
            prev_priced = Some(i);
            i += 1;
            continue;
        }

        // Find the end of this missing run.
        let mut j = i;
        while j < rows.len() && rows[j].price.is_none() {
            j += 1;
        }

        if let (Some(lo), true) = (prev_priced, j < rows.len()) {
            let lo_price = rows[lo].price.unwrap_or(0.0);
            let hi_price = rows[j].price.unwrap_or(0.0);
            let span = (j - lo) as f64;
            for k in i..j {
                let frac = (k - lo) as f64 / span;
                rows[k].price = Some(lo_price + frac * (hi_price - lo_price));
                filled += 1;
            }
        }

        i = j;
    }

    filled
}

/// Drop rows with a missing price. Returns the number of rows removed.
pub fn drop_missing(dataset: &mut Dataset) -> usize {
    let before = dataset.rows.len();
    dataset.rows.retain(|r| r.price.is_some());
    before - dataset.rows.len()
}

/// Rows flagged by the IQR rule, with the bounds that flagged them.
#[derive(Debug, Clone)]
pub struct OutlierReport {
    pub lower_bound: f64,
    pub upper_bound: f64,
    pub rows: Vec<RawObservation>,
}

/// Flag prices outside `[Q1 - 1.5*IQR, Q3 + 1.5*IQR]`.
///
/// Quartiles use linear interpolation between order statistics. Fewer than
/// four priced rows give no meaningful quartiles; nothing is flagged.
pub fn outliers(dataset: &Dataset) -> OutlierReport {
    let mut prices: Vec<f64> = dataset.rows.iter().filter_map(|r| r.price).collect();
    if prices.len() < 4 {
        return OutlierReport {
            lower_bound: f64::NEG_INFINITY,
            upper_bound: f64::INFINITY,
            rows: Vec::new(),
        };
    }
    prices.sort_by(|a, b| a.total_cmp(b));

    let q1 = quantile(&prices, 0.25);
    let q3 = quantile(&prices, 0.75);
    let iqr = q3 - q1;
    let lower_bound = q1 - 1.5 * iqr;
    let upper_bound = q3 + 1.5 * iqr;

    let rows = dataset
        .rows
        .iter()
        .filter(|r| {
            r.price
                .map(|p| p < lower_bound || p > upper_bound)
                .unwrap_or(false)
        })
        .copied()
        .collect();

    OutlierReport { lower_bound, upper_bound, rows }
}

/// Quantile of a sorted slice with linear interpolation.
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    if lo == hi {
        return sorted[lo];
    }
    let frac = pos - lo as f64;
    sorted[lo] + frac * (sorted[hi] - sorted[lo])
}

/// What a cleaning pass did to the dataset.
#[derive(Debug, Clone, Copy, Default)]
pub struct CleanReport {
    pub duplicates_removed: usize,
    pub filled: usize,
    pub dropped: usize,
}

/// Apply the chosen cleaning method: duplicates always go (keep first),
/// missing prices are interpolated, dropped, or left alone.
pub fn clean(dataset: &mut Dataset, method: CleanMethod) -> CleanReport {
    let duplicates_removed = remove_duplicates(dataset);
    let (filled, dropped) = match method {
        CleanMethod::Interpolate => (interpolate_missing(dataset), 0),
        CleanMethod::Drop => (0, drop_missing(dataset)),
        CleanMethod::None => (0, 0),
    };
    CleanReport { duplicates_removed, filled, dropped }
}

/// Pre-cleaning summary of the dataset.
#[derive(Debug, Clone)]
pub struct EdaSummary {
    pub rows: usize,
    pub missing_prices: usize,
    pub duplicate_dates: usize,
    pub outliers: OutlierReport,
}

pub fn summarize(dataset: &Dataset) -> EdaSummary {
    EdaSummary {
        rows: dataset.len(),
        missing_prices: missing_values(dataset),
        duplicate_dates: duplicate_dates(dataset),
        outliers: outliers(dataset),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn row(day: u32, price: Option<f64>) -> RawObservation {
        RawObservation { date: d(2020, 1, day), price }
    }

    #[test]
    fn missing_and_duplicate_counts() {
        let ds = Dataset::from_rows(vec![
            row(1, Some(10.0)),
            row(2, None),
            row(2, Some(11.0)),
            row(3, None),
        ]);
        assert_eq!(missing_values(&ds), 2);
        assert_eq!(duplicate_dates(&ds), 1);
    }

    #[test]
    fn remove_duplicates_keeps_first_occurrence() {
        let mut ds = Dataset::from_rows(vec![
            row(1, Some(10.0)),
            row(2, Some(20.0)),
            row(2, Some(99.0)),
        ]);
        assert_eq!(remove_duplicates(&mut ds), 1);
        assert_eq!(ds.rows[1].price, Some(20.0));
    }

    #[test]
    fn interpolation_fills_interior_gaps_linearly() {
        let mut ds = Dataset::from_rows(vec![
            row(1, Some(10.0)),
            row(2, None),
            row(3, None),
            row(4, Some(16.0)),
        ]);
        assert_eq!(interpolate_missing(&mut ds), 2);
        assert_eq!(ds.rows[1].price, Some(12.0));
        assert_eq!(ds.rows[2].price, Some(14.0));
    }

    #[test]
    fn interpolation_leaves_edge_gaps_missing() {
        let mut ds = Dataset::from_rows(vec![
            row(1, None),
            row(2, Some(10.0)),
            row(3, None),
        ]);
        assert_eq!(interpolate_missing(&mut ds), 0);
        assert_eq!(ds.rows[0].price, None);
        assert_eq!(ds.rows[2].price, None);
    }

    #[test]
    fn drop_missing_removes_only_unpriced_rows() {
        let mut ds = Dataset::from_rows(vec![row(1, Some(10.0)), row(2, None)]);
        assert_eq!(drop_missing(&mut ds), 1);
        assert_eq!(ds.len(), 1);
    }

    #[test]
    fn iqr_flags_a_planted_outlier() {
        let mut rows: Vec<RawObservation> =
            (1..=20).map(|day| row(day, Some(50.0 + day as f64))).collect();
        rows.push(row(21, Some(500.0)));
        let report = outliers(&Dataset::from_rows(rows));
        assert_eq!(report.rows.len(), 1);
        assert_eq!(report.rows[0].price, Some(500.0));
    }

    #[test]
    fn iqr_flags_nothing_on_tiny_datasets() {
        let ds = Dataset::from_rows(vec![row(1, Some(1.0)), row(2, Some(1000.0))]);
        assert!(outliers(&ds).rows.is_empty());
    }

    #[test]
    fn clean_composes_duplicate_and_missing_handling() {
        let mut ds = Dataset::from_rows(vec![
            row(1, Some(10.0)),
            row(1, Some(11.0)),
            row(2, None),
            row(3, Some(20.0)),
        ]);
        let report = clean(&mut ds, CleanMethod::Interpolate);
        assert_eq!(report.duplicates_removed, 1);
        assert_eq!(report.filled, 1);
        assert_eq!(ds.rows[1].price, Some(15.0));
    }
}
