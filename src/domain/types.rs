//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during analysis
//! - exported to JSON/CSV
//! - reloaded later for plotting or comparisons

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// A row as loaded from the input CSV, before any cleaning.
///
/// An empty price cell is a *missing value* and is handled by the EDA
/// operations; it is not an ingest error.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawObservation {
    pub date: NaiveDate,
    pub price: Option<f64>,
}

/// The dataset in file order, as loaded.
///
/// EDA operations (missing values, duplicates, outliers, cleaning) work on
/// this representation; analysis works on the `PriceSeries` built from it.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub rows: Vec<RawObservation>,
}

impl Dataset {
    pub fn from_rows(rows: Vec<RawObservation>) -> Self {
        Self { rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// One dated price observation in the cleaned series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub price: f64,
}

/// A date-sorted, unique-date price series.
///
/// Calendar gaps (weekends, holidays) are expected; all date lookups are
/// nearest-match, never exact-match.
#[derive(Debug, Clone)]
pub struct PriceSeries {
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Build a series from observations.
    ///
    /// Rows are sorted by date; exact duplicate dates keep the first
    /// occurrence. Fails when no points remain.
    pub fn from_points(mut points: Vec<PricePoint>) -> Result<Self, AppError> {
        points.sort_by_key(|p| p.date);
        points.dedup_by_key(|p| p.date);
        if points.is_empty() {
            return Err(AppError::no_data("Price series is empty."));
        }
        Ok(Self { points })
    }

    /// Build a series from a dataset, ignoring rows with missing prices.
    ///
    /// Rows without a price cannot participate in nearest-price lookups, so
    /// they are excluded here regardless of the cleaning method chosen
    /// upstream.
    pub fn from_dataset(dataset: &Dataset) -> Result<Self, AppError> {
        let points: Vec<PricePoint> = dataset
            .rows
            .iter()
            .filter_map(|r| r.price.map(|price| PricePoint { date: r.date, price }))
            .collect();
        if points.is_empty() {
            return Err(AppError::no_data(
                "No priced rows remain after cleaning; nothing to analyze.",
            ));
        }
        Self::from_points(points)
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first_date(&self) -> NaiveDate {
        self.points[0].date
    }

    pub fn last_date(&self) -> NaiveDate {
        self.points[self.points.len() - 1].date
    }

    /// Latest observation dated at or before `date`, if any.
    pub fn latest_at_or_before(&self, date: NaiveDate) -> Option<&PricePoint> {
        let idx = self.points.partition_point(|p| p.date <= date);
        if idx == 0 { None } else { Some(&self.points[idx - 1]) }
    }

    /// Earliest observation dated at or after `date`, if any.
    pub fn earliest_at_or_after(&self, date: NaiveDate) -> Option<&PricePoint> {
        let idx = self.points.partition_point(|p| p.date < date);
        self.points.get(idx)
    }

    /// All observations with `start <= date <= end`, in date order.
    ///
    /// An empty slice is a valid result (no observations inside the window).
    pub fn window(&self, start: NaiveDate, end: NaiveDate) -> &[PricePoint] {
        let lo = self.points.partition_point(|p| p.date < start);
        let hi = self.points.partition_point(|p| p.date <= end);
        &self.points[lo..hi.max(lo)]
    }
}

/// Fixed comparison horizons around an event anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Horizon {
    OneMonth,
    ThreeMonths,
    SixMonths,
}

impl Horizon {
    pub const ALL: [Horizon; 3] = [Horizon::OneMonth, Horizon::ThreeMonths, Horizon::SixMonths];

    /// Calendar-day offset applied on both sides of the anchor.
    pub fn days(self) -> i64 {
        match self {
            Horizon::OneMonth => 30,
            Horizon::ThreeMonths => 90,
            Horizon::SixMonths => 180,
        }
    }

    /// Short label for table headers and chart legends.
    pub fn label(self) -> &'static str {
        match self {
            Horizon::OneMonth => "1M",
            Horizon::ThreeMonths => "3M",
            Horizon::SixMonths => "6M",
        }
    }
}

/// Derived metrics for one event.
///
/// Absent metrics (`None`) mean the series did not cover the relevant dates
/// or a zero-price denominator was hit; they are distinct from zero and are
/// rendered as `-` downstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventImpact {
    pub label: String,
    pub date: NaiveDate,
    pub change_1m: Option<f64>,
    pub change_3m: Option<f64>,
    pub change_6m: Option<f64>,
    pub cum_return_before: Option<f64>,
    pub cum_return_after: Option<f64>,
}

impl EventImpact {
    pub fn change(&self, horizon: Horizon) -> Option<f64> {
        match horizon {
            Horizon::OneMonth => self.change_1m,
            Horizon::ThreeMonths => self.change_3m,
            Horizon::SixMonths => self.change_6m,
        }
    }
}

/// A saved impact table (JSON).
///
/// The portable representation of a batch run: the computed rows plus the
/// window settings needed to interpret them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImpactFile {
    pub tool: String,
    pub source: String,
    pub days_before: i64,
    pub days_after: i64,
    pub rows: Vec<EventImpact>,
}

/// How missing prices are handled before analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum CleanMethod {
    /// Fill interior gaps linearly between the nearest priced neighbors.
    Interpolate,
    /// Drop rows with missing prices.
    Drop,
    /// Leave the dataset untouched (missing rows are still excluded from the
    /// series, since they carry no price).
    None,
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults).
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    pub csv_path: PathBuf,
    pub clean: CleanMethod,

    /// Cumulative-return window, calendar days before the anchor.
    pub days_before: i64,
    /// Cumulative-return window, calendar days after the anchor.
    pub days_after: i64,

    pub plot: bool,
    pub plot_width: usize,
    pub plot_height: usize,

    pub export_csv: Option<PathBuf>,
    pub export_json: Option<PathBuf>,
    pub charts_dir: Option<PathBuf>,

    /// Run the diagnostic statistics (ADF + per-event t-tests).
    pub diagnostics: bool,
}
