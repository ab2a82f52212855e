//! Analysis of the price series.
//!
//! - `impact` — event-impact metrics (horizon changes, windowed returns)
//! - `eda` — dataset hygiene: missing values, duplicates, outliers, cleaning
//! - `stats` — summary statistics and the Welch t-test diagnostic
//! - `stationarity` — augmented Dickey-Fuller test

pub mod eda;
pub mod impact;
pub mod stationarity;
pub mod stats;

pub use eda::*;
pub use impact::*;
pub use stationarity::*;
pub use stats::*;
