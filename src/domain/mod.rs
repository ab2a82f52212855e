//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - raw observations and the cleaned, date-indexed price series
//! - the fixed registry of significant events (`events`)
//! - analysis outputs (`EventImpact`, `ImpactFile`)
//! - run configuration (`AnalysisConfig`, `CleanMethod`)

pub mod events;
pub mod types;

pub use events::*;
pub use types::*;
