//! `oil-events` library crate.
//!
//! The binary (`oilev`) is a thin wrapper around this library so that:
//!
//! - core logic is testable without spawning processes
//! - modules are reusable (e.g., future dashboards, notebooks, etc.)
//! - code stays easy to navigate as the project grows

pub mod analysis;
pub mod app;
pub mod charts;
pub mod cli;
pub mod domain;
pub mod error;
pub mod io;
pub mod math;
pub mod plot;
pub mod report;
