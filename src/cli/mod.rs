//! Command-line parsing for the event impact analyzer.
//!
//! The goal of this module is to keep **argument parsing** and **command
//! dispatch** separate from the analysis code.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::domain::CleanMethod;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "oilev", version, about = "Oil Price Event Impact Analyzer")]
pub struct Cli {
    /// Also write logs to `<DIR>/analysis.log`.
    #[arg(long, global = true, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Load prices, run EDA + the event batch, and print the impact table.
    Analyze(AnalyzeArgs),
    /// Dataset hygiene summary only (missing values, duplicates, outliers).
    Eda(EdaArgs),
    /// Re-render charts from a previously exported impact JSON.
    Plot(PlotArgs),
}

/// Options for the full analysis run.
#[derive(Debug, Parser, Clone)]
pub struct AnalyzeArgs {
    /// Price CSV (`Date,Price`). Falls back to `OIL_PRICES_CSV` (environment
    /// or `.env`).
    #[arg(short = 'i', long)]
    pub input: Option<PathBuf>,

    /// How to handle missing prices before analysis.
    #[arg(long, value_enum, default_value_t = CleanMethod::Interpolate)]
    pub clean: CleanMethod,

    /// Cumulative-return window: calendar days before the anchor.
    #[arg(long, default_value_t = 180)]
    pub days_before: i64,

    /// Cumulative-return window: calendar days after the anchor.
    #[arg(long, default_value_t = 180)]
    pub days_after: i64,

    /// Render an ASCII plot in the terminal (enabled by default).
    #[arg(long, default_value_t = true)]
    pub plot: bool,

    /// Disable the terminal plot.
    #[arg(long)]
    pub no_plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 100)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 25)]
    pub height: usize,

    /// Export the impact table to CSV.
    #[arg(long)]
    pub export: Option<PathBuf>,

    /// Export the impact table (rows + window settings) to JSON.
    #[arg(long = "export-json")]
    pub export_json: Option<PathBuf>,

    /// Write SVG charts into this directory.
    #[arg(long = "charts-dir", value_name = "DIR")]
    pub charts_dir: Option<PathBuf>,

    /// Run diagnostic statistics (ADF + per-event t-tests).
    #[arg(long)]
    pub diagnostics: bool,
}

/// Options for the standalone EDA pass.
#[derive(Debug, Parser)]
pub struct EdaArgs {
    /// Price CSV (`Date,Price`). Falls back to `OIL_PRICES_CSV` (environment
    /// or `.env`).
    #[arg(short = 'i', long)]
    pub input: Option<PathBuf>,

    /// Cleaning applied before `--save-cleaned`.
    #[arg(long, value_enum, default_value_t = CleanMethod::Interpolate)]
    pub clean: CleanMethod,

    /// Write the cleaned dataset to this CSV.
    #[arg(long = "save-cleaned", value_name = "CSV")]
    pub save_cleaned: Option<PathBuf>,
}

/// Options for re-plotting a saved impact table.
#[derive(Debug, Parser)]
pub struct PlotArgs {
    /// Impact JSON produced by `oilev analyze --export-json`.
    #[arg(long, value_name = "JSON")]
    pub table: PathBuf,

    /// Price CSV for the series chart; defaults to the source recorded in
    /// the JSON.
    #[arg(short = 'i', long)]
    pub input: Option<PathBuf>,

    /// How to handle missing prices before charting.
    #[arg(long, value_enum, default_value_t = CleanMethod::Interpolate)]
    pub clean: CleanMethod,

    /// Output directory for SVG charts.
    #[arg(long = "charts-dir", value_name = "DIR", default_value = "charts")]
    pub charts_dir: PathBuf,
}
