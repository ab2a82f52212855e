//! Shared analysis pipeline used by the CLI subcommands.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! load -> EDA summary -> clean -> series -> event batch -> diagnostics
//!
//! The subcommand handlers can then focus on presentation (printing,
//! exports, charts).

use chrono::Duration;
use tracing::info;

use crate::analysis::eda::{self, CleanReport, EdaSummary};
use crate::analysis::stats::{self, TestResult};
use crate::analysis::{impact, stationarity};
use crate::domain::{events, AnalysisConfig, Event, EventImpact, PriceSeries};
use crate::error::AppError;
use crate::report;

/// All computed outputs of a single `oilev analyze` run.
pub struct RunOutput {
    pub eda: EdaSummary,
    pub clean: CleanReport,
    pub series: PriceSeries,
    pub impacts: Vec<EventImpact>,
    pub diagnostics: Option<Diagnostics>,
}

/// Diagnostic add-ons: series-level stationarity plus per-event return
/// comparisons. Reported, never acted on.
pub struct Diagnostics {
    pub adf: TestResult,
    pub event_tests: Vec<(String, TestResult)>,
}

/// Execute the full analysis pipeline and return the computed outputs.
pub fn run_analysis(config: &AnalysisConfig) -> Result<RunOutput, AppError> {
    let mut dataset = crate::io::ingest::load_dataset(&config.csv_path)?;

    let eda_summary = eda::summarize(&dataset);
    info!(
        "loaded {} rows ({} missing prices, {} duplicate dates, {} IQR outliers)",
        eda_summary.rows,
        eda_summary.missing_prices,
        eda_summary.duplicate_dates,
        eda_summary.outliers.rows.len()
    );

    let clean_report = eda::clean(&mut dataset, config.clean);
    let series = PriceSeries::from_dataset(&dataset)?;

    let registry = events::registry();
    let impacts =
        impact::analyze_events(&series, &registry, config.days_before, config.days_after);
    info!(
        "Event Impact Analysis:\n{}",
        report::format_impact_table(&impacts)
    );

    let diagnostics = config
        .diagnostics
        .then(|| compute_diagnostics(&series, &registry, config));

    Ok(RunOutput {
        eda: eda_summary,
        clean: clean_report,
        series,
        impacts,
        diagnostics,
    })
}

fn compute_diagnostics(
    series: &PriceSeries,
    registry: &[Event],
    config: &AnalysisConfig,
) -> Diagnostics {
    let prices: Vec<f64> = series.points().iter().map(|p| p.price).collect();
    let adf = stationarity::adf_test(&prices, None);

    let event_tests = registry
        .iter()
        .map(|event| {
            let window = series.window(
                event.date - Duration::days(config.days_before),
                event.date + Duration::days(config.days_after),
            );
            // Same inclusive-inclusive split as the return computation.
            let before_end = window.partition_point(|p| p.date <= event.date);
            let after_start = window.partition_point(|p| p.date < event.date);
            let before = stats::simple_returns(&window[..before_end]);
            let after = stats::simple_returns(&window[after_start..]);
            (event.label.to_string(), stats::welch_t_test(&before, &after))
        })
        .collect();

    Diagnostics { adf, event_tests }
}
