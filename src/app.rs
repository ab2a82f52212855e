//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - initializes logging
//! - runs the analysis pipeline
//! - prints reports/plots
//! - writes optional exports and charts

use std::path::{Path, PathBuf};

use clap::Parser;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::EnvFilter;

use crate::analysis::eda;
use crate::cli::{AnalyzeArgs, Cli, Command, EdaArgs, PlotArgs};
use crate::domain::{AnalysisConfig, ImpactFile, PriceSeries};
use crate::error::AppError;
use crate::report;

pub mod pipeline;

/// Entry point for the `oilev` binary.
pub fn run() -> Result<(), AppError> {
    // We want a bare `oilev` (and `oilev -i prices.csv`) to behave like
    // `oilev analyze ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of
    // the argv list before parsing. This preserves a clean clap structure
    // while retaining the convenient default.
    let argv = rewrite_args(std::env::args().collect());
    let cli = Cli::parse_from(argv);

    let _log_guard = init_logging(cli.log_dir.as_deref())?;

    match cli.command {
        Command::Analyze(args) => handle_analyze(args),
        Command::Eda(args) => handle_eda(args),
        Command::Plot(args) => handle_plot(args),
    }
}

fn handle_analyze(args: AnalyzeArgs) -> Result<(), AppError> {
    let config = analysis_config_from_args(&args)?;
    let run = pipeline::run_analysis(&config)?;

    let source = config.csv_path.display().to_string();
    println!(
        "{}",
        report::format_run_summary(&source, &run.eda, &run.clean, &run.series)
    );
    println!("{}", report::format_impact_table(&run.impacts));

    if let Some(diag) = &run.diagnostics {
        println!("{}", report::format_diagnostics(&diag.adf, &diag.event_tests));
    }

    if config.plot {
        let anchors: Vec<chrono::NaiveDate> = run.impacts.iter().map(|r| r.date).collect();
        println!(
            "{}",
            crate::plot::render_price_plot(
                &run.series,
                &anchors,
                config.plot_width,
                config.plot_height
            )
        );
    }

    // Optional exports.
    if let Some(path) = &config.export_csv {
        crate::io::export::write_impact_csv(path, &run.impacts)?;
        info!("wrote impact CSV to {}", path.display());
    }
    if let Some(path) = &config.export_json {
        let table = ImpactFile {
            tool: "oilev".to_string(),
            source,
            days_before: config.days_before,
            days_after: config.days_after,
            rows: run.impacts.clone(),
        };
        crate::io::table::write_impact_json(path, &table)?;
        info!("wrote impact JSON to {}", path.display());
    }
    if let Some(dir) = &config.charts_dir {
        for path in crate::charts::render_charts(dir, &run.series, &run.impacts)? {
            info!("wrote chart {}", path.display());
        }
    }

    Ok(())
}

fn handle_eda(args: EdaArgs) -> Result<(), AppError> {
    let input = resolve_input(args.input)?;
    let mut dataset = crate::io::ingest::load_dataset(&input)?;

    let summary = eda::summarize(&dataset);
    println!("{}", report::format_eda_summary(&summary));

    if let Some(path) = &args.save_cleaned {
        let clean = eda::clean(&mut dataset, args.clean);
        info!(
            "cleaning: removed {} duplicates, filled {}, dropped {}",
            clean.duplicates_removed, clean.filled, clean.dropped
        );
        crate::io::export::write_series_csv(path, &dataset)?;
        info!("wrote cleaned data to {}", path.display());
    }

    Ok(())
}

fn handle_plot(args: PlotArgs) -> Result<(), AppError> {
    let table = crate::io::table::read_impact_json(&args.table)?;

    let input = match args.input {
        Some(path) => path,
        None => PathBuf::from(&table.source),
    };
    let mut dataset = crate::io::ingest::load_dataset(&input)?;
    eda::clean(&mut dataset, args.clean);
    let series = PriceSeries::from_dataset(&dataset)?;

    for path in crate::charts::render_charts(&args.charts_dir, &series, &table.rows)? {
        println!("wrote {}", path.display());
    }

    Ok(())
}

pub fn analysis_config_from_args(args: &AnalyzeArgs) -> Result<AnalysisConfig, AppError> {
    if args.days_before < 0 || args.days_after < 0 {
        return Err(AppError::usage(
            "--days-before and --days-after must be non-negative.",
        ));
    }

    Ok(AnalysisConfig {
        csv_path: resolve_input(args.input.clone())?,
        clean: args.clean,
        days_before: args.days_before,
        days_after: args.days_after,
        plot: args.plot && !args.no_plot,
        plot_width: args.width,
        plot_height: args.height,
        export_csv: args.export.clone(),
        export_json: args.export_json.clone(),
        charts_dir: args.charts_dir.clone(),
        diagnostics: args.diagnostics,
    })
}

fn resolve_input(input: Option<PathBuf>) -> Result<PathBuf, AppError> {
    if let Some(path) = input {
        return Ok(path);
    }
    dotenvy::dotenv().ok();
    std::env::var("OIL_PRICES_CSV")
        .map(PathBuf::from)
        .map_err(|_| {
            AppError::usage(
                "No input CSV: pass --input or set OIL_PRICES_CSV in the environment (.env).",
            )
        })
}

/// Console logging at `info` unless `RUST_LOG` says otherwise; optionally
/// tees into `<dir>/analysis.log`. The returned guard must stay alive for
/// the file writer to flush.
fn init_logging(log_dir: Option<&Path>) -> Result<Option<WorkerGuard>, AppError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir).map_err(|e| {
                AppError::usage(format!("Failed to create log dir '{}': {e}", dir.display()))
            })?;
            let (file_writer, guard) =
                tracing_appender::non_blocking(tracing_appender::rolling::never(
                    dir,
                    "analysis.log",
                ));
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(file_writer.and(std::io::stderr))
                .with_ansi(false)
                .init();
            Ok(Some(guard))
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
            Ok(None)
        }
    }
}

/// Rewrite argv so `oilev` defaults to `oilev analyze`.
///
/// Rules:
/// - `oilev`                     -> `oilev analyze`
/// - `oilev -i prices.csv ...`   -> `oilev analyze -i prices.csv ...`
/// - `oilev --help/--version/-h` -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("analyze".to_string());
        return argv;
    };

    let is_top_level_help_or_version =
        matches!(arg1.as_str(), "-h" | "--help" | "-V" | "--version" | "help");
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "analyze" | "eda" | "plot");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "analyze flags".
    if arg1.starts_with('-') {
        argv.insert(1, "analyze".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_defaults_to_analyze() {
        assert_eq!(
            rewrite_args(argv(&["oilev"])),
            argv(&["oilev", "analyze"])
        );
        assert_eq!(
            rewrite_args(argv(&["oilev", "-i", "prices.csv"])),
            argv(&["oilev", "analyze", "-i", "prices.csv"])
        );
    }

    #[test]
    fn help_version_and_subcommands_pass_through() {
        assert_eq!(rewrite_args(argv(&["oilev", "--help"])), argv(&["oilev", "--help"]));
        assert_eq!(
            rewrite_args(argv(&["oilev", "eda", "-i", "x.csv"])),
            argv(&["oilev", "eda", "-i", "x.csv"])
        );
    }

    #[test]
    fn config_rejects_negative_windows() {
        let args = AnalyzeArgs {
            input: Some(PathBuf::from("prices.csv")),
            clean: crate::domain::CleanMethod::Interpolate,
            days_before: -1,
            days_after: 180,
            plot: true,
            no_plot: false,
            width: 100,
            height: 25,
            export: None,
            export_json: None,
            charts_dir: None,
            diagnostics: false,
        };
        assert!(analysis_config_from_args(&args).is_err());
    }

    #[test]
    fn no_plot_overrides_plot_default() {
        let args = AnalyzeArgs {
            input: Some(PathBuf::from("prices.csv")),
            clean: crate::domain::CleanMethod::Interpolate,
            days_before: 180,
            days_after: 180,
            plot: true,
            no_plot: true,
            width: 100,
            height: 25,
            export: None,
            export_json: None,
            charts_dir: None,
            diagnostics: false,
        };
        let config = analysis_config_from_args(&args).unwrap();
        assert!(!config.plot);
    }
}
