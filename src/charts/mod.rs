//! SVG chart rendering via Plotters.
//!
//! Three charts per run:
//! - the price series with event anchors as vertical lines
//! - horizon percentage changes per event (grouped bars)
//! - cumulative returns before/after each event (paired bars)
//!
//! Absent metrics simply draw no bar; a chart with no drawable data is
//! skipped entirely rather than emitted empty.

use std::fs::create_dir_all;
use std::path::{Path, PathBuf};

use plotters::prelude::*;

use crate::domain::{EventImpact, Horizon, PriceSeries};
use crate::error::AppError;

const CHART_SIZE: (u32, u32) = (1024, 576);

/// Render all charts into `dir`, returning the files written.
pub fn render_charts(
    dir: &Path,
    series: &PriceSeries,
    impacts: &[EventImpact],
) -> Result<Vec<PathBuf>, AppError> {
    create_dir_all(dir).map_err(|e| {
        AppError::usage(format!("Failed to create charts dir '{}': {e}", dir.display()))
    })?;

    let mut written = Vec::new();

    if series.len() >= 2 {
        let path = dir.join("price_series.svg");
        price_chart(&path, series, impacts)?;
        written.push(path);
    }

    if impacts.iter().any(|r| Horizon::ALL.iter().any(|&h| r.change(h).is_some())) {
        let path = dir.join("horizon_changes.svg");
        horizon_chart(&path, impacts)?;
        written.push(path);
    }

    if impacts
        .iter()
        .any(|r| r.cum_return_before.is_some() || r.cum_return_after.is_some())
    {
        let path = dir.join("cumulative_returns.svg");
        cumulative_chart(&path, impacts)?;
        written.push(path);
    }

    Ok(written)
}

fn price_chart(path: &Path, series: &PriceSeries, impacts: &[EventImpact]) -> Result<(), AppError> {
    let root = SVGBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(chart_err)?;

    let points = series.points();
    let (d0, d1) = (series.first_date(), series.last_date());
    let (mut y0, mut y1) = (f64::INFINITY, f64::NEG_INFINITY);
    for p in points {
        y0 = y0.min(p.price);
        y1 = y1.max(p.price);
    }
    let (y0, y1) = pad(y0, y1);

    let mut chart = ChartBuilder::on(&root)
        .margin(10)
        .caption("Oil price with event anchors", ("sans-serif", 22))
        .x_label_area_size(32)
        .y_label_area_size(56)
        .build_cartesian_2d(d0..d1, y0..y1)
        .map_err(chart_err)?;

    chart
        .configure_mesh()
        .x_labels(8)
        .y_labels(6)
        .x_label_formatter(&|d| d.format("%Y-%m").to_string())
        .draw()
        .map_err(chart_err)?;

    chart
        .draw_series(LineSeries::new(points.iter().map(|p| (p.date, p.price)), &BLUE))
        .map_err(chart_err)?;

    for row in impacts {
        if row.date < d0 || row.date > d1 {
            continue;
        }
        chart
            .draw_series(LineSeries::new(
                [(row.date, y0), (row.date, y1)],
                RED.mix(0.6),
            ))
            .map_err(chart_err)?;
    }

    root.present().map_err(chart_err)?;
    Ok(())
}

fn horizon_chart(path: &Path, impacts: &[EventImpact]) -> Result<(), AppError> {
    let root = SVGBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(chart_err)?;

    let values: Vec<f64> = impacts
        .iter()
        .flat_map(|r| Horizon::ALL.iter().filter_map(|&h| r.change(h)).collect::<Vec<_>>())
        .collect();
    let (y0, y1) = value_range(&values);

    let n = impacts.len() as f64;
    let mut chart = ChartBuilder::on(&root)
        .margin(10)
        .caption("Price change by horizon (%)", ("sans-serif", 22))
        .x_label_area_size(90)
        .y_label_area_size(56)
        .build_cartesian_2d(-0.5f64..(n - 0.5), y0..y1)
        .map_err(chart_err)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(impacts.len())
        .x_label_formatter(&|x| event_label(impacts, *x))
        .draw()
        .map_err(chart_err)?;

    let styles = [BLUE, RED, GREEN];
    for (slot, &horizon) in Horizon::ALL.iter().enumerate() {
        let color = styles[slot];
        let bars = impacts.iter().enumerate().filter_map(move |(i, row)| {
            let value = row.change(horizon)?;
            let x0 = i as f64 - 0.36 + slot as f64 * 0.24;
            Some(Rectangle::new([(x0, 0.0), (x0 + 0.2, value)], color.filled()))
        });
        chart
            .draw_series(bars)
            .map_err(chart_err)?
            .label(horizon.label())
            .legend(move |(x, y)| Rectangle::new([(x, y - 4), (x + 10, y + 4)], color.filled()));
    }

    chart
        .configure_series_labels()
        .border_style(&BLACK)
        .background_style(&WHITE.mix(0.8))
        .draw()
        .map_err(chart_err)?;

    root.present().map_err(chart_err)?;
    Ok(())
}

fn cumulative_chart(path: &Path, impacts: &[EventImpact]) -> Result<(), AppError> {
    let root = SVGBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(chart_err)?;

    let values: Vec<f64> = impacts
        .iter()
        .flat_map(|r| [r.cum_return_before, r.cum_return_after])
        .flatten()
        .collect();
    let (y0, y1) = value_range(&values);

    let n = impacts.len() as f64;
    let mut chart = ChartBuilder::on(&root)
        .margin(10)
        .caption("Cumulative return around events", ("sans-serif", 22))
        .x_label_area_size(90)
        .y_label_area_size(56)
        .build_cartesian_2d(-0.5f64..(n - 0.5), y0..y1)
        .map_err(chart_err)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(impacts.len())
        .x_label_formatter(&|x| event_label(impacts, *x))
        .draw()
        .map_err(chart_err)?;

    let halves: [(&str, fn(&EventImpact) -> Option<f64>, RGBColor); 2] = [
        ("before", |r| r.cum_return_before, BLUE),
        ("after", |r| r.cum_return_after, RED),
    ];
    for (slot, (label, value_of, color)) in halves.into_iter().enumerate() {
        let bars = impacts.iter().enumerate().filter_map(move |(i, row)| {
            let value = value_of(row)?;
            let x0 = i as f64 - 0.3 + slot as f64 * 0.32;
            Some(Rectangle::new([(x0, 0.0), (x0 + 0.28, value)], color.filled()))
        });
        chart
            .draw_series(bars)
            .map_err(chart_err)?
            .label(label)
            .legend(move |(x, y)| Rectangle::new([(x, y - 4), (x + 10, y + 4)], color.filled()));
    }

    chart
        .configure_series_labels()
        .border_style(&BLACK)
        .background_style(&WHITE.mix(0.8))
        .draw()
        .map_err(chart_err)?;

    root.present().map_err(chart_err)?;
    Ok(())
}

fn event_label(impacts: &[EventImpact], x: f64) -> String {
    let i = x.round();
    if i < 0.0 || (x - i).abs() > 0.01 {
        return String::new();
    }
    impacts
        .get(i as usize)
        .map(|r| {
            let label: String = r.label.chars().take(14).collect();
            label
        })
        .unwrap_or_default()
}

fn value_range(values: &[f64]) -> (f64, f64) {
    let mut lo = 0.0f64;
    let mut hi = 0.0f64;
    for &v in values {
        lo = lo.min(v);
        hi = hi.max(v);
    }
    pad(lo, hi)
}

fn pad(lo: f64, hi: f64) -> (f64, f64) {
    let span = (hi - lo).abs();
    let pad = if span < 1e-9 { 1.0 } else { span * 0.08 };
    (lo - pad, hi + pad)
}

fn chart_err<E: std::fmt::Display>(e: E) -> AppError {
    AppError::render(format!("Failed to render chart: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_range_always_spans_zero_with_padding() {
        let (lo, hi) = value_range(&[5.0, 12.0]);
        assert!(lo < 0.0);
        assert!(hi > 12.0);

        let (lo, hi) = value_range(&[-4.0]);
        assert!(lo < -4.0);
        assert!(hi > 0.0);
    }

    #[test]
    fn event_labels_only_appear_on_integer_ticks() {
        let impacts = vec![EventImpact {
            label: "Start-Gulf War".to_string(),
            date: chrono::NaiveDate::from_ymd_opt(1990, 8, 2).unwrap(),
            change_1m: Some(1.0),
            change_3m: None,
            change_6m: None,
            cum_return_before: None,
            cum_return_after: None,
        }];
        assert_eq!(event_label(&impacts, 0.0), "Start-Gulf War");
        assert_eq!(event_label(&impacts, 0.4), "");
        assert_eq!(event_label(&impacts, 5.0), "");
    }
}
