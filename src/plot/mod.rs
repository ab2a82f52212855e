//! ASCII/Unicode plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - price observations: `o`
//! - event anchors: `E` (drawn at the nearest observation)

use chrono::NaiveDate;

use crate::domain::{PricePoint, PriceSeries};

/// Render the price series with event anchors marked.
///
/// Events outside the series date range are skipped.
pub fn render_price_plot(
    series: &PriceSeries,
    event_dates: &[NaiveDate],
    width: usize,
    height: usize,
) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let points = series.points();
    let d0 = series.first_date();
    let d1 = series.last_date();
    let span_days = (d1 - d0).num_days().max(1);

    let (y_min, y_max) = price_range(points);
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];

    for p in points {
        let x = map_x(p.date, d0, span_days, width);
        let y = map_y(p.price, y_min, y_max, height);
        grid[y][x] = 'o';
    }

    // Event markers overwrite observations: anchors are the whole point of
    // the chart.
    for &date in event_dates {
        if date < d0 || date > d1 {
            continue;
        }
        let anchor = series
            .earliest_at_or_after(date)
            .or_else(|| series.latest_at_or_before(date));
        if let Some(p) = anchor {
            let x = map_x(date, d0, span_days, width);
            let y = map_y(p.price, y_min, y_max, height);
            grid[y][x] = 'E';
        }
    }

    let mut out = String::new();
    out.push_str(&format!(
        "Plot: dates=[{d0}, {d1}] | price=[{y_min:.2}, {y_max:.2}]\n"
    ));
    for row in &grid {
        let line: String = row.iter().collect();
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out.push_str("legend: o observation, E event anchor\n");

    out
}

fn price_range(points: &[PricePoint]) -> (f64, f64) {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for p in points {
        min = min.min(p.price);
        max = max.max(p.price);
    }
    if !min.is_finite() || !max.is_finite() {
        return (0.0, 1.0);
    }
    (min, max)
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = if span < 1e-9 { 1.0 } else { span * frac };
    (min - pad, max + pad)
}

fn map_x(date: NaiveDate, d0: NaiveDate, span_days: i64, width: usize) -> usize {
    let u = (date - d0).num_days() as f64 / span_days as f64;
    ((u * (width - 1) as f64).round() as usize).min(width - 1)
}

fn map_y(price: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let u = (price - y_min) / (y_max - y_min);
    let row = (u * (height - 1) as f64).round() as usize;
    // Row 0 is the top of the grid.
    (height - 1).saturating_sub(row.min(height - 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn series() -> PriceSeries {
        PriceSeries::from_points(vec![
            PricePoint { date: d(2001, 6, 1), price: 20.0 },
            PricePoint { date: d(2001, 8, 15), price: 25.0 },
            PricePoint { date: d(2001, 10, 15), price: 30.0 },
        ])
        .unwrap()
    }

    /// Grid rows only (skips the header and legend lines).
    fn grid_of(out: &str) -> String {
        let lines: Vec<&str> = out.lines().collect();
        lines[1..lines.len() - 1].join("\n")
    }

    #[test]
    fn plot_marks_observations_and_events() {
        let out = render_price_plot(&series(), &[d(2001, 9, 11)], 40, 10);
        assert!(out.starts_with("Plot: dates=[2001-06-01, 2001-10-15]"));
        let grid = grid_of(&out);
        assert!(grid.contains('o'));
        assert!(grid.contains('E'));
    }

    #[test]
    fn events_outside_the_range_are_skipped() {
        let out = render_price_plot(&series(), &[d(1990, 8, 2)], 40, 10);
        assert!(!grid_of(&out).contains('E'));
    }

    #[test]
    fn plot_is_deterministic() {
        let a = render_price_plot(&series(), &[d(2001, 9, 11)], 40, 10);
        let b = render_price_plot(&series(), &[d(2001, 9, 11)], 40, 10);
        assert_eq!(a, b);
    }
}
