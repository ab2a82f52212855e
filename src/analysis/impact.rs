//! Event-impact metrics around anchor dates.
//!
//! For each registered event this module computes:
//!
//! - percentage price changes at fixed horizons (30/90/180 calendar days),
//!   using nearest-match lookups on either side of the anchor
//! - compounded returns over the before/after halves of a configurable
//!   window around the anchor
//!
//! Every metric is an `Option`: a series that does not cover the relevant
//! dates, or a zero-price denominator, yields `None` rather than an error or
//! a non-finite number.

use chrono::{Duration, NaiveDate};
use rayon::prelude::*;

use crate::domain::{Event, EventImpact, Horizon, PricePoint, PriceSeries};

/// Percentage change from `before` to `after`.
///
/// A zero `before` price has no meaningful relative change; the metric is
/// absent instead of infinite.
pub fn percent_change(before: f64, after: f64) -> Option<f64> {
    if before == 0.0 {
        return None;
    }
    Some((after - before) / before * 100.0)
}

/// Horizon change around `anchor`: the latest price at or before
/// `anchor - horizon` versus the earliest price at or after
/// `anchor + horizon`.
pub fn horizon_change(series: &PriceSeries, anchor: NaiveDate, horizon: Horizon) -> Option<f64> {
    let offset = Duration::days(horizon.days());
    let before = series.latest_at_or_before(anchor - offset)?;
    let after = series.earliest_at_or_after(anchor + offset)?;
    percent_change(before.price, after.price)
}

/// Compounded return over a date-ordered run of observations:
/// `∏(1 + r_i) - 1` for successive simple returns `r_i`.
///
/// Needs at least two points; a zero price anywhere except the last point
/// would divide the next return by zero, so it makes the result absent.
pub fn cumulative_return(points: &[PricePoint]) -> Option<f64> {
    if points.len() < 2 {
        return None;
    }
    let mut compounded = 1.0;
    for pair in points.windows(2) {
        let prev = pair[0].price;
        if prev == 0.0 {
            return None;
        }
        compounded *= 1.0 + (pair[1].price - prev) / prev;
    }
    Some(compounded - 1.0)
}

/// Cumulative returns on each side of the anchor within
/// `[anchor - days_before, anchor + days_after]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowReturns {
    pub before: Option<f64>,
    pub after: Option<f64>,
}

/// Split the window at the anchor and compound each half.
///
/// The split is inclusive on both sides: an observation dated exactly on the
/// anchor participates in both halves.
pub fn window_returns(
    series: &PriceSeries,
    anchor: NaiveDate,
    days_before: i64,
    days_after: i64,
) -> WindowReturns {
    let window = series.window(
        anchor - Duration::days(days_before),
        anchor + Duration::days(days_after),
    );
    if window.is_empty() {
        return WindowReturns { before: None, after: None };
    }

    let split = window.partition_point(|p| p.date <= anchor);
    let before = &window[..split];
    let after_start = window.partition_point(|p| p.date < anchor);
    let after = &window[after_start..];

    WindowReturns {
        before: cumulative_return(before),
        after: cumulative_return(after),
    }
}

/// Compute the full metric row for one event.
pub fn analyze_event(
    series: &PriceSeries,
    event: &Event,
    days_before: i64,
    days_after: i64,
) -> EventImpact {
    let returns = window_returns(series, event.date, days_before, days_after);
    EventImpact {
        label: event.label.to_string(),
        date: event.date,
        change_1m: horizon_change(series, event.date, Horizon::OneMonth),
        change_3m: horizon_change(series, event.date, Horizon::ThreeMonths),
        change_6m: horizon_change(series, event.date, Horizon::SixMonths),
        cum_return_before: returns.before,
        cum_return_after: returns.after,
    }
}

/// Run the batch over every registered event, in registry order.
///
/// Each event only reads the shared series, so the rows are computed in
/// parallel; the indexed collect keeps registry order.
pub fn analyze_events(
    series: &PriceSeries,
    events: &[Event],
    days_before: i64,
    days_after: i64,
) -> Vec<EventImpact> {
    events
        .par_iter()
        .map(|event| analyze_event(series, event, days_before, days_after))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::events;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn p(y: i32, m: u32, day: u32, price: f64) -> PricePoint {
        PricePoint { date: d(y, m, day), price }
    }

    fn sept11_series() -> PriceSeries {
        PriceSeries::from_points(vec![
            p(2001, 6, 1, 20.0),
            p(2001, 8, 15, 25.0),
            p(2001, 10, 15, 30.0),
            p(2001, 12, 15, 28.0),
        ])
        .unwrap()
    }

    #[test]
    fn percent_change_is_literal_arithmetic() {
        assert_eq!(percent_change(20.0, 30.0), Some(50.0));
        assert_eq!(percent_change(25.0, 30.0), Some(20.0));
        assert_eq!(percent_change(40.0, 30.0), Some(-25.0));
    }

    #[test]
    fn percent_change_guards_zero_denominator() {
        assert_eq!(percent_change(0.0, 30.0), None);
    }

    #[test]
    fn horizon_change_uses_nearest_neighbors_on_both_sides() {
        let s = sept11_series();
        let anchor = d(2001, 9, 11);

        // 1M: latest <= 2001-08-12 is 2001-06-01 (20), earliest >= 2001-10-11
        // is 2001-10-15 (30).
        assert_eq!(horizon_change(&s, anchor, Horizon::OneMonth), Some(50.0));

        // 3M: latest <= 2001-06-13 is 2001-06-01 (20), earliest >= 2001-12-10
        // is 2001-12-15 (28).
        assert_eq!(horizon_change(&s, anchor, Horizon::ThreeMonths), Some(40.0));
    }

    #[test]
    fn horizon_change_is_absent_when_no_before_neighbor_exists() {
        let s = sept11_series();
        // 6M: no series date on or before 2001-03-15.
        assert_eq!(horizon_change(&s, d(2001, 9, 11), Horizon::SixMonths), None);
    }

    #[test]
    fn horizon_change_is_absent_not_infinite_on_zero_before_price() {
        let s = PriceSeries::from_points(vec![
            p(2001, 1, 1, 0.0),
            p(2001, 12, 31, 30.0),
        ])
        .unwrap();
        assert_eq!(horizon_change(&s, d(2001, 6, 1), Horizon::OneMonth), None);
    }

    #[test]
    fn cumulative_return_of_flat_prices_is_exactly_zero() {
        let flat = vec![p(2020, 1, 1, 50.0), p(2020, 1, 2, 50.0), p(2020, 1, 3, 50.0)];
        assert_eq!(cumulative_return(&flat), Some(0.0));
    }

    #[test]
    fn cumulative_return_needs_two_points() {
        assert_eq!(cumulative_return(&[]), None);
        assert_eq!(cumulative_return(&[p(2020, 1, 1, 50.0)]), None);
    }

    #[test]
    fn cumulative_return_guards_zero_interior_price() {
        let pts = vec![p(2020, 1, 1, 10.0), p(2020, 1, 2, 0.0), p(2020, 1, 3, 5.0)];
        assert_eq!(cumulative_return(&pts), None);
    }

    #[test]
    fn window_returns_split_is_inclusive_on_both_sides() {
        let s = PriceSeries::from_points(vec![
            p(2020, 1, 1, 10.0),
            p(2020, 1, 10, 20.0),
            p(2020, 1, 20, 30.0),
        ])
        .unwrap();
        // Anchor lands exactly on an observation: it closes the before half
        // and opens the after half.
        let r = window_returns(&s, d(2020, 1, 10), 30, 30);
        assert_eq!(r.before, Some(1.0));
        assert_eq!(r.after, Some(0.5));
    }

    #[test]
    fn window_returns_absent_when_window_misses_the_series() {
        let s = sept11_series();
        let r = window_returns(&s, d(2010, 6, 1), 180, 180);
        assert_eq!(r.before, None);
        assert_eq!(r.after, None);
    }

    #[test]
    fn sept11_end_to_end() {
        let s = sept11_series();
        let event = Event { date: d(2001, 9, 11), label: "9/11" };
        let impact = analyze_event(&s, &event, 180, 180);

        assert_eq!(impact.change_1m, Some(50.0));
        assert_eq!(impact.change_3m, Some(40.0));
        assert_eq!(impact.change_6m, None);

        // Before half: 20 -> 25 compounds to +25%.
        let before = impact.cum_return_before.unwrap();
        assert!((before - 0.25).abs() < 1e-12);

        // After half: 30 -> 28 compounds to -1/15.
        let after = impact.cum_return_after.unwrap();
        assert!((after - (28.0 / 30.0 - 1.0)).abs() < 1e-12);
    }

    #[test]
    fn batch_keeps_registry_order_and_covers_every_event() {
        let s = sept11_series();
        let events = events::registry();
        let impacts = analyze_events(&s, &events, 180, 180);

        assert_eq!(impacts.len(), events.len());
        for (impact, event) in impacts.iter().zip(events.iter()) {
            assert_eq!(impact.label, event.label);
            assert_eq!(impact.date, event.date);
        }
        // Events far outside the series have fully absent metrics.
        assert_eq!(impacts[0].change_1m, None);
        assert_eq!(impacts[0].cum_return_before, None);
    }

    #[test]
    fn batch_matches_sequential_computation() {
        let s = sept11_series();
        let events = events::registry();
        let parallel = analyze_events(&s, &events, 180, 180);
        let sequential: Vec<EventImpact> = events
            .iter()
            .map(|e| analyze_event(&s, e, 180, 180))
            .collect();
        assert_eq!(parallel, sequential);
    }
}
