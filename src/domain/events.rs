//! The fixed registry of significant geopolitical events.
//!
//! The registry is process-wide immutable configuration: defined once,
//! read-only, never mutated. Order matters — the output table follows it.

use chrono::NaiveDate;

/// An immutable (date, label) pair from the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Event {
    pub date: NaiveDate,
    pub label: &'static str,
}

/// Registry entries as calendar components (year, month, day, label).
const SIGNIFICANT_EVENTS: [(i32, u32, u32, &str); 10] = [
    (1990, 8, 2, "Start-Gulf War"),
    (1991, 2, 28, "End-Gulf War"),
    (2001, 9, 11, "9/11 Terrorist Attacks"),
    (2003, 3, 20, "Invasion of Iraq"),
    (2005, 7, 7, "London Terrorist Attack"),
    (2010, 12, 18, "Start-Arab Spring"),
    (2011, 2, 17, "Civil War in Libya Start"),
    (2015, 11, 13, "Paris Terrorist Attacks"),
    (2019, 12, 31, "Attack on US Embassy in Iraq"),
    (2022, 2, 24, "Russian Invasion of Ukraine"),
];

/// Materialize the registry in its canonical order.
pub fn registry() -> Vec<Event> {
    SIGNIFICANT_EVENTS
        .iter()
        .map(|&(y, m, d, label)| Event {
            // The components above are literal, valid calendar dates.
            date: NaiveDate::from_ymd_opt(y, m, d).expect("registry dates are valid"),
            label,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_has_ten_events_in_date_order() {
        let events = registry();
        assert_eq!(events.len(), 10);
        assert!(events.windows(2).all(|w| w[0].date < w[1].date));
    }

    #[test]
    fn registry_spans_1990_to_2022() {
        let events = registry();
        assert_eq!(events[0].date.format("%Y-%m-%d").to_string(), "1990-08-02");
        assert_eq!(
            events[9].date.format("%Y-%m-%d").to_string(),
            "2022-02-24"
        );
        assert_eq!(events[9].label, "Russian Invasion of Ukraine");
    }
}
