//! Dated historical events and matching them against unit ranges.
//!
//! The built-in table is small and fixed; [`find_events`] keeps every event
//! whose date falls inside a half-open [`UnitRange`].

use chrono::NaiveDate;
use serde::Serialize;

use crate::date_math::UnitRange;

/// A dated historical event shown as hover detail on the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct HistoricalEvent {
    pub date: NaiveDate,
    pub title: &'static str,
}

impl HistoricalEvent {
    /// Long US-English date, e.g. "July 20, 1969".
    pub fn long_date(&self) -> String {
        self.date.format("%B %-d, %Y").to_string()
    }
}

const EVENT_TABLE: [(i32, u32, u32, &str); 7] = [
    (1969, 7, 20, "Moon Landing"),
    (1989, 11, 9, "Fall of Berlin Wall"),
    (1991, 8, 6, "World Wide Web"),
    (2001, 9, 11, "9/11 Attacks"),
    (2008, 9, 15, "Global Financial Crisis"),
    (2020, 3, 11, "COVID-19 Pandemic"),
    (2022, 2, 24, "Russia Invades Ukraine"),
];

/// The fixed event dataset.
pub fn default_events() -> Vec<HistoricalEvent> {
    EVENT_TABLE
        .iter()
        .filter_map(|&(y, m, d, title)| {
            NaiveDate::from_ymd_opt(y, m, d).map(|date| HistoricalEvent { date, title })
        })
        .collect()
}

/// Events dated inside `range`, in the order they appear in `events`.
///
/// Linear scan; the dataset is small and fixed.
pub fn find_events(range: UnitRange, events: &[HistoricalEvent]) -> Vec<HistoricalEvent> {
    events
        .iter()
        .filter(|event| range.contains(event.date))
        .copied()
        .collect()
}
