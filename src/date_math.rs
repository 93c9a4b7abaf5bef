//! date_math.rs
//!
//! Calendar arithmetic for the life grid: how many whole units (weeks, months,
//! years) lie between two dates, which calendar range a given unit index
//! covers, and a human-readable age in the format:
//!     "X years, Y months, Z days"
//!
//! Month and year units snap to calendar boundaries (the 1st of a month, Jan 1)
//! instead of being anchored on the exact birth day. Week units are anchored on
//! the birth day itself.
//!
//! Date arithmetic that would leave chrono's representable range saturates at
//! `NaiveDate::MAX`, so every function here is total.

use std::fmt;

use chrono::{Datelike, Months, NaiveDate, TimeDelta};
use serde::Serialize;

const DAYS_IN_WEEK: i64 = 7;

/// Unit granularity of the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ViewGranularity {
    Weeks,
    Months,
    Years,
}

impl ViewGranularity {
    /// 52 for weeks, 12 for months, 1 for years.
    pub fn units_per_year(self) -> u32 {
        match self {
            ViewGranularity::Weeks => 52,
            ViewGranularity::Months => 12,
            ViewGranularity::Years => 1,
        }
    }

    /// Singular label of one unit, e.g. "Week".
    pub fn unit_label(self) -> &'static str {
        match self {
            ViewGranularity::Weeks => "Week",
            ViewGranularity::Months => "Month",
            ViewGranularity::Years => "Year",
        }
    }

    /// Age in years at the start of unit `index`.
    pub fn age_at(self, index: u32) -> f64 {
        match self {
            ViewGranularity::Years => f64::from(index),
            _ => f64::from(index) / f64::from(self.units_per_year()),
        }
    }
}

/// Half-open calendar range `[start, end)` covered by one unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UnitRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl UnitRange {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date < self.end
    }
}

/// Whole weeks between `start` and `end`, floored.
///
/// Negative when `end` precedes `start`; callers treat that as zero elapsed.
pub fn weeks_elapsed(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days().div_euclid(DAYS_IN_WEEK)
}

/// Calendar-month difference, ignoring the day of month. Clamped to 0.
pub fn months_elapsed(start: NaiveDate, end: NaiveDate) -> u32 {
    let months = i64::from(end.year() - start.year()) * 12 + i64::from(end.month())
        - i64::from(start.month());
    u32::try_from(months.max(0)).unwrap_or(u32::MAX)
}

/// Birthday-aware calendar-year difference. Clamped to 0.
pub fn years_elapsed(start: NaiveDate, end: NaiveDate) -> u32 {
    let mut years = end.year() - start.year();
    if (end.month(), end.day()) < (start.month(), start.day()) {
        years -= 1;
    }
    u32::try_from(years.max(0)).unwrap_or(0)
}

/// Elapsed whole units for `granularity`, with negative counts clamped to 0.
pub fn units_elapsed(granularity: ViewGranularity, start: NaiveDate, end: NaiveDate) -> u32 {
    match granularity {
        ViewGranularity::Weeks => {
            u32::try_from(weeks_elapsed(start, end).max(0)).unwrap_or(u32::MAX)
        }
        ViewGranularity::Months => months_elapsed(start, end),
        ViewGranularity::Years => years_elapsed(start, end),
    }
}

/// Calendar range covered by unit `index` of a grid starting at `birth`.
pub fn unit_range(granularity: ViewGranularity, birth: NaiveDate, index: u32) -> UnitRange {
    match granularity {
        ViewGranularity::Weeks => {
            let start = add_days(birth, i64::from(index) * DAYS_IN_WEEK);
            UnitRange {
                start,
                end: add_days(start, DAYS_IN_WEEK),
            }
        }
        ViewGranularity::Months => {
            let first = first_of_month(birth.year(), birth.month());
            let start = add_months(first, index);
            UnitRange {
                start,
                end: add_months(start, 1),
            }
        }
        ViewGranularity::Years => {
            let year = i64::from(birth.year()) + i64::from(index);
            UnitRange {
                start: jan_first(year),
                end: jan_first(year + 1),
            }
        }
    }
}

fn add_days(date: NaiveDate, days: i64) -> NaiveDate {
    TimeDelta::try_days(days)
        .and_then(|delta| date.checked_add_signed(delta))
        .unwrap_or(NaiveDate::MAX)
}

fn add_months(date: NaiveDate, months: u32) -> NaiveDate {
    date.checked_add_months(Months::new(months))
        .unwrap_or(NaiveDate::MAX)
}

fn first_of_month(year: i32, month: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(NaiveDate::MAX)
}

fn jan_first(year: i64) -> NaiveDate {
    i32::try_from(year)
        .ok()
        .and_then(|y| NaiveDate::from_ymd_opt(y, 1, 1))
        .unwrap_or(NaiveDate::MAX)
}

/// Age split into calendar years, months and days.
///
/// Chrono does not provide a year/month/day diff, so it is built from whole
/// months: step the birth date forward by as many months as fit before
/// `today` (chrono clamps the day to the month's length, so Jan 31 plus one
/// month is Feb 28/29), then count the remaining days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AgeBreakdown {
    pub years: u32,
    pub months: u32,
    pub days: u32,
}

impl AgeBreakdown {
    pub fn between(birthdate: NaiveDate, today: NaiveDate) -> Self {
        let mut whole_months = months_elapsed(birthdate, today);
        if whole_months > 0 && add_months(birthdate, whole_months) > today {
            whole_months -= 1;
        }

        let anchor = add_months(birthdate, whole_months);
        let days = (today - anchor).num_days().max(0);

        Self {
            years: whole_months / 12,
            months: whole_months % 12,
            days: u32::try_from(days).unwrap_or(u32::MAX),
        }
    }
}

impl fmt::Display for AgeBreakdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} year{}, {} month{}, {} day{}",
            self.years,
            plural(self.years),
            self.months,
            plural(self.months),
            self.days,
            plural(self.days)
        )
    }
}

/// Returns a human age as a string
pub fn age_string(birthdate: NaiveDate, today: NaiveDate) -> String {
    AgeBreakdown::between(birthdate, today).to_string()
}

fn plural(n: u32) -> &'static str {
    if n == 1 { "" } else { "s" }
}
