//! Input validation done before the grid is built.
//!
//! The grid builder trusts its inputs; this is where a birth date is parsed and
//! checked against today, and where a lifespan override is bounded.

use std::ops::RangeInclusive;

use chrono::NaiveDate;
use thiserror::Error;
use tracing::warn;

use crate::date_math::ViewGranularity;
use crate::grid::{FIXED_LIFESPAN_YEARS, GridRequest};

pub const LIFESPAN_BOUNDS: RangeInclusive<u32> = 1..=120;

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid date `{0}`: expected YYYY-MM-DD")]
    InvalidDate(String),

    #[error("Birth date {birth} cannot be in the future (today is {today})")]
    FutureBirthDate { birth: NaiveDate, today: NaiveDate },
}

pub fn parse_date(input: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(input.trim(), DATE_FORMAT)
        .map_err(|_| ValidationError::InvalidDate(input.to_string()))
}

/// Parses an optional birth date. Blank input counts as absent.
pub fn parse_birth_date(
    input: Option<&str>,
    today: NaiveDate,
) -> Result<Option<NaiveDate>, ValidationError> {
    let Some(raw) = input.filter(|s| !s.trim().is_empty()) else {
        return Ok(None);
    };
    let birth = parse_date(raw)?;
    if birth > today {
        return Err(ValidationError::FutureBirthDate { birth, today });
    }
    Ok(Some(birth))
}

/// Applies a lifespan override, falling back to the fixed lifespan when it is
/// missing or out of bounds.
pub fn resolve_lifespan(requested: Option<u32>) -> u32 {
    match requested {
        Some(years) if LIFESPAN_BOUNDS.contains(&years) => years,
        Some(years) => {
            warn!(
                requested = years,
                fallback = FIXED_LIFESPAN_YEARS,
                "lifespan must be between {} and {} years; using default",
                LIFESPAN_BOUNDS.start(),
                LIFESPAN_BOUNDS.end()
            );
            FIXED_LIFESPAN_YEARS
        }
        None => FIXED_LIFESPAN_YEARS,
    }
}

/// Raw control values sampled from the caller.
#[derive(Debug, Clone, Default)]
pub struct GridInputs {
    pub birth_date: Option<String>,
    pub lifespan_years: Option<u32>,
    pub granularity: Option<ViewGranularity>,
    pub show_phases: bool,
    pub show_events: bool,
}

impl GridInputs {
    /// Validates the inputs into a request for `today`.
    pub fn into_request(self, today: NaiveDate) -> Result<GridRequest, ValidationError> {
        Ok(GridRequest {
            birth_date: parse_birth_date(self.birth_date.as_deref(), today)?,
            today,
            granularity: self.granularity.unwrap_or(ViewGranularity::Weeks),
            lifespan_years: resolve_lifespan(self.lifespan_years),
            show_phases: self.show_phases,
            show_events: self.show_events,
        })
    }
}
