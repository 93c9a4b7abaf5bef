//! Grid model: the ordered unit descriptors for a whole lifespan.
//!
//! [`build`] is pure: everything it depends on (birth date, today, granularity,
//! toggles, phase and event tables) is passed in. Each call returns a fresh,
//! independently owned [`GridModel`]; nothing is cached between calls.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use crate::date_math::{self, UnitRange, ViewGranularity};
use crate::events::{self, HistoricalEvent};
use crate::phase::{self, LifePhase};

/// Lifespan used when none is configured.
pub const FIXED_LIFESPAN_YEARS: u32 = 80;

/// Inputs sampled from the UI layer for one render cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridRequest {
    pub birth_date: Option<NaiveDate>,
    pub today: NaiveDate,
    pub granularity: ViewGranularity,
    pub lifespan_years: u32,
    pub show_phases: bool,
    pub show_events: bool,
}

/// One cell of the grid.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnitDescriptor {
    pub index: u32,
    pub range_start: NaiveDate,
    /// Exclusive.
    pub range_end: NaiveDate,
    pub is_past: bool,
    pub phase: Option<LifePhase>,
    pub matched_events: Vec<HistoricalEvent>,
}

impl UnitDescriptor {
    pub fn range(&self) -> UnitRange {
        UnitRange {
            start: self.range_start,
            end: self.range_end,
        }
    }
}

/// Descriptor sequence plus the flags it was built with.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridModel {
    pub granularity: ViewGranularity,
    pub lifespan_years: u32,
    pub show_phases: bool,
    pub show_events: bool,
    pub birth_date: Option<NaiveDate>,
    pub units_passed: u32,
    pub units: Vec<UnitDescriptor>,
}

/// A run of consecutive units sharing the same phase.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseGroup<'a> {
    pub phase: Option<&'a LifePhase>,
    pub units: &'a [UnitDescriptor],
}

impl GridModel {
    pub fn total_units(&self) -> usize {
        self.units.len()
    }

    /// Splits the units into runs at every phase change.
    ///
    /// Without phases shown this is a single group holding every unit.
    pub fn phase_groups(&self) -> Vec<PhaseGroup<'_>> {
        let mut groups = Vec::new();
        let mut start = 0;
        for i in 1..=self.units.len() {
            if i == self.units.len() || self.units[i].phase != self.units[start].phase {
                groups.push(PhaseGroup {
                    phase: self.units[start].phase.as_ref(),
                    units: &self.units[start..i],
                });
                start = i;
            }
        }
        groups
    }
}

/// Builds the descriptor for every unit of the lifespan.
///
/// Without a birth date units still cover the lifespan (anchored on `today`),
/// but none is past and no events are matched.
pub fn build(
    request: &GridRequest,
    phases: &[LifePhase],
    events: &[HistoricalEvent],
) -> GridModel {
    let granularity = request.granularity;
    let total = request
        .lifespan_years
        .saturating_mul(granularity.units_per_year());
    let units_passed = request
        .birth_date
        .map(|birth| date_math::units_elapsed(granularity, birth, request.today))
        .unwrap_or(0);
    let anchor = request.birth_date.unwrap_or(request.today);

    let units = (0..total)
        .map(|index| {
            let range = date_math::unit_range(granularity, anchor, index);
            let phase = if request.show_phases {
                phase::classify(granularity.age_at(index), phases).copied()
            } else {
                None
            };
            let matched_events = if request.show_events && request.birth_date.is_some() {
                events::find_events(range, events)
            } else {
                Vec::new()
            };
            UnitDescriptor {
                index,
                range_start: range.start,
                range_end: range.end,
                is_past: index < units_passed,
                phase,
                matched_events,
            }
        })
        .collect::<Vec<_>>();

    debug!(
        ?granularity,
        total,
        units_passed,
        with_birth_date = request.birth_date.is_some(),
        "built grid model"
    );

    GridModel {
        granularity,
        lifespan_years: request.lifespan_years,
        show_phases: request.show_phases,
        show_events: request.show_events,
        birth_date: request.birth_date,
        units_passed,
        units,
    }
}
