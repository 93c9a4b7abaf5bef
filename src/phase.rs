//! Life phases: ordered, non-overlapping age bands.
//!
//! The default table partitions `[0, ∞)`; the last band has no upper bound.

use serde::Serialize;

/// A named age band `[start_age, end_age)`. `end_age == None` is unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LifePhase {
    pub name: &'static str,
    pub start_age: u32,
    pub end_age: Option<u32>,
    /// Style class used by renderers, e.g. `phase-childhood`.
    pub class_name: &'static str,
}

pub const DEFAULT_PHASES: [LifePhase; 5] = [
    LifePhase {
        name: "Childhood",
        start_age: 0,
        end_age: Some(13),
        class_name: "phase-childhood",
    },
    LifePhase {
        name: "Adolescence",
        start_age: 13,
        end_age: Some(20),
        class_name: "phase-adolescence",
    },
    LifePhase {
        name: "Early Adulthood",
        start_age: 20,
        end_age: Some(40),
        class_name: "phase-early-adulthood",
    },
    LifePhase {
        name: "Middle Age",
        start_age: 40,
        end_age: Some(65),
        class_name: "phase-middle-age",
    },
    LifePhase {
        name: "Late Adulthood",
        start_age: 65,
        end_age: None,
        class_name: "phase-late-adulthood",
    },
];

impl LifePhase {
    pub fn contains(&self, age_years: f64) -> bool {
        let above_start = f64::from(self.start_age) <= age_years;
        match self.end_age {
            Some(end) => above_start && age_years < f64::from(end),
            None => above_start,
        }
    }

    /// "13-20 years", or "65+ years" for the unbounded band.
    pub fn duration_label(&self) -> String {
        match self.end_age {
            Some(end) => format!("{}-{} years", self.start_age, end),
            None => format!("{}+ years", self.start_age),
        }
    }
}

/// First phase in `phases` containing `age_years`; bands must be sorted ascending.
pub fn classify(age_years: f64, phases: &[LifePhase]) -> Option<&LifePhase> {
    phases.iter().find(|phase| phase.contains(age_years))
}
