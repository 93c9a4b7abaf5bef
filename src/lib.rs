//! Life calendar: one cell per week, month or year of a fixed lifespan.
//!
//! [`grid::build`] turns a birth date, today's date, a granularity and two
//! toggles into an ordered list of [`UnitDescriptor`]s. [`svg`] lays that list
//! out and renders it; [`export`] rasterizes the same layout to a PNG.

pub mod config;
pub mod date_math;
pub mod events;
pub mod export;
pub mod grid;
pub mod phase;
pub mod svg;
pub mod tooltip;

pub use config::{GridInputs, ValidationError};
pub use date_math::{UnitRange, ViewGranularity};
pub use events::{HistoricalEvent, default_events};
pub use export::{ImageExporter, PngExporter};
pub use grid::{FIXED_LIFESPAN_YEARS, GridModel, GridRequest, UnitDescriptor, build};
pub use phase::{DEFAULT_PHASES, LifePhase};
pub use svg::Theme;
pub use tooltip::{DataAttributeTooltips, TitleTooltips, TooltipProvider};
