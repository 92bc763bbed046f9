//! Heatmap presentation helpers.
//!
//! [`HeatmapColorMapper`] turns a utilization rate into a color band and a
//! fill ratio. [`HeatmapCells`] looks cells up in the finalized occupancy maps
//! and builds display text and tooltips through a [`Translator`]. The current
//! day and hour come from a [`Clock`].

pub mod cells;
pub mod clock;
pub mod color;

pub use cells::{CellData, HeatmapCells, ParamValue, PlainTranslator, Translator};
pub use clock::{Clock, FixedClock, SystemClock};
pub use color::{HeatmapColorMapper, LegendItem, UtilizationColor};
