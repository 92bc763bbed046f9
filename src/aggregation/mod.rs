//! Occupancy aggregation.
//!
//! This module turns a time-ordered stream of occupancy readings into
//! per-week hourly summaries and cross-week (average, weighted average,
//! median) utilization statistics in a single forward pass.

pub mod engine;
pub mod overall;
pub mod types;
pub mod utility;
pub mod weekly;

pub use engine::{OccupancyAggregator, aggregate};
pub use types::{
    AggregatedOccupancy, HourlySummary, OverallMetric, OverallOccupancyMap,
    OverallUtilizationValues, Reading, WeekId, WeeklyOccupancyMap,
};
