pub mod aggregation;
pub mod config;
pub mod dates;
pub mod fetch;
pub mod heatmap;
pub mod output;
pub mod parser;

use anyhow::{Result, bail};

use crate::aggregation::{AggregatedOccupancy, aggregate};
use crate::parser::parse_occupancy_csv;

/// Parses occupancy CSV text and aggregates it against `maximum_capacity`.
///
/// # Errors
///
/// Fails when `maximum_capacity` is 0 or the CSV is malformed.
pub fn process_occupancy_csv(text: &str, maximum_capacity: u32) -> Result<AggregatedOccupancy> {
    if maximum_capacity == 0 {
        bail!("maximum capacity must be positive");
    }

    let readings = parse_occupancy_csv(text)?;
    Ok(aggregate(&readings, maximum_capacity))
}
