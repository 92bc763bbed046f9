use crate::aggregation::utility::{format_number, median, ratio};
use std::collections::HashMap;

/// Weight applied to a week's utilization rate in the weighted average.
///
/// | Rate        | Weight |
/// |-------------|--------|
/// | 0           | 0      |
/// | < 1         | 0.1    |
/// | < 10        | 0.5    |
/// | >= 10       | 1      |
pub fn weight_for(utilization_rate: f64) -> f64 {
    match utilization_rate {
        r if r == 0.0 => 0.0,
        r if r < 1.0 => 0.1,
        r if r < 10.0 => 0.5,
        _ => 1.0,
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct RunningMean {
    sum: f64,
    count: f64,
}

impl RunningMean {
    fn add(&mut self, value: f64, weight: f64) {
        self.sum += value * weight;
        self.count += weight;
    }

    fn value(&self) -> f64 {
        format_number(ratio(self.sum, self.count))
    }
}

/// Cross-week state for one (day, hour) slot.
#[derive(Debug, Clone, Default, PartialEq)]
struct OverallCell {
    average: RunningMean,
    weighted_average: RunningMean,
    weekly_items: Vec<f64>,
}


/// Running averages returned after each recorded week.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunningAverages {
    pub average_utilization_rate: f64,
    pub weighted_average_utilization_rate: f64,
}

/// Accumulates each week's finalized utilization rate per (day, hour).
#[derive(Debug, Clone, Default)]
pub struct OverallAccumulator {
    cells: HashMap<(String, u32), OverallCell>,
}

impl OverallAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the slot for `(day, hour)` if absent. Existing data is kept.
    pub fn initialize(&mut self, day: &str, hour: u32) {
        self.cells.entry((day.to_string(), hour)).or_default();
    }

    /// Adds one week's rate to the slot and returns the updated averages.
    ///
    /// Callers only pass positive rates; empty weeks do not count towards
    /// either average.
    pub fn record_week(&mut self, day: &str, hour: u32, utilization_rate: f64) -> RunningAverages {
        let cell = self.cells.entry((day.to_string(), hour)).or_default();

        cell.weekly_items.push(utilization_rate);
        cell.average.add(utilization_rate, 1.0);
        cell.weighted_average
            .add(utilization_rate, weight_for(utilization_rate));

        RunningAverages {
            average_utilization_rate: cell.average.value(),
            weighted_average_utilization_rate: cell.weighted_average.value(),
        }
    }

    /// Median of all weekly rates recorded for `(day, hour)`; 0 when none.
    pub fn compute_median(&mut self, day: &str, hour: u32) -> f64 {
        self.cells
            .get_mut(&(day.to_string(), hour))
            .map(|cell| median(&mut cell.weekly_items))
            .unwrap_or(0.0)
    }
}
