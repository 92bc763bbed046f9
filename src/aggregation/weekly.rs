use crate::aggregation::utility::{format_number, ratio};

/// Finalized statistics of one (week, day, hour) group.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeeklyStats {
    pub min_occupancy: f64,
    pub max_occupancy: f64,
    pub average_occupancy: f64,
    pub utilization_rate: f64,
    pub remaining_capacity: f64,
}

/// Running sum/count/min/max for the group currently being read.
///
/// Zero readings are "no data" ticks: they move min/max but are left out of
/// the mean. A true zero and an offline sensor are not told apart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeeklyAccumulator {
    sum: f64,
    count: u32,
    min: f64,
    max: f64,
}

impl Default for WeeklyAccumulator {
    fn default() -> Self {
        Self {
            sum: 0.0,
            count: 0,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        }
    }
}

impl WeeklyAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Discards all running totals.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    pub fn is_empty(&self) -> bool {
        self.min > self.max
    }

    pub fn update(&mut self, occupancy: u32) {
        let value = f64::from(occupancy);
        if occupancy > 0 {
            self.sum += value;
            self.count += 1;
        }
        self.min = self.min.min(value);
        self.max = self.max.max(value);
    }

    /// Converts the running totals into a summary against `maximum_capacity`.
    ///
    /// A zero capacity yields a utilization rate of 0 instead of infinity.
    /// An accumulator that never saw a reading reports min and max as 0.
    pub fn finalize(&self, maximum_capacity: u32) -> WeeklyStats {
        let capacity = f64::from(maximum_capacity);
        let average_occupancy = format_number(if self.count > 0 {
            self.sum / f64::from(self.count)
        } else {
            0.0
        });
        let utilization_rate = format_number(ratio(average_occupancy, capacity) * 100.0);

        let (min_occupancy, max_occupancy) = if self.is_empty() {
            (0.0, 0.0)
        } else {
            (self.min, self.max)
        };

        WeeklyStats {
            min_occupancy,
            max_occupancy,
            average_occupancy,
            utilization_rate,
            remaining_capacity: capacity - average_occupancy,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn accumulate(values: &[u32]) -> WeeklyAccumulator {
        let mut acc = WeeklyAccumulator::new();
        for v in values {
            acc.update(*v);
        }
        acc
    }

    #[test]
    fn test_finalize_three_readings() {
        let stats = accumulate(&[25, 30, 20]).finalize(100);

        assert_eq!(stats.min_occupancy, 20.0);
        assert_eq!(stats.max_occupancy, 30.0);
        assert_eq!(stats.average_occupancy, 25.0);
        assert_eq!(stats.utilization_rate, 25.0);
        assert_eq!(stats.remaining_capacity, 75.0);
    }

    #[test]
    fn test_zero_readings_excluded_from_mean_but_not_min_max() {
        let stats = accumulate(&[0, 20, 30]).finalize(100);

        assert_eq!(stats.min_occupancy, 0.0);
        assert_eq!(stats.max_occupancy, 30.0);
        assert_eq!(stats.average_occupancy, 25.0);
    }

    #[test]
    fn test_only_zero_readings() {
        let stats = accumulate(&[0, 0]).finalize(100);

        assert_eq!(stats.min_occupancy, 0.0);
        assert_eq!(stats.max_occupancy, 0.0);
        assert_eq!(stats.average_occupancy, 0.0);
        assert_eq!(stats.utilization_rate, 0.0);
        assert_eq!(stats.remaining_capacity, 100.0);
    }

    #[test]
    fn test_single_reading() {
        let stats = accumulate(&[42]).finalize(200);

        assert_eq!(stats.min_occupancy, 42.0);
        assert_eq!(stats.max_occupancy, 42.0);
        assert_eq!(stats.average_occupancy, 42.0);
        assert_eq!(stats.utilization_rate, 21.0);
    }

    #[test]
    fn test_low_traffic_keeps_one_decimal() {
        let stats = accumulate(&[1]).finalize(200);

        assert_eq!(stats.average_occupancy, 1.0);
        assert_eq!(stats.utilization_rate, 0.5);

        let stats = accumulate(&[1]).finalize(1000);
        assert_eq!(stats.utilization_rate, 0.1);
    }

    #[test]
    fn test_zero_capacity_short_circuits() {
        let stats = accumulate(&[10]).finalize(0);

        assert_eq!(stats.utilization_rate, 0.0);
        assert_eq!(stats.remaining_capacity, -10.0);
    }

    #[test]
    fn test_reading_order_within_group_does_not_matter() {
        let forward = accumulate(&[25, 0, 30, 20]).finalize(100);
        let backward = accumulate(&[20, 30, 0, 25]).finalize(100);
        assert_eq!(forward, backward);
    }

    #[test]
    fn test_reset_returns_to_empty_state() {
        let mut acc = accumulate(&[10, 20]);
        assert!(!acc.is_empty());

        acc.reset();
        assert!(acc.is_empty());
        assert_eq!(acc, WeeklyAccumulator::new());
    }

    #[test]
    fn test_utilization_is_monotonic_in_average() {
        let mut previous = -1.0;
        for occupancy in [0, 1, 2, 5, 49, 50, 99, 150] {
            let rate = accumulate(&[occupancy]).finalize(150).utilization_rate;
            assert!(rate >= previous, "{rate} < {previous} at {occupancy}");
            previous = rate;
        }
    }
}
