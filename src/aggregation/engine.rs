use crate::aggregation::overall::OverallAccumulator;
use crate::aggregation::types::{
    AggregatedOccupancy, OverallOccupancyMap, Reading, WeekId, WeeklyOccupancyMap,
};
use crate::aggregation::weekly::WeeklyAccumulator;
use crate::dates::week_id;
use tracing::{debug, trace};

/// The group whose readings are currently being accumulated.
#[derive(Debug, Clone, PartialEq)]
struct GroupCursor {
    week_id: WeekId,
    day: String,
    hour: u32,
    maximum_capacity: u32,
}

impl GroupCursor {
    fn same_group(&self, week_id: &str, day: &str, hour: u32) -> bool {
        self.week_id == week_id && self.day == day && self.hour == hour
    }
}

/// Single-pass aggregation of a time-ordered reading stream.
///
/// Readings are fed one by one through [`ingest`](Self::ingest); a group is
/// flushed into both maps as soon as a reading from a different
/// (week, day, hour) arrives. [`finalize`](Self::finalize) flushes the tail
/// group, computes medians and maxima, and hands the maps over.
#[derive(Debug, Default)]
pub struct OccupancyAggregator {
    weekly: WeeklyAccumulator,
    overall: OverallAccumulator,
    weekly_map: WeeklyOccupancyMap,
    overall_map: OverallOccupancyMap,
    cursor: Option<GroupCursor>,
    readings: usize,
    groups: usize,
}

impl OccupancyAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn readings_ingested(&self) -> usize {
        self.readings
    }

    pub fn ingest(&mut self, reading: &Reading, maximum_capacity: u32) {
        let week_id = week_id(reading.date);
        let day = reading.day.as_str();
        let hour = reading.hour;

        self.weekly_map
            .hour_or_insert(&week_id, reading.date, day, hour);
        self.overall_map.hour_or_insert(day, hour);
        self.overall.initialize(day, hour);

        if self
            .cursor
            .as_ref()
            .is_some_and(|cursor| !cursor.same_group(&week_id, day, hour))
        {
            self.flush();
            self.weekly.reset();
        }

        self.cursor = Some(GroupCursor {
            week_id,
            day: day.to_string(),
            hour,
            maximum_capacity,
        });
        self.weekly.update(reading.occupancy);
        self.readings += 1;
    }

    /// Writes the accumulated group into both maps.
    fn flush(&mut self) {
        let Some(cursor) = self.cursor.as_ref() else {
            return;
        };
        let Some(summary) = self
            .weekly_map
            .weeks
            .get_mut(&cursor.week_id)
            .and_then(|week| week.days.get_mut(&cursor.day))
            .and_then(|week_day| week_day.hours.get_mut(&cursor.hour))
        else {
            return;
        };

        let stats = self.weekly.finalize(cursor.maximum_capacity);
        summary.min_occupancy = stats.min_occupancy;
        summary.max_occupancy = stats.max_occupancy;
        summary.average_occupancy = stats.average_occupancy;
        summary.utilization_rate = stats.utilization_rate;
        summary.remaining_capacity = stats.remaining_capacity;
        summary.maximum_capacity = cursor.maximum_capacity;

        self.weekly_map
            .absorb_max(&cursor.week_id, &cursor.day, stats.utilization_rate);

        if stats.utilization_rate > 0.0 {
            let averages =
                self.overall
                    .record_week(&cursor.day, cursor.hour, stats.utilization_rate);
            let values = self.overall_map.hour_or_insert(&cursor.day, cursor.hour);
            values.average_utilization_rate = averages.average_utilization_rate;
            values.weighted_average_utilization_rate = averages.weighted_average_utilization_rate;
        }

        self.groups += 1;
        trace!(
            week_id = %cursor.week_id,
            day = %cursor.day,
            hour = cursor.hour,
            utilization_rate = stats.utilization_rate,
            "Group flushed"
        );
    }

    /// Computes every (day, hour) median, then the day and overall maxima.
    fn finalize_overall(&mut self) {
        let map = &mut self.overall_map;
        for (day, overall_day) in map.days.iter_mut() {
            for (hour, values) in overall_day.hours.iter_mut() {
                values.median_utilization_rate = self.overall.compute_median(day, *hour);
                overall_day.max_day_values.absorb(values);
                map.max_overall_values.absorb(values);
            }
        }
    }

    /// Ends the stream: flushes the tail group and completes the cross-week
    /// statistics. Valid on a partially ingested or empty stream.
    pub fn finalize(mut self) -> AggregatedOccupancy {
        self.flush();
        self.finalize_overall();

        debug!(
            readings = self.readings,
            groups = self.groups,
            weeks = self.weekly_map.weeks.len(),
            "Aggregation finalized"
        );

        AggregatedOccupancy {
            weekly_occupancy_map: self.weekly_map,
            overall_occupancy_map: self.overall_map,
        }
    }
}

/// Runs a whole batch of readings through a fresh [`OccupancyAggregator`].
#[tracing::instrument(skip(readings), fields(readings = readings.len()))]
pub fn aggregate(readings: &[Reading], maximum_capacity: u32) -> AggregatedOccupancy {
    let mut aggregator = OccupancyAggregator::new();
    for reading in readings {
        aggregator.ingest(reading, maximum_capacity);
    }
    aggregator.finalize()
}
