//! Data types produced by the aggregation pipeline.
//!
//! Both maps serialize to the nested camelCase JSON shape consumed by the
//! heatmap front end.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// ISO date (`YYYY-MM-DD`) of the Monday that starts a calendar week.
pub type WeekId = String;

/// A single occupancy observation handed over by the parser.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Reading {
    pub date: NaiveDate,
    pub day: String,
    pub time: String,
    pub hour: u32,
    /// Headcount; fractional source values are truncated by the parser.
    pub occupancy: u32,
}

/// Finalized statistics for one (week, day, hour) group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HourlySummary {
    pub date: NaiveDate,
    pub day: String,
    pub hour: u32,
    pub min_occupancy: f64,
    pub max_occupancy: f64,
    pub average_occupancy: f64,
    pub maximum_capacity: u32,
    pub utilization_rate: f64,
    pub remaining_capacity: f64,
}

impl HourlySummary {
    /// Creates a zeroed stub that is filled in when its group is flushed.
    pub fn stub(date: NaiveDate, day: &str, hour: u32) -> Self {
        Self {
            date,
            day: day.to_string(),
            hour,
            min_occupancy: 0.0,
            max_occupancy: 0.0,
            average_occupancy: 0.0,
            maximum_capacity: 0,
            utilization_rate: 0.0,
            remaining_capacity: 0.0,
        }
    }
}

/// Running maximum of the utilization rate within a week or a day of a week.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyMaxValues {
    pub utilization_rate: f64,
}

impl WeeklyMaxValues {
    pub fn absorb(&mut self, utilization_rate: f64) {
        self.utilization_rate = self.utilization_rate.max(utilization_rate);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekDay {
    pub max_day_values: WeeklyMaxValues,
    pub hours: BTreeMap<u32, HourlySummary>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Week {
    pub max_week_values: WeeklyMaxValues,
    pub days: BTreeMap<String, WeekDay>,
}

/// Per-week summaries keyed by [`WeekId`], then day name, then hour.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeeklyOccupancyMap {
    pub weeks: BTreeMap<WeekId, Week>,
}

impl WeeklyOccupancyMap {
    pub fn is_empty(&self) -> bool {
        self.weeks.is_empty()
    }

    pub fn week(&self, week_id: &str) -> Option<&Week> {
        self.weeks.get(week_id)
    }

    pub fn hour(&self, week_id: &str, day: &str, hour: u32) -> Option<&HourlySummary> {
        self.weeks
            .get(week_id)?
            .days
            .get(day)?
            .hours
            .get(&hour)
    }

    /// Returns the summary slot for `(week_id, day, hour)`, creating the week,
    /// day and a zeroed stub as needed. Existing entries are left untouched.
    pub fn hour_or_insert(
        &mut self,
        week_id: &str,
        date: NaiveDate,
        day: &str,
        hour: u32,
    ) -> &mut HourlySummary {
        self.weeks
            .entry(week_id.to_string())
            .or_default()
            .days
            .entry(day.to_string())
            .or_default()
            .hours
            .entry(hour)
            .or_insert_with(|| HourlySummary::stub(date, day, hour))
    }

    /// Raises the week and day maxima to at least `utilization_rate`.
    /// Does nothing when the week or day has never been seen.
    pub fn absorb_max(&mut self, week_id: &str, day: &str, utilization_rate: f64) {
        if let Some(week) = self.weeks.get_mut(week_id) {
            if let Some(week_day) = week.days.get_mut(day) {
                week_day.max_day_values.absorb(utilization_rate);
            }
            week.max_week_values.absorb(utilization_rate);
        }
    }

    /// Iterates over every hourly summary in week, day, hour key order.
    pub fn summaries(&self) -> impl Iterator<Item = (&str, &HourlySummary)> {
        self.weeks.iter().flat_map(|(week_id, week)| {
            week.days.values().flat_map(move |week_day| {
                week_day
                    .hours
                    .values()
                    .map(move |summary| (week_id.as_str(), summary))
            })
        })
    }
}

/// Which cross-week statistic a value or lookup refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverallMetric {
    Average,
    WeightedAverage,
    Median,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverallUtilizationValues {
    pub average_utilization_rate: f64,
    pub weighted_average_utilization_rate: f64,
    pub median_utilization_rate: f64,
}

impl OverallUtilizationValues {
    pub fn get(&self, metric: OverallMetric) -> f64 {
        match metric {
            OverallMetric::Average => self.average_utilization_rate,
            OverallMetric::WeightedAverage => self.weighted_average_utilization_rate,
            OverallMetric::Median => self.median_utilization_rate,
        }
    }

    /// Field-wise running maximum against `other`.
    pub fn absorb(&mut self, other: &OverallUtilizationValues) {
        self.average_utilization_rate = self
            .average_utilization_rate
            .max(other.average_utilization_rate);
        self.weighted_average_utilization_rate = self
            .weighted_average_utilization_rate
            .max(other.weighted_average_utilization_rate);
        self.median_utilization_rate = self
            .median_utilization_rate
            .max(other.median_utilization_rate);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverallDay {
    pub max_day_values: OverallUtilizationValues,
    pub hours: BTreeMap<u32, OverallUtilizationValues>,
}

/// Cross-week statistics keyed by day name, then hour.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverallOccupancyMap {
    pub max_overall_values: OverallUtilizationValues,
    pub days: BTreeMap<String, OverallDay>,
}

impl OverallOccupancyMap {
    pub fn hour(&self, day: &str, hour: u32) -> Option<&OverallUtilizationValues> {
        self.days.get(day)?.hours.get(&hour)
    }

    pub fn hour_or_insert(&mut self, day: &str, hour: u32) -> &mut OverallUtilizationValues {
        self.days
            .entry(day.to_string())
            .or_default()
            .hours
            .entry(hour)
            .or_default()
    }
}

/// The pair of read-only views produced by a finalized aggregation run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedOccupancy {
    pub weekly_occupancy_map: WeeklyOccupancyMap,
    pub overall_occupancy_map: OverallOccupancyMap,
}
