use serde::Serialize;
use std::fmt;

use crate::aggregation::{HourlySummary, OverallMetric, OverallOccupancyMap, WeeklyOccupancyMap};
use crate::heatmap::clock::Clock;
use crate::heatmap::color::{HeatmapColorMapper, LegendItem, UtilizationColor};

/// A named value passed to the translation callback.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Text(String),
    Number(f64),
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Text(text) => f.write_str(text),
            ParamValue::Number(number) => write!(f, "{number}"),
        }
    }
}

/// Localizes a message key with named parameters.
///
/// Any `Fn(&str, &[(&str, ParamValue)]) -> String` closure is a translator.
pub trait Translator {
    fn translate(&self, key: &str, params: &[(&str, ParamValue)]) -> String;
}

impl<F> Translator for F
where
    F: Fn(&str, &[(&str, ParamValue)]) -> String,
{
    fn translate(&self, key: &str, params: &[(&str, ParamValue)]) -> String {
        self(key, params)
    }
}

/// Translator that renders keys without a message catalog: day keys become
/// the capitalized day name, any other key becomes its parameters joined
/// as `name=value`.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTranslator;

impl Translator for PlainTranslator {
    fn translate(&self, key: &str, params: &[(&str, ParamValue)]) -> String {
        if let Some(day) = key.strip_prefix("common.days.") {
            let mut chars = day.chars();
            return match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            };
        }
        params
            .iter()
            .map(|(name, value)| format!("{name}={value}"))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Everything the presentation layer needs to draw one heatmap cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CellData {
    pub color: UtilizationColor,
    pub color_fill_ratio: f64,
    pub display_text: String,
    pub title: String,
    pub is_current_hour: bool,
}

impl CellData {
    pub fn empty() -> Self {
        Self {
            color: UtilizationColor::Empty,
            color_fill_ratio: 0.0,
            display_text: String::new(),
            title: String::new(),
            is_current_hour: false,
        }
    }
}

/// Cell lookups over finalized occupancy maps.
pub struct HeatmapCells<'a, T, C> {
    weekly: &'a WeeklyOccupancyMap,
    overall: &'a OverallOccupancyMap,
    mapper: HeatmapColorMapper,
    tooltip_key: String,
    translator: T,
    clock: C,
}

impl<'a, T: Translator, C: Clock> HeatmapCells<'a, T, C> {
    pub fn new(
        weekly: &'a WeeklyOccupancyMap,
        overall: &'a OverallOccupancyMap,
        high_threshold: f64,
        tooltip_key: impl Into<String>,
        translator: T,
        clock: C,
    ) -> Self {
        Self {
            weekly,
            overall,
            mapper: HeatmapColorMapper::new(high_threshold),
            tooltip_key: tooltip_key.into(),
            translator,
            clock,
        }
    }

    pub fn legend_items(&self) -> Vec<LegendItem> {
        self.mapper.legend_items()
    }

    pub fn is_current_hour(&self, day: &str, hour: u32) -> bool {
        self.clock.is_today(day) && self.clock.current_hour() == hour
    }

    /// Context maximum for weekly cells. The current week is also compared
    /// against the overall average so "now" lines up with history.
    fn week_context_max(&self, week_id: &str) -> f64 {
        let week_max = self
            .weekly
            .week(week_id)
            .map_or(0.0, |week| week.max_week_values.utilization_rate);

        if week_id == self.clock.current_week_id() {
            week_max.max(self.overall.max_overall_values.average_utilization_rate)
        } else {
            week_max
        }
    }

    fn tooltip(&self, day: &str, hour: u32, values: &[(&'static str, ParamValue)]) -> String {
        let day_key = format!("common.days.{}", day.to_lowercase());
        let day_name = self.translator.translate(&day_key, &[]);

        let mut params = vec![
            ("day", ParamValue::Text(day_name)),
            ("hour", ParamValue::Number(f64::from(hour))),
        ];
        params.extend_from_slice(values);
        self.translator.translate(&self.tooltip_key, &params)
    }

    fn cell(
        &self,
        utilization_rate: f64,
        context_max: f64,
        display_text: String,
        title: String,
        day: &str,
        hour: u32,
    ) -> CellData {
        CellData {
            color: self.mapper.color_for(utilization_rate),
            color_fill_ratio: self.mapper.fill_ratio(utilization_rate, context_max),
            display_text,
            title,
            is_current_hour: self.is_current_hour(day, hour),
        }
    }

    fn utilization_cell(
        &self,
        utilization_rate: f64,
        context_max: f64,
        day: &str,
        hour: u32,
    ) -> CellData {
        let display_text = if utilization_rate > 0.0 {
            format!("{utilization_rate}%")
        } else {
            String::new()
        };
        let title = self.tooltip(
            day,
            hour,
            &[("utilization", ParamValue::Number(utilization_rate))],
        );
        self.cell(utilization_rate, context_max, display_text, title, day, hour)
    }

    fn overall_cell(&self, day: &str, hour: u32, metric: OverallMetric) -> CellData {
        let utilization_rate = self
            .overall
            .hour(day, hour)
            .map_or(0.0, |values| values.get(metric));
        let context_max = self.overall.max_overall_values.get(metric);
        self.utilization_cell(utilization_rate, context_max, day, hour)
    }

    pub fn overall_average_cell(&self, day: &str, hour: u32) -> CellData {
        self.overall_cell(day, hour, OverallMetric::Average)
    }

    pub fn overall_weighted_average_cell(&self, day: &str, hour: u32) -> CellData {
        self.overall_cell(day, hour, OverallMetric::WeightedAverage)
    }

    pub fn overall_median_cell(&self, day: &str, hour: u32) -> CellData {
        self.overall_cell(day, hour, OverallMetric::Median)
    }

    /// Summary for a weekly cell. While the current hour has no reading yet,
    /// the previous hour of the same day stands in; hour 0 has no stand-in.
    fn weekly_summary(&self, week_id: &str, day: &str, hour: u32) -> Option<&'a HourlySummary> {
        let summary = self.weekly.hour(week_id, day, hour);
        if summary.is_some() {
            return summary;
        }

        let is_now = week_id == self.clock.current_week_id() && self.is_current_hour(day, hour);
        if is_now {
            hour.checked_sub(1)
                .and_then(|previous| self.weekly.hour(week_id, day, previous))
        } else {
            None
        }
    }

    pub fn weekly_percentage_cell(&self, week_id: &str, day: &str, hour: u32) -> CellData {
        let utilization_rate = self
            .weekly_summary(week_id, day, hour)
            .map_or(0.0, |summary| summary.utilization_rate);
        self.utilization_cell(utilization_rate, self.week_context_max(week_id), day, hour)
    }

    pub fn weekly_min_max_cell(&self, week_id: &str, day: &str, hour: u32) -> CellData {
        let Some(summary) = self.weekly_summary(week_id, day, hour) else {
            return CellData::empty();
        };

        let display_text = if summary.min_occupancy == summary.max_occupancy {
            format!("{}", summary.min_occupancy)
        } else {
            format!("{}-{}", summary.min_occupancy, summary.max_occupancy)
        };
        let title = self.tooltip(
            day,
            hour,
            &[
                ("min", ParamValue::Number(summary.min_occupancy)),
                ("max", ParamValue::Number(summary.max_occupancy)),
            ],
        );
        self.cell(
            summary.utilization_rate,
            self.week_context_max(week_id),
            display_text,
            title,
            day,
            hour,
        )
    }

    pub fn weekly_average_cell(&self, week_id: &str, day: &str, hour: u32) -> CellData {
        let Some(summary) = self.weekly_summary(week_id, day, hour) else {
            return CellData::empty();
        };

        let title = self.tooltip(
            day,
            hour,
            &[("average", ParamValue::Number(summary.average_occupancy))],
        );
        self.cell(
            summary.utilization_rate,
            self.week_context_max(week_id),
            format!("{}", summary.average_occupancy),
            title,
            day,
            hour,
        )
    }
}
