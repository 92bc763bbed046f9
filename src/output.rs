//! Output formatting for aggregation results.
//!
//! Supports pretty-printing, JSON serialization, a flat CSV table of the
//! weekly hourly summaries, and a plain-text heatmap grid.

use anyhow::Result;
use csv::WriterBuilder;
use serde::Serialize;
use std::io::Write;
use std::ops::RangeInclusive;
use tracing::debug;

use crate::aggregation::{AggregatedOccupancy, HourlySummary, WeeklyOccupancyMap};
use crate::heatmap::{CellData, LegendItem};

/// Logs aggregation results using Rust's debug pretty-print format.
pub fn print_pretty(result: &AggregatedOccupancy) {
    debug!("{:#?}", result);
}

/// Serializes any result value as pretty-printed JSON.
pub fn to_json(value: &impl Serialize) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SummaryRow<'a> {
    week_id: &'a str,
    date: String,
    day: &'a str,
    hour: u32,
    min_occupancy: f64,
    max_occupancy: f64,
    average_occupancy: f64,
    maximum_capacity: u32,
    utilization_rate: f64,
    remaining_capacity: f64,
}

impl<'a> SummaryRow<'a> {
    fn new(week_id: &'a str, summary: &'a HourlySummary) -> Self {
        Self {
            week_id,
            date: summary.date.format("%Y-%m-%d").to_string(),
            day: &summary.day,
            hour: summary.hour,
            min_occupancy: summary.min_occupancy,
            max_occupancy: summary.max_occupancy,
            average_occupancy: summary.average_occupancy,
            maximum_capacity: summary.maximum_capacity,
            utilization_rate: summary.utilization_rate,
            remaining_capacity: summary.remaining_capacity,
        }
    }
}

/// Writes one CSV row per hourly summary, headers included.
pub fn write_hourly_csv<W: Write>(writer: W, weekly: &WeeklyOccupancyMap) -> Result<()> {
    let mut writer = WriterBuilder::new().has_headers(true).from_writer(writer);

    for (week_id, summary) in weekly.summaries() {
        writer.serialize(SummaryRow::new(week_id, summary))?;
    }
    writer.flush()?;

    Ok(())
}

/// Renders cells as a text table: one row per hour, one column per day.
///
/// `cell` is called for every `(day, hour)` pair in `hours`.
pub fn render_grid<F>(days: &[&str], hours: RangeInclusive<u32>, mut cell: F) -> String
where
    F: FnMut(&str, u32) -> CellData,
{
    let width = 10;

    let mut out = format!("{:>5} ", "");
    for &day in days {
        let short: String = day.chars().take(3).collect();
        out.push_str(&format!("{short:>width$}"));
    }
    out.push('\n');

    for hour in hours {
        out.push_str(&format!("{hour:>2}:00 "));
        for &day in days {
            let data = cell(day, hour);
            let marker = if data.is_current_hour { '*' } else { data.color.glyph() };
            let text = format!("{marker}{}", data.display_text);
            out.push_str(&format!("{text:>width$}"));
        }
        out.push('\n');
    }
    out
}

/// Renders legend entries on a single line.
pub fn render_legend(items: &[LegendItem]) -> String {
    items
        .iter()
        .map(|item| item.label.as_str())
        .collect::<Vec<_>>()
        .join("  ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregation::aggregate;
    use crate::heatmap::UtilizationColor;
    use crate::parser::parse_occupancy_csv;

    fn sample() -> AggregatedOccupancy {
        let readings = parse_occupancy_csv(
            "Date,Day,Time,Occupancy
11.03.2024,Monday,14:00,25
11.03.2024,Monday,14:30,35
11.03.2024,Monday,15:00,50",
        )
        .unwrap();
        aggregate(&readings, 100)
    }

    #[test]
    fn test_print_pretty_does_not_panic() {
        print_pretty(&sample());
    }

    #[test]
    fn test_to_json_shape() {
        let json = to_json(&sample()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        let hour = &value["weeklyOccupancyMap"]["2024-03-11"]["days"]["Monday"]["hours"]["14"];
        assert_eq!(hour["averageOccupancy"], 30.0);
        assert_eq!(hour["date"], "2024-03-11");
        assert_eq!(
            value["overallOccupancyMap"]["maxOverallValues"]["averageUtilizationRate"],
            50.0
        );
    }

    #[test]
    fn test_write_hourly_csv() {
        let mut buf = Vec::new();
        write_hourly_csv(&mut buf, &sample().weekly_occupancy_map).unwrap();

        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("weekId,date,day,hour"));
        assert_eq!(lines[1], "2024-03-11,2024-03-11,Monday,14,25.0,35.0,30.0,100,30.0,70.0");
    }

    #[test]
    fn test_render_grid() {
        let grid = render_grid(&["Monday", "Tuesday"], 14..=15, |day, hour| {
            if day == "Monday" && hour == 14 {
                CellData {
                    color: UtilizationColor::Low,
                    color_fill_ratio: 0.5,
                    display_text: "25%".to_string(),
                    title: String::new(),
                    is_current_hour: false,
                }
            } else {
                CellData::empty()
            }
        });

        let lines: Vec<&str> = grid.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].contains("Mon"));
        assert!(lines[0].contains("Tue"));
        assert!(lines[1].starts_with("14:00"));
        assert!(lines[1].contains("▒25%"));
    }

    #[test]
    fn test_render_legend() {
        let items = crate::heatmap::HeatmapColorMapper::new(80.0).legend_items();
        assert_eq!(render_legend(&items), "0%  <20%  <40%  <60%  <80%  <100%");
    }
}
