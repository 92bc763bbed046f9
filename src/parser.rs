//! CSV parser for facility occupancy logs.
//!
//! The expected layout is a header row followed by one reading per line:
//!
//! ```text
//! Date,Day,Time,Occupancy
//! 15.03.2024,Friday,14:30,25
//! ```

use anyhow::{Context, Result, anyhow};
use csv::{ReaderBuilder, StringRecord, Trim};
use tracing::debug;

use crate::aggregation::Reading;
use crate::dates::{hour_from_time, parse_date};

/// Parses occupancy CSV text into readings, preserving file order.
///
/// Header names are ignored; columns are read by position. Occupancy is
/// truncated to a whole number of people (`25.5` becomes `25`).
///
/// # Errors
///
/// Returns an error naming the offending line if a date, time or occupancy
/// value cannot be parsed.
pub fn parse_occupancy_csv(text: &str) -> Result<Vec<Reading>> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(Vec::new());
    }

    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .flexible(true)
        .from_reader(text.as_bytes());

    let mut readings = Vec::new();
    for (index, result) in rdr.records().enumerate() {
        // header is line 1
        let line = index + 2;
        let record = result.with_context(|| format!("malformed CSV row on line {line}"))?;
        let reading =
            parse_record(&record).with_context(|| format!("invalid reading on line {line}"))?;
        readings.push(reading);
    }

    debug!(readings = readings.len(), "Occupancy CSV parsed");
    Ok(readings)
}

fn parse_record(record: &StringRecord) -> Result<Reading> {
    let field = |index: usize, name: &str| {
        record
            .get(index)
            .ok_or_else(|| anyhow!("missing {name} column"))
    };

    let date = parse_date(field(0, "date")?)?;
    let day = field(1, "day")?;
    let time = field(2, "time")?;
    let raw_occupancy = field(3, "occupancy")?;
    let whole = raw_occupancy
        .split_once('.')
        .map_or(raw_occupancy, |(whole, _)| whole);
    let occupancy: u32 = whole
        .parse()
        .with_context(|| format!("invalid occupancy '{raw_occupancy}'"))?;

    Ok(Reading {
        date,
        day: day.to_string(),
        time: time.to_string(),
        hour: hour_from_time(time)?,
        occupancy,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_parse_valid_csv() {
        let csv = "Date,Day,Time,Occupancy
15.03.2024,Friday,14:30,25
15.03.2024,Friday,14:45,30
16.03.2024,Saturday,09:15,15";

        let readings = parse_occupancy_csv(csv).unwrap();
        assert_eq!(readings.len(), 3);

        assert_eq!(readings[0].date, NaiveDate::from_ymd_opt(2024, 3, 15).unwrap());
        assert_eq!(readings[0].day, "Friday");
        assert_eq!(readings[0].time, "14:30");
        assert_eq!(readings[0].hour, 14);
        assert_eq!(readings[0].occupancy, 25);

        assert_eq!(readings[1].hour, 14);
        assert_eq!(readings[1].occupancy, 30);

        assert_eq!(readings[2].day, "Saturday");
        assert_eq!(readings[2].hour, 9);
        assert_eq!(readings[2].occupancy, 15);
    }

    #[test]
    fn test_header_only_and_blank_input() {
        assert!(parse_occupancy_csv("Date,Day,Time,Occupancy").unwrap().is_empty());
        assert!(parse_occupancy_csv("   ").unwrap().is_empty());
        assert!(parse_occupancy_csv("").unwrap().is_empty());
    }

    #[test]
    fn test_occupancy_is_truncated() {
        let csv = "Date,Day,Time,Occupancy\n15.03.2024,Friday,14:30,25.5";
        let readings = parse_occupancy_csv(csv).unwrap();
        assert_eq!(readings[0].occupancy, 25);
    }

    #[test]
    fn test_negative_occupancy_is_rejected() {
        let csv = "Date,Day,Time,Occupancy\n15.03.2024,Friday,14:30,-3";
        let err = parse_occupancy_csv(csv).unwrap_err();
        assert!(format!("{err:#}").contains("invalid occupancy '-3'"));
    }

    #[test]
    fn test_zero_occupancy() {
        let csv = "Date,Day,Time,Occupancy\n15.03.2024,Friday,14:30,0";
        let readings = parse_occupancy_csv(csv).unwrap();
        assert_eq!(readings[0].occupancy, 0);
    }

    #[test]
    fn test_single_digit_hours() {
        let csv = "Date,Day,Time,Occupancy
15.03.2024,Friday,6:30,10
15.03.2024,Friday,14:45,20
15.03.2024,Friday,23:59,5";

        let hours: Vec<u32> = parse_occupancy_csv(csv)
            .unwrap()
            .iter()
            .map(|r| r.hour)
            .collect();
        assert_eq!(hours, vec![6, 14, 23]);
    }

    #[test]
    fn test_invalid_row_reports_line() {
        let csv = "Date,Day,Time,Occupancy
15.03.2024,Friday,14:30,25
not-a-date,Friday,14:45,30";

        let err = parse_occupancy_csv(csv).unwrap_err();
        assert!(format!("{err:#}").contains("line 3"));
    }

    #[test]
    fn test_windows_line_endings() {
        let csv = "Date,Day,Time,Occupancy\r\n15.03.2024,Friday,14:30,25\r\n";
        let readings = parse_occupancy_csv(csv).unwrap();
        assert_eq!(readings.len(), 1);
        assert_eq!(readings[0].occupancy, 25);
    }
}
