//! Calendar helpers shared by the parser, the aggregator and the heatmap.

use anyhow::{Context, Result, anyhow};
use chrono::{Datelike, Days, NaiveDate, Weekday};

/// Weekday names in display order, Monday first.
pub const WEEKDAYS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

/// Parses a `dd.MM.yyyy` date. Single-digit day and month are accepted.
pub fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%d.%m.%Y")
        .with_context(|| format!("invalid date '{value}', expected dd.MM.yyyy"))
}

/// Extracts the hour from an `H:MM` or `HH:MM` time string.
pub fn hour_from_time(time: &str) -> Result<u32> {
    let hour_str = time
        .trim()
        .split(':')
        .next()
        .ok_or_else(|| anyhow!("empty time value"))?;
    let hour: u32 = hour_str
        .parse()
        .with_context(|| format!("invalid hour in time '{time}'"))?;
    if hour > 23 {
        return Err(anyhow!("hour {hour} out of range in time '{time}'"));
    }
    Ok(hour)
}

/// Monday that starts the calendar week containing `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    let offset = u64::from(date.weekday().num_days_from_monday());
    date.checked_sub_days(Days::new(offset)).unwrap_or(date)
}

/// Identifier of the week containing `date`: its Monday as `YYYY-MM-DD`.
pub fn week_id(date: NaiveDate) -> String {
    week_start(date).format("%Y-%m-%d").to_string()
}

/// English name of a weekday, matching the names used in the data feed.
pub fn weekday_name(weekday: Weekday) -> &'static str {
    WEEKDAYS[weekday.num_days_from_monday() as usize]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date("15.03.2024").unwrap(), ymd(2024, 3, 15));
        assert_eq!(parse_date("5.1.2024").unwrap(), ymd(2024, 1, 5));
        assert!(parse_date("2024-03-15").is_err());
    }

    #[test]
    fn test_hour_from_time() {
        assert_eq!(hour_from_time("14:30").unwrap(), 14);
        assert_eq!(hour_from_time("09:15").unwrap(), 9);
        assert_eq!(hour_from_time("6:30").unwrap(), 6);
        assert_eq!(hour_from_time("00:00").unwrap(), 0);
        assert_eq!(hour_from_time("23:59").unwrap(), 23);
        assert!(hour_from_time("24:00").is_err());
        assert!(hour_from_time("ab:00").is_err());
    }

    #[test]
    fn test_week_id() {
        // Friday
        assert_eq!(week_id(ymd(2024, 3, 15)), "2024-03-11");
        // Monday
        assert_eq!(week_id(ymd(2024, 3, 11)), "2024-03-11");
        // Sunday belongs to the week started by the previous Monday
        assert_eq!(week_id(ymd(2024, 3, 17)), "2024-03-11");
        // across a year boundary
        assert_eq!(week_id(ymd(2025, 1, 1)), "2024-12-30");
    }

    #[test]
    fn test_weekday_name() {
        assert_eq!(weekday_name(Weekday::Mon), "Monday");
        assert_eq!(weekday_name(Weekday::Sun), "Sunday");
        assert_eq!(weekday_name(ymd(2024, 3, 15).weekday()), "Friday");
    }
}
