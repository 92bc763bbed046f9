//! Facility catalog.
//!
//! Stored as a JSON array on disk:
//! ```json
//! [
//!   {
//!     "name": "Kraví hora",
//!     "timeZone": "Europe/Prague",
//!     "outsidePool": {
//!       "url": "https://example.org/occupancy",
//!       "pattern": "Venkovní bazén",
//!       "csvFile": "kravi_hora_outside_pool_occupancy.csv",
//!       "maximumCapacity": 1000,
//!       "weekdaysOpeningHours": "9-20",
//!       "weekendOpeningHours": "9-20",
//!       "collectStats": true,
//!       "viewStats": true
//!     }
//!   }
//! ]
//! ```

use anyhow::{Context, Result, anyhow};
use chrono_tz::Tz;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// Which of a facility's two pools a data set belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PoolType {
    Inside,
    #[default]
    Outside,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PoolSettings {
    #[serde(default)]
    pub custom_name: Option<String>,
    pub url: String,
    pub pattern: String,
    pub csv_file: String,
    pub maximum_capacity: u32,
    #[serde(default)]
    pub total_lanes: Option<u32>,
    pub weekdays_opening_hours: String,
    pub weekend_opening_hours: String,
    #[serde(default)]
    pub collect_stats: bool,
    #[serde(default)]
    pub view_stats: bool,
    #[serde(default)]
    pub temporarily_closed: Option<String>,
}

impl PoolSettings {
    /// Hours to show for `day`, taken from the weekday or weekend schedule.
    pub fn opening_hours(&self, day: &str) -> RangeInclusive<u32> {
        let schedule = if matches!(day, "Saturday" | "Sunday") {
            &self.weekend_opening_hours
        } else {
            &self.weekdays_opening_hours
        };
        parse_opening_hours(schedule).unwrap_or(0..=23)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FacilityConfig {
    pub name: String,
    #[serde(default)]
    pub icon: Option<String>,
    /// Zone of the facility's wall clock; readings are logged in it.
    #[serde(default = "default_time_zone")]
    pub time_zone: Tz,
    #[serde(default)]
    pub inside_pool: Option<PoolSettings>,
    #[serde(default)]
    pub outside_pool: Option<PoolSettings>,
}

impl FacilityConfig {
    pub fn pool(&self, pool_type: PoolType) -> Option<&PoolSettings> {
        match pool_type {
            PoolType::Inside => self.inside_pool.as_ref(),
            PoolType::Outside => self.outside_pool.as_ref(),
        }
    }

    /// Configured capacity of the given pool, or 0 when it does not exist.
    pub fn maximum_capacity(&self, pool_type: PoolType) -> u32 {
        self.pool(pool_type).map_or(0, |pool| pool.maximum_capacity)
    }
}

fn default_time_zone() -> Tz {
    chrono_tz::Europe::Prague
}

pub struct FacilityCatalog {
    facilities: Vec<FacilityConfig>,
}

impl FacilityCatalog {
    /// Loads the catalog from a JSON file at `path`.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read facility config '{path}'"))?;
        Self::from_json(&content).with_context(|| format!("invalid facility config '{path}'"))
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let facilities: Vec<FacilityConfig> = serde_json::from_str(content)?;
        Ok(Self { facilities })
    }

    pub fn facilities(&self) -> &[FacilityConfig] {
        &self.facilities
    }

    /// Facility with the given name (case-insensitive), or the first one
    /// when no name is given.
    pub fn find(&self, name: Option<&str>) -> Result<&FacilityConfig> {
        match name {
            Some(name) => self
                .facilities
                .iter()
                .find(|f| f.name.eq_ignore_ascii_case(name))
                .ok_or_else(|| anyhow!("facility '{name}' is not configured")),
            None => self
                .facilities
                .first()
                .ok_or_else(|| anyhow!("facility config is empty")),
        }
    }
}

/// Parses `"6-22"` or `"06:00-21:30"` into the hours a facility is open.
/// The closing hour is included when minutes are given past the hour.
pub fn parse_opening_hours(value: &str) -> Option<RangeInclusive<u32>> {
    let (open, close) = value.trim().split_once('-')?;
    let (open_hour, _) = parse_clock(open)?;
    let (close_hour, close_minute) = parse_clock(close)?;

    let last = if close_minute > 0 {
        close_hour
    } else {
        close_hour.checked_sub(1)?
    };
    (open_hour <= last && last <= 23).then_some(open_hour..=last)
}

fn parse_clock(value: &str) -> Option<(u32, u32)> {
    let mut parts = value.trim().splitn(2, ':');
    let hour = parts.next()?.parse().ok()?;
    let minute = match parts.next() {
        Some(m) => m.parse().ok()?,
        None => 0,
    };
    Some((hour, minute))
}
