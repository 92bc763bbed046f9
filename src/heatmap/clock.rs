use chrono::{DateTime, Datelike, NaiveDateTime, Timelike, Utc};
use chrono_tz::Tz;

use crate::dates::{week_id, weekday_name};

/// Source of the facility's current wall-clock time.
pub trait Clock {
    fn now(&self) -> NaiveDateTime;

    fn current_week_id(&self) -> String {
        week_id(self.now().date())
    }

    fn is_today(&self, day: &str) -> bool {
        weekday_name(self.now().weekday()) == day
    }

    fn current_hour(&self) -> u32 {
        self.now().hour()
    }
}

/// Wall-clock time in the facility's time zone, independent of the host zone.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    tz: Tz,
}

impl SystemClock {
    pub fn new(tz: Tz) -> Self {
        Self { tz }
    }

    /// Facility-local time at `instant`.
    pub fn local_time(&self, instant: DateTime<Utc>) -> NaiveDateTime {
        instant.with_timezone(&self.tz).naive_local()
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new(chrono_tz::Europe::Prague)
    }
}

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        self.local_time(Utc::now())
    }
}

/// A clock stopped at a given instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};

    #[test]
    fn test_fixed_clock_helpers() {
        let now = NaiveDate::from_ymd_opt(2024, 3, 13)
            .unwrap()
            .and_hms_opt(9, 41, 0)
            .unwrap();
        let clock = FixedClock(now);

        assert_eq!(clock.current_week_id(), "2024-03-11");
        assert!(clock.is_today("Wednesday"));
        assert!(!clock.is_today("Monday"));
        assert_eq!(clock.current_hour(), 9);
    }

    #[test]
    fn test_system_clock_uses_facility_zone() {
        let clock = SystemClock::default();

        let summer = Utc.with_ymd_and_hms(2024, 7, 15, 19, 0, 0).unwrap();
        assert_eq!(clock.local_time(summer).hour(), 21);

        let winter = Utc.with_ymd_and_hms(2024, 1, 15, 19, 0, 0).unwrap();
        assert_eq!(clock.local_time(winter).hour(), 20);
    }

    #[test]
    fn test_system_clock_week_rolls_over_in_facility_zone() {
        // Sunday 23:30 UTC is already Monday in Prague
        let instant = Utc.with_ymd_and_hms(2024, 3, 17, 23, 30, 0).unwrap();
        let local = SystemClock::default().local_time(instant);

        assert_eq!(local.date(), NaiveDate::from_ymd_opt(2024, 3, 18).unwrap());
        assert_eq!(local.hour(), 0);

        let utc = SystemClock::new(chrono_tz::UTC).local_time(instant);
        assert_eq!(utc.hour(), 23);
    }
}
