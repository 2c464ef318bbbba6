use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

const MILLIS_PER_HOUR: f64 = 3_600_000.0;

/// The fixed daily window used to measure impacted production time.
///
/// `hours_per_day` is the divisor that turns worked hours into production
/// days. It is configured alongside the window rather than derived from it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkShift {
    pub start: NaiveTime,
    pub end: NaiveTime,
    pub hours_per_day: f64,
}

impl Default for WorkShift {
    fn default() -> Self {
        Self {
            start: NaiveTime::from_hms_opt(8, 30, 0).expect("08:30 is a valid time"),
            end: NaiveTime::from_hms_opt(17, 30, 0).expect("17:30 is a valid time"),
            hours_per_day: 9.0,
        }
    }
}

impl WorkShift {
    pub fn new(start: NaiveTime, end: NaiveTime, hours_per_day: f64) -> ConfigResult<Self> {
        let shift = Self {
            start,
            end,
            hours_per_day,
        };
        shift.validate()?;
        Ok(shift)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.end <= self.start {
            return Err(ConfigError::Invalid(format!(
                "shift end {} must be after shift start {}",
                self.end, self.start
            )));
        }
        if !self.hours_per_day.is_finite() || self.hours_per_day <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "hours_per_day must be a positive number (got {})",
                self.hours_per_day
            )));
        }
        Ok(())
    }

    /// Shift boundaries on `date` in local time.
    pub fn window(&self, date: NaiveDate) -> (NaiveDateTime, NaiveDateTime) {
        (date.and_time(self.start), date.and_time(self.end))
    }

    /// Length of one production day in milliseconds.
    pub fn day_length_ms(&self) -> i64 {
        (self.hours_per_day * MILLIS_PER_HOUR).round() as i64
    }
}
