use chrono::{DateTime, NaiveDateTime};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

use crate::error::DurationError;
use crate::shift::WorkShift;

/// Longest anomaly span, in calendar days, the calculator will walk.
pub const DEFAULT_MAX_SPAN_DAYS: i64 = 3650;

const TIMESTAMP_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Impacted production days, held in tenths of a day.
///
/// Displays in the minimal form persisted alongside anomaly records:
/// `0`, `0.3`, `1`, `1.5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct DurationDays {
    tenths: u64,
}

impl DurationDays {
    pub const ZERO: DurationDays = DurationDays { tenths: 0 };

    pub fn from_tenths(tenths: u64) -> Self {
        Self { tenths }
    }

    pub fn tenths(&self) -> u64 {
        self.tenths
    }

    pub fn as_f64(&self) -> f64 {
        self.tenths as f64 / 10.0
    }

    pub fn is_zero(&self) -> bool {
        self.tenths == 0
    }
}

impl fmt::Display for DurationDays {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.tenths / 10;
        let fraction = self.tenths % 10;
        if fraction == 0 {
            write!(f, "{whole}")
        } else {
            write!(f, "{whole}.{fraction}")
        }
    }
}

impl FromStr for DurationDays {
    type Err = DurationError;

    /// Parses persisted values such as `0`, `0.3`, `2` or `1.0`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || DurationError::InvalidDuration(s.to_string());
        let trimmed = s.trim();
        let (whole, fraction) = match trimmed.split_once('.') {
            Some((whole, fraction)) => (whole, Some(fraction)),
            None => (trimmed, None),
        };
        if whole.is_empty() || !whole.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let whole: u64 = whole.parse().map_err(|_| invalid())?;
        let tenth = match fraction {
            None => 0,
            Some(digit) if digit.len() == 1 && digit.bytes().all(|b| b.is_ascii_digit()) => {
                u64::from(digit.as_bytes()[0] - b'0')
            }
            Some(_) => return Err(invalid()),
        };
        whole
            .checked_mul(10)
            .and_then(|tenths| tenths.checked_add(tenth))
            .map(Self::from_tenths)
            .ok_or_else(invalid)
    }
}

/// Converts anomaly intervals into impacted production days.
///
/// Every calendar day touched by the interval contributes its overlap with
/// the work shift. Holiday rules are not consulted: a stoppage on a rest day
/// still counts the shift hours of that day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnomalyDurationCalculator {
    shift: WorkShift,
    max_span_days: i64,
}

impl Default for AnomalyDurationCalculator {
    fn default() -> Self {
        Self::new(WorkShift::default())
    }
}

impl AnomalyDurationCalculator {
    pub fn new(shift: WorkShift) -> Self {
        Self {
            shift,
            max_span_days: DEFAULT_MAX_SPAN_DAYS,
        }
    }

    pub fn with_max_span_days(self, max_span_days: i64) -> Self {
        Self {
            max_span_days,
            ..self
        }
    }

    pub fn shift(&self) -> &WorkShift {
        &self.shift
    }

    pub fn max_span_days(&self) -> i64 {
        self.max_span_days
    }

    /// Impacted production days between `start` and `end`.
    ///
    /// A missing bound or an interval with `start >= end` yields zero. The
    /// only error is a span longer than the configured limit.
    pub fn duration_days(
        &self,
        start: Option<NaiveDateTime>,
        end: Option<NaiveDateTime>,
    ) -> Result<DurationDays, DurationError> {
        let (Some(start), Some(end)) = (start, end) else {
            return Ok(DurationDays::ZERO);
        };
        if start >= end {
            return Ok(DurationDays::ZERO);
        }
        self.check_span(start, end)?;

        let worked_ms = self.shift_overlap_ms(start, end);
        let days = DurationDays::from_tenths(rounded_tenths(worked_ms, self.shift.day_length_ms()));
        debug!(%start, %end, worked_ms, days = %days, "computed anomaly duration");
        Ok(days)
    }

    /// Same as [`duration_days`](Self::duration_days), rendered for display and storage.
    pub fn compute(
        &self,
        start: Option<NaiveDateTime>,
        end: Option<NaiveDateTime>,
    ) -> Result<String, DurationError> {
        Ok(self.duration_days(start, end)?.to_string())
    }

    /// Rejects intervals whose calendar-day span exceeds the limit.
    pub fn check_span(&self, start: NaiveDateTime, end: NaiveDateTime) -> Result<(), DurationError> {
        let days = (end.date() - start.date()).num_days();
        if days > self.max_span_days {
            return Err(DurationError::SpanTooLong {
                days,
                max: self.max_span_days,
            });
        }
        Ok(())
    }

    /// Milliseconds of `[start, end]` falling inside the shift window of each day.
    pub fn shift_overlap_ms(&self, start: NaiveDateTime, end: NaiveDateTime) -> i64 {
        let mut total = 0;
        let mut day = start.date();
        let last = end.date();

        while day <= last {
            let (shift_start, shift_end) = self.shift.window(day);
            let overlap_start = start.max(shift_start);
            let overlap_end = end.min(shift_end);
            if overlap_start < overlap_end {
                total += (overlap_end - overlap_start).num_milliseconds();
            }
            match day.succ_opt() {
                Some(next) => day = next,
                None => break,
            }
        }
        total
    }
}

/// `worked_ms / day_ms` in tenths, rounded half up, computed without floats.
fn rounded_tenths(worked_ms: i64, day_ms: i64) -> u64 {
    if worked_ms <= 0 || day_ms <= 0 {
        return 0;
    }
    let numerator = i128::from(worked_ms) * 20 + i128::from(day_ms);
    let denominator = i128::from(day_ms) * 2;
    (numerator / denominator) as u64
}

/// Impacted production days under the default 08:30–17:30 shift.
pub fn compute_duration_days(
    start: Option<NaiveDateTime>,
    end: Option<NaiveDateTime>,
) -> Result<String, DurationError> {
    AnomalyDurationCalculator::default().compute(start, end)
}

/// Parses a form timestamp as local wall-clock time.
///
/// Offset-bearing RFC 3339 input keeps its own wall-clock reading.
pub fn parse_local_timestamp(input: &str) -> Result<NaiveDateTime, DurationError> {
    let trimmed = input.trim();
    for format in TIMESTAMP_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(parsed);
        }
    }
    DateTime::parse_from_rfc3339(trimmed)
        .map(|parsed| parsed.naive_local())
        .map_err(|_| DurationError::InvalidTimestamp(input.to_string()))
}
