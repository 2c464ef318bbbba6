use chrono::NaiveDateTime;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

use crate::duration::{AnomalyDurationCalculator, DurationDays};
use crate::error::DurationError;

/// Whether production kept running through the anomaly. Display only; it
/// has no bearing on the duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AnomalyStatus {
    Continuous,
    #[default]
    Halted,
}

impl AnomalyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnomalyStatus::Continuous => "CONTINUOUS",
            AnomalyStatus::Halted => "HALTED",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AnomalyStatus::Continuous => "production continues",
            AnomalyStatus::Halted => "production halted",
        }
    }
}

impl fmt::Display for AnomalyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnomalyRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub work_order_no: String,
    #[serde(default)]
    pub description: String,
    pub anomaly_status: AnomalyStatus,
    pub start_time: Option<NaiveDateTime>,
    /// `None` while the anomaly is ongoing.
    #[serde(default)]
    pub end_time: Option<NaiveDateTime>,
    /// Derived from the two timestamps; see [`AnomalyRecord::recompute`].
    pub duration_days: String,
}

impl AnomalyRecord {
    pub fn is_ongoing(&self) -> bool {
        self.end_time.is_none()
    }

    pub fn recompute(&mut self, calculator: &AnomalyDurationCalculator) -> Result<(), DurationError> {
        self.duration_days = calculator.compute(self.start_time, self.end_time)?;
        Ok(())
    }

    /// The persisted duration as a value.
    pub fn stored_duration(&self) -> Result<DurationDays, DurationError> {
        self.duration_days.parse()
    }

    /// Whether the stored duration still matches a fresh computation.
    /// Values are compared, so `1.0` matches `1`; an unreadable stored value
    /// never matches.
    pub fn duration_matches(&self, calculator: &AnomalyDurationCalculator) -> Result<bool, DurationError> {
        let recomputed = calculator.duration_days(self.start_time, self.end_time)?;
        Ok(self.stored_duration().ok() == Some(recomputed))
    }
}

/// In-progress anomaly form owned by the caller.
///
/// The duration is only derived in [`finalize`](Self::finalize), after both
/// timestamps are in their final state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnomalyDraft {
    pub id: Option<i64>,
    pub work_order_no: String,
    pub description: String,
    pub anomaly_status: AnomalyStatus,
    start_time: Option<NaiveDateTime>,
    end_time: Option<NaiveDateTime>,
}

impl AnomalyDraft {
    pub fn new(work_order_no: impl Into<String>, anomaly_status: AnomalyStatus) -> Self {
        Self {
            work_order_no: work_order_no.into(),
            anomaly_status,
            ..Self::default()
        }
    }

    pub fn from_record(record: &AnomalyRecord) -> Self {
        Self {
            id: record.id,
            work_order_no: record.work_order_no.clone(),
            description: record.description.clone(),
            anomaly_status: record.anomaly_status,
            start_time: record.start_time,
            end_time: record.end_time,
        }
    }

    pub fn start_time(&self) -> Option<NaiveDateTime> {
        self.start_time
    }

    pub fn end_time(&self) -> Option<NaiveDateTime> {
        self.end_time
    }

    pub fn set_start(&mut self, start: Option<NaiveDateTime>) {
        self.start_time = start;
    }

    pub fn set_end(&mut self, end: Option<NaiveDateTime>) {
        self.end_time = end;
    }

    /// Duration for display while the form is still being edited.
    pub fn preview_duration(&self, calculator: &AnomalyDurationCalculator) -> Result<String, DurationError> {
        calculator.compute(self.start_time, self.end_time)
    }

    pub fn finalize(self, calculator: &AnomalyDurationCalculator) -> Result<AnomalyRecord, DurationError> {
        let duration_days = calculator.compute(self.start_time, self.end_time)?;
        Ok(AnomalyRecord {
            id: self.id,
            work_order_no: self.work_order_no,
            description: self.description,
            anomaly_status: self.anomaly_status,
            start_time: self.start_time,
            end_time: self.end_time,
            duration_days,
        })
    }
}

/// A persisted record whose stored duration disagrees with recomputation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DurationDrift {
    pub index: usize,
    pub id: Option<i64>,
    pub stored: String,
    pub recomputed: Result<String, DurationError>,
}

/// Recomputes every record's duration and reports the ones whose stored
/// value differs or cannot be read.
/// Records are checked in parallel; the report keeps input order.
pub fn audit_durations(records: &[AnomalyRecord], calculator: &AnomalyDurationCalculator) -> Vec<DurationDrift> {
    let drifts: Vec<DurationDrift> = records
        .par_iter()
        .enumerate()
        .filter_map(|(index, record)| {
            let recomputed = calculator.duration_days(record.start_time, record.end_time);
            if let (Ok(fresh), Ok(stored)) = (&recomputed, record.stored_duration()) {
                if *fresh == stored {
                    return None;
                }
            }
            Some(DurationDrift {
                index,
                id: record.id,
                stored: record.duration_days.clone(),
                recomputed: recomputed.map(|days| days.to_string()),
            })
        })
        .collect();

    if !drifts.is_empty() {
        warn!(drifted = drifts.len(), total = records.len(), "anomaly durations out of date");
    }
    drifts
}
