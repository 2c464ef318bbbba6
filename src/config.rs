use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;

use crate::calendar::{HolidayCalendar, HolidayRule};
use crate::duration::{AnomalyDurationCalculator, DEFAULT_MAX_SPAN_DAYS};
use crate::error::{ConfigError, ConfigResult};
use crate::shift::WorkShift;

/// Dashboard settings persisted as JSON. Missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DashboardConfig {
    pub shift: WorkShift,
    pub holiday_rule: HolidayRule,
    pub max_anomaly_span_days: i64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            shift: WorkShift::default(),
            holiday_rule: HolidayRule::default(),
            max_anomaly_span_days: DEFAULT_MAX_SPAN_DAYS,
        }
    }
}

impl DashboardConfig {
    pub fn validate(&self) -> ConfigResult<()> {
        self.shift.validate()?;
        if self.max_anomaly_span_days <= 0 {
            return Err(ConfigError::Invalid(format!(
                "maxAnomalySpanDays must be positive (got {})",
                self.max_anomaly_span_days
            )));
        }
        Ok(())
    }

    pub fn calculator(&self) -> AnomalyDurationCalculator {
        AnomalyDurationCalculator::new(self.shift).with_max_span_days(self.max_anomaly_span_days)
    }

    pub fn calendar(&self) -> HolidayCalendar {
        HolidayCalendar::new(self.holiday_rule.clone())
    }

    pub fn from_json_str(json: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_string(&self) -> ConfigResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        let config = Self::from_json_str(&contents)?;
        info!(path = %path.display(), "loaded dashboard config");
        Ok(config)
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> ConfigResult<()> {
        self.validate()?;
        fs::write(path, self.to_json_string()?)?;
        Ok(())
    }
}
