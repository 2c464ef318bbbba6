use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DurationError {
    #[error("anomaly spans {days} days, which exceeds the {max}-day limit")]
    SpanTooLong { days: i64, max: i64 },
    #[error("invalid timestamp '{0}' (expected YYYY-MM-DDTHH:MM[:SS])")]
    InvalidTimestamp(String),
    #[error("invalid duration '{0}' (expected whole days with at most one decimal digit)")]
    InvalidDuration(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalendarError {
    #[error("unknown holiday rule type '{0}' (expected single, double, alternate or none)")]
    UnknownRuleType(String),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    #[error("step #{index} requires a non-empty name")]
    EmptyStepName { index: usize },
    #[error("duplicate step name '{0}'")]
    DuplicateStep(String),
    #[error("step '{name}' has invalid estimated_hours {hours}")]
    InvalidHours { name: String, hours: f64 },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WorkOrderError {
    #[error("model '{model}' has no step named '{step}'")]
    UnknownStep { model: String, step: String },
    #[error("work order {order_no} belongs to model '{expected}', not '{actual}'")]
    ModelMismatch {
        order_no: String,
        expected: String,
        actual: String,
    },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;
