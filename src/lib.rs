pub mod anomaly;
pub mod calendar;
pub mod config;
pub mod duration;
pub mod error;
#[cfg(feature = "cli")]
pub mod logging;
pub mod model;
pub mod projection;
pub mod rule_store;
pub mod schedule;
pub mod shift;
pub mod work_order;

pub use anomaly::{AnomalyDraft, AnomalyRecord, AnomalyStatus, DurationDrift, audit_durations};
pub use calendar::{HolidayCalendar, HolidayRule, HolidayRuleType, WorkingCalendar, is_working_day};
pub use config::DashboardConfig;
pub use duration::{
    AnomalyDurationCalculator, DEFAULT_MAX_SPAN_DAYS, DurationDays, compute_duration_days,
    parse_local_timestamp,
};
pub use error::{CalendarError, ConfigError, ConfigResult, DurationError, ModelError, WorkOrderError};
pub use model::{MachineModel, ProcessStep};
pub use projection::{
    MAX_PROJECTION_WORKING_DAYS, project_completion, project_order_completion, required_working_days,
};
pub use rule_store::HolidayRuleStore;
pub use schedule::{GoverningMode, ScheduleSelection, governing_selection, select_governing_steps};
pub use shift::WorkShift;
pub use work_order::WorkOrder;
