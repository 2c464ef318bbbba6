use chrono::NaiveDate;
use tracing::warn;

use crate::calendar::WorkingCalendar;
use crate::duration::DEFAULT_MAX_SPAN_DAYS;
use crate::model::MachineModel;
use crate::schedule::governing_selection;
use crate::shift::WorkShift;

/// Most working days a projection will count forward.
pub const MAX_PROJECTION_WORKING_DAYS: u32 = DEFAULT_MAX_SPAN_DAYS as u32;

/// Working days needed to cover `hours` of work at one shift per day.
///
/// `None` when the count is not finite or exceeds
/// [`MAX_PROJECTION_WORKING_DAYS`].
pub fn required_working_days(hours: f64, shift: &WorkShift) -> Option<u32> {
    if hours.is_nan() || hours <= 0.0 {
        return Some(0);
    }
    let days = (hours / shift.hours_per_day).ceil();
    if !days.is_finite() || days < 0.0 || days > f64::from(MAX_PROJECTION_WORKING_DAYS) {
        warn!(hours, hours_per_day = shift.hours_per_day, "work content out of projection range");
        return None;
    }
    Some(days as u32)
}

/// Last working day needed to burn down `hours`, starting on `start`.
///
/// `start` is the first candidate day. With no hours left the result is the
/// first working day on or after `start`. `None` when the work cannot be
/// projected, see [`required_working_days`].
pub fn project_completion<C>(start: NaiveDate, hours: f64, shift: &WorkShift, calendar: &C) -> Option<NaiveDate>
where
    C: WorkingCalendar + ?Sized,
{
    let days = required_working_days(hours, shift)?.max(1);
    calendar.nth_working_day(start, days)
}

/// Projected completion for a fresh order of `model` starting on `start`.
///
/// `None` when the model's designated lane matches no steps or the work
/// content is out of range.
pub fn project_order_completion<C>(
    model: &MachineModel,
    start: NaiveDate,
    shift: &WorkShift,
    calendar: &C,
) -> Option<NaiveDate>
where
    C: WorkingCalendar + ?Sized,
{
    let selection = governing_selection(model);
    if selection.is_empty() {
        warn!(model = %model.name, mode = %selection.mode, "no governing steps, completion not projected");
        return None;
    }
    project_completion(start, selection.total_hours(), shift, calendar)
}
