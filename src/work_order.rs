use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::calendar::WorkingCalendar;
use crate::error::WorkOrderError;
use crate::model::MachineModel;
use crate::projection::project_completion;
use crate::schedule::governing_selection;
use crate::shift::WorkShift;

/// A production order for one machine model, with per-step completion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkOrder {
    pub order_no: String,
    pub model_name: String,
    pub start_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_date: Option<NaiveDate>,
    #[serde(default)]
    completed_steps: BTreeSet<String>,
}

impl WorkOrder {
    pub fn new(order_no: impl Into<String>, model: &MachineModel, start_date: NaiveDate) -> Self {
        Self {
            order_no: order_no.into(),
            model_name: model.name.clone(),
            start_date,
            target_date: None,
            completed_steps: BTreeSet::new(),
        }
    }

    pub fn with_target_date(mut self, target_date: NaiveDate) -> Self {
        self.target_date = Some(target_date);
        self
    }

    pub fn completed_steps(&self) -> impl Iterator<Item = &str> + '_ {
        self.completed_steps.iter().map(String::as_str)
    }

    pub fn is_step_complete(&self, step: &str) -> bool {
        self.completed_steps.contains(step)
    }

    pub fn mark_step_complete(&mut self, model: &MachineModel, step: &str) -> Result<(), WorkOrderError> {
        self.check_model(model)?;
        if model.step(step).is_none() {
            return Err(WorkOrderError::UnknownStep {
                model: model.name.clone(),
                step: step.to_string(),
            });
        }
        self.completed_steps.insert(step.to_string());
        Ok(())
    }

    /// Returns whether the step had been marked complete.
    pub fn reopen_step(&mut self, step: &str) -> bool {
        self.completed_steps.remove(step)
    }

    /// Completed estimated hours among the governing steps.
    pub fn completed_hours(&self, model: &MachineModel) -> f64 {
        governing_selection(model)
            .steps
            .iter()
            .filter(|step| self.is_step_complete(&step.name))
            .map(|step| step.estimated_hours)
            .sum()
    }

    pub fn remaining_hours(&self, model: &MachineModel) -> f64 {
        let total = governing_selection(model).total_hours();
        (total - self.completed_hours(model)).max(0.0)
    }

    /// Share of governing hours completed, in `0.0..=1.0`.
    pub fn progress(&self, model: &MachineModel) -> f64 {
        let total = governing_selection(model).total_hours();
        if total <= 0.0 {
            return 0.0;
        }
        (self.completed_hours(model) / total).clamp(0.0, 1.0)
    }

    /// When the remaining governing work finishes if resumed on `from`.
    ///
    /// `None` when the model has no governing steps or the remaining work is
    /// beyond the projection range.
    pub fn projected_completion<C>(
        &self,
        model: &MachineModel,
        from: NaiveDate,
        shift: &WorkShift,
        calendar: &C,
    ) -> Option<NaiveDate>
    where
        C: WorkingCalendar + ?Sized,
    {
        if governing_selection(model).is_empty() {
            return None;
        }
        project_completion(from, self.remaining_hours(model), shift, calendar)
    }

    /// Working days between the projected completion and the target date.
    /// Positive when the order finishes early, negative when it overruns.
    /// `None` without a target date or a projection.
    pub fn schedule_slack_days<C>(
        &self,
        model: &MachineModel,
        from: NaiveDate,
        shift: &WorkShift,
        calendar: &C,
    ) -> Option<i64>
    where
        C: WorkingCalendar + ?Sized,
    {
        let target = self.target_date?;
        let projected = self.projected_completion(model, from, shift, calendar)?;
        if projected <= target {
            Some(calendar.count_working_days(projected.succ_opt()?, target))
        } else {
            Some(-calendar.count_working_days(target.succ_opt()?, projected))
        }
    }

    /// Whether the projection overshoots the target date. `None` without a
    /// target date or a projection.
    pub fn is_behind_schedule<C>(
        &self,
        model: &MachineModel,
        from: NaiveDate,
        shift: &WorkShift,
        calendar: &C,
    ) -> Option<bool>
    where
        C: WorkingCalendar + ?Sized,
    {
        self.schedule_slack_days(model, from, shift, calendar)
            .map(|slack| slack < 0)
    }

    fn check_model(&self, model: &MachineModel) -> Result<(), WorkOrderError> {
        if model.name != self.model_name {
            return Err(WorkOrderError::ModelMismatch {
                order_no: self.order_no.clone(),
                expected: self.model_name.clone(),
                actual: model.name.clone(),
            });
        }
        Ok(())
    }
}
