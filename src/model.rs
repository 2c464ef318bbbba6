use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};

use crate::error::ModelError;

/// One process step of a machine model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessStep {
    pub name: String,
    /// Production lane; steps in different lanes can proceed concurrently.
    pub parallel_module: String,
    /// Station or sub-grouping within the lane.
    #[serde(default)]
    pub module: String,
    /// Responsible departments. Informational only.
    #[serde(default)]
    pub departments: BTreeSet<String>,
    #[serde(default)]
    pub estimated_hours: f64,
}

impl ProcessStep {
    pub fn new(name: impl Into<String>, parallel_module: impl Into<String>, estimated_hours: f64) -> Self {
        Self {
            name: name.into(),
            parallel_module: parallel_module.into(),
            module: String::new(),
            departments: BTreeSet::new(),
            estimated_hours,
        }
    }

    pub fn with_module(mut self, module: impl Into<String>) -> Self {
        self.module = module.into();
        self
    }

    pub fn with_departments<I, S>(mut self, departments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.departments = departments.into_iter().map(Into::into).collect();
        self
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MachineModel {
    pub name: String,
    /// Steps in execution order.
    #[serde(default)]
    pub steps: Vec<ProcessStep>,
    /// Lane whose steps alone drive completion-date estimation, when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schedule_calculation_module: Option<String>,
}

impl MachineModel {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_steps(mut self, steps: Vec<ProcessStep>) -> Self {
        self.steps = steps;
        self
    }

    pub fn with_schedule_calculation_module(mut self, lane: impl Into<String>) -> Self {
        self.schedule_calculation_module = Some(lane.into());
        self
    }

    pub fn push_step(&mut self, step: ProcessStep) {
        self.steps.push(step);
    }

    pub fn set_schedule_calculation_module(&mut self, lane: Option<String>) {
        self.schedule_calculation_module = lane;
    }

    /// The designated lane, ignoring blank values.
    pub fn designated_lane(&self) -> Option<&str> {
        self.schedule_calculation_module
            .as_deref()
            .map(str::trim)
            .filter(|lane| !lane.is_empty())
    }

    pub fn step(&self, name: &str) -> Option<&ProcessStep> {
        self.steps.iter().find(|step| step.name == name)
    }

    /// Distinct lanes in order of first appearance.
    pub fn lanes(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.steps
            .iter()
            .map(|step| step.parallel_module.as_str())
            .filter(|lane| seen.insert(*lane))
            .collect()
    }

    pub fn total_estimated_hours(&self) -> f64 {
        self.steps.iter().map(|step| step.estimated_hours).sum()
    }

    pub fn validate(&self) -> Result<(), ModelError> {
        validate_steps(&self.steps)
    }
}

pub fn validate_steps(steps: &[ProcessStep]) -> Result<(), ModelError> {
    let mut seen_names = HashSet::with_capacity(steps.len());
    for (index, step) in steps.iter().enumerate() {
        if step.name.trim().is_empty() {
            return Err(ModelError::EmptyStepName { index });
        }
        if !seen_names.insert(step.name.as_str()) {
            return Err(ModelError::DuplicateStep(step.name.clone()));
        }
        if !step.estimated_hours.is_finite() || step.estimated_hours < 0.0 {
            return Err(ModelError::InvalidHours {
                name: step.name.clone(),
                hours: step.estimated_hours,
            });
        }
    }
    Ok(())
}
