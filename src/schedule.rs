use std::fmt;
use tracing::{debug, warn};

use crate::model::{MachineModel, ProcessStep};

/// Which steps of a model drive its completion date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GoverningMode {
    /// Every step, in model order.
    Aggregate,
    /// Only the steps of one lane.
    Lane(String),
}

impl fmt::Display for GoverningMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GoverningMode::Aggregate => f.write_str("all steps"),
            GoverningMode::Lane(lane) => write!(f, "lane '{lane}'"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleSelection<'a> {
    pub mode: GoverningMode,
    pub steps: Vec<&'a ProcessStep>,
}

impl<'a> ScheduleSelection<'a> {
    /// True for a lane designation that no step carries. Callers decide
    /// whether to warn or fall back; the selection itself never does.
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn total_hours(&self) -> f64 {
        self.steps.iter().map(|step| step.estimated_hours).sum()
    }

    pub fn step_names(&self) -> Vec<&'a str> {
        self.steps.iter().map(|step| step.name.as_str()).collect()
    }

    pub fn contains(&self, step_name: &str) -> bool {
        self.steps.iter().any(|step| step.name == step_name)
    }
}

pub fn governing_selection(model: &MachineModel) -> ScheduleSelection<'_> {
    let Some(lane) = model.designated_lane() else {
        return ScheduleSelection {
            mode: GoverningMode::Aggregate,
            steps: model.steps.iter().collect(),
        };
    };

    let steps: Vec<&ProcessStep> = model
        .steps
        .iter()
        .filter(|step| step.parallel_module == lane)
        .collect();

    if steps.is_empty() {
        warn!(model = %model.name, lane, "schedule calculation module matches no steps");
    } else {
        debug!(model = %model.name, lane, count = steps.len(), "selected governing lane");
    }

    ScheduleSelection {
        mode: GoverningMode::Lane(lane.to_string()),
        steps,
    }
}

/// Steps whose estimated hours govern the order's completion date.
///
/// All steps when the model has no designated lane, otherwise the steps of
/// that lane in their original order. A stale designation yields an empty
/// sequence rather than the full list.
pub fn select_governing_steps(model: &MachineModel) -> Vec<&ProcessStep> {
    governing_selection(model).steps
}
