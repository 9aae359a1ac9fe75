//! Plan model definition and related functionality.

use std::{convert::Infallible, fmt, str::FromStr};

use jiff::Timestamp;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Step, StepStatus};

/// Opaque plan identifier.
///
/// Generated from a random UUID so identifiers stay unique across processes
/// and restarts.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlanId(String);

impl PlanId {
    /// Generates a fresh identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for PlanId {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.to_string()))
    }
}

impl From<&str> for PlanId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for PlanId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl AsRef<str> for PlanId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A task decomposed into a graph of steps.
///
/// `steps` keeps declaration order. That order only makes iteration
/// deterministic; execution order is governed by dependencies.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Plan {
    /// Unique identifier for the plan
    pub id: PlanId,

    /// The natural-language task the plan was derived from
    pub task: String,

    /// Steps in declaration order
    #[serde(default)]
    pub steps: Vec<Step>,

    /// Timestamp when the plan was created (UTC)
    pub created_at: Timestamp,

    /// Timestamp of the last state change (UTC)
    pub updated_at: Timestamp,
}

impl Plan {
    /// Creates a plan with a fresh identifier. The steps are taken as given.
    pub fn new(task: impl Into<String>, steps: Vec<Step>) -> Self {
        let now = Timestamp::now();
        Self {
            id: PlanId::generate(),
            task: task.into(),
            steps,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn step(&self, id: &str) -> Option<&Step> {
        self.steps.iter().find(|step| step.id == id)
    }

    pub fn step_mut(&mut self, id: &str) -> Option<&mut Step> {
        self.steps.iter_mut().find(|step| step.id == id)
    }

    /// True when every step has completed. An empty plan is complete.
    pub fn is_complete(&self) -> bool {
        self.steps
            .iter()
            .all(|step| step.status == StepStatus::Completed)
    }

    /// IDs of every step that has not completed, in declaration order.
    pub fn unfinished_ids(&self) -> Vec<String> {
        self.ids_where(|status| status != StepStatus::Completed)
    }

    /// IDs of failed steps, in declaration order.
    pub fn failed_ids(&self) -> Vec<String> {
        self.ids_where(|status| status == StepStatus::Failed)
    }

    /// `(completed, total)` step counts.
    pub fn progress(&self) -> (usize, usize) {
        let completed = self
            .steps
            .iter()
            .filter(|step| step.status == StepStatus::Completed)
            .count();
        (completed, self.steps.len())
    }

    /// Puts steps left `Running` by an interrupted run back to `Pending`.
    ///
    /// Only meant for a snapshot that was just loaded: a crash or a
    /// cancellation can persist a generation whose siblings never finished.
    /// Returns the IDs that were reset.
    pub fn reset_interrupted(&mut self) -> Vec<String> {
        self.reset_where(StepStatus::Running)
    }

    /// Puts failed steps back to `Pending` so an operator can run the plan
    /// again after fixing the cause. Returns the IDs that were reset.
    pub fn reset_failed(&mut self) -> Vec<String> {
        self.reset_where(StepStatus::Failed)
    }

    pub(crate) fn touch(&mut self) {
        self.updated_at = Timestamp::now();
    }

    fn ids_where(&self, predicate: impl Fn(StepStatus) -> bool) -> Vec<String> {
        self.steps
            .iter()
            .filter(|step| predicate(step.status))
            .map(|step| step.id.clone())
            .collect()
    }

    fn reset_where(&mut self, status: StepStatus) -> Vec<String> {
        let mut reset = Vec::new();
        for step in self.steps.iter_mut().filter(|step| step.status == status) {
            step.status = StepStatus::Pending;
            step.result = None;
            step.attempts = 0;
            reset.push(step.id.clone());
        }
        if !reset.is_empty() {
            self.touch();
        }
        reset
    }
}
