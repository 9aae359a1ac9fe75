//! Step model definition and related functionality.

use serde::{Deserialize, Serialize};

use super::StepStatus;

/// Represents an individual unit of work within a plan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Step {
    /// Identifier, unique within the owning plan
    pub id: String,

    /// Human-readable description of the work; opaque to the engine
    pub description: String,

    /// IDs of the steps that must complete before this one may run
    #[serde(default)]
    pub dependencies: Vec<String>,

    /// Current status of the step
    #[serde(default)]
    pub status: StepStatus,

    /// Output of the executor (set only once the step has completed)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,

    /// Executor invocations made for this step in the latest run
    #[serde(default)]
    pub attempts: u32,
}

impl Step {
    /// Creates a pending step.
    pub fn new(
        id: impl Into<String>,
        description: impl Into<String>,
        dependencies: &[&str],
    ) -> Self {
        Self {
            id: id.into(),
            description: description.into(),
            dependencies: dependencies.iter().map(|dep| (*dep).to_string()).collect(),
            status: StepStatus::Pending,
            result: None,
            attempts: 0,
        }
    }

    /// Whether this step declares `id` as a dependency.
    pub fn depends_on(&self, id: &str) -> bool {
        self.dependencies.iter().any(|dep| dep == id)
    }
}
