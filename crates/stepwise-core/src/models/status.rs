//! Status enumeration for steps.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Type-safe enumeration of step statuses.
///
/// Steps move through `Pending -> Running -> {Completed | Failed}` and never
/// backwards during a run.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    /// Step is waiting for its dependencies or for dispatch
    #[default]
    Pending,

    /// Step has been handed to the executor
    Running,

    /// Step finished and holds a result
    Completed,

    /// Step used up its retry budget
    Failed,
}

impl FromStr for StepStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(StepStatus::Pending),
            "running" => Ok(StepStatus::Running),
            "completed" => Ok(StepStatus::Completed),
            "failed" => Ok(StepStatus::Failed),
            _ => Err(format!("Invalid step status: {s}")),
        }
    }
}

impl StepStatus {
    /// Convert to database string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            StepStatus::Pending => "pending",
            StepStatus::Running => "running",
            StepStatus::Completed => "completed",
            StepStatus::Failed => "failed",
        }
    }

    /// Whether the step has reached a final state for the current run.
    pub fn is_terminal(&self) -> bool {
        matches!(self, StepStatus::Completed | StepStatus::Failed)
    }

    /// Whether the state machine allows moving from `self` to `next`.
    ///
    /// ```rust
    /// use stepwise_core::models::StepStatus;
    ///
    /// assert!(StepStatus::Pending.can_transition_to(StepStatus::Running));
    /// assert!(StepStatus::Running.can_transition_to(StepStatus::Failed));
    /// assert!(!StepStatus::Running.can_transition_to(StepStatus::Pending));
    /// assert!(!StepStatus::Pending.can_transition_to(StepStatus::Completed));
    /// ```
    pub fn can_transition_to(&self, next: StepStatus) -> bool {
        matches!(
            (self, next),
            (StepStatus::Pending, StepStatus::Running)
                | (StepStatus::Running, StepStatus::Completed)
                | (StepStatus::Running, StepStatus::Failed)
        )
    }

    /// Get status with consistent icon formatting for display.
    ///
    /// # Icons Used
    /// - `○ Pending` - Circle for steps not started yet
    /// - `➤ Running` - Arrow for dispatched steps
    /// - `✓ Completed` - Checkmark for finished steps
    /// - `✗ Failed` - Cross for exhausted steps
    ///
    /// # Examples
    ///
    /// ```rust
    /// use stepwise_core::models::StepStatus;
    ///
    /// assert_eq!(StepStatus::Completed.with_icon(), "✓ Completed");
    /// assert_eq!(StepStatus::Running.with_icon(), "➤ Running");
    /// assert_eq!(StepStatus::Pending.with_icon(), "○ Pending");
    /// ```
    pub fn with_icon(&self) -> &'static str {
        match self {
            StepStatus::Pending => "○ Pending",
            StepStatus::Running => "➤ Running",
            StepStatus::Completed => "✓ Completed",
            StepStatus::Failed => "✗ Failed",
        }
    }
}
