//! Plan summary types and functionality.

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

use super::{Plan, PlanId, StepStatus};

/// Summary information about a plan with step statistics.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlanSummary {
    /// Plan ID
    pub id: PlanId,
    /// Task the plan was built for
    pub task: String,
    /// Creation timestamp
    pub created_at: Timestamp,
    /// Last update timestamp
    pub updated_at: Timestamp,
    /// Total number of steps
    pub total_steps: u32,
    /// Number of completed steps
    pub completed_steps: u32,
    /// Number of failed steps
    pub failed_steps: u32,
    /// Number of steps not finished yet (pending or running)
    pub pending_steps: u32,
}

impl From<&Plan> for PlanSummary {
    fn from(plan: &Plan) -> Self {
        let count = |status: StepStatus| {
            plan.steps
                .iter()
                .filter(|step| step.status == status)
                .count() as u32
        };
        let total_steps = plan.steps.len() as u32;
        let completed_steps = count(StepStatus::Completed);
        let failed_steps = count(StepStatus::Failed);

        Self {
            id: plan.id.clone(),
            task: plan.task.clone(),
            created_at: plan.created_at,
            updated_at: plan.updated_at,
            total_steps,
            completed_steps,
            failed_steps,
            pending_steps: total_steps - completed_steps - failed_steps,
        }
    }
}
