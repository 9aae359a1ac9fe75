//! Parameter structures for Stepwise operations
//!
//! Interface-agnostic parameter types shared by every front end. They carry
//! no framework derives; the CLI wraps them in clap argument structs and
//! converts with `From`, keeping clap out of the core:
//!
//! ```text
//! ┌─────────────────┐    ┌─────────────────┐    ┌─────────────────┐
//! │   CLI Args      │    │  Core Params    │    │    Planner      │
//! │  (clap derives) │───▶│ (minimal deps)  │───▶│   operations    │
//! └─────────────────┘    └─────────────────┘    └─────────────────┘
//! ```

use serde::{Deserialize, Serialize};

use crate::models::PlanId;

/// Generic parameters for operations requiring just a plan ID.
///
/// Used for operations like show, ready and delete.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Id {
    /// The ID of the plan to operate on
    pub id: String,
}

impl Id {
    pub fn plan_id(&self) -> PlanId {
        PlanId::from(self.id.trim())
    }
}

/// Parameters for building a new plan from a task description.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildPlan {
    /// Natural-language task to decompose
    pub task: String,
}

/// Parameters for loading a plan snapshot.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoadPlan {
    /// The ID of the plan to load
    pub id: String,
    /// Re-validate the step graph (for snapshots from untrusted sources)
    #[serde(default)]
    pub verify: bool,
}

impl LoadPlan {
    pub fn plan_id(&self) -> PlanId {
        PlanId::from(self.id.trim())
    }
}

/// Parameters for preparing a loaded plan to run again.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ResumePlan {
    /// Put failed steps back to pending before running
    #[serde(default)]
    pub retry_failed: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_trims_whitespace() {
        let params = Id {
            id: "  3f1c-plan \n".to_string(),
        };
        assert_eq!(params.plan_id().as_str(), "3f1c-plan");
    }

    #[test]
    fn test_load_plan_defaults_to_unverified() {
        let params: LoadPlan = serde_json::from_str(r#"{"id": "p1"}"#).expect("parse");
        assert!(!params.verify);
        assert_eq!(params.plan_id(), PlanId::from("p1"));
    }

    #[test]
    fn test_resume_plan_default() {
        assert!(!ResumePlan::default().retry_failed);
    }
}
