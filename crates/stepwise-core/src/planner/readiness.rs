//! Readiness resolution: which steps may run right now.

use std::collections::HashMap;

use crate::{
    error::{PlannerError, Result},
    models::{Plan, Step, StepStatus},
};

/// Returns the steps that are `Pending` and whose dependencies have all
/// `Completed`, in declaration order.
///
/// Every dependency of every step is resolved, not only those of pending
/// steps, so a corrupted snapshot is reported as soon as it is looked at.
///
/// # Errors
///
/// - [`PlannerError::DuplicateStep`] when two steps share an ID
/// - [`PlannerError::MissingDependency`] when a dependency names no step in
///   the plan
pub fn find_ready_steps(plan: &Plan) -> Result<Vec<&Step>> {
    let mut statuses: HashMap<&str, StepStatus> = HashMap::with_capacity(plan.steps.len());
    for step in &plan.steps {
        if statuses.insert(step.id.as_str(), step.status).is_some() {
            return Err(PlannerError::DuplicateStep {
                step_id: step.id.clone(),
            });
        }
    }

    let mut ready = Vec::new();
    for step in &plan.steps {
        let mut satisfied = true;
        for dep in &step.dependencies {
            match statuses.get(dep.as_str()) {
                Some(StepStatus::Completed) => {}
                Some(_) => satisfied = false,
                None => {
                    return Err(PlannerError::MissingDependency {
                        step_id: step.id.clone(),
                        dependency: dep.clone(),
                    })
                }
            }
        }
        if satisfied && step.status == StepStatus::Pending {
            ready.push(step);
        }
    }
    Ok(ready)
}

/// IDs of [`find_ready_steps`], fixed as an owned list so the plan can be
/// mutated while the generation is dispatched.
pub fn ready_step_ids(plan: &Plan) -> Result<Vec<String>> {
    Ok(find_ready_steps(plan)?
        .into_iter()
        .map(|step| step.id.clone())
        .collect())
}
