//! Step executor collaborator contract.

use async_trait::async_trait;

use crate::{
    error::StepExecutionError,
    models::{Plan, PlanId, Step},
};

/// What an executor gets to see besides the step itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepContext {
    pub plan_id: PlanId,
    pub task: String,
    /// `(dependency id, result)` pairs in the step's dependency order
    pub dependency_results: Vec<(String, String)>,
}

impl StepContext {
    /// Collects the results of `step`'s dependencies from `plan`.
    ///
    /// Dependencies without a result contribute an empty string; the engine
    /// only builds a context once every dependency has completed.
    pub fn for_step(plan: &Plan, step: &Step) -> Self {
        let dependency_results = step
            .dependencies
            .iter()
            .map(|dep| {
                let result = plan
                    .step(dep)
                    .and_then(|s| s.result.clone())
                    .unwrap_or_default();
                (dep.clone(), result)
            })
            .collect();

        Self {
            plan_id: plan.id.clone(),
            task: plan.task.clone(),
            dependency_results,
        }
    }

    pub fn dependency_result(&self, id: &str) -> Option<&str> {
        self.dependency_results
            .iter()
            .find(|(dep, _)| dep == id)
            .map(|(_, result)| result.as_str())
    }
}

/// Performs the work a step describes.
///
/// The engine may call `execute` several times for the same step when earlier
/// attempts fail. Implementations own any deduplication of side effects.
#[async_trait]
pub trait StepExecutor: Send + Sync {
    async fn execute(
        &self,
        step: &Step,
        context: &StepContext,
    ) -> Result<String, StepExecutionError>;
}
