//! Running and resuming plans.

use log::warn;
use tokio_util::sync::CancellationToken;

use super::{engine, Planner, StepExecutor};
use crate::{error::Result, models::Plan, params::ResumePlan};

impl Planner {
    /// Runs `plan` to completion with the planner's store and configuration.
    pub async fn execute_plan(&self, plan: &mut Plan, executor: &dyn StepExecutor) -> Result<()> {
        self.execute_plan_with_cancel(plan, executor, &CancellationToken::new())
            .await
    }

    /// Like [`Planner::execute_plan`], stopping before the next generation
    /// once `cancel` fires.
    pub async fn execute_plan_with_cancel(
        &self,
        plan: &mut Plan,
        executor: &dyn StepExecutor,
        cancel: &CancellationToken,
    ) -> Result<()> {
        engine::execute_plan(plan, executor, self.store.as_ref(), &self.config, cancel).await
    }

    /// Prepares a freshly loaded snapshot for another run.
    ///
    /// Steps left `Running` by an interrupted run go back to `Pending`; with
    /// `retry_failed`, failed steps do too. The plan is saved if anything
    /// changed.
    pub async fn prepare_resume(&self, plan: &mut Plan, params: &ResumePlan) -> Result<()> {
        let interrupted = plan.reset_interrupted();
        if !interrupted.is_empty() {
            warn!(
                "Plan {}: recovered interrupted steps [{}]",
                plan.id,
                interrupted.join(", ")
            );
        }

        let failed = if params.retry_failed {
            plan.reset_failed()
        } else {
            Vec::new()
        };
        if !failed.is_empty() {
            warn!("Plan {}: retrying failed steps [{}]", plan.id, failed.join(", "));
        }

        if !interrupted.is_empty() || !failed.is_empty() {
            self.store.save(plan).await?;
        }
        Ok(())
    }
}
