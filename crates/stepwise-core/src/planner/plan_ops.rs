//! Plan building and snapshot operations for the Planner.

use log::info;

use super::{decompose, Decomposer, Planner};
use crate::{
    display::PlanSummaries,
    error::Result,
    graph,
    models::Plan,
    params::{BuildPlan, Id, LoadPlan},
};

impl Planner {
    /// Builds a validated plan for `task` through `decomposer`.
    ///
    /// The plan is not saved; call [`Planner::save_plan`] to persist it.
    pub async fn build_plan(&self, task: &str, decomposer: &dyn Decomposer) -> Result<Plan> {
        decompose::build_plan(task, decomposer).await
    }

    /// Parameter-struct flavour of [`Planner::build_plan`].
    pub async fn build_plan_from(
        &self,
        params: &BuildPlan,
        decomposer: &dyn Decomposer,
    ) -> Result<Plan> {
        self.build_plan(&params.task, decomposer).await
    }

    /// Persists a snapshot of `plan`.
    pub async fn save_plan(&self, plan: &Plan) -> Result<()> {
        self.store.save(plan).await
    }

    /// Loads a plan snapshot, re-validating its graph when `params.verify` is
    /// set.
    pub async fn load_plan(&self, params: &LoadPlan) -> Result<Plan> {
        let plan = self.store.load(&params.plan_id()).await?;
        if params.verify {
            graph::validate_steps(&plan.steps)?;
        }
        Ok(plan)
    }

    /// Lists stored plans as summaries, most recently updated first.
    pub async fn list_plans(&self) -> Result<PlanSummaries> {
        Ok(PlanSummaries(self.store.list().await?))
    }

    /// Permanently deletes a stored plan.
    pub async fn delete_plan(&self, params: &Id) -> Result<()> {
        let id = params.plan_id();
        self.store.delete(&id).await?;
        info!("Deleted plan {id}");
        Ok(())
    }
}
