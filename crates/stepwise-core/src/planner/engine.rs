//! The execution engine: drives a plan to completion one ready set
//! ("generation") at a time.
//!
//! Each generation is fixed before anything is dispatched. Steps of the same
//! generation never depend on each other, so they can run sequentially or
//! concurrently with the same final state. A snapshot is saved after every
//! step that completes or fails.

use futures::future::join_all;
use log::{debug, error, info, warn};
use tokio_util::sync::CancellationToken;

use super::{
    config::{Dispatch, EngineConfig},
    executor::{StepContext, StepExecutor},
    readiness::ready_step_ids,
};
use crate::{
    error::{PlannerError, Result, StepExecutionError},
    models::{Plan, Step, StepStatus},
    store::SnapshotStore,
};

/// Outcome of driving one step through its retry budget.
struct Attempted {
    attempts: u32,
    outcome: std::result::Result<String, StepExecutionError>,
}

/// Runs `plan` until every step has completed or a terminal error occurs.
///
/// The plan is mutated in place. Partial progress is persisted through
/// `store` as it happens and survives any error returned here.
///
/// # Errors
///
/// - [`PlannerError::StepExhausted`] when a step fails `max_retries + 1` times
/// - [`PlannerError::Deadlock`] when unfinished steps remain but none is ready
/// - [`PlannerError::Cancelled`] when `cancel` fires between generations
/// - [`PlannerError::DuplicateStep`] or [`PlannerError::MissingDependency`]
///   for a corrupted plan
/// - any error from `store`
pub async fn execute_plan(
    plan: &mut Plan,
    executor: &dyn StepExecutor,
    store: &dyn SnapshotStore,
    config: &EngineConfig,
    cancel: &CancellationToken,
) -> Result<()> {
    info!(
        "Executing plan {} ({} steps, max_retries={}, dispatch={:?})",
        plan.id,
        plan.steps.len(),
        config.max_retries,
        config.dispatch
    );

    let mut generation = 0usize;
    loop {
        let ready = ready_step_ids(plan)?;

        if ready.is_empty() {
            if plan.is_complete() {
                info!("Plan {} completed after {generation} generation(s)", plan.id);
                return Ok(());
            }
            let blocked = plan.unfinished_ids();
            let failed = plan.failed_ids();
            warn!(
                "Plan {} is deadlocked: blocked [{}], failed [{}]",
                plan.id,
                blocked.join(", "),
                failed.join(", ")
            );
            return Err(PlannerError::Deadlock { blocked, failed });
        }

        if cancel.is_cancelled() {
            let (completed, total) = plan.progress();
            warn!("Run of plan {} cancelled before generation {}", plan.id, generation + 1);
            return Err(PlannerError::Cancelled {
                plan_id: plan.id.clone(),
                completed,
                remaining: total - completed,
            });
        }

        generation += 1;
        debug!("Generation {generation}: [{}]", ready.join(", "));

        match config.dispatch {
            Dispatch::Sequential => {
                for id in &ready {
                    let (step, context) = start_step(plan, id)?;
                    let attempted = run_with_retries(&step, &context, executor, config).await;
                    finish_step(plan, id, attempted, store).await?;
                }
            }
            Dispatch::Concurrent => {
                dispatch_concurrently(plan, &ready, executor, store, config).await?;
            }
        }
    }
}

/// Dispatches the whole generation at once and applies the outcomes in
/// declaration order once every sibling has finished.
async fn dispatch_concurrently(
    plan: &mut Plan,
    ready: &[String],
    executor: &dyn StepExecutor,
    store: &dyn SnapshotStore,
    config: &EngineConfig,
) -> Result<()> {
    let mut jobs = Vec::with_capacity(ready.len());
    for id in ready {
        jobs.push(start_step(plan, id)?);
    }

    let outcomes = join_all(
        jobs.iter()
            .map(|(step, context)| run_with_retries(step, context, executor, config)),
    )
    .await;

    // Every outcome is applied before an error is returned, store errors first
    let mut first_exhausted = None;
    let mut first_store_error = None;
    for (id, attempted) in ready.iter().zip(outcomes) {
        match finish_step(plan, id, attempted, store).await {
            Ok(()) => {}
            Err(e @ PlannerError::StepExhausted { .. }) => {
                first_exhausted.get_or_insert(e);
            }
            Err(e) => {
                first_store_error.get_or_insert(e);
            }
        }
    }

    match first_store_error.or(first_exhausted) {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

/// Moves a ready step to `Running` and snapshots what the executor needs.
fn start_step(plan: &mut Plan, id: &str) -> Result<(Step, StepContext)> {
    let step = step_mut(plan, id)?;
    if !step.status.can_transition_to(StepStatus::Running) {
        return Err(PlannerError::invalid_input("step_id")
            .with_reason(format!("step '{id}' cannot start from {}", step.status)));
    }
    step.status = StepStatus::Running;
    step.attempts = 0;
    let step = step.clone();
    plan.touch();
    debug!("Step '{id}' running");

    let context = StepContext::for_step(plan, &step);
    Ok((step, context))
}

async fn run_with_retries(
    step: &Step,
    context: &StepContext,
    executor: &dyn StepExecutor,
    config: &EngineConfig,
) -> Attempted {
    let max_attempts = config.max_attempts();
    let mut attempts = 0;
    loop {
        attempts += 1;
        match executor.execute(step, context).await {
            Ok(result) => return Attempted { attempts, outcome: Ok(result) },
            Err(e) if attempts >= max_attempts => {
                return Attempted { attempts, outcome: Err(e) };
            }
            Err(e) => {
                warn!(
                    "Step '{}' attempt {attempts}/{max_attempts} failed: {e}",
                    step.id
                );
                if !config.retry_delay.is_zero() {
                    tokio::time::sleep(config.retry_delay).await;
                }
            }
        }
    }
}

/// Records the terminal status of a step and persists the plan.
async fn finish_step(
    plan: &mut Plan,
    id: &str,
    attempted: Attempted,
    store: &dyn SnapshotStore,
) -> Result<()> {
    let Attempted { attempts, outcome } = attempted;
    let step = step_mut(plan, id)?;
    step.attempts = attempts;

    let failure = match outcome {
        Ok(result) => {
            step.status = StepStatus::Completed;
            step.result = Some(result);
            debug!("Step '{id}' completed after {attempts} attempt(s)");
            None
        }
        Err(source) => {
            step.status = StepStatus::Failed;
            step.result = None;
            error!("Step '{id}' failed after {attempts} attempt(s): {source}");
            Some(source)
        }
    };
    plan.touch();

    store.save(plan).await?;
    debug!("Saved snapshot of plan {}", plan.id);

    match failure {
        Some(source) => Err(PlannerError::StepExhausted {
            step_id: id.to_string(),
            attempts,
            source,
        }),
        None => Ok(()),
    }
}

fn step_mut<'a>(plan: &'a mut Plan, id: &str) -> Result<&'a mut Step> {
    plan.step_mut(id).ok_or_else(|| {
        PlannerError::invalid_input("step_id").with_reason(format!("no step with ID '{id}'"))
    })
}
