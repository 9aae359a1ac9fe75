//! Command-line argument wrappers and command handlers.
//!
//! Each clap argument struct converts into an interface-agnostic parameter
//! type from `stepwise_core::params`, keeping clap out of the core:
//!
//! ```text
//! User Input → CLI Args (clap) → Core Params → Planner
//! ```

use std::{path::PathBuf, time::Duration};

use anyhow::{bail, Context, Result};
use clap::{ArgGroup, Args, Subcommand, ValueEnum};
use log::{info, warn};
use stepwise_core::{
    display::{CreateResult, DeleteResult, OperationStatus, ReadySteps},
    find_ready_steps, BuildPlan, Decomposer, Dispatch, EngineConfig, Id, LoadPlan, Planner,
    ResumePlan, StepExecutor,
};
use tokio_util::sync::CancellationToken;

use crate::{
    collaborators::{CommandDecomposer, EchoExecutor, FileDecomposer, ShellExecutor},
    renderer::TerminalRenderer,
};

/// Build a plan for a task
///
/// The task is handed to a decomposer, which must answer with a JSON object
/// `{"steps": [{"id": ..., "description": ..., "dependencies": [...]}]}`.
/// The plan is validated, saved and printed.
#[derive(Args)]
#[command(group(ArgGroup::new("source").required(true).args(["from_file", "command"])))]
pub struct BuildPlanArgs {
    /// Natural-language description of the task
    pub task: String,
    #[arg(long, help = "Read the decomposition from a JSON file")]
    pub from_file: Option<PathBuf>,
    #[arg(
        long,
        help = "Shell command that receives the prompt on stdin and prints the decomposition"
    )]
    pub command: Option<String>,
}

impl BuildPlanArgs {
    fn decomposer(&self) -> Result<Box<dyn Decomposer>> {
        match (&self.from_file, &self.command) {
            (Some(path), _) => Ok(Box::new(FileDecomposer::new(path))),
            (None, Some(command)) => Ok(Box::new(CommandDecomposer::new(command))),
            (None, None) => bail!("either --from-file or --command is required"),
        }
    }
}

impl From<&BuildPlanArgs> for BuildPlan {
    fn from(val: &BuildPlanArgs) -> Self {
        BuildPlan {
            task: val.task.clone(),
        }
    }
}

/// Show a plan with all of its steps
#[derive(Args)]
pub struct ShowPlanArgs {
    #[arg(help = "Unique identifier of the plan to show")]
    pub id: String,
    #[arg(long, help = "Re-validate the step graph of the stored plan")]
    pub verify: bool,
}

impl From<ShowPlanArgs> for LoadPlan {
    fn from(val: ShowPlanArgs) -> Self {
        LoadPlan {
            id: val.id,
            verify: val.verify,
        }
    }
}

/// Arguments for commands that only need a plan ID
#[derive(Args)]
pub struct PlanIdArgs {
    #[arg(help = "Unique identifier of the plan")]
    pub id: String,
}

impl From<PlanIdArgs> for Id {
    fn from(val: PlanIdArgs) -> Self {
        Id { id: val.id }
    }
}

#[derive(Subcommand)]
pub enum PlanCommands {
    /// Build a new plan from a task description
    #[command(alias = "b")]
    Build(BuildPlanArgs),
    /// List stored plans, most recently updated first
    #[command(alias = "ls")]
    List,
    /// Show a plan with all of its steps
    #[command(alias = "s")]
    Show(ShowPlanArgs),
    /// List the steps that could run right now
    Ready(PlanIdArgs),
    /// Permanently delete a plan
    #[command(alias = "d")]
    Delete(PlanIdArgs),
}

/// Which executor performs the steps of a run.
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ExecutorKind {
    /// Complete every step immediately (dry run)
    Echo,
    /// Run each step description as a shell command
    Shell,
}

impl ExecutorKind {
    pub fn executor(self) -> Box<dyn StepExecutor> {
        match self {
            ExecutorKind::Echo => Box::new(EchoExecutor),
            ExecutorKind::Shell => Box::new(ShellExecutor),
        }
    }
}

/// Run a stored plan until every step has completed
///
/// Steps left running by an interrupted run are reset first. Failed steps
/// keep the plan stuck unless --retry-failed is given.
#[derive(Args)]
pub struct RunArgs {
    #[arg(help = "Unique identifier of the plan to run")]
    pub id: String,
    #[arg(
        long,
        default_value_t = EngineConfig::DEFAULT_MAX_RETRIES,
        help = "Additional attempts for a failing step"
    )]
    pub max_retries: u32,
    #[arg(long, default_value_t = 0, help = "Pause between attempts in milliseconds")]
    pub retry_delay_ms: u64,
    #[arg(long, help = "Run the steps of each ready set concurrently")]
    pub concurrent: bool,
    #[arg(long, value_enum, default_value_t = ExecutorKind::Echo, help = "How steps are performed")]
    pub executor: ExecutorKind,
    #[arg(long, help = "Put failed steps back to pending before running")]
    pub retry_failed: bool,
    #[arg(long, help = "Re-validate the step graph before running")]
    pub verify: bool,
}

impl RunArgs {
    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig::default()
            .with_max_retries(self.max_retries)
            .with_retry_delay(Duration::from_millis(self.retry_delay_ms))
            .with_dispatch(if self.concurrent {
                Dispatch::Concurrent
            } else {
                Dispatch::Sequential
            })
    }
}

impl From<&RunArgs> for LoadPlan {
    fn from(val: &RunArgs) -> Self {
        LoadPlan {
            id: val.id.clone(),
            verify: val.verify,
        }
    }
}

impl From<&RunArgs> for ResumePlan {
    fn from(val: &RunArgs) -> Self {
        ResumePlan {
            retry_failed: val.retry_failed,
        }
    }
}

/// Executes parsed commands against a planner and renders the output.
pub struct Cli {
    planner: Planner,
    renderer: TerminalRenderer,
}

impl Cli {
    pub fn new(planner: Planner, renderer: TerminalRenderer) -> Self {
        Self { planner, renderer }
    }

    pub async fn handle_plan_command(&self, command: PlanCommands) -> Result<()> {
        match command {
            PlanCommands::Build(args) => self.build_plan(args).await,
            PlanCommands::List => self.list_plans().await,
            PlanCommands::Show(args) => self.show_plan(args.into()).await,
            PlanCommands::Ready(args) => self.ready_steps(args.into()).await,
            PlanCommands::Delete(args) => self.delete_plan(args.into()).await,
        }
    }

    pub async fn list_plans(&self) -> Result<()> {
        let plans = self
            .planner
            .list_plans()
            .await
            .context("Failed to list plans")?;
        self.renderer.render(&plans.to_string())
    }

    async fn build_plan(&self, args: BuildPlanArgs) -> Result<()> {
        let params = BuildPlan::from(&args);
        let decomposer = args.decomposer()?;
        let plan = self
            .planner
            .build_plan_from(&params, decomposer.as_ref())
            .await
            .context("Failed to build plan")?;
        self.planner
            .save_plan(&plan)
            .await
            .context("Failed to save plan")?;

        self.renderer.render(&CreateResult::new(plan).to_string())
    }

    async fn show_plan(&self, params: LoadPlan) -> Result<()> {
        let plan = self
            .planner
            .load_plan(&params)
            .await
            .with_context(|| format!("Failed to load plan {}", params.id))?;
        self.renderer.render(&plan.to_string())
    }

    async fn ready_steps(&self, params: Id) -> Result<()> {
        let plan = self
            .planner
            .load_plan(&LoadPlan {
                id: params.id.clone(),
                verify: false,
            })
            .await
            .with_context(|| format!("Failed to load plan {}", params.id))?;
        let ready = find_ready_steps(&plan).context("Failed to resolve ready steps")?;

        self.renderer.render(&ReadySteps(ready).to_string())
    }

    async fn delete_plan(&self, params: Id) -> Result<()> {
        self.planner
            .delete_plan(&params)
            .await
            .with_context(|| format!("Failed to delete plan {}", params.id))?;

        self.renderer
            .render(&DeleteResult::new(params.plan_id()).to_string())
    }

    pub async fn run_plan(&self, args: RunArgs, cancel: CancellationToken) -> Result<()> {
        let params = LoadPlan::from(&args);
        let mut plan = self
            .planner
            .load_plan(&params)
            .await
            .with_context(|| format!("Failed to load plan {}", params.id))?;
        self.planner
            .prepare_resume(&mut plan, &ResumePlan::from(&args))
            .await
            .context("Failed to prepare plan for running")?;

        let executor = args.executor.executor();
        info!("Running plan {} with the {:?} executor", plan.id, args.executor);
        let outcome = self
            .planner
            .execute_plan_with_cancel(&mut plan, executor.as_ref(), &cancel)
            .await;

        self.renderer.render(&plan.to_string())?;
        let status = match &outcome {
            Ok(()) => OperationStatus::success(format!("Plan {} completed", plan.id)),
            Err(e) => {
                warn!("Run of plan {} stopped: {e}", plan.id);
                OperationStatus::failure(e.to_string())
            }
        };
        self.renderer.render(&status.to_string())?;
        outcome.with_context(|| format!("Failed to run plan {}", plan.id))
    }
}
