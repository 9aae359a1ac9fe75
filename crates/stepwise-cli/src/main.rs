//! Stepwise CLI Application
//!
//! Command-line interface for building task plans and running them step by
//! step.

mod args;
mod cli;
mod collaborators;
mod renderer;

use anyhow::{Context, Result};
use args::{Args, Commands};
use clap::Parser;
use cli::Cli;
use log::{info, warn};
use renderer::TerminalRenderer;
use stepwise_core::PlannerBuilder;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let Args {
        database_file,
        snapshot_dir,
        no_color,
        command,
    } = Args::parse();

    let mut builder = PlannerBuilder::new()
        .with_database_path(database_file)
        .with_snapshot_dir(snapshot_dir);
    if let Some(Commands::Run(run)) = &command {
        builder = builder.with_engine_config(run.engine_config());
    }
    let planner = builder
        .build()
        .await
        .context("Failed to initialize planner")?;

    let cli = Cli::new(planner, TerminalRenderer::new(!no_color));

    info!("Stepwise started");

    match command {
        Some(Commands::Plan { command }) => cli.handle_plan_command(command).await,
        Some(Commands::Run(run)) => cli.run_plan(run, cancel_on_ctrl_c()).await,
        None => cli.list_plans().await,
    }
}

/// A token cancelled by the first Ctrl-C. The running generation finishes
/// and its results are saved before the run stops.
fn cancel_on_ctrl_c() -> CancellationToken {
    let cancel = CancellationToken::new();
    let token = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, stopping after the current generation");
            token.cancel();
        }
    });
    cancel
}
