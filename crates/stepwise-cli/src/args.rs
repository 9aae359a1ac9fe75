use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::cli::{PlanCommands, RunArgs};

/// Plan a task as a graph of steps and run it to completion
///
/// Stepwise asks a decomposer (a JSON file or any external command, such as
/// an LLM client) to break a task into steps with dependencies, stores the
/// resulting plan, and runs every step once its dependencies have completed.
/// Progress is saved after each step, so a failed or interrupted run can be
/// resumed with `stepwise run <ID>`.
#[derive(Parser)]
#[command(version, about, name = "stepwise")]
pub struct Args {
    /// Path to the SQLite database file. Defaults to
    /// $XDG_DATA_HOME/stepwise/stepwise.db
    #[arg(long, global = true)]
    pub database_file: Option<PathBuf>,

    /// Store plans as JSON files in this directory instead of SQLite
    #[arg(long, global = true, conflicts_with = "database_file")]
    pub snapshot_dir: Option<PathBuf>,

    /// Disable colored output and use plain text
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands for the Stepwise CLI
#[derive(Subcommand)]
pub enum Commands {
    /// Build and inspect plans
    #[command(alias = "p")]
    Plan {
        #[command(subcommand)]
        command: PlanCommands,
    },
    /// Run (or resume) a stored plan
    #[command(alias = "r")]
    Run(RunArgs),
}
