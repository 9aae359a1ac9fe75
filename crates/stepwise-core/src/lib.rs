//! Core library for the Stepwise planning workflow executor.
//!
//! A natural-language task is decomposed (by an external collaborator such as
//! an LLM) into a [`Plan`] of [`Step`]s whose dependencies form a DAG. The
//! execution engine repeatedly runs every step whose dependencies have
//! completed, retrying failed steps a bounded number of times and saving a
//! snapshot after each step finishes so an interrupted run can resume.
//!
//! # Display Architecture
//!
//! - **Domain Models** ([`models`]): Implement [`std::fmt::Display`] for direct
//!   formatting
//! - **Display Wrappers** ([`display`]): Collections and operation results
//! - **Terminal Rendering**: Rich markdown output via the CLI's terminal
//!   renderer
//!
//! # Quick Start
//!
//! ```rust
//! use stepwise_core::{find_ready_steps, Plan, Step, StepStatus};
//!
//! let mut plan = Plan::new(
//!     "Ship release",
//!     vec![
//!         Step::new("a", "Prepare", &[]),
//!         Step::new("b", "Build", &["a"]),
//!         Step::new("c", "Document", &["a"]),
//!         Step::new("d", "Publish", &["b", "c"]),
//!     ],
//! );
//!
//! let ready: Vec<_> = find_ready_steps(&plan)?.iter().map(|s| s.id.clone()).collect();
//! assert_eq!(ready, ["a"]);
//!
//! plan.step_mut("a").unwrap().status = StepStatus::Completed;
//! let ready: Vec<_> = find_ready_steps(&plan)?.iter().map(|s| s.id.clone()).collect();
//! assert_eq!(ready, ["b", "c"]);
//! # Ok::<(), stepwise_core::PlannerError>(())
//! ```

pub mod db;
pub mod display;
pub mod error;
pub mod graph;
pub mod models;
pub mod params;
pub mod planner;
pub mod store;

// Re-export commonly used types
pub use db::Database;
pub use display::{
    CreateResult, DeleteResult, LocalDateTime, OperationStatus, PlanSummaries, ReadySteps,
};
pub use error::{PlannerError, Result, StepExecutionError};
pub use models::{Plan, PlanId, PlanSummary, Step, StepStatus};
pub use params::{BuildPlan, Id, LoadPlan, ResumePlan};
pub use planner::{
    find_ready_steps, Decomposer, DecompositionRequest, Dispatch, EngineConfig, Planner,
    PlannerBuilder, StepContext, StepExecutor,
};
pub use store::{JsonFileStore, MemoryStore, SnapshotStore, SqliteStore};
