//! High-level planner API: build plans, persist them and run them.
//!
//! [`Planner`] ties the pieces together: a snapshot store, the execution
//! engine configuration and the free functions doing the actual work.
//!
//! ```text
//! task ──▶ Decomposer ──▶ build_plan ──▶ Plan ──▶ SnapshotStore
//!                                         │
//!             ┌───────────────────────────┘
//!             ▼
//!      find_ready_steps ──▶ StepExecutor ──▶ state update ──▶ SnapshotStore
//!             ▲                                   │
//!             └───────────────────────────────────┘
//! ```
//!
//! ## Submodules
//!
//! - [`builder`]: Factory for creating [`Planner`] instances with configuration
//! - [`config`]: Engine configuration (retries, delay, dispatch mode)
//! - [`decompose`]: Decomposition collaborator contract and strict parsing
//! - [`readiness`]: Ready-step resolution
//! - [`engine`]: The execution loop
//! - [`executor`]: Step executor collaborator contract
//! - [`plan_ops`]: Plan building and snapshot operations
//! - [`run_ops`]: Running and resuming plans
//!
//! # Usage Examples
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use async_trait::async_trait;
//! use stepwise_core::{
//!     planner::{Decomposer, DecompositionRequest, StepContext, StepExecutor},
//!     store::MemoryStore,
//!     PlannerBuilder, Step, StepExecutionError,
//! };
//!
//! struct Canned;
//!
//! #[async_trait]
//! impl Decomposer for Canned {
//!     async fn decompose(&self, _request: &DecompositionRequest) -> anyhow::Result<String> {
//!         Ok(r#"{"steps": [
//!             {"id": "build", "description": "Build", "dependencies": []},
//!             {"id": "ship", "description": "Ship", "dependencies": ["build"]}
//!         ]}"#
//!         .to_string())
//!     }
//! }
//!
//! struct Echo;
//!
//! #[async_trait]
//! impl StepExecutor for Echo {
//!     async fn execute(&self, step: &Step, _ctx: &StepContext) -> Result<String, StepExecutionError> {
//!         Ok(format!("{} done", step.id))
//!     }
//! }
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let planner = PlannerBuilder::new()
//!     .with_store(Arc::new(MemoryStore::new()))
//!     .with_max_retries(2)
//!     .build()
//!     .await?;
//!
//! let mut plan = planner.build_plan("Release 1.2", &Canned).await?;
//! planner.save_plan(&plan).await?;
//! planner.execute_plan(&mut plan, &Echo).await?;
//! assert!(plan.is_complete());
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;

use crate::store::SnapshotStore;

pub mod builder;
pub mod config;
pub mod decompose;
pub mod engine;
pub mod executor;
pub mod plan_ops;
pub mod readiness;
pub mod run_ops;


pub use builder::PlannerBuilder;
pub use config::{Dispatch, EngineConfig};
pub use decompose::{
    build_plan, parse_decomposition, Decomposer, DecompositionRequest,
    DECOMPOSITION_INSTRUCTIONS,
};
pub use engine::execute_plan;
pub use executor::{StepContext, StepExecutor};
pub use readiness::{find_ready_steps, ready_step_ids};

/// Main planner interface for building and running plans.
pub struct Planner {
    pub(crate) store: Arc<dyn SnapshotStore>,
    pub(crate) config: EngineConfig,
}

impl Planner {
    /// Creates a new planner over `store`.
    pub(crate) fn new(store: Arc<dyn SnapshotStore>, config: EngineConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<dyn SnapshotStore> {
        &self.store
    }
}
