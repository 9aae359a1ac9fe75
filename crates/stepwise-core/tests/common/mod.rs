#![allow(dead_code)]

use std::sync::Mutex;

use async_trait::async_trait;
use stepwise_core::{
    Plan, PlannerBuilder, Step, StepContext, StepExecutionError, StepExecutor,
};
use tempfile::TempDir;

/// Helper function to create a test planner backed by SQLite
pub async fn create_test_planner() -> (TempDir, stepwise_core::Planner) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("test.db");
    let planner = PlannerBuilder::new()
        .with_database_path(Some(&db_path))
        .with_max_retries(1)
        .build()
        .await
        .expect("Failed to create planner");
    (temp_dir, planner)
}

/// The a -> {b, c} -> d plan.
pub fn diamond_plan() -> Plan {
    Plan::new(
        "Ship the release",
        vec![
            Step::new("a", "Prepare", &[]),
            Step::new("b", "Build", &["a"]),
            Step::new("c", "Document", &["a"]),
            Step::new("d", "Publish", &["b", "c"]),
        ],
    )
}

/// Executor that succeeds for every step except those listed in `failing`.
#[derive(Default)]
pub struct RecordingExecutor {
    pub failing: Vec<String>,
    calls: Mutex<Vec<String>>,
}

impl RecordingExecutor {
    pub fn failing(ids: &[&str]) -> Self {
        Self {
            failing: ids.iter().map(|id| id.to_string()).collect(),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl StepExecutor for RecordingExecutor {
    async fn execute(
        &self,
        step: &Step,
        _context: &StepContext,
    ) -> Result<String, StepExecutionError> {
        self.calls.lock().unwrap().push(step.id.clone());
        if self.failing.contains(&step.id) {
            Err(StepExecutionError::new("boom"))
        } else {
            Ok(format!("Step {} completed", step.id))
        }
    }
}
