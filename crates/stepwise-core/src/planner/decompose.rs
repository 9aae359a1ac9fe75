//! Task decomposition: asking a collaborator for steps and turning its answer
//! into a validated [`Plan`].
//!
//! The collaborator (usually a language model behind some transport) is
//! untrusted. Its answer must be exactly one JSON object of the form
//!
//! ```json
//! {"steps": [{"id": "build", "description": "Build it", "dependencies": []}]}
//! ```
//!
//! Anything else, including prose around the object or markdown fences, is a
//! [`PlannerError::DecompositionParse`].

use std::collections::HashSet;

use async_trait::async_trait;
use log::{debug, info};
use serde::Deserialize;

use crate::{
    error::{PlannerError, Result},
    graph,
    models::{Plan, Step},
};

/// Instructions sent along with every task.
pub const DECOMPOSITION_INSTRUCTIONS: &str = r#"Break the task below into concrete steps.
Reply with exactly one JSON object and nothing else, using this shape:
{"steps": [{"id": "<short unique id>", "description": "<what to do>", "dependencies": ["<id>", ...]}]}
Rules:
- every id is unique and non-empty
- "dependencies" lists the ids of steps that must finish first; use [] when there are none
- dependencies may only reference ids from the same list
- the dependencies must not form a cycle"#;

/// Request handed to a [`Decomposer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecompositionRequest {
    pub task: String,
    pub instructions: String,
}

impl DecompositionRequest {
    pub fn new(task: impl Into<String>) -> Self {
        Self {
            task: task.into(),
            instructions: DECOMPOSITION_INSTRUCTIONS.to_string(),
        }
    }

    /// Instructions and task as a single prompt.
    pub fn prompt(&self) -> String {
        format!("{}\n\nTask: {}\n", self.instructions, self.task)
    }
}

/// Produces the raw step list for a task.
#[async_trait]
pub trait Decomposer: Send + Sync {
    async fn decompose(&self, request: &DecompositionRequest) -> anyhow::Result<String>;
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct DecompositionOutput {
    steps: Vec<StepDescriptor>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct StepDescriptor {
    id: String,
    description: String,
    dependencies: Vec<String>,
}

/// Strictly parses a collaborator answer into pending steps.
///
/// Duplicate entries inside one `dependencies` list are collapsed, keeping
/// the first occurrence. Graph-level checks are left to
/// [`graph::validate_steps`].
///
/// # Errors
///
/// [`PlannerError::DecompositionParse`] when the text is not the expected JSON
/// object, the step list is empty, or an ID is blank.
pub fn parse_decomposition(text: &str) -> Result<Vec<Step>> {
    let output: DecompositionOutput = serde_json::from_str(text.trim())
        .map_err(|e| PlannerError::parse(format!("invalid step list: {e}")))?;

    if output.steps.is_empty() {
        return Err(PlannerError::parse("the step list is empty"));
    }

    output
        .steps
        .into_iter()
        .enumerate()
        .map(|(index, descriptor)| {
            if descriptor.id.trim().is_empty() {
                return Err(PlannerError::parse(format!("step #{index} has an empty id")));
            }
            if descriptor.dependencies.iter().any(|dep| dep.trim().is_empty()) {
                return Err(PlannerError::parse(format!(
                    "step '{}' has an empty dependency id",
                    descriptor.id
                )));
            }

            let mut seen = HashSet::new();
            let dependencies = descriptor
                .dependencies
                .into_iter()
                .filter(|dep| seen.insert(dep.clone()))
                .collect();

            Ok(Step {
                dependencies,
                ..Step::new(descriptor.id, descriptor.description, &[])
            })
        })
        .collect()
}

/// Builds a validated plan for `task`.
///
/// Makes exactly one collaborator call. Nothing is persisted and no partial
/// plan is returned on failure.
///
/// # Errors
///
/// - [`PlannerError::InvalidInput`] for a blank task
/// - [`PlannerError::Decomposer`] when the collaborator call fails
/// - [`PlannerError::DecompositionParse`] for a malformed answer
/// - [`PlannerError::DuplicateStep`], [`PlannerError::DanglingDependency`] or
///   [`PlannerError::CyclicDependency`] for an invalid graph
pub async fn build_plan(task: &str, decomposer: &dyn Decomposer) -> Result<Plan> {
    if task.trim().is_empty() {
        return Err(PlannerError::invalid_input("task").with_reason("task must not be empty"));
    }

    let request = DecompositionRequest::new(task);
    let response = decomposer
        .decompose(&request)
        .await
        .map_err(|e| PlannerError::Decomposer {
            message: format!("{e:#}"),
        })?;
    debug!("Decomposer returned {} bytes", response.len());

    let steps = parse_decomposition(&response)?;
    graph::validate_steps(&steps)?;

    let plan = Plan::new(task, steps);
    info!("Built plan {} with {} steps", plan.id, plan.steps.len());
    Ok(plan)
}
