//! Decomposers and step executors available from the command line.

use std::{io::ErrorKind, path::PathBuf, process::Stdio};

use anyhow::{bail, Context};
use async_trait::async_trait;
use log::debug;
use stepwise_core::{
    Decomposer, DecompositionRequest, Step, StepContext, StepExecutionError, StepExecutor,
};
use tokio::{io::AsyncWriteExt, process::Command};

/// Reads a ready-made decomposition from a JSON file.
pub struct FileDecomposer {
    path: PathBuf,
}

impl FileDecomposer {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl Decomposer for FileDecomposer {
    async fn decompose(&self, _request: &DecompositionRequest) -> anyhow::Result<String> {
        tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("Failed to read {}", self.path.display()))
    }
}

/// Pipes the decomposition prompt through a shell command and takes its
/// stdout as the answer.
pub struct CommandDecomposer {
    command: String,
}

impl CommandDecomposer {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }
}

#[async_trait]
impl Decomposer for CommandDecomposer {
    async fn decompose(&self, request: &DecompositionRequest) -> anyhow::Result<String> {
        debug!("Decomposing with `{}`", self.command);
        let mut child = Command::new("sh")
            .arg("-c")
            .arg(&self.command)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .with_context(|| format!("Failed to start `{}`", self.command))?;

        if let Some(mut stdin) = child.stdin.take() {
            // Commands that ignore the prompt may exit before reading it
            if let Err(e) = stdin.write_all(request.prompt().as_bytes()).await {
                if e.kind() != ErrorKind::BrokenPipe {
                    return Err(e).context("Failed to send the prompt");
                }
            }
        }

        let output = child
            .wait_with_output()
            .await
            .with_context(|| format!("Failed to wait for `{}`", self.command))?;
        if !output.status.success() {
            bail!(
                "`{}` exited with {}: {}",
                self.command,
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }
        String::from_utf8(output.stdout).context("Decomposer output is not valid UTF-8")
    }
}

/// Completes every step without doing anything.
pub struct EchoExecutor;

#[async_trait]
impl StepExecutor for EchoExecutor {
    async fn execute(
        &self,
        step: &Step,
        _context: &StepContext,
    ) -> Result<String, StepExecutionError> {
        Ok(format!("Step {} completed", step.id))
    }
}

/// Runs each step description as a shell command.
///
/// The results of the step's dependencies are available as
/// `STEPWISE_DEP_<ID>` environment variables, next to `STEPWISE_PLAN_ID`,
/// `STEPWISE_TASK` and `STEPWISE_STEP_ID`.
pub struct ShellExecutor;

#[async_trait]
impl StepExecutor for ShellExecutor {
    async fn execute(
        &self,
        step: &Step,
        context: &StepContext,
    ) -> Result<String, StepExecutionError> {
        let mut command = Command::new("sh");
        command
            .arg("-c")
            .arg(&step.description)
            .env("STEPWISE_PLAN_ID", context.plan_id.as_str())
            .env("STEPWISE_TASK", &context.task)
            .env("STEPWISE_STEP_ID", &step.id)
            .stdin(Stdio::null());
        for (dependency, result) in &context.dependency_results {
            command.env(dependency_variable(dependency), result);
        }

        let output = command
            .output()
            .await
            .with_context(|| format!("Failed to start step '{}'", step.id))?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stderr = stderr.trim();
            return Err(StepExecutionError::new(if stderr.is_empty() {
                format!("exited with {}", output.status)
            } else {
                format!("exited with {}: {stderr}", output.status)
            }));
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

/// `STEPWISE_DEP_` followed by the uppercased step ID, with every other
/// character than ASCII letters and digits replaced by `_`.
pub fn dependency_variable(step_id: &str) -> String {
    let suffix: String = step_id
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect();
    format!("STEPWISE_DEP_{suffix}")
}

#[cfg(test)]
mod tests {
    use stepwise_core::{Plan, Step};

    use super::*;

    fn context_for(plan: &Plan, id: &str) -> (Step, StepContext) {
        let step = plan.step(id).unwrap().clone();
        let context = StepContext::for_step(plan, &step);
        (step, context)
    }

    #[test]
    fn test_dependency_variable() {
        assert_eq!(dependency_variable("build"), "STEPWISE_DEP_BUILD");
        assert_eq!(dependency_variable("run-tests.v2"), "STEPWISE_DEP_RUN_TESTS_V2");
    }

    #[tokio::test]
    async fn test_echo_executor() {
        let plan = Plan::new("task", vec![Step::new("a", "anything", &[])]);
        let (step, context) = context_for(&plan, "a");
        assert_eq!(
            EchoExecutor.execute(&step, &context).await.unwrap(),
            "Step a completed"
        );
    }

    #[tokio::test]
    async fn test_shell_executor_sees_dependency_results() {
        let mut plan = Plan::new(
            "greet",
            vec![
                Step::new("first-step", "echo hello", &[]),
                Step::new("b", "echo \"$STEPWISE_DEP_FIRST_STEP from $STEPWISE_STEP_ID\"", &["first-step"]),
            ],
        );
        {
            let first = plan.step_mut("first-step").unwrap();
            first.status = stepwise_core::StepStatus::Completed;
            first.result = Some("hello".to_string());
        }

        let (step, context) = context_for(&plan, "b");
        let result = ShellExecutor.execute(&step, &context).await.unwrap();
        assert_eq!(result, "hello from b");
    }

    #[tokio::test]
    async fn test_shell_executor_reports_failures() {
        let plan = Plan::new("task", vec![Step::new("a", "echo broken >&2; exit 3", &[])]);
        let (step, context) = context_for(&plan, "a");

        let err = ShellExecutor.execute(&step, &context).await.unwrap_err();
        assert!(err.message.contains("broken"), "{}", err.message);
    }

    #[tokio::test]
    async fn test_command_decomposer_receives_prompt() {
        let decomposer = CommandDecomposer::new("grep -c 'Task: Ship it'");
        let answer = decomposer
            .decompose(&DecompositionRequest::new("Ship it"))
            .await
            .unwrap();
        assert_eq!(answer.trim(), "1");
    }

    #[tokio::test]
    async fn test_command_decomposer_failure() {
        let decomposer = CommandDecomposer::new("echo nope >&2; exit 1");
        let err = decomposer
            .decompose(&DecompositionRequest::new("task"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("nope"));
    }

    #[tokio::test]
    async fn test_file_decomposer() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("steps.json");
        std::fs::write(&path, r#"{"steps": []}"#).unwrap();

        let answer = FileDecomposer::new(&path)
            .decompose(&DecompositionRequest::new("task"))
            .await
            .unwrap();
        assert_eq!(answer, r#"{"steps": []}"#);

        let missing = FileDecomposer::new(dir.path().join("missing.json"));
        assert!(missing
            .decompose(&DecompositionRequest::new("task"))
            .await
            .is_err());
    }
}
