//! Error types for the planner library.

use std::path::PathBuf;

use thiserror::Error;

use crate::models::PlanId;

/// Comprehensive error type for all planner operations.
///
/// Build-time (`DecompositionParse`, `Decomposer`, `DuplicateStep`,
/// `DanglingDependency`, `CyclicDependency`), resolution-time
/// (`MissingDependency`) and execution-time (`StepExhausted`, `Deadlock`,
/// `Cancelled`) errors are all terminal. The engine retries individual
/// executor attempts internally and never surfaces them one by one.
#[derive(Error, Debug)]
pub enum PlannerError {
    /// The decomposition collaborator answered with something that is not a
    /// well-formed step list
    #[error("Could not parse decomposition: {reason}")]
    DecompositionParse { reason: String },
    /// The decomposition collaborator itself failed
    #[error("Decomposition collaborator failed: {message}")]
    Decomposer { message: String },
    /// Two steps share the same ID
    #[error("Duplicate step ID '{step_id}'")]
    DuplicateStep { step_id: String },
    /// A step depends on an ID that no step in the plan declares
    #[error("Step '{step_id}' depends on unknown step '{dependency}'")]
    DanglingDependency { step_id: String, dependency: String },
    /// The dependency relation contains a cycle
    #[error("Cyclic dependency: {}", .cycle.join(" -> "))]
    CyclicDependency { cycle: Vec<String> },
    /// A dependency could not be resolved while computing readiness
    #[error("Step '{step_id}' references missing dependency '{dependency}'")]
    MissingDependency { step_id: String, dependency: String },
    /// A step failed on every attempt it was given
    #[error("Step '{step_id}' failed after {attempts} attempt(s): {source}")]
    StepExhausted {
        step_id: String,
        attempts: u32,
        #[source]
        source: StepExecutionError,
    },
    /// Steps remain unfinished but none of them can run
    #[error("Deadlock: no runnable steps, blocked: [{}], failed: [{}]", .blocked.join(", "), .failed.join(", "))]
    Deadlock {
        blocked: Vec<String>,
        failed: Vec<String>,
    },
    /// The caller cancelled the run between generations
    #[error("Run of plan {plan_id} cancelled ({completed} completed, {remaining} remaining)")]
    Cancelled {
        plan_id: PlanId,
        completed: usize,
        remaining: usize,
    },
    /// Plan not found for the given ID
    #[error("Plan with ID {id} not found")]
    PlanNotFound { id: PlanId },
    /// Database connection or query errors
    #[error("Database error: {message}")]
    Database {
        message: String,
        #[source]
        source: rusqlite::Error,
    },
    /// File system operation errors
    #[error("File system error at path '{path}': {source}")]
    FileSystem {
        path: PathBuf,
        source: std::io::Error,
    },
    /// XDG directory specification errors
    #[error("XDG directory error: {0}")]
    XdgDirectory(String),
    /// Invalid input validation errors
    #[error("Invalid input for field '{field}': {reason}")]
    InvalidInput { field: String, reason: String },
    /// Serialization/deserialization errors
    #[error("Serialization error: {source}")]
    Serialization {
        #[from]
        source: serde_json::Error,
    },
    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

/// A single failed attempt reported by a step executor.
///
/// Never returned from the engine on its own; it ends up as the source of
/// [`PlannerError::StepExhausted`] once the retry budget is spent.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct StepExecutionError {
    pub message: String,
}

impl StepExecutionError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<anyhow::Error> for StepExecutionError {
    fn from(error: anyhow::Error) -> Self {
        Self::new(format!("{error:#}"))
    }
}

/// Builder for creating database errors with optional context.
pub struct DatabaseErrorBuilder {
    message: String,
}

impl DatabaseErrorBuilder {
    /// Create a new database error builder with a message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Build the error with the given source.
    pub fn with_source(self, source: rusqlite::Error) -> PlannerError {
        PlannerError::Database {
            message: self.message,
            source,
        }
    }
}

/// Builder for creating input validation errors.
pub struct InvalidInputBuilder {
    field: String,
}

impl InvalidInputBuilder {
    /// Create a new invalid input error builder for a field.
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }

    /// Build the error with the given reason.
    pub fn with_reason(self, reason: impl Into<String>) -> PlannerError {
        PlannerError::InvalidInput {
            field: self.field,
            reason: reason.into(),
        }
    }
}

impl PlannerError {
    /// Creates a builder for database errors.
    pub fn database(message: impl Into<String>) -> DatabaseErrorBuilder {
        DatabaseErrorBuilder::new(message)
    }

    /// Creates a builder for input validation errors.
    pub fn invalid_input(field: impl Into<String>) -> InvalidInputBuilder {
        InvalidInputBuilder::new(field)
    }

    /// Creates a decomposition parse error.
    pub fn parse(reason: impl Into<String>) -> Self {
        Self::DecompositionParse {
            reason: reason.into(),
        }
    }

    /// Wraps a `spawn_blocking` join failure.
    pub(crate) fn join(error: tokio::task::JoinError) -> Self {
        Self::Configuration {
            message: format!("Task join error: {error}"),
        }
    }

    /// Whether retrying the same call could succeed.
    ///
    /// Always false: attempt-level failures are retried inside the engine and
    /// never reach the caller, everything that does is structural or final.
    pub fn is_retriable(&self) -> bool {
        false
    }

    /// The step this error is about, when it names exactly one.
    pub fn step_id(&self) -> Option<&str> {
        match self {
            Self::DuplicateStep { step_id }
            | Self::DanglingDependency { step_id, .. }
            | Self::MissingDependency { step_id, .. }
            | Self::StepExhausted { step_id, .. } => Some(step_id),
            _ => None,
        }
    }
}

/// Specialized extension trait for database-related Results.
pub trait DatabaseResultExt<T> {
    /// Map database errors with a message.
    fn db_context(self, message: &str) -> Result<T>;
}

impl<T> DatabaseResultExt<T> for std::result::Result<T, rusqlite::Error> {
    fn db_context(self, message: &str) -> Result<T> {
        self.map_err(|e| PlannerError::database(message).with_source(e))
    }
}

/// Extension trait for attaching a path to I/O failures.
pub trait IoResultExt<T> {
    fn fs_context(self, path: &std::path::Path) -> Result<T>;
}

impl<T> IoResultExt<T> for std::result::Result<T, std::io::Error> {
    fn fs_context(self, path: &std::path::Path) -> Result<T> {
        self.map_err(|source| PlannerError::FileSystem {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Result type alias for planner operations
pub type Result<T> = std::result::Result<T, PlannerError>;
