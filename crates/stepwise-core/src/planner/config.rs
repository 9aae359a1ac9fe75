//! Execution engine configuration.

use std::time::Duration;

/// How the steps of one ready set are handed to the executor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dispatch {
    /// One step at a time, in declaration order
    #[default]
    Sequential,
    /// Every step of the ready set at once, on the calling task
    Concurrent,
}

/// Knobs for a plan run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Additional attempts after the first failure of a step
    pub max_retries: u32,
    /// Pause between attempts of the same step
    pub retry_delay: Duration,
    /// Ready-set dispatch mode
    pub dispatch: Dispatch,
}

impl EngineConfig {
    pub const DEFAULT_MAX_RETRIES: u32 = 3;

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_retry_delay(mut self, retry_delay: Duration) -> Self {
        self.retry_delay = retry_delay;
        self
    }

    pub fn with_dispatch(mut self, dispatch: Dispatch) -> Self {
        self.dispatch = dispatch;
        self
    }

    /// Total executor invocations a single step may receive.
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_retries: Self::DEFAULT_MAX_RETRIES,
            retry_delay: Duration::ZERO,
            dispatch: Dispatch::Sequential,
        }
    }
}
