//! Builder for creating and configuring Planner instances.

use std::{
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};

use super::{
    config::{Dispatch, EngineConfig},
    Planner,
};
use crate::{
    error::{PlannerError, Result},
    store::{JsonFileStore, SnapshotStore, SqliteStore},
};

/// Builder for creating and configuring Planner instances.
///
/// The snapshot store is chosen in this order: an explicit
/// [`with_store`](Self::with_store), a JSON directory from
/// [`with_snapshot_dir`](Self::with_snapshot_dir), otherwise SQLite at the
/// configured or default database path.
#[derive(Clone, Default)]
pub struct PlannerBuilder {
    database_path: Option<PathBuf>,
    snapshot_dir: Option<PathBuf>,
    store: Option<Arc<dyn SnapshotStore>>,
    config: EngineConfig,
}

impl PlannerBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a custom database file path.
    ///
    /// If not specified, uses XDG Base Directory specification:
    /// `$XDG_DATA_HOME/stepwise/stepwise.db` or
    /// `~/.local/share/stepwise/stepwise.db`
    pub fn with_database_path<P: AsRef<Path>>(mut self, path: Option<P>) -> Self {
        if let Some(path) = path {
            self.database_path = Some(path.as_ref().to_path_buf());
        }
        self
    }

    /// Stores snapshots as JSON files in `dir` instead of SQLite.
    pub fn with_snapshot_dir<P: AsRef<Path>>(mut self, dir: Option<P>) -> Self {
        if let Some(dir) = dir {
            self.snapshot_dir = Some(dir.as_ref().to_path_buf());
        }
        self
    }

    /// Uses an already constructed store.
    pub fn with_store(mut self, store: Arc<dyn SnapshotStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn with_engine_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.config.max_retries = max_retries;
        self
    }

    pub fn with_retry_delay(mut self, retry_delay: Duration) -> Self {
        self.config.retry_delay = retry_delay;
        self
    }

    pub fn with_dispatch(mut self, dispatch: Dispatch) -> Self {
        self.config.dispatch = dispatch;
        self
    }

    /// Builds the configured planner instance.
    ///
    /// # Errors
    ///
    /// Returns `PlannerError::FileSystem` if a storage path cannot be created,
    /// `PlannerError::XdgDirectory` if the default path cannot be resolved and
    /// `PlannerError::Database` if database initialization fails
    pub async fn build(self) -> Result<Planner> {
        let store: Arc<dyn SnapshotStore> = if let Some(store) = self.store {
            store
        } else if let Some(dir) = self.snapshot_dir {
            Arc::new(JsonFileStore::new(dir)?)
        } else {
            let db_path = match self.database_path {
                Some(path) => path,
                None => Self::default_database_path()?,
            };
            Arc::new(SqliteStore::open(db_path).await?)
        };

        Ok(Planner::new(store, self.config))
    }

    /// Returns the default database path following XDG Base Directory
    /// specification.
    fn default_database_path() -> Result<PathBuf> {
        xdg::BaseDirectories::with_prefix("stepwise")
            .place_data_file("stepwise.db")
            .map_err(|e| PlannerError::XdgDirectory(e.to_string()))
    }
}
