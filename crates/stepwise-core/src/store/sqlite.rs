use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::task;

use super::{sort_summaries, SnapshotStore};
use crate::{
    db::Database,
    error::{IoResultExt, PlannerError, Result},
    models::{Plan, PlanId, PlanSummary},
};

/// Snapshot store backed by a SQLite file.
///
/// Every operation opens its own connection on the blocking pool, so the
/// store is cheap to share and never holds a connection across awaits.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    db_path: PathBuf,
}

impl SqliteStore {
    /// Opens (and if needed creates) the database at `db_path`.
    ///
    /// # Errors
    ///
    /// Returns `PlannerError::FileSystem` if the parent directory cannot be
    /// created and `PlannerError::Database` if schema initialization fails.
    pub async fn open(db_path: impl Into<PathBuf>) -> Result<Self> {
        let db_path = db_path.into();

        if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).fs_context(parent)?;
        }

        let path = db_path.clone();
        task::spawn_blocking(move || Database::new(&path).map(drop))
            .await
            .map_err(PlannerError::join)??;

        Ok(Self { db_path })
    }

    pub fn path(&self) -> &Path {
        &self.db_path
    }

    async fn with_database<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut Database) -> Result<T> + Send + 'static,
    {
        let db_path = self.db_path.clone();
        task::spawn_blocking(move || {
            let mut db = Database::new(&db_path)?;
            f(&mut db)
        })
        .await
        .map_err(PlannerError::join)?
    }
}

#[async_trait]
impl SnapshotStore for SqliteStore {
    async fn save(&self, plan: &Plan) -> Result<()> {
        let plan = plan.clone();
        self.with_database(move |db| db.save_plan(&plan)).await
    }

    async fn load(&self, plan_id: &PlanId) -> Result<Plan> {
        let id = plan_id.clone();
        self.with_database(move |db| {
            db.load_plan(&id)?
                .ok_or(PlannerError::PlanNotFound { id })
        })
        .await
    }

    async fn list(&self) -> Result<Vec<PlanSummary>> {
        let mut summaries = self.with_database(|db| db.list_summaries()).await?;
        sort_summaries(&mut summaries);
        Ok(summaries)
    }

    async fn delete(&self, plan_id: &PlanId) -> Result<()> {
        let id = plan_id.clone();
        self.with_database(move |db| db.delete_plan(&id)).await
    }
}
