use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use log::warn;
use tokio::task;

use super::{sort_summaries, SnapshotStore};
use crate::{
    error::{IoResultExt, PlannerError, Result},
    models::{Plan, PlanId, PlanSummary},
};

/// Snapshot store keeping one `<plan-id>.json` file per plan in a directory.
///
/// Writes go to a temporary file that is renamed over the snapshot, so a
/// crash mid-write leaves the previous snapshot intact.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Creates the store, creating `dir` if needed.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).fs_context(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, plan_id: &PlanId) -> Result<PathBuf> {
        let id = plan_id.as_str();
        let safe = !id.is_empty()
            && id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !safe {
            return Err(PlannerError::invalid_input("plan_id")
                .with_reason(format!("'{id}' cannot be used as a snapshot file name")));
        }
        Ok(self.dir.join(format!("{id}.json")))
    }
}

fn write_snapshot(path: &Path, plan: &Plan) -> Result<()> {
    let json = serde_json::to_vec_pretty(plan)?;
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json).fs_context(&tmp)?;
    fs::rename(&tmp, path).fs_context(path)
}

fn read_snapshot(path: &Path) -> Result<Plan> {
    let bytes = fs::read(path).fs_context(path)?;
    Ok(serde_json::from_slice(&bytes)?)
}

fn read_summaries(dir: &Path) -> Result<Vec<PlanSummary>> {
    let mut summaries = Vec::new();
    for entry in fs::read_dir(dir).fs_context(dir)? {
        let path = entry.fs_context(dir)?.path();
        if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
            continue;
        }
        match read_snapshot(&path) {
            Ok(plan) => summaries.push(PlanSummary::from(&plan)),
            Err(e) => warn!("Skipping unreadable snapshot {}: {e}", path.display()),
        }
    }
    sort_summaries(&mut summaries);
    Ok(summaries)
}

#[async_trait]
impl SnapshotStore for JsonFileStore {
    async fn save(&self, plan: &Plan) -> Result<()> {
        let path = self.path_for(&plan.id)?;
        let plan = plan.clone();
        task::spawn_blocking(move || write_snapshot(&path, &plan))
            .await
            .map_err(PlannerError::join)?
    }

    async fn load(&self, plan_id: &PlanId) -> Result<Plan> {
        let path = self.path_for(plan_id)?;
        let id = plan_id.clone();
        task::spawn_blocking(move || match read_snapshot(&path) {
            Err(PlannerError::FileSystem { source, .. }) if source.kind() == ErrorKind::NotFound => {
                Err(PlannerError::PlanNotFound { id })
            }
            other => other,
        })
        .await
        .map_err(PlannerError::join)?
    }

    async fn list(&self) -> Result<Vec<PlanSummary>> {
        let dir = self.dir.clone();
        task::spawn_blocking(move || read_summaries(&dir))
            .await
            .map_err(PlannerError::join)?
    }

    async fn delete(&self, plan_id: &PlanId) -> Result<()> {
        let path = self.path_for(plan_id)?;
        let id = plan_id.clone();
        task::spawn_blocking(move || match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(PlannerError::PlanNotFound { id }),
            Err(source) => Err(PlannerError::FileSystem { path, source }),
        })
        .await
        .map_err(PlannerError::join)?
    }
}
