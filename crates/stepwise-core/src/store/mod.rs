//! Snapshot persistence for plans.
//!
//! The engine saves the full plan after every step that completes or fails,
//! which is what makes an interrupted run resumable. Three backends are
//! provided:
//!
//! - [`SqliteStore`]: the default, one SQLite file holding every plan
//! - [`JsonFileStore`]: one pretty-printed JSON document per plan
//! - [`MemoryStore`]: process-local, for tests and embedding

use async_trait::async_trait;

use crate::{
    error::Result,
    models::{Plan, PlanId, PlanSummary},
};

mod json_file;
mod memory;
mod sqlite;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Save/load contract for plan snapshots, keyed by plan ID.
///
/// A saved snapshot must round-trip every field of [`Plan`] and [`crate::Step`]
/// exactly.
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Persists a complete snapshot of `plan`, replacing any previous one
    /// with the same ID.
    async fn save(&self, plan: &Plan) -> Result<()>;

    /// Loads the latest snapshot of a plan.
    ///
    /// # Errors
    ///
    /// [`crate::PlannerError::PlanNotFound`] when no snapshot exists.
    async fn load(&self, plan_id: &PlanId) -> Result<Plan>;

    /// Summaries of every stored plan, most recently updated first.
    async fn list(&self) -> Result<Vec<PlanSummary>>;

    /// Removes a snapshot.
    ///
    /// # Errors
    ///
    /// [`crate::PlannerError::PlanNotFound`] when no snapshot exists.
    async fn delete(&self, plan_id: &PlanId) -> Result<()>;
}

/// Orders summaries most recently updated first, then by ID for ties.
pub(crate) fn sort_summaries(summaries: &mut [PlanSummary]) {
    summaries.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then_with(|| a.id.cmp(&b.id)));
}
