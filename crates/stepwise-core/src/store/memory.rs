use std::{
    collections::BTreeMap,
    sync::atomic::{AtomicUsize, Ordering},
};

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::{sort_summaries, SnapshotStore};
use crate::{
    error::{PlannerError, Result},
    models::{Plan, PlanId, PlanSummary},
};

/// In-memory snapshot store.
#[derive(Default)]
pub struct MemoryStore {
    plans: Mutex<BTreeMap<PlanId, Plan>>,
    saves: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `save` calls so far.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SnapshotStore for MemoryStore {
    async fn save(&self, plan: &Plan) -> Result<()> {
        self.plans.lock().await.insert(plan.id.clone(), plan.clone());
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn load(&self, plan_id: &PlanId) -> Result<Plan> {
        self.plans
            .lock()
            .await
            .get(plan_id)
            .cloned()
            .ok_or_else(|| PlannerError::PlanNotFound {
                id: plan_id.clone(),
            })
    }

    async fn list(&self) -> Result<Vec<PlanSummary>> {
        let mut summaries: Vec<PlanSummary> =
            self.plans.lock().await.values().map(Into::into).collect();
        sort_summaries(&mut summaries);
        Ok(summaries)
    }

    async fn delete(&self, plan_id: &PlanId) -> Result<()> {
        match self.plans.lock().await.remove(plan_id) {
            Some(_) => Ok(()),
            None => Err(PlannerError::PlanNotFound {
                id: plan_id.clone(),
            }),
        }
    }
}
