//! Plan persistence client.
//!
//! Saves whole-plan snapshots under freshly generated identifiers and keeps
//! an ordered index of every identifier saved through it. Storage layout:
//!
//! ```text
//! tripPlanner_<uuid>        -> serialized Plan snapshot
//! tripPlanner_savedPlans    -> JSON array of uuids, in save order
//! ```

use thiserror::Error;
use tracing::{debug, info};

use crate::kv::{KeyValueStore, KvError};
use crate::models::{Plan, PlanId};

/// Prefix of every snapshot key.
pub const SNAPSHOT_KEY_PREFIX: &str = "tripPlanner_";

/// Well-known key of the saved-plan index.
pub const INDEX_KEY: &str = "tripPlanner_savedPlans";

/// Errors from saving or loading plans.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("storage is unavailable: {0}")]
    StorageUnavailable(#[source] KvError),

    #[error("plan {0} not found")]
    NotFound(PlanId),

    #[error("stored data under {key:?} is not valid: {source}")]
    Corrupt {
        key: String,
        source: serde_json::Error,
    },

    #[error("failed to serialize plan: {0}")]
    Serialize(#[source] serde_json::Error),
}

impl From<KvError> for StoreError {
    fn from(e: KvError) -> Self {
        Self::StorageUnavailable(e)
    }
}

/// Key under which the snapshot for `id` is stored.
pub fn snapshot_key(id: PlanId) -> String {
    format!("{SNAPSHOT_KEY_PREFIX}{id}")
}

/// Shareable URL for a saved plan: `{base_url}/plans/{id}`.
///
/// A trailing slash on `base_url` is dropped so the path is not doubled.
pub fn share_url(base_url: &str, id: PlanId) -> String {
    format!("{}/plans/{id}", base_url.trim_end_matches('/'))
}

/// Persistence client over an explicit [`KeyValueStore`].
#[derive(Debug)]
pub struct PlanStore<S> {
    kv: S,
}

impl<S: KeyValueStore> PlanStore<S> {
    pub fn new(kv: S) -> Self {
        Self { kv }
    }

    pub fn kv(&self) -> &S {
        &self.kv
    }

    /// Save a snapshot of `plan` under a fresh identifier.
    ///
    /// The snapshot is written first; the index is only extended once that
    /// write has succeeded, so a failure never leaves a dangling index entry.
    pub fn save_plan(&mut self, plan: &Plan) -> Result<PlanId, StoreError> {
        let id = PlanId::generate();
        let snapshot = serde_json::to_string(plan).map_err(StoreError::Serialize)?;

        self.kv.set(&snapshot_key(id), &snapshot)?;

        let mut ids = self.saved_plan_ids()?;
        ids.push(id);
        let index = serde_json::to_string(&ids).map_err(StoreError::Serialize)?;
        self.kv.set(INDEX_KEY, &index)?;

        info!(%id, kind = %plan.kind(), days = plan.day_count(), "plan saved");
        Ok(id)
    }

    /// Load the snapshot saved under `id`, exactly as stored.
    pub fn load_plan(&self, id: PlanId) -> Result<Plan, StoreError> {
        let key = snapshot_key(id);
        let Some(raw) = self.kv.get(&key)? else {
            debug!(%id, "plan snapshot not found");
            return Err(StoreError::NotFound(id));
        };
        serde_json::from_str(&raw).map_err(|source| StoreError::Corrupt { key, source })
    }

    /// Identifiers of all saved plans, in save order. Empty if none.
    pub fn saved_plan_ids(&self) -> Result<Vec<PlanId>, StoreError> {
        match self.kv.get(INDEX_KEY)? {
            Some(raw) => serde_json::from_str(&raw).map_err(|source| StoreError::Corrupt {
                key: INDEX_KEY.to_owned(),
                source,
            }),
            None => Ok(Vec::new()),
        }
    }

    /// Shareable URLs of all saved plans, in save order.
    pub fn list_saved_plan_urls(&self, base_url: &str) -> Result<Vec<String>, StoreError> {
        Ok(self
            .saved_plan_ids()?
            .into_iter()
            .map(|id| share_url(base_url, id))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::MemoryStore;
    use crate::models::ScheduleItem;

    fn outing() -> Plan {
        Plan::Outing(vec![
            ScheduleItem::new("10:00 - 11:00", "Cafe ABC", "breakfast").unwrap(),
        ])
    }

    #[test]
    fn snapshot_key_format() {
        let id: PlanId = "6f1c2f4e-2b1a-4c3d-9e8f-0a1b2c3d4e5f".parse().unwrap();
        assert_eq!(
            snapshot_key(id),
            "tripPlanner_6f1c2f4e-2b1a-4c3d-9e8f-0a1b2c3d4e5f"
        );
    }

    #[test]
    fn share_url_trims_trailing_slash() {
        let id = PlanId::generate();
        assert_eq!(
            share_url("http://localhost:3000/", id),
            format!("http://localhost:3000/plans/{id}")
        );
        assert_eq!(
            share_url("https://example.com", id),
            format!("https://example.com/plans/{id}")
        );
    }

    #[test]
    fn save_writes_snapshot_and_index() {
        let mut store = PlanStore::new(MemoryStore::new());
        let id = store.save_plan(&outing()).unwrap();

        let raw = store.kv().get(&snapshot_key(id)).unwrap().unwrap();
        assert!(raw.starts_with('['), "outing snapshot should be an array: {raw}");

        let index = store.kv().get(INDEX_KEY).unwrap().unwrap();
        assert_eq!(index, format!("[\"{id}\"]"));
    }

    #[test]
    fn load_missing_is_not_found() {
        let store = PlanStore::new(MemoryStore::new());
        let id = PlanId::generate();
        assert!(matches!(store.load_plan(id), Err(StoreError::NotFound(got)) if got == id));
    }

    #[test]
    fn unavailable_store_fails_save_without_index() {
        let mut store = PlanStore::new(MemoryStore::unavailable());
        let err = store.save_plan(&outing()).unwrap_err();
        assert!(matches!(err, StoreError::StorageUnavailable(_)));
        assert!(store.kv().is_empty());
    }

    #[test]
    fn corrupt_index_is_reported() {
        let mut kv = MemoryStore::new();
        kv.set(INDEX_KEY, "{oops").unwrap();
        let store = PlanStore::new(kv);
        assert!(matches!(
            store.saved_plan_ids(),
            Err(StoreError::Corrupt { ref key, .. }) if key == INDEX_KEY
        ));
    }

    #[test]
    fn list_urls_empty_without_index() {
        let store = PlanStore::new(MemoryStore::new());
        assert!(store.list_saved_plan_urls("http://x").unwrap().is_empty());
    }
}
