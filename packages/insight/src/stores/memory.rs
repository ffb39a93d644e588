//! In-memory result store, with JSON snapshot export for the CLI.

use std::collections::HashMap;
use std::path::Path;
use std::sync::RwLock;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{ArtifactResult, StoreError, StoreResult};
use crate::traits::store::ResultStore;
use crate::types::listing::ListingId;
use crate::types::result::StoredResult;

/// In-memory store of per-listing results.
///
/// Suitable for single-node batch runs and tests; data is lost on restart
/// unless exported with [`MemoryResultStore::save_snapshot`].
pub struct MemoryResultStore {
    results: RwLock<HashMap<ListingId, StoredResult>>,
}

/// One row of the JSON snapshot format.
#[derive(Debug, Serialize, Deserialize)]
struct SnapshotEntry {
    id: ListingId,
    result: StoredResult,
}

impl Default for MemoryResultStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryResultStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            results: RwLock::new(HashMap::new()),
        }
    }

    /// Clear all stored results.
    pub fn clear(&self) {
        self.results.write().unwrap().clear();
    }

    /// Number of stored results (sync convenience).
    pub fn len(&self) -> usize {
        self.results.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Export the store as a JSON snapshot.
    ///
    /// Rows are sorted by identifier so snapshots of identical runs are
    /// byte-identical.
    pub fn save_snapshot(&self, path: impl AsRef<Path>) -> ArtifactResult<()> {
        let results = self.results.read().unwrap();
        let mut entries: Vec<SnapshotEntry> = results
            .iter()
            .map(|(id, result)| SnapshotEntry {
                id: *id,
                result: result.clone(),
            })
            .collect();
        entries.sort_by_key(|e| (e.id.seller_id, e.id.listing_id));

        let text = serde_json::to_string_pretty(&entries)?;
        std::fs::write(path, text)?;
        Ok(())
    }

    /// Load a store from a JSON snapshot.
    pub fn load_snapshot(path: impl AsRef<Path>) -> ArtifactResult<Self> {
        let text = std::fs::read_to_string(path)?;
        let entries: Vec<SnapshotEntry> = serde_json::from_str(&text)?;

        let store = Self::new();
        {
            let mut results = store.results.write().unwrap();
            for entry in entries {
                results.insert(entry.id, entry.result);
            }
        }
        Ok(store)
    }
}

#[async_trait]
impl ResultStore for MemoryResultStore {
    async fn store_result(&self, id: ListingId, result: &StoredResult) -> StoreResult<()> {
        self.results.write().unwrap().insert(id, result.clone());
        Ok(())
    }

    async fn get_result(&self, id: ListingId) -> StoreResult<StoredResult> {
        self.results
            .read()
            .unwrap()
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFound { id })
    }

    async fn count(&self) -> StoreResult<usize> {
        Ok(self.len())
    }

    async fn ids(&self) -> StoreResult<Vec<ListingId>> {
        Ok(self.results.read().unwrap().keys().copied().collect())
    }
}
