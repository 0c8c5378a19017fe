use crate::PersistedStore;
use crate::batch::{WriteBatch, WriteOp};
use crate::error::StorageError;
use crate::key::StoreKey;
use fxhash::FxHashMap;
use parking_lot::RwLock;
use serde_json::Value;
use std::sync::Arc;
use tracing::trace;

/// In-memory [`PersistedStore`]. Clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<RwLock<FxHashMap<StoreKey, Value>>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl PersistedStore for MemoryStore {
    async fn get(&self, key: &StoreKey) -> Result<Option<Value>, StorageError> {
        Ok(self.entries.read().get(key).cloned())
    }

    async fn commit(&self, batch: WriteBatch) -> Result<(), StorageError> {
        let ops = batch.len();
        let mut entries = self.entries.write();
        for op in batch.into_ops() {
            match op {
                WriteOp::Put { key, value } => {
                    entries.insert(key, value);
                },
                WriteOp::Delete { key } => {
                    entries.remove(&key);
                },
            }
        }
        drop(entries);
        trace!(ops, "Batch committed to memory store");
        Ok(())
    }

    async fn clear(&self) -> Result<(), StorageError> {
        self.entries.write().clear();
        Ok(())
    }

    async fn keys(&self) -> Result<Vec<StoreKey>, StorageError> {
        let mut keys: Vec<_> = self.entries.read().keys().cloned().collect();
        keys.sort();
        Ok(keys)
    }
}
