use crate::error::StorageError;
use crate::key::StoreKey;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single mutation inside a [`WriteBatch`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum WriteOp {
    Put { key: StoreKey, value: Value },
    Delete { key: StoreKey },
}

impl WriteOp {
    #[must_use]
    pub const fn key(&self) -> &StoreKey {
        match self {
            Self::Put { key, .. } | Self::Delete { key } => key,
        }
    }
}

/// An ordered set of mutations applied all-or-nothing by
/// [`PersistedStore::commit`](crate::PersistedStore::commit).
///
/// Later operations on the same key win.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WriteBatch {
    ops: Vec<WriteOp>,
}

impl WriteBatch {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a put of an already-encoded JSON value.
    #[must_use]
    pub fn put(mut self, key: StoreKey, value: Value) -> Self {
        self.ops.push(WriteOp::Put { key, value });
        self
    }

    /// Encodes `value` and queues it.
    ///
    /// # Errors
    /// [`StorageError::Serialization`] when `value` cannot be represented as JSON.
    pub fn put_json<T: Serialize + ?Sized>(
        self,
        key: StoreKey,
        value: &T,
    ) -> Result<Self, StorageError> {
        let value = serde_json::to_value(value)?;
        Ok(self.put(key, value))
    }

    #[must_use]
    pub fn delete(mut self, key: StoreKey) -> Self {
        self.ops.push(WriteOp::Delete { key });
        self
    }

    /// Appends every operation of `other`.
    #[must_use]
    pub fn merge(mut self, other: Self) -> Self {
        self.ops.extend(other.ops);
        self
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.ops.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn ops(&self) -> impl Iterator<Item = &WriteOp> {
        self.ops.iter()
    }

    #[must_use]
    pub fn into_ops(self) -> Vec<WriteOp> {
        self.ops
    }
}
