//! Persisted key → JSON store used by the inspection engine.
//!
//! The engine treats every stored key as one logical field of a record and mutates several of
//! them per state transition. This crate therefore exposes a deliberately small contract,
//! [`PersistedStore`], whose only mutation is [`commit`](PersistedStore::commit): a
//! [`WriteBatch`] that becomes visible all at once or not at all.
//!
//! # Backends
//!
//! - [`MemoryStore`]: process-local map behind a single lock. Tests and ephemeral sessions.
//! - [`FileStore`]: one JSON document per key in a sharded directory tree.
//!   - every document is written with the temp file + `fsync` + rename pattern;
//!   - a batch is first persisted as a journal, then applied, then the journal is dropped, so a
//!     crash mid-batch is rolled forward on the next [`connect`](FileStoreBuilder::connect);
//!   - a batch that fails half-way in a running process is rolled forward before the next read
//!     or commit; until that succeeds every access returns the error;
//!   - optional LZ4 compression is transparent to callers;
//!   - orphaned temp files from earlier crashes are purged on connect.
//!
//! # Example
//!
//! ```rust
//! use serde_json::json;
//! use vaudit_storage::{FileStore, PersistedStore, StorageError, StoreKey, WriteBatch};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), StorageError> {
//! # let tmp = tempfile::tempdir().unwrap();
//! let store = FileStore::builder().root(tmp.path().join("session")).connect().await?;
//!
//! let ok = StoreKey::new("counters.interior")?;
//! let retry = StoreKey::new("retry")?;
//! store
//!     .commit(WriteBatch::new().put(ok.clone(), json!({ "pending": 3 })).put(retry, json!(0)))
//!     .await?;
//!
//! assert_eq!(store.get(&ok).await?, Some(json!({ "pending": 3 })));
//! # Ok(())
//! # }
//! ```

mod batch;
mod builder;
mod error;
mod file;
mod key;
mod maintenance;
mod memory;

pub use batch::{WriteBatch, WriteOp};
pub use builder::FileStoreBuilder;
pub use error::{StorageError, StorageErrorExt};
pub use file::{Compression, FileStore};
pub use key::StoreKey;
pub use memory::MemoryStore;

use serde_json::Value;
use std::future::Future;

/// Asynchronous key → JSON store with atomic multi-key batches.
///
/// Implementations must guarantee that once `commit` returns `Ok`, every later `get` observes
/// all operations of the batch, and that a failed or interrupted commit is observed either
/// completely or not at all.
pub trait PersistedStore: Send + Sync + 'static {
    /// Reads the value under `key`; `None` when absent.
    fn get(
        &self,
        key: &StoreKey,
    ) -> impl Future<Output = Result<Option<Value>, StorageError>> + Send;

    /// Applies every operation of `batch` atomically.
    fn commit(&self, batch: WriteBatch) -> impl Future<Output = Result<(), StorageError>> + Send;

    /// Removes every key.
    fn clear(&self) -> impl Future<Output = Result<(), StorageError>> + Send;

    /// Lists all present keys in ascending order.
    fn keys(&self) -> impl Future<Output = Result<Vec<StoreKey>, StorageError>> + Send;

    /// Single-key convenience over [`commit`](Self::commit).
    fn put(
        &self,
        key: StoreKey,
        value: Value,
    ) -> impl Future<Output = Result<(), StorageError>> + Send {
        self.commit(WriteBatch::new().put(key, value))
    }
}
