use crate::PersistedStore;
use crate::batch::{WriteBatch, WriteOp};
use crate::builder::FileStoreBuilder;
use crate::error::{StorageError, StorageErrorExt};
use crate::key::StoreKey;
use crate::maintenance;
use serde_json::Value;
use std::io::ErrorKind;
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::{RwLock, RwLockReadGuard};
use tracing::{debug, info, warn};

pub(crate) const DATA_DIR: &str = "data";
pub(crate) const JOURNAL_FILE: &str = "batch.journal";
pub(crate) const RECORD_SUFFIX: &str = ".json";
/// Keys never contain `~`, so temp names cannot collide with records.
pub(crate) const TMP_MARKER: &str = "~tmp.";

#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub enum Compression {
    #[default]
    None,
    Lz4,
}

impl Compression {
    fn encode(self, value: &impl serde::Serialize) -> Result<Vec<u8>, StorageError> {
        let json = serde_json::to_vec(value)?;
        Ok(match self {
            Self::None => json,
            Self::Lz4 => lz4_flex::compress_prepend_size(&json),
        })
    }

    fn decode<T: serde::de::DeserializeOwned>(self, bytes: &[u8]) -> Result<T, StorageError> {
        match self {
            Self::None => Ok(serde_json::from_slice(bytes)?),
            Self::Lz4 => {
                let json = lz4_flex::decompress_size_prepended(bytes)?;
                Ok(serde_json::from_slice(&json)?)
            },
        }
    }
}

#[derive(Debug)]
pub struct FileStoreInner {
    pub(crate) root: PathBuf,
    pub(crate) compression: Compression,
    tmp_counter: AtomicU64,
    /// Readers share, commits and clears are exclusive.
    gate: RwLock<()>,
    /// A batch failed half-way; its journal must be rolled forward before anything else.
    pending: AtomicBool,
}

/// File-backed [`PersistedStore`].
///
/// Layout under the root:
///
/// ```text
/// <root>/batch.journal          pending batch, present only while a commit is in flight
/// <root>/data/<shard>/<key>.json
/// ```
///
/// The shard is a two-hex-digit bucket derived from the key, keeping directories small.
/// Cloning is cheap; clones share the same root and commit gate.
#[derive(Debug, Clone)]
pub struct FileStore {
    inner: Arc<FileStoreInner>,
}

impl Deref for FileStore {
    type Target = FileStoreInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl FileStore {
    #[must_use = "The store is not usable until you call .connect()"]
    pub fn builder() -> FileStoreBuilder {
        FileStoreBuilder::new()
    }

    pub(crate) async fn open(root: PathBuf, compression: Compression) -> Result<Self, StorageError> {
        let store = Self {
            inner: Arc::new(FileStoreInner {
                root,
                compression,
                tmp_counter: AtomicU64::new(1),
                gate: RwLock::new(()),
                pending: AtomicBool::new(false),
            }),
        };

        fs::create_dir_all(store.data_dir()).await.context("Creating data directory")?;
        maintenance::purge_tmp(&store.root).await;
        store.recover().await?;
        Ok(store)
    }

    /// Canonical root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn data_dir(&self) -> PathBuf {
        self.root.join(DATA_DIR)
    }

    fn journal_path(&self) -> PathBuf {
        self.root.join(JOURNAL_FILE)
    }

    /// Physical location of the document for `key`.
    #[must_use]
    pub fn path_for(&self, key: &StoreKey) -> PathBuf {
        let shard = format!("{:02x}", fxhash::hash64(key.as_str()) & 0xff);
        self.data_dir().join(shard).join(format!("{key}{RECORD_SUFFIX}"))
    }

    /// Rolls forward a batch whose commit was interrupted.
    async fn recover(&self) -> Result<(), StorageError> {
        let journal = self.journal_path();
        let bytes = match fs::read(&journal).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(()),
            Err(err) => return Err(err).context("Reading batch journal"),
        };

        match self.compression.decode::<WriteBatch>(&bytes) {
            Ok(batch) => {
                let ops = batch.len();
                self.apply(batch).await?;
                info!(ops, "Replayed interrupted batch from journal");
            },
            Err(err) => {
                warn!(error = %err, path = %journal.display(), "Discarding unreadable batch journal");
            },
        }

        remove_if_present(&journal).await
    }

    /// Shared access that never observes a half-applied batch.
    async fn read_gate(&self) -> Result<RwLockReadGuard<'_, ()>, StorageError> {
        loop {
            if self.pending.load(Ordering::Acquire) {
                let _write = self.gate.write().await;
                self.settle().await?;
            }
            let guard = self.gate.read().await;
            if !self.pending.load(Ordering::Acquire) {
                return Ok(guard);
            }
        }
    }

    /// Completes the batch left by a failed commit. Caller holds the write gate.
    async fn settle(&self) -> Result<(), StorageError> {
        if !self.pending.load(Ordering::Acquire) {
            return Ok(());
        }
        self.recover().await.context("Completing a failed batch")?;
        self.pending.store(false, Ordering::Release);
        Ok(())
    }

    async fn apply(&self, batch: WriteBatch) -> Result<(), StorageError> {
        for op in batch.into_ops() {
            match op {
                WriteOp::Put { key, value } => {
                    let bytes = self.compression.encode(&value)?;
                    self.write_atomic(&self.path_for(&key), &bytes).await?;
                },
                WriteOp::Delete { key } => remove_if_present(&self.path_for(&key)).await?,
            }
        }
        Ok(())
    }

    async fn write_atomic(&self, target: &Path, bytes: &[u8]) -> Result<(), StorageError> {
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)
                .await
                .context(format!("Creating shard {}", parent.display()))?;
        }

        let temp = self.tmp_path(target);
        {
            let mut file = fs::OpenOptions::new()
                .create_new(true)
                .write(true)
                .open(&temp)
                .await
                .context(format!("Creating temp file {}", temp.display()))?;
            file.write_all(bytes).await.context("Writing temp file")?;
            file.sync_all().await.context("Syncing temp file")?;
        }

        if let Err(err) = fs::rename(&temp, target).await {
            if err.kind() != ErrorKind::AlreadyExists {
                let _ = fs::remove_file(&temp).await;
                return Err(err).context(format!("Renaming into {}", target.display()));
            }
            fs::remove_file(target).await.context(format!("Replacing {}", target.display()))?;
            fs::rename(&temp, target).await.context(format!("Renaming into {}", target.display()))?;
        }

        if let Some(parent) = target.parent() {
            sync_dir(parent).await;
        }
        Ok(())
    }

    fn tmp_path(&self, target: &Path) -> PathBuf {
        let n = self.tmp_counter.fetch_add(1, Ordering::Relaxed);
        let name = target.file_name().and_then(|s| s.to_str()).unwrap_or("record");
        target.with_file_name(format!("{name}{TMP_MARKER}{n}"))
    }
}

impl PersistedStore for FileStore {
    async fn get(&self, key: &StoreKey) -> Result<Option<Value>, StorageError> {
        let _read = self.read_gate().await?;
        let path = self.path_for(key);
        match fs::read(&path).await {
            Ok(bytes) => self
                .compression
                .decode(&bytes)
                .map(Some)
                .context(format!("Decoding record '{key}'")),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err).context(format!("Reading {}", path.display())),
        }
    }

    async fn commit(&self, batch: WriteBatch) -> Result<(), StorageError> {
        if batch.is_empty() {
            return Ok(());
        }
        let _write = self.gate.write().await;
        self.settle().await?;
        let ops = batch.len();

        let journal = self.journal_path();
        let encoded = self.compression.encode(&batch)?;
        self.write_atomic(&journal, &encoded).await?;
        if let Err(err) = self.apply(batch).await {
            self.pending.store(true, Ordering::Release);
            warn!(ops, error = %err, "Batch applied partially, it will be completed before the next access");
            return Err(err);
        }
        remove_if_present(&journal).await?;

        debug!(ops, "Batch committed to file store");
        Ok(())
    }

    async fn clear(&self) -> Result<(), StorageError> {
        let _write = self.gate.write().await;
        let data = self.data_dir();
        match fs::remove_dir_all(&data).await {
            Ok(()) => {},
            Err(err) if err.kind() == ErrorKind::NotFound => {},
            Err(err) => return Err(err).context(format!("Removing {}", data.display())),
        }
        remove_if_present(&self.journal_path()).await?;
        self.pending.store(false, Ordering::Release);
        fs::create_dir_all(&data).await.context("Recreating data directory")?;
        info!(root = %self.root.display(), "File store cleared");
        Ok(())
    }

    async fn keys(&self) -> Result<Vec<StoreKey>, StorageError> {
        let _read = self.read_gate().await?;
        let data = self.data_dir();
        let mut keys = tokio::task::spawn_blocking(move || maintenance::scan_keys(&data))
            .await
            .context("Scanning store keys")?;
        keys.sort();
        Ok(keys)
    }
}

async fn remove_if_present(path: &Path) -> Result<(), StorageError> {
    match fs::remove_file(path).await {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
        Err(err) => Err(err).context(format!("Removing {}", path.display())),
    }
}

async fn sync_dir(path: &Path) {
    match fs::File::open(path).await {
        Ok(dir) => {
            if let Err(err) = dir.sync_all().await {
                warn!(path = %path.display(), error = %err, "Directory sync failed");
            }
        },
        Err(err) => warn!(path = %path.display(), error = %err, "Directory open failed"),
    }
}
