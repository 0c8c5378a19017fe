use crate::error::{StorageError, StorageErrorExt};
use crate::file::{Compression, FileStore};
use private::Sealed;
use std::path::PathBuf;
use tokio::fs;
use tracing::info;

#[derive(Debug, Clone, Copy)]
struct Options {
    compression: Compression,
    create: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self { compression: Compression::None, create: true }
    }
}

#[derive(Debug, Default)]
pub struct NoRoot;
#[derive(Debug)]
pub struct WithRoot(PathBuf);

mod private {
    pub(super) trait Sealed {}
}
impl Sealed for NoRoot {}
impl Sealed for WithRoot {}

/// Type-state builder for [`FileStore`]; `connect` is only available once a root is set.
#[allow(private_bounds)]
#[derive(Debug, Default)]
pub struct FileStoreBuilder<S: Sealed = NoRoot> {
    state: S,
    options: Options,
}

#[allow(private_bounds)]
impl<S: Sealed> FileStoreBuilder<S> {
    #[must_use]
    pub const fn compression(mut self, compression: Compression) -> Self {
        self.options.compression = compression;
        self
    }

    /// Whether a missing root directory is created on connect. Defaults to `true`.
    #[must_use]
    pub const fn create(mut self, enable: bool) -> Self {
        self.options.create = enable;
        self
    }
}

impl FileStoreBuilder<NoRoot> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn root(self, path: impl Into<PathBuf>) -> FileStoreBuilder<WithRoot> {
        FileStoreBuilder { state: WithRoot(path.into()), options: self.options }
    }
}

impl FileStoreBuilder<WithRoot> {
    /// Opens the store.
    ///
    /// Boot sequence: create the root (if allowed), canonicalize it, purge orphaned temp files,
    /// then replay a leftover batch journal so a commit interrupted by a crash is completed
    /// before the first read.
    ///
    /// # Errors
    /// * [`StorageError::RootNotFound`] when the root is missing and `create(false)` was set.
    /// * [`StorageError::Io`] when the root cannot be created or resolved, or replay fails.
    pub async fn connect(self) -> Result<FileStore, StorageError> {
        let root = self.state.0;

        if self.options.create {
            fs::create_dir_all(&root)
                .await
                .context(format!("Failed to bootstrap store root: {}", root.display()))?;
        } else if !fs::try_exists(&root).await.unwrap_or(false) {
            return Err(StorageError::RootNotFound {
                message: root.display().to_string().into(),
                context: None,
            });
        }

        let canonical = fs::canonicalize(&root)
            .await
            .context(format!("Failed to resolve store root: {}", root.display()))?;

        let store = FileStore::open(canonical, self.options.compression).await?;
        info!(root = %store.root().display(), compression = ?self.options.compression, "File store connected");
        Ok(store)
    }
}
