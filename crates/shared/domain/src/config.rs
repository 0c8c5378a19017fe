use serde::Deserialize;
use std::ops::{Deref, DerefMut};
use std::path::PathBuf;
use std::sync::Arc;

/// Top-level configuration of an inspection run.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct InspectionConfigInner {
    pub bypass: BypassConfig,
    pub reopen: ReopenConfig,
    /// Per-part verification calls.
    pub verification: RetryConfig,
    /// Final audit submission.
    pub finalize: RetryConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}

/// Thin Arc-wrapped config for inexpensive cloning into subsystems.
#[derive(Default, Debug, Clone, Deserialize)]
pub struct InspectionConfig {
    #[serde(flatten, default)]
    inner: Arc<InspectionConfigInner>,
}

impl Deref for InspectionConfig {
    type Target = InspectionConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DerefMut for InspectionConfig {
    fn deref_mut(&mut self) -> &mut InspectionConfigInner {
        Arc::make_mut(&mut self.inner)
    }
}

/// Supervisor bypass of a failing part.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BypassConfig {
    pub pin: String,
    /// Wrong PINs tolerated per part before bypass is locked. `None` never locks.
    pub max_attempts: Option<u32>,
}

#[derive(Default, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ReopenConfig {
    /// Whether a component already closed as `ok` may be reopened.
    pub allow_ok: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackoffKind {
    #[default]
    Fixed,
    Exponential,
}

/// Retry settings for a remote call.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub delay_ms: u64,
    pub timeout_ms: u64,
    pub backoff: BackoffKind,
    /// Upper bound for exponential delays.
    pub max_delay_ms: u64,
}

impl RetryConfig {
    /// Single attempt with a generous timeout, used for the final submission.
    #[must_use]
    pub const fn single_attempt(timeout_ms: u64) -> Self {
        Self {
            max_attempts: 1,
            delay_ms: 0,
            timeout_ms,
            backoff: BackoffKind::Fixed,
            max_delay_ms: 0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
    /// LZ4-compress stored records.
    pub compression: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// JSON lines for file output.
    pub json: bool,
    /// Rolling log directory; console only when absent.
    pub directory: Option<PathBuf>,
}

// --- Default ---

impl Default for InspectionConfigInner {
    fn default() -> Self {
        Self {
            bypass: BypassConfig::default(),
            reopen: ReopenConfig::default(),
            verification: RetryConfig::default(),
            finalize: RetryConfig::single_attempt(20_000),
            storage: StorageConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for BypassConfig {
    fn default() -> Self {
        Self { pin: "0000".to_owned(), max_attempts: None }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 4,
            delay_ms: 1_000,
            timeout_ms: 10_000,
            backoff: BackoffKind::Fixed,
            max_delay_ms: 30_000,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self { data_dir: PathBuf::from(".vaudit"), compression: false }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: "info".to_owned(), json: false, directory: None }
    }
}
