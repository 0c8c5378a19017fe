//! # Typed Repository
//!
//! Maps every inspection record onto a [`PersistedStore`] key and back.
//!
//! Keys are built only from [`RecordKey`]; nothing outside this module concatenates strings
//! into keys. Reads are forgiving: a missing, undecodable or corrupt record yields the type's
//! default and a warning, because an unreadable counter must never take the session down.
//! Writes are staged in [`Changes`] and land through a single [`Repository::commit`].

use crate::error::InspectionError;
use crate::registry::ComponentRegistry;
use crate::retry::RetryState;
use crate::session::SessionRecord;
use crate::status::ComponentStatus;
use crate::tally::{ResultTally, SessionTally};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt::{self, Write as _};
use tracing::{debug, warn};
use vaudit_kernel::domain::{ComponentId, Domain, DomainCounters};
use vaudit_storage::{PersistedStore, StoreKey, WriteBatch};

/// Logical address of one persisted record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordKey {
    Session,
    Registry(Domain),
    Status(Domain, ComponentId),
    Tally(Domain, ComponentId),
    Counters(Domain),
    SessionTally,
    Retry,
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Session => f.write_str("session"),
            Self::Registry(domain) => write!(f, "registry.{domain}"),
            Self::Status(domain, id) => write!(f, "status.{domain}.{}", escape_id(id)),
            Self::Tally(domain, id) => write!(f, "tally.{domain}.{}", escape_id(id)),
            Self::Counters(domain) => write!(f, "counters.{domain}"),
            Self::SessionTally => f.write_str("pass"),
            Self::Retry => f.write_str("retry"),
        }
    }
}

impl RecordKey {
    /// # Errors
    /// [`InspectionError::Storage`] if the rendered key is not store-safe.
    pub fn store_key(&self) -> Result<StoreKey, InspectionError> {
        Ok(StoreKey::new(self.to_string())?)
    }
}

/// Renders a component id with key-safe characters only.
///
/// ASCII letters, digits and `-` pass through; every other byte, `_` included, becomes `_XX`.
/// Escapes have a fixed width, so distinct ids always give distinct keys.
fn escape_id(id: &ComponentId) -> String {
    let mut out = String::with_capacity(id.as_str().len());
    for byte in id.as_str().bytes() {
        if byte.is_ascii_alphanumeric() || byte == b'-' {
            out.push(char::from(byte));
        } else {
            let _ = write!(out, "_{byte:02X}");
        }
    }
    out
}

/// Writes staged for one transition.
#[derive(Debug, Default)]
pub struct Changes {
    batch: WriteBatch,
}

impl Changes {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// # Errors
    /// Fails when the key is invalid or the record cannot be encoded.
    pub fn put<T: Serialize + ?Sized>(self, key: &RecordKey, record: &T) -> Result<Self, InspectionError> {
        let value = serde_json::to_value(record)?;
        Ok(Self { batch: self.batch.put(key.store_key()?, value) })
    }

    /// Removes raw store keys, e.g. every record of an earlier session.
    #[must_use]
    pub fn delete(self, keys: impl IntoIterator<Item = StoreKey>) -> Self {
        Self { batch: keys.into_iter().fold(self.batch, WriteBatch::delete) }
    }

    /// Appends `other`; its writes land after these.
    #[must_use]
    pub fn merge(self, other: Self) -> Self {
        Self { batch: self.batch.merge(other.batch) }
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.batch.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.batch.is_empty()
    }
}

/// Typed access to the inspection records of one session.
#[derive(Debug, Clone)]
pub struct Repository<S> {
    store: S,
}

impl<S: PersistedStore> Repository<S> {
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Reads `key`, or `None` when absent or unreadable.
    ///
    /// # Errors
    /// [`InspectionError::Storage`] when the store itself fails.
    pub async fn read_opt<T: DeserializeOwned>(&self, key: &RecordKey) -> Result<Option<T>, InspectionError> {
        let value = match self.store.get(&key.store_key()?).await {
            Ok(value) => value,
            Err(e) if e.is_corrupt_record() => {
                warn!(key = %key, error = %e, "Corrupt record, falling back to default");
                return Ok(None);
            },
            Err(e) => return Err(e.into()),
        };
        let Some(value) = value else {
            return Ok(None);
        };
        match serde_json::from_value(value) {
            Ok(record) => Ok(Some(record)),
            Err(e) => {
                warn!(key = %key, error = %e, "Malformed record, falling back to default");
                Ok(None)
            },
        }
    }

    /// Reads `key`, substituting the default when absent or unreadable.
    ///
    /// # Errors
    /// [`InspectionError::Storage`] when the store itself fails.
    pub async fn read<T: DeserializeOwned + Default>(&self, key: &RecordKey) -> Result<T, InspectionError> {
        let record = self.read_opt(key).await?;
        if record.is_none() {
            debug!(key = %key, "Record absent, using default");
        }
        Ok(record.unwrap_or_default())
    }

    /// # Errors
    /// [`InspectionError::NotInitialized`] when no session record exists.
    pub async fn session(&self) -> Result<SessionRecord, InspectionError> {
        self.read_opt(&RecordKey::Session).await?.ok_or_else(|| InspectionError::NotInitialized {
            message: "no session record".into(),
            context: None,
        })
    }

    /// # Errors
    /// Store failures only.
    pub async fn registry(&self, domain: Domain) -> Result<ComponentRegistry, InspectionError> {
        self.read(&RecordKey::Registry(domain)).await
    }

    /// # Errors
    /// Store failures only.
    pub async fn status(&self, domain: Domain, id: &ComponentId) -> Result<ComponentStatus, InspectionError> {
        self.read(&RecordKey::Status(domain, id.clone())).await
    }

    /// # Errors
    /// Store failures only.
    pub async fn tally(&self, domain: Domain, id: &ComponentId) -> Result<ResultTally, InspectionError> {
        self.read(&RecordKey::Tally(domain, id.clone())).await
    }

    /// # Errors
    /// Store failures only.
    pub async fn counters(&self, domain: Domain) -> Result<DomainCounters, InspectionError> {
        self.read(&RecordKey::Counters(domain)).await
    }

    /// # Errors
    /// Store failures only.
    pub async fn session_tally(&self) -> Result<SessionTally, InspectionError> {
        self.read(&RecordKey::SessionTally).await
    }

    /// # Errors
    /// Store failures only.
    pub async fn retry(&self) -> Result<RetryState, InspectionError> {
        self.read(&RecordKey::Retry).await
    }

    /// Applies every staged write at once.
    ///
    /// # Errors
    /// [`InspectionError::Storage`] when the batch is rejected; nothing is applied then.
    pub async fn commit(&self, changes: Changes) -> Result<(), InspectionError> {
        if changes.is_empty() {
            return Ok(());
        }
        let ops = changes.len();
        self.store.commit(changes.batch).await?;
        debug!(ops, "Inspection records committed");
        Ok(())
    }

    /// Drops every record.
    ///
    /// # Errors
    /// [`InspectionError::Storage`].
    pub async fn clear(&self) -> Result<(), InspectionError> {
        self.store.clear().await?;
        Ok(())
    }
}
