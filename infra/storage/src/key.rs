use crate::error::StorageError;
use serde::{Deserialize, Serialize};
use std::fmt;

const MAX_KEY_LEN: usize = 128;

/// A validated store key.
///
/// Keys are 1 to 128 characters from `[A-Za-z0-9_.-]` and never start with a dot, so a key can
/// be used verbatim as a file name and can never address anything outside the store.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StoreKey(String);

impl StoreKey {
    /// # Errors
    /// [`StorageError::InvalidKey`] when the key breaks the rules above.
    pub fn new(key: impl Into<String>) -> Result<Self, StorageError> {
        let key = key.into();
        validate(&key)?;
        Ok(Self(key))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn validate(key: &str) -> Result<(), StorageError> {
    let reason = if key.is_empty() {
        Some("key cannot be empty")
    } else if key.len() > MAX_KEY_LEN {
        Some("key exceeds 128 characters")
    } else if key.starts_with('.') {
        Some("key cannot start with '.'")
    } else if !key.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-')) {
        Some("key contains illegal characters")
    } else {
        None
    };

    reason.map_or(Ok(()), |reason| {
        Err(StorageError::InvalidKey { message: key.to_owned().into(), context: Some(reason.into()) })
    })
}

impl TryFrom<String> for StoreKey {
    type Error = StorageError;

    fn try_from(value: String) -> Result<Self, StorageError> {
        Self::new(value)
    }
}

impl TryFrom<&str> for StoreKey {
    type Error = StorageError;

    fn try_from(value: &str) -> Result<Self, StorageError> {
        Self::new(value)
    }
}

impl From<StoreKey> for String {
    fn from(key: StoreKey) -> Self {
        key.0
    }
}

impl AsRef<str> for StoreKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StoreKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
