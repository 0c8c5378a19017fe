use std::borrow::Cow;

/// Errors of the persisted store backends.
#[vaudit_derive::vaudit_error]
pub enum StorageError {
    /// A key failed validation (empty, too long or illegal characters).
    #[error("Invalid store key{}: {message}", format_context(.context))]
    InvalidKey { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Storage root not found{}: {message}", format_context(.context))]
    RootNotFound { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Hardware I/O failure{}: {source}", format_context(.context))]
    Io { source: std::io::Error, context: Option<Cow<'static, str>> },

    /// Stored bytes are not valid JSON, or a value could not be encoded.
    #[error("Serialization failure{}: {source}", format_context(.context))]
    Serialization { source: serde_json::Error, context: Option<Cow<'static, str>> },

    #[error("Decompression failure{}: {source}", format_context(.context))]
    Decompress { source: lz4_flex::block::DecompressError, context: Option<Cow<'static, str>> },

    /// A blocking maintenance task could not be joined.
    #[error("Background task failure{}: {source}", format_context(.context))]
    Task { source: tokio::task::JoinError, context: Option<Cow<'static, str>> },
}

impl StorageError {
    /// Whether the error describes unreadable stored content rather than an unusable store.
    #[must_use]
    pub const fn is_corrupt_record(&self) -> bool {
        matches!(self, Self::Serialization { .. } | Self::Decompress { .. })
    }
}
