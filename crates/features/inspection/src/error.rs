use std::borrow::Cow;

/// Inspection slice error type.
///
/// Every variant except [`Storage`](Self::Storage) and [`Serialization`](Self::Serialization)
/// is raised before anything is written, so the persisted state is unchanged.
#[vaudit_derive::vaudit_error]
pub enum InspectionError {
    #[error("Storage failure{}: {source}", format_context(.context))]
    Storage { source: vaudit_storage::StorageError, context: Option<Cow<'static, str>> },

    #[error("Record encoding failure{}: {source}", format_context(.context))]
    Serialization { source: serde_json::Error, context: Option<Cow<'static, str>> },

    /// No session has been initialized in the store.
    #[error("Inspection session not initialized{}: {message}", format_context(.context))]
    NotInitialized { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// A session already exists; clear it before seeding a new one.
    #[error("Inspection session already initialized{}: {message}", format_context(.context))]
    AlreadyInitialized { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The case configuration cannot be used to seed a session.
    #[error("Invalid component catalog{}: {message}", format_context(.context))]
    InvalidCatalog { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Unknown component{}: {message}", format_context(.context))]
    UnknownComponent { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Part index out of range{}: {message}", format_context(.context))]
    PartOutOfRange { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The component's most recent pass is closed; start a new pass first.
    #[error("Pass already closed{}: {message}", format_context(.context))]
    PassAlreadyClosed { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Reopen requested for a component that has no resolved verdict.
    #[error("Nothing to reopen{}: {message}", format_context(.context))]
    NothingToReopen { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Reopen requested for an `ok` component while policy forbids it.
    #[error("Component locked{}: {message}", format_context(.context))]
    ComponentLocked { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Bypass requested before the retake-or-bypass prompt was shown for this part.
    #[error("Bypass not offered{}: {message}", format_context(.context))]
    BypassNotOffered { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Wrong supervisor PIN.
    #[error("Bypass denied{}: {message}", format_context(.context))]
    BypassDenied { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Too many wrong PINs for the current part.
    #[error("Bypass locked{}: {message}", format_context(.context))]
    BypassLocked { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Internal inspection error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl InspectionError {
    /// Whether the error is a recoverable user-facing rejection rather than a fault.
    #[must_use]
    pub const fn is_rejection(&self) -> bool {
        !matches!(self, Self::Storage { .. } | Self::Serialization { .. } | Self::Internal { .. })
    }
}
