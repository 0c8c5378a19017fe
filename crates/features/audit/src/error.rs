use std::borrow::Cow;

/// Audit slice error type.
///
/// Every variant leaves the session untouched: teardown only runs after an accepted submission.
#[vaudit_derive::vaudit_error]
pub enum AuditError {
    /// Reading the inspection state failed.
    #[error("Inspection state unavailable{}: {source}", format_context(.context))]
    Inspection { source: vaudit_inspection::InspectionError, context: Option<Cow<'static, str>> },

    /// The backend could not be reached within the retry policy.
    #[error("Finalize transport failure{}: {message}", format_context(.context))]
    Transport { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The backend answered but did not accept the submission.
    #[error("Finalize rejected{}: {message}", format_context(.context))]
    Rejected { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Report output failure{}: {source}", format_context(.context))]
    Io { source: std::io::Error, context: Option<Cow<'static, str>> },

    #[error("Report encoding failure{}: {source}", format_context(.context))]
    Serialization { source: serde_json::Error, context: Option<Cow<'static, str>> },

    #[error("Internal audit error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl AuditError {
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }
}
