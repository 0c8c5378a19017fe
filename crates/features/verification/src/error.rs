use std::borrow::Cow;

#[vaudit_derive::vaudit_error]
pub enum VerificationError {
    /// The backend could not be reached or dropped the connection.
    #[error("Verification transport failure{}: {message}", format_context(.context))]
    Transport { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Verification timed out{}: {message}", format_context(.context))]
    Timeout { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The backend answered with something other than a verdict or a secondary check.
    #[error("Unexpected verification response{}: {message}", format_context(.context))]
    UnexpectedResponse { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// Local text recognition failed.
    #[error("Text recognition failed{}: {message}", format_context(.context))]
    Recognition { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Internal verification error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

impl VerificationError {
    /// Whether another attempt may succeed.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Transport { .. } | Self::Timeout { .. })
    }
}
