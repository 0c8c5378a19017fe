//! # Part Verification
//!
//! Contract between the inspection flow and the remote matching service.
//!
//! A captured photo goes to [`VerificationBackend::submit`]. The backend either answers with a
//! verdict or asks for a secondary text check, in which case the [`TextRecognizer`] reads the
//! image locally and [`VerificationBackend::finalize_text`] decides.
//!
//! [`Verifier`] runs both calls under a [`RetryPolicy`](vaudit_kernel::retry::RetryPolicy) and
//! never returns an error: transport failures, timeouts and odd answers all resolve to
//! `notok`, with the reason kept in [`VerificationOutcome::failure`].

mod error;
mod model;
mod verifier;

pub use error::{VerificationError, VerificationErrorExt};
pub use model::{PartVerificationRequest, SecondaryCheck, VerificationOutcome, VerificationResponse};
pub use verifier::{TextRecognizer, VerificationBackend, Verifier};
