//! Facade crate for the vehicle audit slices and shared modules.
//! Re-exports domain/kernel primitives and the feature slices, and composes them where a flow
//! spans more than one slice.
//! Keep this crate thin: business rules live in the slices.

pub use vaudit_domain as domain;
pub use vaudit_events as events;
pub use vaudit_kernel as kernel;
pub use vaudit_logger as logger;
pub use vaudit_storage as storage;

/// Feature slices.
pub mod features {
    pub use vaudit_audit as audit;
    pub use vaudit_inspection as inspection;
    pub use vaudit_verification as verification;

    pub const ENABLED: &[&str] = &["inspection", "verification", "audit"];
}

pub mod workflow;

pub use vaudit_audit::{AuditError, DirectoryBackend, Finalizer};
pub use vaudit_inspection::{InspectionError, InspectionSession, Transition};
pub use vaudit_verification::Verifier;
