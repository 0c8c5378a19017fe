//! # Audit Finalizer
//!
//! Closes an inspection run: reads the vehicle identity, the domain counters and the overall
//! verdict of every catalogued component into an [`AuditSnapshot`], submits it through an
//! [`AuditBackend`] and, once accepted, tears the session down.
//!
//! A failed or rejected submission leaves the session intact so the worker can retry without
//! walking the components again.

mod backend;
mod error;
mod finalizer;
mod snapshot;
mod source;

pub use backend::{AuditBackend, DirectoryBackend, SNAPSHOT_FILE, SUMMARY_FILE};
pub use error::{AuditError, AuditErrorExt};
pub use finalizer::{FinalizeReport, Finalizer};
pub use snapshot::{AuditSnapshot, ComponentVerdicts, FinalVerdict, FinalizeAck, FinalizeSubmission};
pub use source::AuditSource;
