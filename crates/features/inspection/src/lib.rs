//! # Inspection Engine
//!
//! Tracks, per vehicle session, the verification status of every catalogued component and each
//! of its parts, and keeps the domain counters consistent with them.
//!
//! ## Building blocks
//!
//! * [`registry`]: read-only component catalog per domain.
//! * [`status`]: per-component state machine (part verdicts, overall verdict, sticky `notok`).
//! * [`counters`]: domain totals and their derivation from statuses.
//! * [`tally`]: per-pass outcome counters and the persisted result of the latest pass.
//! * [`retry`]: retry count and supervisor bypass gate of the part being inspected.
//! * [`repository`]: typed records over a [`PersistedStore`](vaudit_storage::PersistedStore).
//! * [`session`]: [`InspectionSession`], which runs every transition as one atomic batch.
//!
//! ## Example
//!
//! ```rust
//! use std::collections::BTreeMap;
//! use vaudit_inspection::{InspectionError, InspectionSession, Transition};
//! use vaudit_kernel::domain::config::InspectionConfig;
//! use vaudit_kernel::domain::{CaseConfiguration, ComponentId, ComponentSpec, Domain, Verdict};
//! use vaudit_storage::MemoryStore;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), InspectionError> {
//! let mut case = CaseConfiguration::default();
//! case.exterior.insert(
//!     ComponentId::from("Jack"),
//!     ComponentSpec { name: "Jack".into(), image: None, parts: vec!["Single View".into()], reference_images: vec![] },
//! );
//!
//! let session = InspectionSession::new(MemoryStore::new(), InspectionConfig::default());
//! session.initialize(Default::default(), Default::default(), &case).await?;
//!
//! let jack = ComponentId::from("Jack");
//! let part = session.begin_pass(Domain::Exterior, &jack).await?;
//! let closed = session.record_ok(Domain::Exterior, &jack, part.index).await?;
//! assert!(matches!(closed, Transition::PassClosed { overall: Verdict::Ok, .. }));
//! assert_eq!(session.counters(Domain::Exterior).await?.ok, 1);
//! # Ok(())
//! # }
//! ```

pub mod counters;
mod error;
pub mod events;
pub mod registry;
pub mod repository;
pub mod retry;
pub mod session;
pub mod status;
pub mod tally;

pub use error::{InspectionError, InspectionErrorExt};
pub use events::{BypassApplied, ComponentReopened, CounterDriftDetected, InspectionProgress, PassClosed};
pub use registry::{ComponentRegistry, PartRef};
pub use repository::{RecordKey, Repository};
pub use retry::{PartCursor, RetryPrompt, RetryState};
pub use session::{InspectionSession, SessionOverview, SessionRecord, Transition};
pub use status::ComponentStatus;
pub use tally::{ResultTally, SessionTally};
