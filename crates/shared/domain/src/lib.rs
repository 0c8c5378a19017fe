//! # Domain Models
//!
//! Pure inspection types shared by every slice: the three inspection domains, verdicts,
//! vehicle identity, the component catalog and configuration shapes.
//! Keep it lean: no I/O and no state-machine logic here, just data and simple helpers.

pub mod catalog;
pub mod config;
pub mod inspection;
pub mod vehicle;

pub use catalog::{CaseConfiguration, ComponentId, ComponentSpec};
pub use inspection::{Domain, DomainCounters, Verdict};
pub use vehicle::{Inspector, VehicleIdentity};
