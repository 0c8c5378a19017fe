//! # Event Bus
//!
//! Typed in-process pub/sub shared by the feature slices.
//!
//! Channels are keyed by the event's Rust type. Two kinds exist:
//!
//! * **Broadcast**: every subscriber sees every event published after it subscribed. Used for
//!   observability notifications such as pass closures or detected counter drift.
//! * **Watch**: subscribers see only the latest value. Used for live progress snapshots.
//!
//! A type is bound to one kind for the lifetime of the bus.
//!
//! ```rust
//! use vaudit_events::{EventBus, EventBusError, EventReceiverExt};
//!
//! #[derive(Debug, Clone, PartialEq)]
//! struct PassClosed { component: String }
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), EventBusError> {
//! let bus = EventBus::new();
//! let mut rx = bus.subscribe::<PassClosed>()?;
//! bus.publish(PassClosed { component: "tyre".into() })?;
//! assert_eq!(rx.next_event().await.unwrap().component, "tyre");
//! # Ok(())
//! # }
//! ```

mod bus;
mod error;
mod receiver;

pub use bus::{ChannelKind, Event, EventBus};
pub use error::{EventBusError, EventBusErrorExt};
pub use receiver::EventReceiverExt;
