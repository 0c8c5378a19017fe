use crate::error::EventBusError;
use fxhash::FxHashMap;
use parking_lot::RwLock;
use std::any::{Any, TypeId, type_name};
use std::sync::Arc;
use tokio::sync::{broadcast, watch};
use tracing::trace;

const DEFAULT_CAPACITY: usize = 64;

/// Channel kind a type is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelKind {
    Broadcast { capacity: usize },
    Watch,
}

/// Anything that can travel over the bus.
pub trait Event: Any + Send + Sync + 'static {}
impl<T: Any + Send + Sync + 'static> Event for T {}

#[derive(Debug)]
struct Slot {
    kind: ChannelKind,
    sender: Box<dyn Any + Send + Sync>,
}

impl Slot {
    fn sender<S: Clone + 'static, T: Event>(&self) -> Result<S, EventBusError> {
        self.sender.downcast_ref::<S>().cloned().ok_or_else(|| EventBusError::TypeMismatch {
            message: type_name::<T>().into(),
            context: Some("Registered sender has an unexpected type".into()),
        })
    }
}

/// Cloneable handle to a shared set of typed channels.
#[derive(Debug, Clone, Default)]
pub struct EventBus {
    slots: Arc<RwLock<FxHashMap<TypeId, Slot>>>,
}

impl EventBus {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribes to broadcast events of type `T`.
    ///
    /// # Errors
    /// [`EventBusError::ChannelKindMismatch`] if `T` is bound to a watch channel.
    pub fn subscribe<T: Event>(&self) -> Result<broadcast::Receiver<Arc<T>>, EventBusError> {
        self.subscribe_with_capacity::<T>(DEFAULT_CAPACITY)
    }

    /// Like [`subscribe`](Self::subscribe), choosing the buffer size when the channel is created.
    /// The capacity of an existing channel is kept.
    ///
    /// # Errors
    /// [`EventBusError::InvalidCapacity`] for a zero capacity, or a kind mismatch.
    pub fn subscribe_with_capacity<T: Event>(
        &self,
        capacity: usize,
    ) -> Result<broadcast::Receiver<Arc<T>>, EventBusError> {
        if capacity == 0 {
            return Err(EventBusError::InvalidCapacity {
                message: "capacity must be at least 1".into(),
                context: Some(type_name::<T>().into()),
            });
        }
        Ok(self.broadcast_sender::<T>(capacity)?.subscribe())
    }

    /// Publishes `event` to current broadcast subscribers and returns how many received it.
    /// Zero subscribers is not an error.
    ///
    /// # Errors
    /// [`EventBusError::ChannelKindMismatch`] if `T` is bound to a watch channel.
    pub fn publish<T: Event>(&self, event: T) -> Result<usize, EventBusError> {
        let sender = self.broadcast_sender::<T>(DEFAULT_CAPACITY)?;
        let delivered = sender.send(Arc::new(event)).unwrap_or(0);
        trace!(event = type_name::<T>(), delivered, "Event published");
        Ok(delivered)
    }

    /// Subscribes to the latest value of `T`, seeding the channel with `initial` if it is new.
    ///
    /// # Errors
    /// [`EventBusError::ChannelKindMismatch`] if `T` is bound to a broadcast channel.
    pub fn watch<T: Event>(&self, initial: T) -> Result<watch::Receiver<Arc<T>>, EventBusError> {
        Ok(self.watch_sender(|| Arc::new(initial))?.subscribe())
    }

    /// Replaces the latest value of `T`.
    ///
    /// # Errors
    /// [`EventBusError::ChannelKindMismatch`] if `T` is bound to a broadcast channel.
    pub fn publish_watch<T: Event>(&self, value: T) -> Result<(), EventBusError> {
        let value = Arc::new(value);
        let seed = Arc::clone(&value);
        self.watch_sender(move || seed)?.send_replace(value);
        trace!(event = type_name::<T>(), "Watch value replaced");
        Ok(())
    }

    /// Number of registered channels.
    #[must_use]
    pub fn channel_count(&self) -> usize {
        self.slots.read().len()
    }

    /// Drops every channel; live receivers observe closure. Returns how many were closed.
    pub fn shutdown(&self) -> usize {
        let mut slots = self.slots.write();
        let closed = slots.len();
        slots.clear();
        closed
    }

    fn broadcast_sender<T: Event>(
        &self,
        capacity: usize,
    ) -> Result<broadcast::Sender<Arc<T>>, EventBusError> {
        self.slot::<T, broadcast::Sender<Arc<T>>>(ChannelKind::Broadcast { capacity }, || {
            broadcast::channel::<Arc<T>>(capacity).0
        })
    }

    fn watch_sender<T: Event>(
        &self,
        initial: impl FnOnce() -> Arc<T>,
    ) -> Result<watch::Sender<Arc<T>>, EventBusError> {
        self.slot::<T, watch::Sender<Arc<T>>>(ChannelKind::Watch, || watch::channel(initial()).0)
    }

    fn slot<T: Event, S: Clone + Send + Sync + 'static>(
        &self,
        kind: ChannelKind,
        create: impl FnOnce() -> S,
    ) -> Result<S, EventBusError> {
        let id = TypeId::of::<T>();

        if let Some(slot) = self.slots.read().get(&id) {
            return Self::check_kind::<T>(slot, kind).and_then(|()| slot.sender::<S, T>());
        }

        let mut slots = self.slots.write();
        let slot = slots.entry(id).or_insert_with(|| {
            trace!(event = type_name::<T>(), ?kind, "Creating event channel");
            Slot { kind, sender: Box::new(create()) }
        });
        Self::check_kind::<T>(slot, kind)?;
        slot.sender::<S, T>()
    }

    fn check_kind<T: Event>(slot: &Slot, requested: ChannelKind) -> Result<(), EventBusError> {
        let same = matches!(
            (slot.kind, requested),
            (ChannelKind::Broadcast { .. }, ChannelKind::Broadcast { .. })
                | (ChannelKind::Watch, ChannelKind::Watch)
        );
        if same {
            Ok(())
        } else {
            Err(EventBusError::ChannelKindMismatch {
                message: format!(
                    "{} is bound to {:?}, requested {:?}",
                    type_name::<T>(),
                    slot.kind,
                    requested
                )
                .into(),
                context: None,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct Drift(u32);

    #[test]
    fn channels_are_created_lazily() {
        let bus = EventBus::new();
        assert_eq!(bus.channel_count(), 0);
        assert_eq!(bus.publish(Drift(1)).unwrap(), 0);
        assert_eq!(bus.channel_count(), 1);
    }

    #[test]
    fn kind_is_fixed_per_type() {
        let bus = EventBus::new();
        bus.publish(Drift(1)).unwrap();
        let err = bus.publish_watch(Drift(2)).unwrap_err();
        assert!(matches!(err, EventBusError::ChannelKindMismatch { .. }));
    }

    #[test]
    fn zero_capacity_is_rejected() {
        let bus = EventBus::new();
        assert!(matches!(
            bus.subscribe_with_capacity::<Drift>(0),
            Err(EventBusError::InvalidCapacity { .. })
        ));
    }

    #[test]
    fn shutdown_reports_closed_channels() {
        let bus = EventBus::new();
        bus.publish(Drift(1)).unwrap();
        bus.publish_watch(7_u64).unwrap();
        assert_eq!(bus.shutdown(), 2);
        assert_eq!(bus.channel_count(), 0);
    }
}
