use crate::error::EventBusError;
use fxhash::FxHashMap;
use parking_lot::RwLock;
use std::any::{Any, TypeId};
use std::sync::Arc;
use tokio::sync::{broadcast, watch};
use tracing::{trace, warn};

/// A safe default for broadcast buffers; change notifications are small and
/// subscribers re-read state, so a short queue is plenty.
const DEFAULT_CAPACITY: usize = 64;

/// Marker trait for types that can travel across the [`EventBus`].
///
/// Any type that is `Send + Sync + 'static` automatically implements this trait.
pub trait Event: Any + Send + Sync + 'static {}
impl<T: Any + Send + Sync + 'static> Event for T {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ChannelKind {
    /// Fan-out: every subscriber sees every published event, in order.
    Broadcast { capacity: usize },
    /// Latest-value: rapid publishes coalesce; subscribers observe the
    /// newest state and re-read whatever they derive from it.
    Watch,
}

impl ChannelKind {
    const fn name(self) -> &'static str {
        match self {
            Self::Broadcast { .. } => "broadcast",
            Self::Watch => "watch",
        }
    }
}

#[derive(Debug)]
struct ChannelState {
    kind: ChannelKind,
    sender: Box<dyn Any + Send + Sync>,
}

/// A thread-safe notification bus with channels indexed by event [`TypeId`].
///
/// Two delivery kinds cover the change-propagation patterns in this
/// codebase: `broadcast` for discrete events where every occurrence matters
/// (an environment switch), and `watch` for coalesced "something changed"
/// signals where only the latest state is interesting (a settings write).
/// A given event type is bound to one kind on first use; mixing kinds for
/// the same type is an error.
///
/// Delivery to a single subscriber preserves publish order. Ordering across
/// different event types is not guaranteed.
#[derive(Debug, Clone, Default)]
pub struct EventBus {
    channels: Arc<RwLock<FxHashMap<TypeId, ChannelState>>>,
}

impl EventBus {
    /// Creates a new, empty `EventBus`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribes to broadcast events of type `T` with the default buffer.
    ///
    /// # Errors
    /// Returns [`EventBusError::KindMismatch`] if `T` is already bound to a
    /// watch channel.
    ///
    /// # Examples
    /// ```rust
    /// use orbit_event_bus::EventBus;
    ///
    /// #[derive(Debug)]
    /// struct ProfileSaved;
    ///
    /// # #[tokio::main(flavor = "current_thread")]
    /// # async fn main() -> Result<(), orbit_event_bus::EventBusError> {
    /// let bus = EventBus::new();
    /// let mut rx = bus.subscribe::<ProfileSaved>()?;
    /// bus.publish(ProfileSaved)?;
    /// assert!(rx.recv().await.is_ok());
    /// # Ok(())
    /// # }
    /// ```
    pub fn subscribe<T: Event>(&self) -> Result<broadcast::Receiver<Arc<T>>, EventBusError> {
        self.subscribe_with_capacity::<T>(DEFAULT_CAPACITY)
    }

    /// Subscribes to broadcast events of type `T` with an explicit buffer
    /// capacity.
    ///
    /// # Errors
    /// Returns [`EventBusError::KindMismatch`] if `T` is already bound to a
    /// watch channel, or [`EventBusError::InvalidCapacity`] when `capacity`
    /// is zero.
    pub fn subscribe_with_capacity<T: Event>(
        &self,
        capacity: usize,
    ) -> Result<broadcast::Receiver<Arc<T>>, EventBusError> {
        if capacity == 0 {
            return Err(EventBusError::InvalidCapacity { requested: capacity });
        }
        Ok(self.broadcast_sender::<T>(capacity)?.subscribe())
    }

    /// Publishes a broadcast event, returning how many subscribers it
    /// reached. Zero subscribers is not an error; the event is dropped.
    ///
    /// # Errors
    /// Returns [`EventBusError::KindMismatch`] if `T` is already bound to a
    /// watch channel.
    pub fn publish<T: Event>(&self, event: T) -> Result<usize, EventBusError> {
        let sender = self.broadcast_sender::<T>(DEFAULT_CAPACITY)?;
        match sender.send(Arc::new(event)) {
            Ok(count) => {
                trace!(event = std::any::type_name::<T>(), count, "Event dispatched");
                Ok(count)
            },
            Err(_) => {
                trace!(event = std::any::type_name::<T>(), "Event dropped: no active subscribers");
                Ok(0)
            },
        }
    }

    /// Subscribes to the watch channel for `T`, creating it with `initial`
    /// if absent.
    ///
    /// The receiver always holds the most recent value; intermediate values
    /// published while the subscriber was busy are skipped by design.
    ///
    /// # Errors
    /// Returns [`EventBusError::KindMismatch`] if `T` is already bound to a
    /// broadcast channel.
    pub fn subscribe_watch<T: Event>(
        &self,
        initial: T,
    ) -> Result<watch::Receiver<Arc<T>>, EventBusError> {
        Ok(self.watch_sender::<T>(Arc::new(initial))?.subscribe())
    }

    /// Replaces the current value of the watch channel for `T`, creating the
    /// channel if absent. Subscribers are woken; rapid successive calls
    /// coalesce into fewer observations.
    ///
    /// # Errors
    /// Returns [`EventBusError::KindMismatch`] if `T` is already bound to a
    /// broadcast channel.
    pub fn publish_watch<T: Event>(&self, event: T) -> Result<(), EventBusError> {
        let value = Arc::new(event);
        let sender = self.watch_sender::<T>(value.clone())?;
        sender.send_replace(value);
        Ok(())
    }

    /// Drops every channel, waking subscribers with a closed error.
    /// Returns the number of channels that were open.
    #[must_use]
    pub fn shutdown(&self) -> usize {
        let mut channels = self.channels.write();
        let count = channels.len();
        channels.clear();
        count
    }

    fn broadcast_sender<T: Event>(
        &self,
        capacity: usize,
    ) -> Result<broadcast::Sender<Arc<T>>, EventBusError> {
        let kind = ChannelKind::Broadcast { capacity };
        self.with_channel::<T, _, _>(kind, || {
            let (tx, _) = broadcast::channel::<Arc<T>>(capacity);
            let sender: Box<dyn Any + Send + Sync> = Box::new(tx);
            sender
        })
    }

    fn watch_sender<T: Event>(
        &self,
        initial: Arc<T>,
    ) -> Result<watch::Sender<Arc<T>>, EventBusError> {
        self.with_channel::<T, _, _>(ChannelKind::Watch, move || {
            let (tx, _) = watch::channel::<Arc<T>>(initial);
            let sender: Box<dyn Any + Send + Sync> = Box::new(tx);
            sender
        })
    }

    /// Looks up (or lazily creates) the channel for `T` and clones out its
    /// sender. Creation takes the write lock once; steady-state lookups only
    /// read.
    fn with_channel<T, S, F>(&self, kind: ChannelKind, create: F) -> Result<S, EventBusError>
    where
        T: Event,
        S: Clone + 'static,
        F: FnOnce() -> Box<dyn Any + Send + Sync>,
    {
        let id = TypeId::of::<T>();

        {
            let channels = self.channels.read();
            if let Some(existing) = channels.get(&id) {
                return Self::sender_from::<T, S>(existing, kind);
            }
        }

        let mut channels = self.channels.write();
        let entry = channels.entry(id).or_insert_with(|| {
            trace!(event = std::any::type_name::<T>(), kind = kind.name(), "Opening event channel");
            ChannelState { kind, sender: create() }
        });
        let sender = Self::sender_from::<T, S>(entry, kind);
        drop(channels);
        sender
    }

    fn sender_from<T: Event, S: Clone + 'static>(
        state: &ChannelState,
        requested: ChannelKind,
    ) -> Result<S, EventBusError> {
        match (state.kind, requested) {
            (
                ChannelKind::Broadcast { capacity: existing },
                ChannelKind::Broadcast { capacity: wanted },
            ) => {
                if existing != wanted {
                    warn!(
                        event = std::any::type_name::<T>(),
                        existing,
                        requested = wanted,
                        "Broadcast channel already open with a different capacity"
                    );
                }
                Self::downcast_sender::<T, S>(state)
            },
            (ChannelKind::Watch, ChannelKind::Watch) => Self::downcast_sender::<T, S>(state),
            (existing, _) => Err(EventBusError::KindMismatch {
                event: std::any::type_name::<T>(),
                existing: existing.name(),
                requested: requested.name(),
            }),
        }
    }

    fn downcast_sender<T: Event, S: Clone + 'static>(
        state: &ChannelState,
    ) -> Result<S, EventBusError> {
        state
            .sender
            .downcast_ref::<S>()
            .cloned()
            .ok_or(EventBusError::TypeMismatch { event: std::any::type_name::<T>() })
    }
}
