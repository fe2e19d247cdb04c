use thiserror::Error;

/// Errors that can occur during notification bus operations.
#[derive(Debug, Error)]
pub enum EventBusError {
    /// An internal dynamic cast failed. This indicates an invariant
    /// violation in the type-keyed channel registry.
    #[error("event type mismatch for `{event}`")]
    TypeMismatch { event: &'static str },

    /// A channel for the event type already exists with a different
    /// delivery kind (broadcast vs. watch).
    #[error("channel for `{event}` is {existing}, requested {requested}")]
    KindMismatch { event: &'static str, existing: &'static str, requested: &'static str },

    /// Broadcast channels need room for at least one queued event.
    #[error("broadcast capacity must be at least 1, got {requested}")]
    InvalidCapacity { requested: usize },
}
