//! # Notification Bus
//!
//! A type-safe, asynchronous notification bus connecting the core services
//! to their observers.
//!
//! ## Overview
//!
//! Provides a centralized [`EventBus`] with two channel kinds built on
//! `tokio` sync primitives:
//!
//! * **Broadcast**: discrete fan-out events where each occurrence matters
//!   and per-subscriber order is preserved (environment switches).
//! * **Watch**: coalesced latest-value signals where subscribers re-read
//!   state instead of consuming a delta payload (settings writes).
//!
//! Channels are keyed by the event's Rust type; no string topics and no
//! payload casting at the call site.
//!
//! # Example
//!
//! ```rust
//! use orbit_event_bus::{EventBus, EventBusError};
//!
//! #[derive(Debug, PartialEq)]
//! struct ThemeChanged(String);
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), EventBusError> {
//!     let bus = EventBus::new();
//!
//!     let mut rx = bus.subscribe::<ThemeChanged>()?;
//!     bus.publish(ThemeChanged("dark".to_owned()))?;
//!
//!     let event = rx.recv().await.expect("bus is open");
//!     assert_eq!(event.0, "dark");
//!     Ok(())
//! }
//! ```

mod bus;
mod error;
mod receiver;

pub use bus::{Event, EventBus};
pub use error::EventBusError;
pub use receiver::EventReceiverExt;
