//! # Settings
//!
//! A typed persistent settings store over a flat namespace of slot files.
//!
//! ## Core properties
//!
//! - **Closed key set**: every persisted slot is declared in [`SettingKey`]
//!   together with its storage policy ([`ValueKind`]) and default. The slot
//!   identifiers are the durable on-device contract.
//! - **Explicit storage policy**: scalars are stored as plain JSON scalars,
//!   structured values as serialized JSON documents; which one applies is a
//!   visible match on the key, not an implicit type inspection.
//! - **Degrade, never throw**: writes that fail to encode or persist are
//!   logged and dropped; reads of absent or corrupt slots return the key's
//!   declared default. No error types cross the store's read/write API.
//! - **Atomic slots**: each write lands via temp-file + `fsync` + rename,
//!   so concurrent readers see either the old or the new value.
//! - **Coalesced notification**: every mutation publishes a
//!   [`SettingsChanged`] latest-value signal; observers re-read the keys
//!   they care about rather than consuming diffs.

mod error;
mod keys;
mod store;
mod value;

pub use error::SettingsError;
pub use keys::{SettingKey, ValueKind};
pub use store::{SettingsChanged, SettingsStore};
pub use value::SettingValue;
