use crate::keys::ValueKind;
use orbit_event_bus::EventBusError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised inside the settings store.
///
/// These never cross the store's mutating/reading API: writes log and drop,
/// reads log and fall back to the key's default. They surface only from
/// [`SettingsStore::open`](crate::SettingsStore::open) and
/// [`SettingsStore::subscribe`](crate::SettingsStore::subscribe).
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings I/O failure at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode value for `{key}`: {source}")]
    Serialize {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("stored slot `{key}` is not valid JSON: {source}")]
    Malformed {
        key: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("stored slot `{key}` does not match its declared {expected:?} policy")]
    WrongShape { key: &'static str, expected: ValueKind },

    #[error(transparent)]
    Events(#[from] EventBusError),
}
