//! The settings store engine: atomic slot files plus coalesced change
//! notification.
//!
//! Each [`SettingKey`] owns one file under the store root
//! (`<identifier>.json`). Writes go through the atomic swap pattern (unique
//! temp file, `fsync`, rename) so a slot is never observed half-written,
//! which is the single-key atomicity the rest of the system assumes.

use crate::error::SettingsError;
use crate::keys::{SettingKey, ValueKind};
use crate::value::SettingValue;
use chrono::{DateTime, Utc};
use orbit_event_bus::EventBus;
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use strum::IntoEnumIterator;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::watch;
use tracing::{debug, error, warn};

const SLOT_SUFFIX: &str = "json";
const TMP_MARKER: &str = ".orbittmp.";

/// Coalesced "something changed" signal published after every mutation.
///
/// Carries no diff: subscribers re-read the keys they care about. Rapid
/// successive writes may collapse into fewer observations, but at least one
/// notification follows any successful write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettingsChanged {
    /// Monotonic mutation counter, useful for debugging missed re-reads.
    pub generation: u64,
}

#[derive(Debug)]
struct StoreInner {
    root: PathBuf,
    events: EventBus,
    generation: AtomicU64,
    tmp_counter: AtomicU64,
}

/// A thread-safe handle to the persistent settings store.
///
/// The handle is internally reference-counted and can be cheaply cloned
/// into any task. Mutating operations never fail outward: serialization or
/// I/O problems are logged and the write is dropped; reads degrade to the
/// key's declared default.
///
/// # Example
///
/// ```rust
/// use orbit_event_bus::EventBus;
/// use orbit_settings::{SettingKey, SettingsStore};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), orbit_settings::SettingsError> {
/// # let dir = tempfile::tempdir().unwrap();
/// let store = SettingsStore::open(dir.path(), EventBus::new()).await?;
///
/// assert!(store.get_bool(SettingKey::FirstLaunch).await); // declared default
/// store.set_bool(SettingKey::FirstLaunch, false).await;
/// assert!(!store.get_bool(SettingKey::FirstLaunch).await);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct SettingsStore {
    inner: Arc<StoreInner>,
}

impl SettingsStore {
    /// Opens (creating if needed) the store rooted at `root` and connects
    /// it to the notification bus.
    ///
    /// Stale temp files from interrupted writes are purged so a crash never
    /// leaks half-written slots into the directory.
    ///
    /// # Errors
    /// Returns [`SettingsError::Io`] if the root directory cannot be
    /// created.
    pub async fn open(root: impl Into<PathBuf>, events: EventBus) -> Result<Self, SettingsError> {
        let root = root.into();
        fs::create_dir_all(&root)
            .await
            .map_err(|source| SettingsError::Io { path: root.clone(), source })?;

        purge_stale_tmp(&root).await;

        Ok(Self {
            inner: Arc::new(StoreInner {
                root,
                events,
                generation: AtomicU64::new(0),
                tmp_counter: AtomicU64::new(0),
            }),
        })
    }

    /// Stores `value` in the slot for `key`.
    ///
    /// The value must match the key's declared policy; a mismatch is a
    /// programming error at the call site and the write is logged and
    /// dropped, as are serialization and I/O failures.
    pub async fn set_value(&self, key: SettingKey, value: SettingValue) {
        if value.kind() != key.kind() {
            error!(
                key = key.identifier(),
                expected = ?key.kind(),
                got = ?value.kind(),
                "Value does not match the slot's declared policy; write dropped"
            );
            return;
        }

        let bytes = match value.encode(key) {
            Ok(bytes) => bytes,
            Err(err) => {
                error!(key = key.identifier(), error = %err, "Encoding failed; write dropped");
                return;
            },
        };

        match self.write_slot(key, &bytes).await {
            Ok(()) => {
                debug!(key = key.identifier(), "Stored value");
                self.notify();
            },
            Err(err) => {
                error!(key = key.identifier(), error = %err, "Slot write failed; write dropped");
            },
        }
    }

    /// Serializes a structured value into a `Json`-policy slot.
    pub async fn set<T: Serialize + ?Sized>(&self, key: SettingKey, value: &T) {
        if key.kind() != ValueKind::Json {
            error!(
                key = key.identifier(),
                expected = ?key.kind(),
                "Structured write to a scalar slot; write dropped"
            );
            return;
        }

        match serde_json::to_value(value) {
            Ok(json) => self.set_value(key, SettingValue::Json(json)).await,
            Err(err) => {
                error!(key = key.identifier(), error = %err, "Encoding failed; write dropped");
            },
        }
    }

    /// Deserializes a structured slot, falling back to the declared default
    /// when the slot is absent or unreadable.
    pub async fn get<T: DeserializeOwned>(&self, key: SettingKey) -> Option<T> {
        match self.read_slot(key).await {
            Some(bytes) => match serde_json::from_slice(&bytes) {
                Ok(value) => Some(value),
                Err(err) => {
                    error!(
                        key = key.identifier(),
                        error = %err,
                        "Stored slot failed to decode; using default"
                    );
                    default_as(key)
                },
            },
            None => default_as(key),
        }
    }

    /// The current value of `key`: the stored value when present and
    /// well-formed, otherwise the declared default.
    pub async fn value_of(&self, key: SettingKey) -> Option<SettingValue> {
        match self.stored_value(key).await {
            Some(value) => Some(value),
            None => key.default_value(),
        }
    }

    pub async fn get_bool(&self, key: SettingKey) -> bool {
        self.value_of(key).await.and_then(|v| v.as_bool()).unwrap_or(false)
    }

    pub async fn get_int(&self, key: SettingKey) -> i64 {
        self.value_of(key).await.and_then(|v| v.as_int()).unwrap_or(0)
    }

    pub async fn get_float(&self, key: SettingKey) -> f64 {
        self.value_of(key).await.and_then(|v| v.as_float()).unwrap_or(0.0)
    }

    pub async fn get_string(&self, key: SettingKey) -> Option<String> {
        self.value_of(key).await.and_then(|v| v.as_text().map(str::to_owned))
    }

    pub async fn get_date(&self, key: SettingKey) -> Option<DateTime<Utc>> {
        self.value_of(key).await.and_then(|v| v.as_timestamp())
    }

    pub async fn set_bool(&self, key: SettingKey, value: bool) {
        self.set_value(key, SettingValue::Bool(value)).await;
    }

    pub async fn set_int(&self, key: SettingKey, value: i64) {
        self.set_value(key, SettingValue::Int(value)).await;
    }

    pub async fn set_float(&self, key: SettingKey, value: f64) {
        self.set_value(key, SettingValue::Float(value)).await;
    }

    pub async fn set_string(&self, key: SettingKey, value: impl Into<String>) {
        self.set_value(key, SettingValue::Text(value.into())).await;
    }

    /// Stores a timestamp; `None` clears the slot (matching the platform
    /// convention that assigning nil removes the stored value).
    pub async fn set_date(&self, key: SettingKey, value: Option<DateTime<Utc>>) {
        match value {
            Some(timestamp) => self.set_value(key, SettingValue::Timestamp(timestamp)).await,
            None => self.remove(key).await,
        }
    }

    /// Deletes the slot for `key`. Removing an absent slot is not an error;
    /// observers are notified either way.
    pub async fn remove(&self, key: SettingKey) {
        let path = self.slot_path(key);
        match fs::remove_file(&path).await {
            Ok(()) => debug!(key = key.identifier(), "Removed slot"),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {},
            Err(err) => {
                error!(key = key.identifier(), error = %err, "Slot removal failed");
                return;
            },
        }
        self.notify();
    }

    /// Deletes every known slot.
    ///
    /// Only the closed [`SettingKey`] set is touched: files the store does
    /// not own survive, keeping foreign data out of harm's way. One
    /// notification fires for the whole sweep.
    pub async fn remove_all(&self) {
        for key in SettingKey::iter() {
            let path = self.slot_path(key);
            match fs::remove_file(&path).await {
                Ok(()) => {},
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => {},
                Err(err) => {
                    error!(key = key.identifier(), error = %err, "Slot removal failed");
                },
            }
        }
        warn!("Removed all persisted settings");
        self.notify();
    }

    /// Whether a stored value exists for `key` (defaults do not count).
    #[must_use]
    pub fn exists(&self, key: SettingKey) -> bool {
        self.slot_path(key).exists()
    }

    /// Subscribes to the coalesced change signal.
    ///
    /// The receiver holds the latest [`SettingsChanged`]; awaiting it after
    /// a mutation wakes the subscriber, who then re-reads whatever keys it
    /// displays.
    ///
    /// # Errors
    /// Returns [`SettingsError::Events`] if the notification channel was
    /// opened with conflicting semantics elsewhere.
    pub fn subscribe(&self) -> Result<watch::Receiver<Arc<SettingsChanged>>, SettingsError> {
        let initial = SettingsChanged { generation: self.generation() };
        Ok(self.inner.events.subscribe_watch(initial)?)
    }

    /// The number of mutations observed by this store instance.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.inner.generation.load(Ordering::Relaxed)
    }

    fn notify(&self) {
        let generation = self.inner.generation.fetch_add(1, Ordering::Relaxed) + 1;
        if let Err(err) = self.inner.events.publish_watch(SettingsChanged { generation }) {
            warn!(error = %err, "Change notification dropped");
        }
    }

    fn slot_path(&self, key: SettingKey) -> PathBuf {
        self.inner.root.join(format!("{}.{SLOT_SUFFIX}", key.identifier()))
    }

    async fn stored_value(&self, key: SettingKey) -> Option<SettingValue> {
        let bytes = self.read_slot(key).await?;
        match SettingValue::decode(key, &bytes) {
            Ok(value) => Some(value),
            Err(err) => {
                error!(
                    key = key.identifier(),
                    error = %err,
                    "Stored slot failed to decode; using default"
                );
                None
            },
        }
    }

    async fn read_slot(&self, key: SettingKey) -> Option<Vec<u8>> {
        let path = self.slot_path(key);
        match fs::read(&path).await {
            Ok(bytes) => Some(bytes),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => None,
            Err(err) => {
                error!(key = key.identifier(), error = %err, "Slot read failed; using default");
                None
            },
        }
    }

    /// Writes slot bytes with the atomic swap pattern: unique temp file,
    /// `fsync`, rename over the target, then a parent directory sync. The
    /// target is never observed in a partially written state.
    async fn write_slot(&self, key: SettingKey, bytes: &[u8]) -> Result<(), SettingsError> {
        let target = self.slot_path(key);
        let temp = self.unique_tmp_path(&target);

        {
            let mut file = fs::OpenOptions::new()
                .create_new(true)
                .write(true)
                .open(&temp)
                .await
                .map_err(|source| SettingsError::Io { path: temp.clone(), source })?;
            file.write_all(bytes)
                .await
                .map_err(|source| SettingsError::Io { path: temp.clone(), source })?;
            file.sync_all()
                .await
                .map_err(|source| SettingsError::Io { path: temp.clone(), source })?;
        }

        if let Err(err) = fs::rename(&temp, &target).await {
            // Platforms without atomic replace fall back to remove-then-rename.
            if err.kind() == std::io::ErrorKind::AlreadyExists {
                fs::remove_file(&target)
                    .await
                    .map_err(|source| SettingsError::Io { path: target.clone(), source })?;
                fs::rename(&temp, &target)
                    .await
                    .map_err(|source| SettingsError::Io { path: target.clone(), source })?;
            } else {
                let _ = fs::remove_file(&temp).await;
                return Err(SettingsError::Io { path: target, source: err });
            }
        }

        if let Some(parent) = target.parent() {
            sync_dir(parent).await;
        }

        Ok(())
    }

    fn unique_tmp_path(&self, target: &Path) -> PathBuf {
        let counter = self.inner.tmp_counter.fetch_add(1, Ordering::Relaxed);
        let file_name = target.file_name().and_then(|s| s.to_str()).unwrap_or("slot");
        target.with_file_name(format!("{file_name}{TMP_MARKER}{counter}"))
    }
}

fn default_as<T: DeserializeOwned>(key: SettingKey) -> Option<T> {
    let default = key.default_value()?;
    let json = default.to_json(key).ok()?;
    serde_json::from_value(json).ok()
}

async fn sync_dir(path: &Path) {
    match fs::File::open(path).await {
        Ok(dir) => {
            if let Err(err) = dir.sync_all().await {
                warn!(path = %path.display(), error = %err, "Directory sync failed");
            }
        },
        Err(err) => {
            warn!(path = %path.display(), error = %err, "Directory open failed");
        },
    }
}

/// Removes leftovers of interrupted atomic writes.
async fn purge_stale_tmp(root: &Path) {
    let mut entries = match fs::read_dir(root).await {
        Ok(entries) => entries,
        Err(err) => {
            warn!(path = %root.display(), error = %err, "Temp cleanup skipped");
            return;
        },
    };

    let mut removed = 0_usize;
    while let Ok(Some(entry)) = entries.next_entry().await {
        let is_tmp = entry.file_name().to_str().is_some_and(|name| name.contains(TMP_MARKER));
        if is_tmp && fs::remove_file(entry.path()).await.is_ok() {
            removed += 1;
        }
    }

    if removed > 0 {
        debug!(removed, "Cleaned up temporary files");
    }
}
