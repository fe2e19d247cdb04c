//! Environment configuration: manifest loading and the runtime-switchable
//! active environment.

use config::{Config, File};
use orbit_domain::{BuildProfile, Environment, Manifest};
use orbit_event_bus::{EventBus, EventBusError};
use parking_lot::RwLock;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::broadcast;
use tracing::{info, warn};

/// Prefix of the environment variables that override manifest values
/// (`APP_ENVIRONMENT`, `APP_API_BASE_URL`, `APP_ENCRYPTION_KEY_NAME`).
pub const MANIFEST_ENV_PREFIX: &str = "APP";

/// Custom error type for manifest loading.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("manifest error: {0}")]
    Load(#[from] config::ConfigError),
}

/// Broadcast when the active environment is replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnvironmentChanged {
    pub environment: Environment,
}

/// Loads the startup manifest.
///
/// Implements a layered strategy: an optional file source first, then
/// `APP_`-prefixed environment variables on top, so a deploy can override
/// any manifest value without touching the file.
///
/// # Errors
/// Returns [`ManifestError`] if the named file is missing or malformed, or
/// if the merged values do not deserialize into a [`Manifest`].
pub fn load_manifest(path: Option<impl AsRef<Path>>) -> Result<Manifest, ManifestError> {
    load_manifest_from(path, config::Environment::with_prefix(MANIFEST_ENV_PREFIX))
}

/// Variant of [`load_manifest`] taking an explicit variable source; the
/// seam tests use to inject variables without mutating process state.
///
/// # Errors
/// Same conditions as [`load_manifest`].
pub fn load_manifest_from(
    path: Option<impl AsRef<Path>>,
    variables: config::Environment,
) -> Result<Manifest, ManifestError> {
    let mut builder = Config::builder();
    if let Some(path) = path {
        info!("Loading manifest from {}", path.as_ref().display());
        builder = builder.add_source(File::from(path.as_ref()).required(true));
    }

    let manifest = builder.add_source(variables).build()?.try_deserialize::<Manifest>()?;
    Ok(manifest)
}

#[derive(Debug)]
struct AppConfigInner {
    manifest: Manifest,
    profile: BuildProfile,
    current: RwLock<Environment>,
    events: EventBus,
}

/// The externally visible, possibly-overridden view of the current
/// environment.
///
/// One instance is created at startup and lives for the process lifetime;
/// the only mutation is an environment switch, which replaces the active
/// [`Environment`] (never the variants' fixed attributes). The handle is
/// `Arc`-backed and cheap to clone into any consumer.
#[derive(Debug, Clone)]
pub struct AppConfig {
    inner: Arc<AppConfigInner>,
}

impl AppConfig {
    /// Creates the configuration for the compiled build profile.
    #[must_use]
    pub fn new(manifest: Manifest, events: EventBus) -> Self {
        Self::with_profile(manifest, BuildProfile::current(), events)
    }

    /// Creates the configuration with an explicit build profile. Production
    /// code goes through [`AppConfig::new`]; tests use this to exercise
    /// release-build policies from a debug test binary.
    #[must_use]
    pub fn with_profile(manifest: Manifest, profile: BuildProfile, events: EventBus) -> Self {
        let requested = manifest.environment.as_deref();
        let environment = requested.and_then(Environment::from_key).unwrap_or_else(|| {
            let fallback = profile.default_environment();
            if let Some(raw) = requested {
                warn!(
                    requested = raw,
                    fallback = fallback.key(),
                    "Unrecognized environment in manifest; using the build default"
                );
            }
            fallback
        });

        info!(environment = %environment, "App started with environment");

        Self {
            inner: Arc::new(AppConfigInner {
                manifest,
                profile,
                current: RwLock::new(environment),
                events,
            }),
        }
    }

    /// The active environment.
    #[must_use]
    pub fn current_environment(&self) -> Environment {
        *self.inner.current.read()
    }

    /// The build profile the configuration enforces policies for.
    #[must_use]
    pub fn build_profile(&self) -> BuildProfile {
        self.inner.profile
    }

    /// API origin: manifest override first, else the active environment's.
    #[must_use]
    pub fn base_url(&self) -> String {
        self.inner
            .manifest
            .api_base_url
            .clone()
            .unwrap_or_else(|| self.current_environment().base_url().to_owned())
    }

    /// Encryption key slot: manifest override first, else the active
    /// environment's.
    #[must_use]
    pub fn encryption_key_name(&self) -> String {
        self.inner
            .manifest
            .encryption_key_name
            .clone()
            .unwrap_or_else(|| self.current_environment().encryption_key_name().to_owned())
    }

    #[must_use]
    pub fn enable_logging(&self) -> bool {
        self.current_environment().enable_logging()
    }

    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        self.current_environment().request_timeout()
    }

    #[must_use]
    pub fn enable_encryption(&self) -> bool {
        self.current_environment().enable_encryption()
    }

    #[must_use]
    pub fn cache_expiration(&self) -> Duration {
        self.current_environment().cache_expiration()
    }

    /// Replaces the active environment and broadcasts the change.
    ///
    /// Permitted only in debug builds: release builds log the attempt and
    /// leave everything untouched, because production must never allow
    /// runtime environment tampering. On success the swap happens under the
    /// write lock and the [`EnvironmentChanged`] event is published before
    /// this method returns, so observers always see the consistent next
    /// state when they re-read.
    pub fn switch_environment(&self, environment: Environment) {
        if !self.inner.profile.allows_environment_switch() {
            warn!(
                requested = environment.key(),
                "Environment switching is disabled in release builds"
            );
            return;
        }

        {
            let mut current = self.inner.current.write();
            *current = environment;
        }
        info!(environment = %environment, "Environment switched");

        if let Err(err) = self.inner.events.publish(EnvironmentChanged { environment }) {
            warn!(error = %err, "Environment change notification dropped");
        }
    }

    /// Subscribes to [`EnvironmentChanged`] broadcasts.
    ///
    /// # Errors
    /// Returns an error if the event channel was opened with conflicting
    /// semantics elsewhere.
    pub fn subscribe(
        &self,
    ) -> Result<broadcast::Receiver<Arc<EnvironmentChanged>>, EventBusError> {
        self.inner.events.subscribe::<EnvironmentChanged>()
    }

    /// A point-in-time view of every derived field, for display surfaces.
    #[must_use]
    pub fn snapshot(&self) -> ConfigSnapshot {
        let environment = self.current_environment();
        ConfigSnapshot {
            environment,
            base_url: self.base_url(),
            encryption_key_name: self.encryption_key_name(),
            enable_logging: environment.enable_logging(),
            request_timeout: environment.request_timeout(),
            enable_encryption: environment.enable_encryption(),
            cache_expiration: environment.cache_expiration(),
        }
    }
}

/// Resolved configuration values at one instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigSnapshot {
    pub environment: Environment,
    pub base_url: String,
    pub encryption_key_name: String,
    pub enable_logging: bool,
    pub request_timeout: Duration,
    pub enable_encryption: bool,
    pub cache_expiration: Duration,
}
