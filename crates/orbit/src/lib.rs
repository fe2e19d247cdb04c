//! Facade crate for the Orbit platform core.
//! Re-exports the shared service crates and owns the startup sequence that
//! wires them together. Keep this crate thin: it composes other crates, it
//! does not implement service logic.
//!
//! ## Startup contract
//!
//! [`Bootstrap::init`] builds every core service in dependency order
//! (environment configuration, then the logger registry seeded from the
//! configuration's logging flag, then the settings store) and freezes
//! them into a [`ServiceRegistry`]. All other code resolves the shared
//! instances from the registry; nothing constructs a service directly.
//!
//! ```no_run
//! use orbit::{Bootstrap, SettingsStore};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = Bootstrap::new().data_dir("var/settings").init().await?;
//! let settings = registry.resolve::<SettingsStore>()?;
//! # Ok(())
//! # }
//! ```

pub use orbit_domain as domain;
pub use orbit_kernel as kernel;

pub use orbit_domain::{BuildProfile, Environment, FeatureSet, Manifest, constants};
pub use orbit_event_bus::{EventBus, EventReceiverExt};
pub use orbit_kernel::{
    AppConfig, ConfigSnapshot, EnvironmentChanged, RegistryError, ServiceRegistry,
};
pub use orbit_logger::{Logger, LoggerRegistry};
pub use orbit_settings::{SettingKey, SettingValue, SettingsChanged, SettingsStore};

use orbit_event_bus::EventBusError;
use orbit_kernel::{ManifestError, load_manifest};
use orbit_settings::SettingsError;
use std::path::PathBuf;
use thiserror::Error;

/// Default directory for persisted settings, relative to the working
/// directory, when the application does not choose one.
const DEFAULT_DATA_DIR: &str = "settings";

/// Errors from the startup sequence.
#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    #[error(transparent)]
    Settings(#[from] SettingsError),

    #[error(transparent)]
    Events(#[from] EventBusError),
}

/// A fluent builder for the startup sequence.
#[must_use = "builders do nothing unless you call .init()"]
#[derive(Debug, Default)]
pub struct Bootstrap {
    manifest_path: Option<PathBuf>,
    data_dir: Option<PathBuf>,
    profile: Option<BuildProfile>,
}

impl Bootstrap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Path of the startup manifest file. Without one, only `APP_`-prefixed
    /// environment variables feed the manifest.
    pub fn manifest_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.manifest_path = Some(path.into());
        self
    }

    /// Root directory of the settings store.
    pub fn data_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.data_dir = Some(path.into());
        self
    }

    /// Overrides the build profile. Production code omits this and gets the
    /// compiled profile; tests use it to exercise release policies.
    pub const fn profile(mut self, profile: BuildProfile) -> Self {
        self.profile = Some(profile);
        self
    }

    /// Runs the startup sequence and freezes the capability registry.
    ///
    /// Construction order is fixed: configuration first (everything reads
    /// it), the logger registry second (parameterized by the configuration's
    /// logging flag), the settings store last. A background task keeps the
    /// logger flag in sync with later environment switches.
    ///
    /// # Errors
    /// Returns [`BootstrapError`] when the manifest is malformed or the
    /// settings directory cannot be created; both are startup
    /// misconfigurations, reported before any capability is handed out.
    pub async fn init(self) -> Result<ServiceRegistry, BootstrapError> {
        let manifest = load_manifest(self.manifest_path.as_deref())?;
        let events = EventBus::new();

        let config = match self.profile {
            Some(profile) => AppConfig::with_profile(manifest, profile, events.clone()),
            None => AppConfig::new(manifest, events.clone()),
        };

        let loggers = LoggerRegistry::new(config.enable_logging());
        let default_logger = loggers.default();

        let data_dir = self.data_dir.unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));
        let settings = SettingsStore::open(data_dir, events.clone()).await?;

        spawn_logger_flag_sync(&config, &loggers)?;

        let registry = ServiceRegistry::builder()
            .register(events)
            .register(config)
            .register(loggers)
            .register(default_logger.clone())
            .register(settings)
            .build();

        default_logger.info("Platform core initialized");
        Ok(registry)
    }
}

/// Keeps the logger registry's enabled flag in sync with environment
/// switches, rebuilding it from the new environment's configuration.
fn spawn_logger_flag_sync(
    config: &AppConfig,
    loggers: &LoggerRegistry,
) -> Result<(), EventBusError> {
    let mut changes = config.subscribe()?;
    let loggers = loggers.clone();
    tokio::spawn(async move {
        while let Some(event) = EventReceiverExt::recv(&mut changes).await {
            loggers.set_enabled(event.environment.enable_logging());
        }
    });
    Ok(())
}

/// Spawns the detached startup tasks: the first-launch check and the
/// configuration check.
///
/// Both run as non-blocking background units; callers must not assume they
/// have completed, and neither is cancellable: they run to completion or
/// the process exits.
///
/// # Errors
/// Returns [`RegistryError`] if a required capability is missing, which
/// means the registry was not produced by [`Bootstrap::init`].
pub fn spawn_startup_tasks(registry: &ServiceRegistry) -> Result<(), RegistryError> {
    let settings = registry.resolve::<SettingsStore>()?;
    let config = registry.resolve::<AppConfig>()?;
    let logger = registry.resolve::<Logger>()?;

    tokio::spawn(first_launch_check(settings, logger.clone()));
    tokio::spawn(configuration_check(config, logger));
    Ok(())
}

/// Flips the first-launch flag, records the running version, and counts the
/// launch. On later launches detects version changes.
async fn first_launch_check(settings: SettingsStore, logger: Logger) {
    if settings.get_bool(SettingKey::FirstLaunch).await {
        logger.info("First launch detected");
        settings.set_bool(SettingKey::FirstLaunch, false).await;
        settings.set_string(SettingKey::LastAppVersion, constants::APP_VERSION).await;
    } else {
        let last = settings
            .get_string(SettingKey::LastAppVersion)
            .await
            .unwrap_or_else(|| "unknown".to_owned());
        if last != constants::APP_VERSION {
            logger.info(format!("App updated from {last} to {}", constants::APP_VERSION));
            settings.set_string(SettingKey::LastAppVersion, constants::APP_VERSION).await;
        }
    }

    let count = settings.get_int(SettingKey::AppUsageCount).await;
    settings.set_int(SettingKey::AppUsageCount, count + 1).await;
}

/// Logs the resolved configuration so a misconfigured build is visible in
/// the first screen of diagnostics.
async fn configuration_check(config: AppConfig, logger: Logger) {
    logger.info("Performing configuration check");

    let snapshot = config.snapshot();
    logger.info(format!("Environment: {}", snapshot.environment));
    logger.info(format!("Base URL: {}", snapshot.base_url));
    logger.info(format!("Encryption enabled: {}", snapshot.enable_encryption));

    if snapshot.environment != Environment::Production {
        logger.debug("Non-production environment; extra diagnostics enabled");
        if FeatureSet::DEFAULT.contains(FeatureSet::ANALYTICS) {
            logger.warning("Analytics enabled in a non-production environment");
        }
    }
}
