//! Application-wide constants.

/// Product name used in diagnostics and the user agent.
pub const APP_NAME: &str = "Orbit";

/// Version recorded in the settings store for update detection.
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// User agent advertised by networking layers.
pub const USER_AGENT: &str = concat!("Orbit-core/", env!("CARGO_PKG_VERSION"));

/// Feature names accepted by [`FeatureSet::from`](crate::FeatureSet).
pub const BIOMETRIC_AUTH: &str = "biometric_auth";
pub const PUSH_NOTIFICATIONS: &str = "push_notifications";
pub const ANALYTICS: &str = "analytics";
pub const CRASH_REPORTING: &str = "crash_reporting";
pub const OFFLINE_MODE: &str = "offline_mode";
pub const DATA_EXPORT: &str = "data_export";
