//! # Kernel
//!
//! The wiring layer of the platform core: a type-keyed capability registry
//! frozen after the startup sequence, and the environment configuration
//! manager built on the manifest loader.
//!
//! Everything else in the application obtains the shared services
//! ([`AppConfig`], logger registry, settings store) exclusively through a
//! [`ServiceRegistry`] built at process start, never by direct
//! construction.

pub mod config;
pub mod registry;

pub use config::{
    AppConfig, ConfigSnapshot, EnvironmentChanged, ManifestError, load_manifest,
    load_manifest_from,
};
pub use registry::{RegistryError, ServiceRegistry, ServiceRegistryBuilder};
