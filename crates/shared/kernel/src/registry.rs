//! Capability registry for the platform core.
//!
//! The registry maps a capability's Rust type to exactly one shared
//! instance. Registration happens only through the builder during the
//! startup sequence; the built registry is immutable, which is what makes
//! lock-free concurrent resolution sound. Capabilities are the concrete
//! cheap-clone handles themselves (`AppConfig`, `SettingsStore`, ...), so a
//! successful insert can never fail to downcast on the way out.

use fxhash::FxHashMap;
use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;

/// Errors from capability resolution.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// Nobody registered the capability. This is a startup-ordering bug,
    /// detectable before release, not a runtime condition to recover from;
    /// binaries bubble it up and exit with the diagnostic.
    #[error("no instance registered for capability `{capability}`")]
    Unregistered { capability: &'static str },
}

struct RegisteredService {
    name: &'static str,
    instance: Box<dyn Any + Send + Sync>,
}

/// An immutable map from capability type to its singleton instance.
///
/// Cloning the registry is cheap (it is `Arc`-backed) and every clone
/// resolves the identical instances.
#[derive(Clone)]
pub struct ServiceRegistry {
    inner: Arc<RegistryInner>,
}

struct RegistryInner {
    services: FxHashMap<TypeId, RegisteredService>,
}

impl ServiceRegistry {
    /// Returns a builder for the startup registration sequence.
    #[must_use]
    pub fn builder() -> ServiceRegistryBuilder {
        ServiceRegistryBuilder::default()
    }

    /// Resolves the registered instance of `T`.
    ///
    /// # Errors
    /// Returns [`RegistryError::Unregistered`] naming the capability when
    /// nothing was registered for `T`.
    pub fn resolve<T: Any + Send + Sync + Clone>(&self) -> Result<T, RegistryError> {
        self.get::<T>()
            .ok_or(RegistryError::Unregistered { capability: std::any::type_name::<T>() })
    }

    /// Resolves the registered instance of `T`, or `None` when absent, for
    /// call sites that can degrade gracefully.
    #[must_use]
    pub fn get<T: Any + Send + Sync + Clone>(&self) -> Option<T> {
        self.inner
            .services
            .get(&TypeId::of::<T>())
            .and_then(|service| service.instance.downcast_ref::<T>())
            .cloned()
    }

    /// Whether an instance of `T` is registered.
    #[must_use]
    pub fn contains<T: Any>(&self) -> bool {
        self.inner.services.contains_key(&TypeId::of::<T>())
    }

    /// Iterates registered capability type names (for diagnostics).
    pub fn capability_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.inner.services.values().map(|service| service.name)
    }

    /// Number of registered capabilities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.services.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.services.is_empty()
    }
}

impl fmt::Debug for ServiceRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceRegistry")
            .field("capabilities", &self.capability_names().collect::<Vec<_>>())
            .finish()
    }
}

/// Collects registrations during startup, then freezes them into a
/// [`ServiceRegistry`].
#[must_use = "builders do nothing unless you call .build()"]
#[derive(Default)]
pub struct ServiceRegistryBuilder {
    services: FxHashMap<TypeId, RegisteredService>,
}

impl ServiceRegistryBuilder {
    /// Binds the capability type `T` to `instance`.
    ///
    /// Registering the same type again silently replaces the previous
    /// binding (last write wins); in practice each capability is registered
    /// exactly once.
    pub fn register<T: Any + Send + Sync>(mut self, instance: T) -> Self {
        let name = std::any::type_name::<T>();
        let previous = self
            .services
            .insert(TypeId::of::<T>(), RegisteredService { name, instance: Box::new(instance) });
        if previous.is_some() {
            tracing::debug!(capability = name, "Rebinding capability; last registration wins");
        }
        self
    }

    /// Freezes the registrations. After this point the map is read-only
    /// and resolution is safe from any number of concurrent callers.
    pub fn build(self) -> ServiceRegistry {
        ServiceRegistry { inner: Arc::new(RegistryInner { services: self.services }) }
    }
}

impl fmt::Debug for ServiceRegistryBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceRegistryBuilder")
            .field("capabilities", &self.services.values().map(|s| s.name).collect::<Vec<_>>())
            .finish()
    }
}
