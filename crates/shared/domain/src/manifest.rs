use serde::Deserialize;

/// Static startup configuration read once at process start.
///
/// Every field is optional; absence falls back to the active
/// [`Environment`](crate::Environment)'s fixed attributes. The manifest is
/// never re-read after startup, matching its role as build metadata rather
/// than runtime state.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Manifest {
    /// Requested startup environment (`dev`/`qa`/`prod`). Unrecognized keys
    /// are ignored in favor of the build-profile default.
    pub environment: Option<String>,
    /// Overrides the environment's base URL when present.
    pub api_base_url: Option<String>,
    /// Overrides the environment's encryption key slot name when present.
    pub encryption_key_name: Option<String>,
}

impl Manifest {
    /// True when no field is set, i.e. the process runs on pure environment
    /// defaults.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.environment.is_none()
            && self.api_base_url.is_none()
            && self.encryption_key_name.is_none()
    }
}
