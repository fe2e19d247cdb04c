use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// A deployment profile with fixed, immutable attributes.
///
/// The set is closed: every attribute is a pure function of the variant, so a
/// given environment always resolves to the same base URL, timeout, and
/// feature toggles. Runtime state (the *active* environment, manifest
/// overrides) lives in `orbit-kernel`, not here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Environment {
    #[serde(rename = "dev")]
    Development,
    #[serde(rename = "qa")]
    Qa,
    #[serde(rename = "prod")]
    Production,
}

impl Environment {
    /// Every known environment, in promotion order.
    pub const ALL: [Self; 3] = [Self::Development, Self::Qa, Self::Production];

    /// The stable wire key (`dev`/`qa`/`prod`) used by manifests.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Development => "dev",
            Self::Qa => "qa",
            Self::Production => "prod",
        }
    }

    /// Parses a manifest wire key. Unknown keys yield `None`; callers decide
    /// the fallback policy.
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "dev" => Some(Self::Development),
            "qa" => Some(Self::Qa),
            "prod" => Some(Self::Production),
            _ => None,
        }
    }

    /// Human-readable name for display surfaces.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Development => "Development",
            Self::Qa => "QA",
            Self::Production => "Production",
        }
    }

    /// Default API origin for the environment (overridable via manifest).
    #[must_use]
    pub const fn base_url(self) -> &'static str {
        match self {
            Self::Development => "http://localhost:3000/v1",
            Self::Qa => "https://api-qa.orbit.app/v1",
            Self::Production => "https://api.orbit.app/v1",
        }
    }

    /// Whether diagnostic logging is on by default.
    #[must_use]
    pub const fn enable_logging(self) -> bool {
        match self {
            Self::Development | Self::Qa => true,
            Self::Production => false,
        }
    }

    /// Per-request network timeout.
    #[must_use]
    pub const fn request_timeout(self) -> Duration {
        match self {
            Self::Development => Duration::from_secs(30),
            Self::Qa => Duration::from_secs(20),
            Self::Production => Duration::from_secs(15),
        }
    }

    /// Whether payload encryption is required.
    #[must_use]
    pub const fn enable_encryption(self) -> bool {
        match self {
            // Plaintext in development makes debugging sane
            Self::Development => false,
            Self::Qa | Self::Production => true,
        }
    }

    /// Name of the key slot used when encryption is enabled (overridable via
    /// manifest).
    #[must_use]
    pub const fn encryption_key_name(self) -> &'static str {
        match self {
            Self::Development => "DEV_ENCRYPTION_KEY",
            Self::Qa => "QA_ENCRYPTION_KEY",
            Self::Production => "PROD_ENCRYPTION_KEY",
        }
    }

    /// How long cached responses stay fresh.
    #[must_use]
    pub const fn cache_expiration(self) -> Duration {
        match self {
            Self::Development => Duration::from_secs(60),
            Self::Qa => Duration::from_secs(300),
            Self::Production => Duration::from_secs(600),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// The build flavor the process was compiled as.
///
/// Determined from `cfg!(debug_assertions)` in production code, but carried
/// as a value so release-build policies (no runtime environment switching)
/// stay testable from a debug test binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuildProfile {
    Debug,
    Release,
}

impl BuildProfile {
    /// The profile this binary was compiled with.
    #[must_use]
    pub const fn current() -> Self {
        if cfg!(debug_assertions) { Self::Debug } else { Self::Release }
    }

    /// The environment a process starts in when the manifest names none.
    #[must_use]
    pub const fn default_environment(self) -> Environment {
        match self {
            Self::Debug => Environment::Development,
            Self::Release => Environment::Production,
        }
    }

    /// Whether runtime environment switching is permitted.
    #[must_use]
    pub const fn allows_environment_switch(self) -> bool {
        matches!(self, Self::Debug)
    }
}
