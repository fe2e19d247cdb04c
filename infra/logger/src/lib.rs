//! # Logger
//!
//! Category-keyed diagnostic loggers for the platform core.
//!
//! A [`LoggerRegistry`] hands out cheap-clone [`Logger`] handles, one per
//! category, created lazily and cached for the process lifetime. Handles
//! emit through [`tracing`], so infrastructure crates that log with the
//! `tracing` macros directly and application code that logs through a
//! [`Logger`] share one sink and one filter.
//!
//! The registry carries a single enabled flag, seeded from the environment
//! configuration and re-checked on every call: flipping it silences or
//! restores every handle immediately, including handles created earlier.
//!
//! [`Diagnostics::builder`] installs the global subscriber with the
//! single-line record format (see [`format_record`]).
//!
//! ## Example
//!
//! ```rust
//! use orbit_logger::LoggerRegistry;
//!
//! let registry = LoggerRegistry::new(true);
//! let logger = registry.logger("network");
//! logger.info("connection established");
//! ```

mod error;
mod format;

pub use error::LoggerError;
pub use format::{RecordFormat, format_record, severity_marker};
pub use tracing::level_filters::LevelFilter;

use crate::format::short_file;
use fxhash::FxHashMap;
use parking_lot::RwLock;
use std::panic::Location;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

/// Category of the logger that is always available without a lookup.
pub const DEFAULT_CATEGORY: &str = "app";

#[derive(Debug)]
struct Shared {
    enabled: AtomicBool,
}

/// A diagnostic logger bound to one category.
///
/// Handles are cheap to clone and share the registry's enabled flag; the
/// flag is consulted on every call, never cached per message, so a runtime
/// configuration change takes effect immediately.
#[derive(Debug, Clone)]
pub struct Logger {
    category: Arc<str>,
    shared: Arc<Shared>,
}

impl Logger {
    fn new(category: &str, shared: Arc<Shared>) -> Self {
        Self { category: Arc::from(category), shared }
    }

    /// The category this handle reports under.
    #[must_use]
    pub fn category(&self) -> &str {
        &self.category
    }

    /// Whether records currently reach the sink.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.shared.enabled.load(Ordering::Relaxed)
    }

    /// True when both handles came from the same registry slot.
    #[must_use]
    pub fn same_as(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.category, &other.category) && Arc::ptr_eq(&self.shared, &other.shared)
    }

    #[track_caller]
    pub fn trace(&self, message: impl AsRef<str>) {
        self.emit(Level::TRACE, message.as_ref(), Location::caller());
    }

    #[track_caller]
    pub fn debug(&self, message: impl AsRef<str>) {
        self.emit(Level::DEBUG, message.as_ref(), Location::caller());
    }

    #[track_caller]
    pub fn info(&self, message: impl AsRef<str>) {
        self.emit(Level::INFO, message.as_ref(), Location::caller());
    }

    #[track_caller]
    pub fn warning(&self, message: impl AsRef<str>) {
        self.emit(Level::WARN, message.as_ref(), Location::caller());
    }

    #[track_caller]
    pub fn error(&self, message: impl AsRef<str>) {
        self.emit(Level::ERROR, message.as_ref(), Location::caller());
    }

    fn emit(&self, level: Level, message: &str, location: &Location<'_>) {
        if !self.is_enabled() {
            return;
        }

        let category = &*self.category;
        let origin = format!("{}:{}", short_file(location.file()), location.line());
        let origin = origin.as_str();
        match level {
            Level::TRACE => tracing::trace!(category, origin, "{message}"),
            Level::DEBUG => tracing::debug!(category, origin, "{message}"),
            Level::INFO => tracing::info!(category, origin, "{message}"),
            Level::WARN => tracing::warn!(category, origin, "{message}"),
            _ => tracing::error!(category, origin, "{message}"),
        }
    }
}

#[derive(Debug)]
struct RegistryInner {
    shared: Arc<Shared>,
    default_logger: Logger,
    loggers: RwLock<FxHashMap<String, Logger>>,
}

/// A memoized factory of category [`Logger`]s.
///
/// Loggers are stateless formatters, so the cache exists for handle reuse
/// rather than correctness; creating a category twice would merely produce
/// two equivalent handles. Lookup takes a read lock, first access per
/// category upgrades to a write lock.
#[derive(Debug, Clone)]
pub struct LoggerRegistry {
    inner: Arc<RegistryInner>,
}

impl LoggerRegistry {
    /// Creates a registry with the given initial enabled state, typically
    /// the active environment's logging flag.
    #[must_use]
    pub fn new(enabled: bool) -> Self {
        let shared = Arc::new(Shared { enabled: AtomicBool::new(enabled) });
        let default_logger = Logger::new(DEFAULT_CATEGORY, shared.clone());
        Self {
            inner: Arc::new(RegistryInner {
                shared,
                default_logger,
                loggers: RwLock::new(FxHashMap::default()),
            }),
        }
    }

    /// Returns the cached logger for `category`, creating it on first
    /// access.
    #[must_use]
    pub fn logger(&self, category: &str) -> Logger {
        {
            let loggers = self.inner.loggers.read();
            if let Some(logger) = loggers.get(category) {
                return logger.clone();
            }
        }

        let mut loggers = self.inner.loggers.write();
        loggers
            .entry(category.to_owned())
            .or_insert_with(|| Logger::new(category, self.inner.shared.clone()))
            .clone()
    }

    /// The fixed default logger, available without a lookup.
    #[must_use]
    pub fn default(&self) -> Logger {
        self.inner.default_logger.clone()
    }

    /// Whether records currently reach the sink.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.inner.shared.enabled.load(Ordering::Relaxed)
    }

    /// Flips the sink for every handle this registry ever produced.
    pub fn set_enabled(&self, enabled: bool) {
        self.inner.shared.enabled.store(enabled, Ordering::Relaxed);
    }
}

/// Entry point for installing the global diagnostic subscriber.
#[derive(Debug)]
pub struct Diagnostics;

impl Diagnostics {
    /// Returns a new [`DiagnosticsBuilder`] for the process-wide sink.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use orbit_logger::{Diagnostics, LevelFilter};
    ///
    /// Diagnostics::builder().level(LevelFilter::DEBUG).init().unwrap();
    /// ```
    #[must_use = "the builder must be configured and init() called to install the subscriber"]
    pub fn builder() -> DiagnosticsBuilder {
        DiagnosticsBuilder { level: LevelFilter::INFO, env_filter: None, ansi: true }
    }
}

/// A fluent builder configuring the global tracing subscriber.
#[must_use = "the builder does nothing unless init() is called"]
#[derive(Debug)]
pub struct DiagnosticsBuilder {
    level: LevelFilter,
    env_filter: Option<String>,
    ansi: bool,
}

impl DiagnosticsBuilder {
    /// Sets the default minimum level; `RUST_LOG` still overrides.
    pub const fn level(mut self, level: LevelFilter) -> Self {
        self.level = level;
        self
    }

    /// Adds an explicit module-directed filter (e.g. `orbit=debug`).
    pub fn env_filter(mut self, filter: impl Into<String>) -> Self {
        self.env_filter = Some(filter.into());
        self
    }

    /// Enables or disables ANSI colors on the console sink.
    pub const fn ansi(mut self, enabled: bool) -> Self {
        self.ansi = enabled;
        self
    }

    /// Consumes the builder and installs the global subscriber.
    ///
    /// # Errors
    /// Returns [`LoggerError::Subscriber`] if a global subscriber is already
    /// set, or [`LoggerError::InvalidFilter`] for a malformed filter.
    pub fn init(self) -> Result<(), LoggerError> {
        let builder = EnvFilter::builder().with_default_directive(self.level.into());
        let filter = match self.env_filter {
            Some(directives) => builder
                .parse(&directives)
                .map_err(|source| LoggerError::InvalidFilter { filter: directives, source })?,
            None => builder.from_env_lossy(),
        };

        let console = tracing_subscriber::fmt::layer()
            .event_format(RecordFormat)
            .with_writer(std::io::stderr)
            .with_ansi(self.ansi)
            .boxed();

        tracing_subscriber::registry().with(filter).with(console).try_init()?;
        Ok(())
    }
}
