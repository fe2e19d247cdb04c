use orbit_logger::{Logger, LoggerRegistry};

#[test]
fn repeated_lookup_returns_the_cached_handle() {
    let registry = LoggerRegistry::new(true);

    let first = registry.logger("sync");
    let second = registry.logger("sync");
    assert!(first.same_as(&second));

    let other = registry.logger("storage");
    assert!(!first.same_as(&other));
}

#[test]
fn cache_is_shared_across_registry_clones() {
    let registry = LoggerRegistry::new(true);
    let clone = registry.clone();

    let a = registry.logger("profile");
    let b = clone.logger("profile");
    assert!(a.same_as(&b));
}

#[test]
fn default_logger_needs_no_lookup() {
    let registry = LoggerRegistry::new(true);
    let default = registry.default();
    assert_eq!(default.category(), orbit_logger::DEFAULT_CATEGORY);
    assert!(default.same_as(&registry.default()));
}

#[test]
fn enabled_flag_reaches_existing_handles() {
    let registry = LoggerRegistry::new(true);
    let logger = registry.logger("network");
    assert!(logger.is_enabled());

    registry.set_enabled(false);
    assert!(!logger.is_enabled());
    assert!(!registry.is_enabled());

    // Calls on a disabled handle are silent no-ops, not errors.
    logger.info("dropped");
    logger.error("also dropped");

    registry.set_enabled(true);
    assert!(logger.is_enabled());
}

#[test]
fn disabled_registry_starts_all_handles_silent() {
    let registry = LoggerRegistry::new(false);
    assert!(!registry.default().is_enabled());
    assert!(!registry.logger("anything").is_enabled());
}

#[test]
fn handles_survive_concurrent_first_access() {
    let registry = LoggerRegistry::new(true);

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let registry = registry.clone();
            std::thread::spawn(move || registry.logger("contended"))
        })
        .collect();

    let loggers: Vec<Logger> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    for logger in &loggers {
        assert!(logger.same_as(&loggers[0]));
    }
}
