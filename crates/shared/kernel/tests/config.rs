use orbit_domain::{BuildProfile, Environment, Manifest};
use orbit_event_bus::EventBus;
use orbit_kernel::{AppConfig, load_manifest, load_manifest_from};
use std::time::Duration;

fn manifest(environment: Option<&str>) -> Manifest {
    Manifest { environment: environment.map(str::to_owned), ..Manifest::default() }
}

#[test]
fn debug_build_defaults_to_development() {
    let config = AppConfig::with_profile(manifest(None), BuildProfile::Debug, EventBus::new());
    assert_eq!(config.current_environment(), Environment::Development);
}

#[test]
fn release_build_defaults_to_production() {
    let config = AppConfig::with_profile(manifest(None), BuildProfile::Release, EventBus::new());
    assert_eq!(config.current_environment(), Environment::Production);
}

#[test]
fn manifest_environment_is_honored() {
    let config = AppConfig::with_profile(manifest(Some("qa")), BuildProfile::Debug, EventBus::new());
    assert_eq!(config.current_environment(), Environment::Qa);
}

#[test]
fn unrecognized_environment_falls_back_to_the_build_default() {
    let config =
        AppConfig::with_profile(manifest(Some("staging")), BuildProfile::Debug, EventBus::new());
    assert_eq!(config.current_environment(), Environment::Development);

    let config =
        AppConfig::with_profile(manifest(Some("staging")), BuildProfile::Release, EventBus::new());
    assert_eq!(config.current_environment(), Environment::Production);
}

#[test]
fn derived_fields_follow_the_active_environment() {
    let config = AppConfig::with_profile(manifest(Some("qa")), BuildProfile::Debug, EventBus::new());

    assert_eq!(config.base_url(), "https://api-qa.orbit.app/v1");
    assert_eq!(config.encryption_key_name(), "QA_ENCRYPTION_KEY");
    assert!(config.enable_logging());
    assert!(config.enable_encryption());
    assert_eq!(config.request_timeout(), Duration::from_secs(20));
    assert_eq!(config.cache_expiration(), Duration::from_secs(300));
}

#[test]
fn manifest_overrides_beat_environment_attributes() {
    let manifest = Manifest {
        environment: Some("prod".to_owned()),
        api_base_url: Some("https://x".to_owned()),
        encryption_key_name: Some("CUSTOM_KEY".to_owned()),
    };
    let config = AppConfig::with_profile(manifest, BuildProfile::Release, EventBus::new());

    // Overrides win regardless of the active environment...
    assert_eq!(config.base_url(), "https://x");
    assert_eq!(config.encryption_key_name(), "CUSTOM_KEY");
    // ...while non-overridable fields still derive from it.
    assert!(!config.enable_logging());
    assert_eq!(config.request_timeout(), Duration::from_secs(15));
}

#[test]
fn debug_switch_changes_environment_and_fires_exactly_one_event() {
    let events = EventBus::new();
    let config = AppConfig::with_profile(manifest(None), BuildProfile::Debug, events);
    let mut rx = config.subscribe().expect("subscribe");

    config.switch_environment(Environment::Qa);

    assert_eq!(config.current_environment(), Environment::Qa);
    // The broadcast happens before switch_environment returns.
    let event = rx.try_recv().expect("one event pending");
    assert_eq!(event.environment, Environment::Qa);
    assert!(rx.try_recv().is_err(), "exactly one notification per switch");
}

#[test]
fn release_switch_is_a_reported_no_op() {
    let events = EventBus::new();
    let config = AppConfig::with_profile(manifest(None), BuildProfile::Release, events);
    let mut rx = config.subscribe().expect("subscribe");

    config.switch_environment(Environment::Qa);

    assert_eq!(config.current_environment(), Environment::Production);
    assert!(rx.try_recv().is_err(), "release builds must not broadcast a switch");
}

#[test]
fn switch_updates_every_derived_field_consistently() {
    let config = AppConfig::with_profile(manifest(None), BuildProfile::Debug, EventBus::new());
    config.switch_environment(Environment::Production);

    let snapshot = config.snapshot();
    assert_eq!(snapshot.environment, Environment::Production);
    assert_eq!(snapshot.base_url, "https://api.orbit.app/v1");
    assert!(!snapshot.enable_logging);
    assert!(snapshot.enable_encryption);
}

#[test]
fn empty_sources_yield_an_empty_manifest() {
    let variables = config::Environment::with_prefix("APP").source(Some(config::Map::new()));
    let manifest = load_manifest_from(None::<&str>, variables).expect("load");
    assert!(manifest.is_empty());
}

#[test]
fn manifest_file_values_are_read() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("app.toml");
    std::fs::write(&path, "environment = \"qa\"\napi_base_url = \"https://qa.example.test\"\n")
        .unwrap();

    let variables = config::Environment::with_prefix("APP").source(Some(config::Map::new()));
    let manifest = load_manifest_from(Some(&path), variables).expect("load");

    assert_eq!(manifest.environment.as_deref(), Some("qa"));
    assert_eq!(manifest.api_base_url.as_deref(), Some("https://qa.example.test"));
    assert!(manifest.encryption_key_name.is_none());
}

#[test]
fn variables_override_file_values() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("app.toml");
    std::fs::write(&path, "environment = \"qa\"\n").unwrap();

    let mut vars = config::Map::new();
    vars.insert("APP_ENVIRONMENT".to_owned(), "prod".to_owned());
    vars.insert("APP_ENCRYPTION_KEY_NAME".to_owned(), "OVERRIDE_KEY".to_owned());
    let variables = config::Environment::with_prefix("APP").source(Some(vars));

    let manifest = load_manifest_from(Some(&path), variables).expect("load");
    assert_eq!(manifest.environment.as_deref(), Some("prod"));
    assert_eq!(manifest.encryption_key_name.as_deref(), Some("OVERRIDE_KEY"));
}

#[test]
fn missing_manifest_file_is_an_error() {
    let result = load_manifest(Some("/definitely/not/here/app.toml"));
    assert!(result.is_err());
}
