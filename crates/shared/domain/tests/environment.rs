use orbit_domain::{BuildProfile, Environment};
use std::time::Duration;

#[test]
fn wire_keys_round_trip() {
    for env in Environment::ALL {
        assert_eq!(Environment::from_key(env.key()), Some(env));
    }
    assert_eq!(Environment::from_key("staging"), None);
    assert_eq!(Environment::from_key(""), None);
}

#[test]
fn attributes_are_fixed_per_variant() {
    assert_eq!(Environment::Development.base_url(), "http://localhost:3000/v1");
    assert_eq!(Environment::Qa.base_url(), "https://api-qa.orbit.app/v1");
    assert_eq!(Environment::Production.base_url(), "https://api.orbit.app/v1");

    assert!(Environment::Development.enable_logging());
    assert!(Environment::Qa.enable_logging());
    assert!(!Environment::Production.enable_logging());

    assert!(!Environment::Development.enable_encryption());
    assert!(Environment::Qa.enable_encryption());
    assert!(Environment::Production.enable_encryption());

    assert_eq!(Environment::Development.request_timeout(), Duration::from_secs(30));
    assert_eq!(Environment::Qa.request_timeout(), Duration::from_secs(20));
    assert_eq!(Environment::Production.request_timeout(), Duration::from_secs(15));

    assert_eq!(Environment::Development.cache_expiration(), Duration::from_secs(60));
    assert_eq!(Environment::Qa.cache_expiration(), Duration::from_secs(300));
    assert_eq!(Environment::Production.cache_expiration(), Duration::from_secs(600));

    assert_eq!(Environment::Qa.encryption_key_name(), "QA_ENCRYPTION_KEY");
}

#[test]
fn serde_uses_wire_keys() {
    let json = serde_json::to_string(&Environment::Qa).expect("serialize");
    assert_eq!(json, "\"qa\"");

    let env: Environment = serde_json::from_str("\"prod\"").expect("deserialize");
    assert_eq!(env, Environment::Production);
}

#[test]
fn build_profile_defaults() {
    assert_eq!(BuildProfile::Debug.default_environment(), Environment::Development);
    assert_eq!(BuildProfile::Release.default_environment(), Environment::Production);
    assert!(BuildProfile::Debug.allows_environment_switch());
    assert!(!BuildProfile::Release.allows_environment_switch());
}
