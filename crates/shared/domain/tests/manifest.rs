use orbit_domain::{FeatureSet, Manifest};
use serde_json::json;

#[test]
fn manifest_defaults_to_empty() {
    let manifest = Manifest::default();
    assert!(manifest.is_empty());
    assert!(manifest.environment.is_none());
}

#[test]
fn manifest_deserializes_partial_input() {
    let raw = json!({ "api_base_url": "https://x" });

    let manifest: Manifest = serde_json::from_value(raw).expect("manifest deserialize");
    assert_eq!(manifest.api_base_url.as_deref(), Some("https://x"));
    assert!(manifest.environment.is_none());
    assert!(manifest.encryption_key_name.is_none());
    assert!(!manifest.is_empty());
}

#[test]
fn feature_set_parses_names_and_bits() {
    assert_eq!(FeatureSet::from("analytics"), FeatureSet::ANALYTICS);
    assert_eq!(FeatureSet::from("*"), FeatureSet::ALL);
    assert_eq!(FeatureSet::from("bogus"), FeatureSet::empty());
    assert_eq!(FeatureSet::from(FeatureSet::ALL.bits()), FeatureSet::ALL);
    assert!(FeatureSet::DEFAULT.contains(FeatureSet::CRASH_REPORTING));
    assert!(!FeatureSet::DEFAULT.contains(FeatureSet::ANALYTICS));
}
