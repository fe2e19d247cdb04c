use orbit_logger::{Diagnostics, LevelFilter, LoggerError, format_record, severity_marker};
use serial_test::serial;
use tracing::Level;

#[test]
fn record_layout_matches_the_contract() {
    let record = format_record("10:42:07.153", Level::INFO, "network", "client.rs:88", "connected");
    assert_eq!(record, "10:42:07.153 INFO  [network] client.rs:88 - connected");

    let record = format_record("10:42:07.154", Level::ERROR, "settings", "store.rs:12", "bad blob");
    assert_eq!(record, "10:42:07.154 ERROR [settings] store.rs:12 - bad blob");
}

#[test]
fn severity_markers_cover_every_level() {
    assert_eq!(severity_marker(Level::TRACE), "TRACE");
    assert_eq!(severity_marker(Level::DEBUG), "DEBUG");
    assert_eq!(severity_marker(Level::INFO), "INFO");
    assert_eq!(severity_marker(Level::WARN), "WARN");
    assert_eq!(severity_marker(Level::ERROR), "ERROR");
}

#[test]
#[serial]
fn malformed_filter_is_rejected_before_install() {
    let result = Diagnostics::builder().env_filter("!!not a filter!!").init();
    assert!(matches!(result, Err(LoggerError::InvalidFilter { .. })));
}

#[test]
#[serial]
fn second_install_is_an_error() {
    Diagnostics::builder().level(LevelFilter::DEBUG).ansi(false).init().expect("first install");

    let result = Diagnostics::builder().init();
    assert!(matches!(result, Err(LoggerError::Subscriber(_))));
}
