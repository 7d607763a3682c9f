//! Installs the global subscriber, so it lives in its own test binary.

use meshview_preview::diagnostics::{self, session_log_path, DiagnosticsConfig, SESSION_HEADER};
use std::fs;

#[test]
fn test_second_install_keeps_live_session_log() {
    if std::env::var_os("RUST_LOG").is_some() {
        return;
    }
    let tmp = tempfile::tempdir().unwrap();
    let config = DiagnosticsConfig {
        log_file: Some(session_log_path(tmp.path())),
        filter: "info".to_string(),
        echo_stderr: false,
    };
    let path = session_log_path(tmp.path());

    assert!(diagnostics::install(&config, None).unwrap());
    tracing::warn!("first session record");

    assert!(!diagnostics::install(&config, None).unwrap());
    tracing::warn!("second session record");

    let contents = fs::read_to_string(&path).unwrap();
    assert!(contents.starts_with(SESSION_HEADER));
    assert_eq!(contents.matches(SESSION_HEADER).count(), 1);
    assert!(contents.contains("first session record"));
    assert!(contents.contains("second session record"));
}
