//! Log classification and status resolution tests

use deploy_verifier::models::deployment::{DeploymentEvent, Outcome};
use deploy_verifier::verify::classify::classify;
use deploy_verifier::verify::resolve::resolve;

fn log(kind: &str, text: &str) -> DeploymentEvent {
    DeploymentEvent {
        kind: kind.to_string(),
        created: 1_700_000_000_000,
        text: Some(text.to_string()),
        payload: None,
    }
}

#[test]
fn test_explicit_error_tag_wins_over_warning_text() {
    let logs = classify(&[log("error", "warning: cache miss")]);
    assert_eq!(logs.errors, vec!["warning: cache miss".to_string()]);
    assert!(logs.warnings.is_empty());
}

#[test]
fn test_buckets_preserve_input_order_without_dedup() {
    let events = vec![
        log("stdout", "Installing dependencies"),
        log("stderr", "npm WARN deprecated left-pad@1.0.0"),
        log("stdout", "Error: module not found"),
        log("stdout", "Warning: large bundle"),
        log("stdout", "Error: module not found"),
        log("command", "Build failed: exit code 1"),
    ];

    let logs = classify(&events);
    assert_eq!(
        logs.errors,
        vec![
            "Error: module not found".to_string(),
            "Error: module not found".to_string(),
            "Build failed: exit code 1".to_string(),
        ]
    );
    assert_eq!(
        logs.warnings,
        vec![
            "npm WARN deprecated left-pad@1.0.0".to_string(),
            "Warning: large bundle".to_string(),
        ]
    );
}

#[test]
fn test_classification_is_repeatable() {
    let events = vec![
        log("stdout", "Deprecated config key"),
        log("warning", "slow build"),
        log("stdout", "FAILED to upload"),
    ];
    assert_eq!(classify(&events), classify(&events));
}

#[test]
fn test_payload_text_is_classified() {
    let event = DeploymentEvent {
        kind: "stderr".to_string(),
        created: 0,
        text: None,
        payload: Some(serde_json::json!({ "text": "fatal error: out of memory" })),
    };
    let logs = classify(&[event]);
    assert_eq!(logs.errors, vec!["fatal error: out of memory".to_string()]);
}

#[test]
fn test_ready_with_log_errors_is_failed() {
    let logs = classify(&[log("log", "Build failed: exit code 1")]);
    assert_eq!(resolve("READY", logs.errors.len()), Outcome::Failed);
}

#[test]
fn test_unknown_state_without_errors_is_error() {
    assert_eq!(resolve("INITIALIZING", 0), Outcome::Error);
}
