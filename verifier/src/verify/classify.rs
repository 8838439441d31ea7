//! Log classification

use crate::models::deployment::{ClassifiedLogs, DeploymentEvent};

const ERROR_KEYWORDS: [&str; 2] = ["error", "failed"];
const WARNING_KEYWORDS: [&str; 2] = ["warning", "deprecated"];

/// Severity bucket for one event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

/// Severity of a single event. An explicit type tag beats the text.
pub fn severity(event: &DeploymentEvent) -> Option<Severity> {
    match event.kind.as_str() {
        "error" => return Some(Severity::Error),
        "warning" => return Some(Severity::Warning),
        _ => {}
    }

    let text = event.message()?.to_lowercase();
    if ERROR_KEYWORDS.iter().any(|keyword| text.contains(keyword)) {
        Some(Severity::Error)
    } else if WARNING_KEYWORDS.iter().any(|keyword| text.contains(keyword)) {
        Some(Severity::Warning)
    } else {
        None
    }
}

/// Partition events into error and warning text, preserving input order
pub fn classify(events: &[DeploymentEvent]) -> ClassifiedLogs {
    let mut logs = ClassifiedLogs::default();

    for event in events {
        let bucket = match severity(event) {
            Some(Severity::Error) => &mut logs.errors,
            Some(Severity::Warning) => &mut logs.warnings,
            None => continue,
        };
        bucket.push(event.message().unwrap_or_default().to_string());
    }

    logs
}
