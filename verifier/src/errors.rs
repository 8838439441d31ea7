//! Error types for the deployment verifier

use std::time::Duration;

use reqwest::StatusCode;
use thiserror::Error;

use crate::http::retry::RetryPolicy;

/// Main error type for the deployment verifier
#[derive(Error, Debug)]
pub enum VerifyError {
    #[error("HTTP {status}: {message}")]
    Http { status: StatusCode, message: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Request timed out after {}ms", .timeout.as_millis())]
    Timeout { timeout: Duration },

    #[error("{operation} failed after {attempts} attempts: {source}")]
    RetriesExhausted {
        operation: String,
        attempts: u32,
        source: Box<VerifyError>,
    },

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Malformed response: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

/// Coarse error classification callers can branch on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Transport,
    NotFound,
    Malformed,
    Unrecognized,
    Config,
}

impl VerifyError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            VerifyError::Http { status, .. } if *status == StatusCode::NOT_FOUND => {
                ErrorKind::NotFound
            }
            VerifyError::Http { .. } | VerifyError::Network(_) | VerifyError::Timeout { .. } => {
                ErrorKind::Transport
            }
            VerifyError::RetriesExhausted { source, .. } => source.kind(),
            VerifyError::NotFound(_) => ErrorKind::NotFound,
            VerifyError::Malformed(_) => ErrorKind::Malformed,
            VerifyError::Config(_) => ErrorKind::Config,
        }
    }

    /// HTTP status carried by this error, if any
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            VerifyError::Http { status, .. } => Some(*status),
            VerifyError::Network(e) => e.status(),
            VerifyError::RetriesExhausted { source, .. } => source.status(),
            _ => None,
        }
    }

    /// Whether another attempt may succeed under the given policy
    pub fn is_retryable(&self, policy: &RetryPolicy) -> bool {
        match self {
            VerifyError::Config(_) => false,
            VerifyError::Http { status, .. } if status.is_client_error() => {
                policy.retry_client_errors || *status == StatusCode::TOO_MANY_REQUESTS
            }
            _ => true,
        }
    }
}
