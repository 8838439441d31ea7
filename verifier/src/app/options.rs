//! Verifier configuration options

use std::time::Duration;

use secrecy::SecretString;

use crate::http::retry::RetryPolicy;

/// Default platform API base URL
pub const DEFAULT_BASE_URL: &str = "https://api.vercel.com";

/// Options for the deployment verifier
#[derive(Debug, Clone)]
pub struct VerifierOptions {
    /// Platform API base URL
    pub base_url: String,

    /// Bearer token for the platform API
    pub token: SecretString,

    /// Team scope, sent as `teamId` on every request
    pub team_id: Option<String>,

    /// Project scope, sent as `projectId` when listing deployments
    pub project_id: Option<String>,

    /// Timeout for a single HTTP attempt
    pub timeout: Duration,

    /// Retry policy applied to every upstream call
    pub retry: RetryPolicy,
}

impl VerifierOptions {
    /// Options with defaults for everything but the token
    pub fn new(token: SecretString) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            token,
            team_id: None,
            project_id: None,
            timeout: Duration::from_secs(30),
            retry: RetryPolicy::default(),
        }
    }
}
