//! Settings read from the process environment

use std::time::Duration;

use secrecy::SecretString;
use url::Url;

use crate::app::options::{VerifierOptions, DEFAULT_BASE_URL};
use crate::errors::VerifyError;
use crate::logs::{LogLevel, LogOptions};

/// Token variables, in order of preference
pub const TOKEN_VARS: [&str; 3] = ["DEPLOY_VERIFY_TOKEN", "VERCEL_TOKEN", "VERCEL_ACCESS_TOKEN"];

/// Verifier and logging settings
#[derive(Debug, Clone)]
pub struct Settings {
    pub verifier: VerifierOptions,
    pub logging: LogOptions,
}

impl Settings {
    /// Build settings from the process environment
    pub fn from_env() -> Result<Self, VerifyError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an environment-like lookup
    pub fn from_lookup<L>(lookup: L) -> Result<Self, VerifyError>
    where
        L: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let token = TOKEN_VARS
            .iter()
            .find_map(|key| get(*key))
            .ok_or_else(|| {
                VerifyError::Config(format!(
                    "No access token found; set one of {}",
                    TOKEN_VARS.join(", ")
                ))
            })?;

        let mut verifier = VerifierOptions::new(SecretString::from(token));

        let base_url = get("DEPLOY_VERIFY_API_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        Url::parse(&base_url)
            .map_err(|e| VerifyError::Config(format!("Invalid API URL {}: {}", base_url, e)))?;
        verifier.base_url = base_url;

        verifier.team_id = get("VERCEL_TEAM_ID");
        verifier.project_id = get("VERCEL_PROJECT_ID");

        if let Some(ms) = get("DEPLOY_VERIFY_TIMEOUT_MS") {
            verifier.timeout = Duration::from_millis(parse_number("DEPLOY_VERIFY_TIMEOUT_MS", &ms)?);
        }
        if let Some(retries) = get("DEPLOY_VERIFY_MAX_RETRIES") {
            verifier.retry.max_retries = parse_number("DEPLOY_VERIFY_MAX_RETRIES", &retries)?;
        }
        if let Some(ms) = get("DEPLOY_VERIFY_RETRY_DELAY_MS") {
            verifier.retry.base_delay =
                Duration::from_millis(parse_number("DEPLOY_VERIFY_RETRY_DELAY_MS", &ms)?);
        }

        let mut logging = LogOptions::default();
        if let Some(level) = get("DEPLOY_VERIFY_LOG_LEVEL") {
            logging.log_level = level.parse().map_err(VerifyError::Config)?;
        }
        if get("DEPLOY_VERIFY_DEBUG").is_some_and(|flag| is_truthy(&flag)) {
            logging.log_level = LogLevel::Debug;
        }

        Ok(Self { verifier, logging })
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, VerifyError> {
    value
        .trim()
        .parse()
        .map_err(|_| VerifyError::Config(format!("{} must be a number, got {:?}", key, value)))
}

fn is_truthy(value: &str) -> bool {
    matches!(value.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "on")
}
