//! Deployment models

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use openapi_client::models::{DeploymentEvent, DeploymentRecord, FunctionDescriptor};

/// Target environment sentinel used by the platform for production
pub const PRODUCTION_TARGET: &str = "production";

/// Deployment target environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Target {
    Production,
    Preview,
}

impl Target {
    pub fn as_str(&self) -> &'static str {
        match self {
            Target::Production => PRODUCTION_TARGET,
            Target::Preview => "preview",
        }
    }
}

impl std::str::FromStr for Target {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "production" | "prod" => Ok(Target::Production),
            "preview" => Ok(Target::Preview),
            _ => Err(format!("Invalid target: {}", s)),
        }
    }
}

/// Query constraints for listing deployments.
///
/// Unset fields are left out of the query string.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FilterOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,

    /// Lower bound on creation time, epoch milliseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub since: Option<i64>,

    /// Upper bound on creation time, epoch milliseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub until: Option<i64>,

    /// Lifecycle state, e.g. READY
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<Target>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub production: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment: Option<String>,
}

impl FilterOptions {
    /// Restrict the listing to a target environment
    pub fn for_target(target: Option<Target>) -> Self {
        Self {
            target,
            ..Default::default()
        }
    }
}

/// Verification outcome
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Outcome {
    Success,
    Failed,
    Building,
    Queued,
    Error,
}

impl Outcome {
    /// Process exit code for this outcome: 0 success, 2 retry later, 1 otherwise
    pub fn exit_code(&self) -> i32 {
        match self {
            Outcome::Success => 0,
            Outcome::Building | Outcome::Queued => 2,
            Outcome::Failed | Outcome::Error => 1,
        }
    }

    /// Whether the deployment has stopped changing
    pub fn is_terminal(&self) -> bool {
        matches!(self, Outcome::Success | Outcome::Failed | Outcome::Error)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Success => write!(f, "SUCCESS"),
            Outcome::Failed => write!(f, "FAILED"),
            Outcome::Building => write!(f, "BUILDING"),
            Outcome::Queued => write!(f, "QUEUED"),
            Outcome::Error => write!(f, "ERROR"),
        }
    }
}

/// Event text partitioned by severity, in input order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ClassifiedLogs {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

/// Summary of one function built by the deployment
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionSummary {
    pub name: String,
    pub state: Option<String>,
    pub runtime: Option<String>,
    pub memory: Option<u32>,
    pub max_duration: Option<u32>,
    pub regions: Vec<String>,
}

impl From<&FunctionDescriptor> for FunctionSummary {
    fn from(descriptor: &FunctionDescriptor) -> Self {
        Self {
            name: descriptor
                .entrypoint
                .clone()
                .or_else(|| descriptor.id.clone())
                .unwrap_or_else(|| "unnamed".to_string()),
            state: descriptor.ready_state.clone(),
            runtime: descriptor.runtime.clone(),
            memory: descriptor.memory,
            max_duration: descriptor.max_duration,
            regions: descriptor.regions.clone().unwrap_or_default(),
        }
    }
}

/// Result of verifying one deployment
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentCheckResult {
    pub status: Outcome,

    /// Lifecycle state as reported by the platform
    pub state: String,

    pub deployment_id: String,
    pub name: Option<String>,
    pub url: Option<String>,

    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
    pub duration_ms: Option<i64>,

    pub creator: String,
    pub branch: Option<String>,
    pub commit: Option<String>,

    pub errors: Vec<String>,
    pub warnings: Vec<String>,

    pub functions: Option<Vec<FunctionSummary>>,

    pub target: Option<String>,
    pub is_production: bool,
    pub alias_url: Option<String>,
    pub inspector_url: Option<String>,
    pub environment: Option<BTreeMap<String, String>>,
}
