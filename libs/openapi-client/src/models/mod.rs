//! API models

use std::collections::BTreeMap;

use chrono::serde::{ts_milliseconds, ts_milliseconds_option};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A deployment as reported by the platform.
///
/// The list and single-deployment endpoints spell some keys differently
/// (`uid`/`id`, `state`/`readyState`, `lambdas`/`functions`) and may send
/// both spellings at once, so decoding goes through [`RawDeploymentRecord`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawDeploymentRecord")]
pub struct DeploymentRecord {
    /// Unique deployment ID
    pub id: String,

    /// Project name
    pub name: Option<String>,

    /// Generated deployment hostname, without scheme
    pub url: Option<String>,

    /// Target environment: 'production', 'preview' or absent
    pub target: Option<String>,

    /// Lifecycle state in the platform's vocabulary (READY, BUILDING, ...)
    pub state: String,

    /// Creation time
    #[serde(with = "ts_milliseconds")]
    pub created_at: DateTime<Utc>,

    /// Time the deployment became ready
    #[serde(with = "ts_milliseconds_option")]
    pub ready: Option<DateTime<Utc>>,

    /// Time the build started
    #[serde(with = "ts_milliseconds_option")]
    pub building_at: Option<DateTime<Utc>>,

    /// Who triggered the deployment
    pub creator: Option<Creator>,

    /// Source control reference
    pub git_source: Option<GitSource>,

    /// Serverless functions built for this deployment
    pub functions: Option<Vec<FunctionDescriptor>>,

    /// Free-form metadata attached by integrations
    pub meta: Option<BTreeMap<String, String>>,

    /// Aliases attached to the deployment
    pub alias: Option<Vec<String>>,

    /// Either a boolean or the epoch milliseconds the alias was assigned
    pub alias_assigned: Option<serde_json::Value>,

    /// Dashboard URL for this deployment
    pub inspector_url: Option<String>,
}

/// Deployment as it comes off the wire, every spelling kept apart
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawDeploymentRecord {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    uid: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    target: Option<String>,
    #[serde(default)]
    state: Option<String>,
    #[serde(default)]
    ready_state: Option<String>,
    /// Epoch milliseconds; out-of-range values are rejected
    #[serde(with = "ts_milliseconds")]
    created_at: DateTime<Utc>,
    #[serde(default, with = "ts_milliseconds_option")]
    ready: Option<DateTime<Utc>>,
    #[serde(default, with = "ts_milliseconds_option")]
    building_at: Option<DateTime<Utc>>,
    #[serde(default)]
    creator: Option<Creator>,
    #[serde(default)]
    git_source: Option<GitSource>,
    #[serde(default)]
    functions: Option<Vec<FunctionDescriptor>>,
    #[serde(default)]
    lambdas: Option<Vec<FunctionDescriptor>>,
    #[serde(default)]
    meta: Option<BTreeMap<String, String>>,
    #[serde(default)]
    alias: Option<Vec<String>>,
    #[serde(default)]
    alias_assigned: Option<serde_json::Value>,
    #[serde(default)]
    inspector_url: Option<String>,
}

impl TryFrom<RawDeploymentRecord> for DeploymentRecord {
    type Error = String;

    fn try_from(raw: RawDeploymentRecord) -> Result<Self, Self::Error> {
        let id = raw
            .id
            .or(raw.uid)
            .ok_or_else(|| "deployment has neither `id` nor `uid`".to_string())?;
        let state = raw
            .ready_state
            .or(raw.state)
            .ok_or_else(|| format!("deployment {} has neither `readyState` nor `state`", id))?;

        Ok(Self {
            id,
            name: raw.name,
            url: raw.url,
            target: raw.target,
            state,
            created_at: raw.created_at,
            ready: raw.ready,
            building_at: raw.building_at,
            creator: raw.creator,
            git_source: raw.git_source,
            functions: raw.functions.or(raw.lambdas),
            meta: raw.meta,
            alias: raw.alias,
            alias_assigned: raw.alias_assigned,
            inspector_url: raw.inspector_url,
        })
    }
}

impl DeploymentRecord {
    /// Whether the platform reports an assigned alias
    pub fn has_assigned_alias(&self) -> bool {
        match &self.alias_assigned {
            Some(serde_json::Value::Bool(assigned)) => *assigned,
            Some(serde_json::Value::Number(_)) => true,
            _ => false,
        }
    }

    /// Branch name, from the git source or integration metadata
    pub fn branch(&self) -> Option<String> {
        self.git_source
            .as_ref()
            .and_then(|git| git.git_ref.clone())
            .or_else(|| {
                self.meta_value(&["githubCommitRef", "gitlabCommitRef", "bitbucketCommitRef"])
            })
    }

    /// Commit SHA, from the git source or integration metadata
    pub fn commit(&self) -> Option<String> {
        self.git_source
            .as_ref()
            .and_then(|git| git.sha.clone())
            .or_else(|| {
                self.meta_value(&["githubCommitSha", "gitlabCommitSha", "bitbucketCommitSha"])
            })
    }

    fn meta_value(&self, keys: &[&str]) -> Option<String> {
        let meta = self.meta.as_ref()?;
        keys.iter().find_map(|key| meta.get(*key).cloned())
    }
}

/// Deployment creator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Creator {
    pub uid: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// Source control reference
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GitSource {
    #[serde(default, rename = "ref")]
    pub git_ref: Option<String>,
    #[serde(default)]
    pub sha: Option<String>,
    #[serde(default, rename = "type")]
    pub provider: Option<String>,
}

/// A function (serverless unit) descriptor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionDescriptor {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub entrypoint: Option<String>,
    #[serde(default)]
    pub ready_state: Option<String>,
    #[serde(default)]
    pub runtime: Option<String>,
    /// Memory in MB
    #[serde(default)]
    pub memory: Option<u32>,
    /// Maximum duration in seconds
    #[serde(default)]
    pub max_duration: Option<u32>,
    #[serde(default)]
    pub regions: Option<Vec<String>>,
}

/// One build or runtime log line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeploymentEvent {
    /// Event type tag: 'stdout', 'stderr', 'command', 'error', 'warning', ...
    #[serde(rename = "type")]
    pub kind: String,

    /// Event time, epoch milliseconds
    #[serde(default)]
    pub created: i64,

    /// Log text
    #[serde(default)]
    pub text: Option<String>,

    /// Structured payload
    #[serde(default)]
    pub payload: Option<serde_json::Value>,
}

impl DeploymentEvent {
    /// Event text, falling back to the payload's `text` field
    pub fn message(&self) -> Option<&str> {
        self.text.as_deref().or_else(|| {
            self.payload
                .as_ref()
                .and_then(|payload| payload.get("text"))
                .and_then(|text| text.as_str())
        })
    }
}

/// List of deployments response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeploymentListResponse {
    pub deployments: Vec<DeploymentRecord>,
}

/// Deployment events response, wrapped or bare
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DeploymentEventsResponse {
    Wrapped { events: Vec<DeploymentEvent> },
    Bare(Vec<DeploymentEvent>),
}

impl DeploymentEventsResponse {
    pub fn into_events(self) -> Vec<DeploymentEvent> {
        match self {
            DeploymentEventsResponse::Wrapped { events } => events,
            DeploymentEventsResponse::Bare(events) => events,
        }
    }
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<ErrorDetail>,
}

impl ErrorResponse {
    /// Message from the top level or the nested error object
    pub fn into_message(self) -> Option<String> {
        self.message
            .or_else(|| self.error.and_then(|detail| detail.message))
    }
}

/// Nested error object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}
