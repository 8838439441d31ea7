//! Deployment API client

use async_trait::async_trait;
use openapi_client::models::{DeploymentEventsResponse, DeploymentListResponse};
use serde::Serialize;
use tracing::debug;

use crate::app::options::VerifierOptions;
use crate::errors::VerifyError;
use crate::http::client::HttpClient;
use crate::http::retry::{with_retry, RetryPolicy};
use crate::models::deployment::{DeploymentEvent, DeploymentRecord, FilterOptions};

/// Upstream deployment operations, as seen by the verifier
#[async_trait]
pub trait DeploymentApi: Send + Sync {
    /// List deployments matching the filters, newest first
    async fn list_deployments(
        &self,
        filters: &FilterOptions,
    ) -> Result<Vec<DeploymentRecord>, VerifyError>;

    /// Fetch one deployment by ID
    async fn get_deployment(&self, id: &str) -> Result<DeploymentRecord, VerifyError>;

    /// Fetch a deployment's build and runtime events
    async fn get_deployment_events(&self, id: &str) -> Result<Vec<DeploymentEvent>, VerifyError>;
}

const NO_QUERY: [(&str, &str); 0] = [];

/// List query: caller filters plus the configured project
#[derive(Serialize)]
struct ListQuery<'a> {
    #[serde(flatten)]
    filters: &'a FilterOptions,
    #[serde(rename = "projectId", skip_serializing_if = "Option::is_none")]
    project_id: Option<&'a str>,
}

/// Deployment status client. Every call is retried independently.
pub struct DeploymentStatusClient {
    http: HttpClient,
    retry: RetryPolicy,
    project_id: Option<String>,
}

impl DeploymentStatusClient {
    pub fn new(options: &VerifierOptions) -> Result<Self, VerifyError> {
        let http = HttpClient::new(
            &options.base_url,
            options.token.clone(),
            options.team_id.clone(),
            options.timeout,
        )?;
        debug!("Deployment status client for {}", http.base_url());

        Ok(Self {
            http,
            retry: options.retry.clone(),
            project_id: options.project_id.clone(),
        })
    }
}

#[async_trait]
impl DeploymentApi for DeploymentStatusClient {
    async fn list_deployments(
        &self,
        filters: &FilterOptions,
    ) -> Result<Vec<DeploymentRecord>, VerifyError> {
        let query = ListQuery {
            filters,
            project_id: self.project_id.as_deref(),
        };
        let response: DeploymentListResponse = with_retry(&self.retry, "listDeployments", || {
            self.http.get(&["v6", "deployments"], &query)
        })
        .await?;
        Ok(response.deployments)
    }

    async fn get_deployment(&self, id: &str) -> Result<DeploymentRecord, VerifyError> {
        let segments = ["v13", "deployments", id];
        with_retry(&self.retry, "getDeployment", || {
            self.http.get(&segments, &NO_QUERY)
        })
        .await
    }

    async fn get_deployment_events(&self, id: &str) -> Result<Vec<DeploymentEvent>, VerifyError> {
        let segments = ["v3", "deployments", id, "events"];
        let response: DeploymentEventsResponse =
            with_retry(&self.retry, "getDeploymentEvents", || {
                self.http.get(&segments, &NO_QUERY)
            })
            .await?;
        Ok(response.into_events())
    }
}
