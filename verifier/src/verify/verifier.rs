//! Deployment verification

use tracing::{debug, info};

use crate::errors::VerifyError;
use crate::http::deployments::DeploymentApi;
use crate::models::deployment::{
    ClassifiedLogs, DeploymentCheckResult, DeploymentRecord, FilterOptions, FunctionSummary,
    Outcome, PRODUCTION_TARGET,
};
use crate::verify::classify::classify;
use crate::verify::resolve::resolve;

/// Verifies deployments against the platform API
pub struct DeploymentVerifier<A: DeploymentApi> {
    api: A,
}

impl<A: DeploymentApi> DeploymentVerifier<A> {
    pub fn new(api: A) -> Self {
        Self { api }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Verify one deployment by ID.
    ///
    /// The record and its events are fetched concurrently; the first
    /// failure is returned as-is.
    pub async fn verify(&self, id: &str) -> Result<DeploymentCheckResult, VerifyError> {
        debug!("Verifying deployment {}", id);

        let (record, events) = tokio::try_join!(
            self.api.get_deployment(id),
            self.api.get_deployment_events(id)
        )?;

        let logs = classify(&events);
        let status = resolve(&record.state, logs.errors.len());
        let result = build_result(record, logs, status);

        info!(
            "Deployment {} is {} (errors: {}, warnings: {})",
            result.deployment_id,
            result.status,
            if result.errors.is_empty() { "none" } else { "present" },
            if result.warnings.is_empty() { "none" } else { "present" },
        );

        Ok(result)
    }

    /// Verify the most recent deployment matching the filters
    pub async fn verify_latest(
        &self,
        filters: &FilterOptions,
    ) -> Result<DeploymentCheckResult, VerifyError> {
        let filters = FilterOptions {
            limit: Some(1),
            ..filters.clone()
        };

        let deployments = self.api.list_deployments(&filters).await?;
        let latest = deployments
            .into_iter()
            .next()
            .ok_or_else(|| VerifyError::NotFound("No deployments found".to_string()))?;

        debug!("Latest deployment is {}", latest.id);
        self.verify(&latest.id).await
    }
}

fn build_result(
    record: DeploymentRecord,
    logs: ClassifiedLogs,
    status: Outcome,
) -> DeploymentCheckResult {
    let duration_ms = match (record.building_at, record.ready) {
        (Some(start), Some(end)) => Some((end - start).num_milliseconds()),
        _ => None,
    };

    let alias_url = if record.has_assigned_alias() {
        record
            .alias
            .as_ref()
            .and_then(|aliases| aliases.first())
            .or(record.url.as_ref())
            .map(|host| https_url(host))
    } else {
        None
    };

    let creator = record
        .creator
        .as_ref()
        .map(|creator| {
            creator
                .username
                .clone()
                .or_else(|| creator.email.clone())
                .unwrap_or_else(|| creator.uid.clone())
        })
        .unwrap_or_else(|| "unknown".to_string());

    let functions = record
        .functions
        .as_ref()
        .map(|functions| functions.iter().map(FunctionSummary::from).collect());

    DeploymentCheckResult {
        status,
        branch: record.branch(),
        commit: record.commit(),
        is_production: record.target.as_deref() == Some(PRODUCTION_TARGET),
        state: record.state,
        deployment_id: record.id,
        name: record.name,
        url: record.url.as_deref().map(https_url),
        created_at: record.created_at,
        completed_at: record.ready,
        duration_ms,
        creator,
        errors: logs.errors,
        warnings: logs.warnings,
        functions,
        target: record.target,
        alias_url,
        inspector_url: record.inspector_url,
        environment: record.meta,
    }
}

fn https_url(host: &str) -> String {
    if host.starts_with("http://") || host.starts_with("https://") {
        host.to_string()
    } else {
        format!("https://{}", host)
    }
}
