//! Deployment verification module

pub mod classify;
pub mod report;
pub mod resolve;
pub mod verifier;

use tracing::debug;

use crate::app::options::VerifierOptions;
use crate::errors::VerifyError;
use crate::http::deployments::DeploymentStatusClient;
use crate::models::deployment::{DeploymentCheckResult, FilterOptions, Target};
use crate::verify::verifier::DeploymentVerifier;

/// Check a deployment by ID, or the latest one for the target when no ID is given
pub async fn check_deployment(
    options: &VerifierOptions,
    id: Option<&str>,
    target: Option<Target>,
) -> Result<DeploymentCheckResult, VerifyError> {
    let verifier = DeploymentVerifier::new(DeploymentStatusClient::new(options)?);

    match id {
        Some(id) => verifier.verify(id).await,
        None => {
            debug!("No deployment ID given, checking the latest one");
            verifier.verify_latest(&FilterOptions::for_target(target)).await
        }
    }
}
