//! HTTP client implementation

use std::time::Duration;

use openapi_client::models::ErrorResponse;
use reqwest::{header, Client, RequestBuilder};
use secrecy::{ExposeSecret, SecretString};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, error};
use url::Url;

use crate::errors::VerifyError;

/// HTTP client for the deployment platform API
pub struct HttpClient {
    client: Client,
    base_url: Url,
    token: SecretString,
    team_id: Option<String>,
    timeout: Duration,
}

impl HttpClient {
    /// Create a new HTTP client
    pub fn new(
        base_url: &str,
        token: SecretString,
        team_id: Option<String>,
        timeout: Duration,
    ) -> Result<Self, VerifyError> {
        let client = Client::builder().build()?;
        let base_url = Url::parse(base_url)
            .map_err(|e| VerifyError::Config(format!("Invalid API URL {}: {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(VerifyError::Config(format!("API URL {} cannot carry a path", base_url)));
        }

        Ok(Self {
            client,
            base_url,
            token,
            team_id,
            timeout,
        })
    }

    /// Get the base URL
    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// Append path segments to the base URL. Each segment is percent-encoded
    /// on its own, so `/`, `?` and `#` inside an ID stay in that segment.
    pub fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Make a single GET request and decode the JSON body.
    ///
    /// The whole exchange, body included, runs under the client's timeout.
    /// Dropping the in-flight future on expiry cancels the request.
    pub async fn get<T, Q>(&self, segments: &[&str], query: &Q) -> Result<T, VerifyError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let url = self.endpoint(segments);
        debug!("GET {}", url);

        let mut request = self
            .client
            .get(url.clone())
            .header(
                header::AUTHORIZATION,
                format!("Bearer {}", self.token.expose_secret()),
            )
            .header(header::ACCEPT, "application/json")
            .header(header::CONTENT_TYPE, "application/json")
            .query(query);

        if let Some(team_id) = &self.team_id {
            request = request.query(&[("teamId", team_id)]);
        }

        match tokio::time::timeout(self.timeout, Self::exchange(request)).await {
            Ok(result) => result,
            Err(_) => {
                error!("HTTP GET {} timed out after {:?}", url, self.timeout);
                Err(VerifyError::Timeout {
                    timeout: self.timeout,
                })
            }
        }
    }

    async fn exchange<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, VerifyError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            let message = serde_json::from_slice::<ErrorResponse>(&body)
                .ok()
                .and_then(ErrorResponse::into_message)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("Unknown").to_string());
            error!("HTTP GET failed: {} - {}", status, message);
            return Err(VerifyError::Http { status, message });
        }

        Ok(serde_json::from_slice(&body)?)
    }
}
