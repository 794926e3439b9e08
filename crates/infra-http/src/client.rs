// Shared HTTP client for the proxy bridge REST API

use radium_core::error::{AppError, Result};
use radium_core::port::CollaboratorError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

/// Default per-request timeout when none is configured
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(2);

/// Connection to the proxy bridge. Cheap to clone (reqwest pools internally).
#[derive(Clone)]
pub struct BridgeClient {
    http: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl BridgeClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .pool_max_idle_per_host(16)
            .build()
            .map_err(|e| AppError::Config(format!("Failed to build bridge HTTP client: {}", e)))?;

        // no trailing slash, paths are joined with '/'
        let base_url = base_url.into().trim_end_matches('/').to_string();

        Ok(Self {
            http,
            base_url,
            timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
    ) -> std::result::Result<T, CollaboratorError> {
        let response = self
            .http
            .get(self.url(path))
            .send()
            .await
            .map_err(|e| self.classify(e))?;
        self.decode(response).await
    }

    pub(crate) async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> std::result::Result<T, CollaboratorError> {
        let response = self
            .http
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(|e| self.classify(e))?;
        self.decode(response).await
    }

    /// POST where only the status code matters
    pub(crate) async fn post_unit<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> std::result::Result<(), CollaboratorError> {
        let response = self
            .http
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .map_err(|e| self.classify(e))?;
        let status = response.status();
        if !status.is_success() {
            return Err(CollaboratorError::BadResponse(format!("HTTP {}", status)));
        }
        Ok(())
    }

    async fn decode<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> std::result::Result<T, CollaboratorError> {
        let status = response.status();
        if !status.is_success() {
            return Err(CollaboratorError::BadResponse(format!("HTTP {}", status)));
        }
        response
            .json::<T>()
            .await
            .map_err(|e| CollaboratorError::BadResponse(e.to_string()))
    }

    fn classify(&self, err: reqwest::Error) -> CollaboratorError {
        if err.is_timeout() {
            CollaboratorError::Timeout(self.timeout.as_millis() as u64)
        } else {
            CollaboratorError::Unreachable(err.to_string())
        }
    }
}
