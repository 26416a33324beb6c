// crates/dapr-testcontainers/src/client.rs
// ============================================================================
// Module: Dapr HTTP Client
// Description: Minimal Dapr HTTP API client for integration tests.
// Purpose: Probe sidecar readiness and publish pub/sub events.
// Dependencies: reqwest, serde_json, tokio
// ============================================================================

//! ## Overview
//! [`DaprHttpClient`] covers the slice of the Dapr HTTP API the test suites
//! need: the health endpoint for readiness gating, topic publishing, and the
//! metadata endpoint for asserting registered components. Readiness polls
//! until a deadline instead of sleeping a fixed interval.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;
use std::time::Instant;

use serde_json::Value;
use thiserror::Error;
use tokio::time::sleep;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Per-request timeout applied to every API call.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
/// Delay between readiness poll attempts.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

// ============================================================================
// SECTION: Client Errors
// ============================================================================

/// Errors emitted by the Dapr HTTP client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The underlying HTTP request failed.
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// The sidecar answered with a non-success status.
    #[error("dapr returned {status} for {context}: {body}")]
    Status {
        /// HTTP status code returned by the sidecar.
        status: u16,
        /// Request being performed.
        context: String,
        /// Response body, when readable.
        body: String,
    },
    /// The sidecar did not become healthy before the deadline.
    #[error("sidecar readiness timeout after {attempts} attempts: {last_error}")]
    ReadinessTimeout {
        /// Number of poll attempts performed.
        attempts: u32,
        /// Error observed on the final attempt.
        last_error: String,
    },
}

// ============================================================================
// SECTION: HTTP Client
// ============================================================================

/// Minimal client for the Dapr HTTP API of one sidecar.
#[derive(Debug, Clone)]
pub struct DaprHttpClient {
    /// Base URL of the sidecar, without a trailing slash.
    base_url: String,
    /// Shared reqwest client.
    client: reqwest::Client,
}

impl DaprHttpClient {
    /// Creates a client for the sidecar at `host:port`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Http`] when the HTTP client cannot be built.
    pub fn new(host: &str, port: u16) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            base_url: format!("http://{host}:{port}"),
            client,
        })
    }

    /// Returns the sidecar base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Polls the health endpoint until it succeeds or the timeout expires.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::ReadinessTimeout`] carrying the attempt count
    /// and the last observed error.
    pub async fn wait_healthy(&self, timeout: Duration) -> Result<(), ClientError> {
        let url = format!("{}/v1.0/healthz", self.base_url);
        let start = Instant::now();
        let mut attempts = 0u32;
        loop {
            attempts = attempts.saturating_add(1);
            let outcome = match self.client.get(&url).send().await {
                Ok(response) if response.status().is_success() => return Ok(()),
                Ok(response) => format!("health returned {}", response.status()),
                Err(err) => err.to_string(),
            };
            if start.elapsed() > timeout {
                return Err(ClientError::ReadinessTimeout {
                    attempts,
                    last_error: outcome,
                });
            }
            sleep(POLL_INTERVAL).await;
        }
    }

    /// Publishes a JSON event to a pub/sub topic.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Status`] for non-success responses.
    pub async fn publish(
        &self,
        pubsub_name: &str,
        topic: &str,
        payload: &Value,
    ) -> Result<(), ClientError> {
        let context = format!("publish to {pubsub_name}/{topic}");
        let url = format!("{}/v1.0/publish/{pubsub_name}/{topic}", self.base_url);
        let response = self.client.post(&url).json(payload).send().await?;
        Self::check_status(response, context).await?;
        Ok(())
    }

    /// Fetches the sidecar metadata document.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Status`] for non-success responses and
    /// [`ClientError::Http`] when the body is not valid JSON.
    pub async fn metadata(&self) -> Result<Value, ClientError> {
        let url = format!("{}/v1.0/metadata", self.base_url);
        let response = self.client.get(&url).send().await?;
        let response = Self::check_status(response, "metadata".to_string()).await?;
        Ok(response.json().await?)
    }

    /// Maps non-success responses to [`ClientError::Status`].
    async fn check_status(
        response: reqwest::Response,
        context: String,
    ) -> Result<reqwest::Response, ClientError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(ClientError::Status {
            status: status.as_u16(),
            context,
            body,
        })
    }
}
