//! HTTP transport
//!
//! The only suspending part of the client. Decoding never touches the
//! network, so tests swap in a mock transport and feed canned bodies.

use std::time::Duration;

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use reqwest::{Client, RequestBuilder, StatusCode, header::CONTENT_TYPE};
use tracing::{debug, instrument};

use crate::{config::AmapConfig, error::AmapError};

/// Sends requests and returns the response body text
///
/// Implementations turn non-success HTTP statuses into errors.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    /// GET `url` with query parameters
    async fn get(&self, url: &str, params: &[(String, String)]) -> Result<String, AmapError>;

    /// POST a JSON body to `url`
    async fn post(&self, url: &str, body: String) -> Result<String, AmapError>;
}

/// [`Transport`] backed by `reqwest`
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
    timeout_secs: u64,
}

impl ReqwestTransport {
    /// Create a transport from client configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(config: &AmapConfig) -> Result<Self, AmapError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| AmapError::ConnectionFailed(e.to_string()))?;

        Ok(Self {
            client,
            timeout_secs: config.timeout_secs,
        })
    }

    async fn send(&self, request: RequestBuilder) -> Result<String, AmapError> {
        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                AmapError::Timeout {
                    timeout_secs: self.timeout_secs,
                }
            } else {
                AmapError::ConnectionFailed(e.to_string())
            }
        })?;

        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(AmapError::RateLimitExceeded {
                retry_after_secs: response
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse().ok()),
            });
        }

        if !status.is_success() {
            return Err(AmapError::RequestFailed(format!("HTTP {status}")));
        }

        let body = response
            .text()
            .await
            .map_err(|e| AmapError::RequestFailed(e.to_string()))?;
        debug!(bytes = body.len(), "Received response");
        Ok(body)
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    #[instrument(skip(self, params))]
    async fn get(&self, url: &str, params: &[(String, String)]) -> Result<String, AmapError> {
        self.send(self.client.get(url).query(params)).await
    }

    #[instrument(skip(self, body))]
    async fn post(&self, url: &str, body: String) -> Result<String, AmapError> {
        self.send(
            self.client
                .post(url)
                .header(CONTENT_TYPE, "application/json")
                .body(body),
        )
        .await
    }
}
