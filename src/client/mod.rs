//! HTTP Envelope Client - authenticated dispatch of catalog operations
//!
//! Every call resolves its URL before touching the network, attaches the
//! current bearer credential, retries exactly once after a 401 with a
//! refreshed credential, and folds every outcome into an [`Envelope`].

mod response;

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::AUTHORIZATION;
use reqwest::{Client, Response, StatusCode, Url};
use serde_json::Value;

use crate::auth::{Credential, TokenProvider};
use crate::catalog::{OperationDescriptor, OperationRequest};
use crate::envelope::Envelope;
use crate::error::{AirtableError, Result};

pub use response::classify;

/// Airtable Web API base URL
pub const DEFAULT_API_BASE: &str = "https://api.airtable.com/v0";

/// Default bound for one upstream HTTP call
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for the API client
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_base: String,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ClientConfig {
    /// Create a config pointing at a different API base
    pub fn with_api_base(api_base: impl Into<String>) -> Self {
        Self {
            api_base: api_base.into(),
            ..Default::default()
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Airtable API client
pub struct ApiClient {
    http: Client,
    api_base: Url,
    tokens: Arc<TokenProvider>,
}

impl ApiClient {
    pub fn new(config: ClientConfig, tokens: Arc<TokenProvider>) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AirtableError::UpstreamUnavailable {
                status: None,
                message: format!("Failed to create HTTP client: {}", e),
            })?;

        let api_base = Url::parse(&config.api_base)
            .map_err(|e| AirtableError::InvalidArgument(format!("Invalid API base URL {}: {}", config.api_base, e)))?;

        Ok(Self { http, api_base, tokens })
    }

    pub fn tokens(&self) -> &Arc<TokenProvider> {
        &self.tokens
    }

    pub fn api_base(&self) -> &Url {
        &self.api_base
    }

    /// Run one operation and wrap the outcome; never fails
    pub async fn execute(&self, op: &OperationDescriptor, request: &OperationRequest) -> Envelope {
        let result = self.dispatch(op, request).await;
        if let Err(e) = &result {
            if e.is_transient() {
                log::warn!("{} failed (transient): {}", op.name, e);
            } else {
                log::info!("{} failed: {}", op.name, e);
            }
        }
        result.into()
    }

    /// Run one operation, returning the parsed response body
    pub async fn dispatch(&self, op: &OperationDescriptor, request: &OperationRequest) -> Result<Value> {
        let url = op.render_url(&self.api_base, &request.path_params)?;
        if request.body.is_some() && !op.accepts_body() {
            return Err(AirtableError::InvalidArgument(format!(
                "{} does not accept a request body",
                op.name
            )));
        }

        let credential = self.tokens.get_token().await?;
        let response = self.send(op, &url, request, &credential, 1).await?;

        let response = if response.status() == StatusCode::UNAUTHORIZED {
            // Single retry with a credential other than the rejected one
            let fresh = self.tokens.refresh_rejected(&credential).await?;
            let retry = self.send(op, &url, request, &fresh, 2).await?;
            if retry.status() == StatusCode::UNAUTHORIZED {
                let body = retry.text().await.unwrap_or_default();
                return Err(AirtableError::AuthFailed(if body.is_empty() {
                    "upstream rejected the refreshed credential".to_string()
                } else {
                    body
                }));
            }
            retry
        } else {
            response
        };

        let data = classify(response).await?;
        if let Some(cursor) = op.kind.cursor_field()
            && let Some(next) = data.get(cursor)
        {
            log::debug!("{} returned next-page {} {}", op.name, cursor, next);
        }
        Ok(data)
    }

    async fn send(
        &self,
        op: &OperationDescriptor,
        url: &Url,
        request: &OperationRequest,
        credential: &Credential,
        attempt: u8,
    ) -> Result<Response> {
        tracing::debug!(
            operation = op.name,
            method = op.method.as_str(),
            attempt,
            credential = %credential.fingerprint(),
            "Dispatching {}",
            url
        );

        let mut builder = self
            .http
            .request(op.method.to_reqwest(), url.clone())
            .header(AUTHORIZATION, credential.bearer());

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(network_error)?;
        tracing::debug!(operation = op.name, status = response.status().as_u16(), attempt, "Response received");
        Ok(response)
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("api_base", &self.api_base.as_str())
            .finish()
    }
}

pub(crate) fn network_error(e: reqwest::Error) -> AirtableError {
    let message = if e.is_timeout() {
        format!("Request timed out: {}", e)
    } else {
        format!("Request failed: {}", e)
    };
    AirtableError::UpstreamUnavailable { status: None, message }
}
