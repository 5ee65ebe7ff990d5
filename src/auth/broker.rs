//! Nango broker client
//!
//! Resolves the current access token of one OAuth connection. This is the
//! only place the broker secret key is used.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, Url};
use serde::Deserialize;

use crate::error::{AirtableError, Result};

pub const ENV_CONNECTION_ID: &str = "NANGO_CONNECTION_ID";
pub const ENV_INTEGRATION_ID: &str = "NANGO_INTEGRATION_ID";
pub const ENV_BASE_URL: &str = "NANGO_BASE_URL";
pub const ENV_SECRET_KEY: &str = "NANGO_SECRET_KEY";

/// Default bound for a single broker round trip
pub const DEFAULT_BROKER_TIMEOUT: Duration = Duration::from_secs(15);

/// Token as returned by the broker, before it is cached
#[derive(Debug, Clone)]
pub struct BrokerToken {
    pub access_token: String,
    pub expires_at: Option<DateTime<Utc>>,
}

/// Source of bearer credentials
#[async_trait]
pub trait CredentialBroker: Send + Sync {
    /// Fetch the connection's access token. `force_refresh` asks the broker
    /// to mint a new one even if it believes the current one is valid.
    async fn fetch(&self, force_refresh: bool) -> Result<BrokerToken>;
}

/// Identity of the broker connection
#[derive(Clone)]
pub struct BrokerConfig {
    pub connection_id: String,
    pub integration_id: String,
    pub base_url: String,
    pub secret_key: String,
}

impl BrokerConfig {
    /// Read the four required variables from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary lookup; every missing or empty name is reported at once
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut missing = Vec::new();
        let mut read = |name: &str| match lookup(name) {
            Some(value) if !value.trim().is_empty() => value,
            _ => {
                missing.push(name.to_string());
                String::new()
            }
        };

        let config = Self {
            connection_id: read(ENV_CONNECTION_ID),
            integration_id: read(ENV_INTEGRATION_ID),
            base_url: read(ENV_BASE_URL),
            secret_key: read(ENV_SECRET_KEY),
        };

        if missing.is_empty() {
            Ok(config)
        } else {
            Err(AirtableError::ConfigMissing(missing))
        }
    }
}

impl std::fmt::Debug for BrokerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BrokerConfig")
            .field("connection_id", &self.connection_id)
            .field("integration_id", &self.integration_id)
            .field("base_url", &self.base_url)
            .field("secret_key", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Deserialize)]
struct ConnectionResponse {
    #[serde(default)]
    credentials: Option<ConnectionCredentials>,
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    expires_at: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ConnectionCredentials {
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    expires_at: Option<String>,
}

/// Broker backed by the Nango connections API
pub struct NangoBroker {
    client: Client,
    endpoint: Url,
    config: BrokerConfig,
}

impl NangoBroker {
    /// Create a broker client with the default timeout
    pub fn new(config: BrokerConfig) -> Result<Self> {
        Self::with_timeout(config, DEFAULT_BROKER_TIMEOUT)
    }

    pub fn with_timeout(config: BrokerConfig, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AirtableError::AuthUnavailable(format!("Failed to create HTTP client: {}", e)))?;

        let mut endpoint = Url::parse(&config.base_url)
            .map_err(|e| AirtableError::AuthUnavailable(format!("Invalid broker base URL: {}", e)))?;
        endpoint
            .path_segments_mut()
            .map_err(|_| AirtableError::AuthUnavailable("Broker base URL cannot carry a path".to_string()))?
            .pop_if_empty()
            .push("connection")
            .push(&config.connection_id);

        Ok(Self {
            client,
            endpoint,
            config,
        })
    }

    fn parse_token(body: ConnectionResponse) -> Result<BrokerToken> {
        let (nested_token, nested_expiry) = match body.credentials {
            Some(c) => (c.access_token, c.expires_at),
            None => (None, None),
        };

        let access_token = nested_token
            .or(body.access_token)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                AirtableError::AuthUnavailable("No access_token found in broker response".to_string())
            })?;

        let expires_at = nested_expiry
            .or(body.expires_at)
            .and_then(|s| DateTime::parse_from_rfc3339(&s).ok())
            .map(|d| d.with_timezone(&Utc));

        Ok(BrokerToken {
            access_token,
            expires_at,
        })
    }
}

#[async_trait]
impl CredentialBroker for NangoBroker {
    async fn fetch(&self, force_refresh: bool) -> Result<BrokerToken> {
        let mut query = vec![("provider_config_key", self.config.integration_id.as_str())];
        if force_refresh {
            query.push(("force_refresh", "true"));
        }

        log::debug!(
            "Requesting credential for connection {} (force_refresh: {})",
            self.config.connection_id,
            force_refresh
        );

        let response = self
            .client
            .get(self.endpoint.clone())
            .bearer_auth(&self.config.secret_key)
            .query(&query)
            .send()
            .await
            .map_err(|e| AirtableError::AuthUnavailable(format!("Broker request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AirtableError::AuthUnavailable(format!(
                "Broker returned HTTP {}: {}",
                status.as_u16(),
                body
            )));
        }

        let body: ConnectionResponse = response
            .json()
            .await
            .map_err(|e| AirtableError::AuthUnavailable(format!("Failed to parse broker response: {}", e)))?;

        Self::parse_token(body)
    }
}

impl std::fmt::Debug for NangoBroker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NangoBroker")
            .field("endpoint", &self.endpoint.as_str())
            .field("integration_id", &self.config.integration_id)
            .finish()
    }
}
