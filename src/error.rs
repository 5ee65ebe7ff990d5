//! Error types for airtable-mcp
//!
//! Centralized error handling using thiserror. Every per-call variant is
//! converted into a failed [`Envelope`](crate::envelope::Envelope) at the
//! client boundary; only `ConfigMissing` is allowed to stop the process.

use thiserror::Error;

/// All error types that can occur while dispatching an operation
#[derive(Debug, Error)]
pub enum AirtableError {
    /// One or more required environment variables are absent
    #[error("Missing required configuration: {}", .0.join(", "))]
    ConfigMissing(Vec<String>),

    /// The broker could not be reached or refused to hand out a credential
    #[error("Authentication unavailable: {0}")]
    AuthUnavailable(String),

    /// The upstream rejected a freshly refreshed credential
    #[error("Authentication failed: {0}")]
    AuthFailed(String),

    /// A required path or body parameter was not supplied
    #[error("Missing required parameter: {0}")]
    MissingParameter(String),

    /// A parameter was supplied with the wrong shape
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Upstream 4xx other than 401/429, body passed through verbatim
    #[error("Request rejected (HTTP {status}): {message}")]
    RequestRejected { status: u16, message: String },

    /// Upstream 429
    #[error("Rate limited (HTTP {status}): {message}")]
    RateLimited { status: u16, message: String },

    /// Upstream 5xx, timeout or connection failure
    #[error("Upstream unavailable: {message}")]
    UpstreamUnavailable { status: Option<u16>, message: String },

    /// Tool name not present in the catalog
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AirtableError {
    /// HTTP status to report alongside the error, if one applies
    pub fn status_code(&self) -> Option<u16> {
        match self {
            AirtableError::AuthFailed(_) => Some(401),
            AirtableError::RequestRejected { status, .. } => Some(*status),
            AirtableError::RateLimited { status, .. } => Some(*status),
            AirtableError::UpstreamUnavailable { status, .. } => *status,
            _ => None,
        }
    }

    /// Whether the caller may reasonably retry the same call later
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            AirtableError::RateLimited { .. }
                | AirtableError::UpstreamUnavailable { .. }
                | AirtableError::AuthUnavailable(_)
        )
    }
}

/// Result type alias for airtable-mcp operations
pub type Result<T> = std::result::Result<T, AirtableError>;
