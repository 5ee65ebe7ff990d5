//! Response classification
//!
//! Maps an upstream HTTP response onto either parsed data or one error of
//! the taxonomy. Error bodies are passed through untouched.

use reqwest::header::RETRY_AFTER;
use reqwest::{Response, StatusCode};
use serde_json::{Value, json};

use crate::error::{AirtableError, Result};

use super::network_error;

/// Turn a response into data or an error. 401 handling (refresh and retry)
/// happens before this point; a 401 reaching here is final.
pub async fn classify(response: Response) -> Result<Value> {
    let status = response.status();
    let retry_after = response
        .headers()
        .get(RETRY_AFTER)
        .and_then(|h| h.to_str().ok())
        .map(str::to_string);

    let text = response.text().await.map_err(network_error)?;
    classify_parts(status, retry_after.as_deref(), text)
}

pub(crate) fn classify_parts(status: StatusCode, retry_after: Option<&str>, text: String) -> Result<Value> {
    if status.is_success() {
        return Ok(parse_success_body(text));
    }

    let code = status.as_u16();
    let message = if text.trim().is_empty() {
        status.canonical_reason().unwrap_or("no response body").to_string()
    } else {
        text
    };

    match status {
        StatusCode::UNAUTHORIZED => Err(AirtableError::AuthFailed(message)),
        StatusCode::TOO_MANY_REQUESTS => {
            tracing::warn!(
                status = code,
                retry_after = retry_after.unwrap_or("unspecified"),
                "Rate limited by upstream"
            );
            Err(AirtableError::RateLimited { status: code, message })
        }
        s if s.is_client_error() => Err(AirtableError::RequestRejected { status: code, message }),
        _ => Err(AirtableError::UpstreamUnavailable {
            status: Some(code),
            message,
        }),
    }
}

/// Empty bodies become `{}`; non-JSON bodies are wrapped as `raw_response`
fn parse_success_body(text: String) -> Value {
    if text.trim().is_empty() {
        return json!({});
    }
    match serde_json::from_str(&text) {
        Ok(value) => value,
        Err(_) => json!({ "raw_response": text }),
    }
}
