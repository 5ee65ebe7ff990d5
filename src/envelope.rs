//! Result envelope returned by every operation
//!
//! Serialized as `{success, data, message?}` on success and
//! `{success, error, status_code?}` on failure.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::AirtableError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
}

impl Envelope {
    pub fn success(data: Value) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            error: None,
            status_code: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn failure(error: &AirtableError) -> Self {
        Self {
            success: false,
            data: None,
            message: None,
            error: Some(error.to_string()),
            status_code: error.status_code(),
        }
    }

    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or_else(|e| {
            serde_json::json!({ "success": false, "error": format!("Failed to serialize envelope: {}", e) })
        })
    }
}

impl From<crate::error::Result<Value>> for Envelope {
    fn from(result: crate::error::Result<Value>) -> Self {
        match result {
            Ok(data) => Envelope::success(data),
            Err(e) => Envelope::failure(&e),
        }
    }
}
