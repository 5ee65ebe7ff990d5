//! JSON-RPC 2.0 message types for the MCP stdio transport.
//!
//! One message per line; requests without an `id` are notifications and
//! never receive a response.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Request (or notification) received from the client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    #[serde(default)]
    pub jsonrpc: Option<String>,
    /// Absent for notifications.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    pub method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
}

impl JsonRpcRequest {
    pub fn new(id: impl Into<Value>, method: impl Into<String>, params: Value) -> Self {
        Self {
            jsonrpc: Some(JSONRPC_VERSION.to_string()),
            id: Some(id.into()),
            method: method.into(),
            params: Some(params),
        }
    }

    pub fn notification(method: impl Into<String>) -> Self {
        Self {
            jsonrpc: Some(JSONRPC_VERSION.to_string()),
            id: None,
            method: method.into(),
            params: None,
        }
    }

    pub fn is_notification(&self) -> bool {
        self.id.is_none()
    }

    /// Parse one line of input, producing the error response on failure.
    pub fn parse_line(raw: &str) -> Result<Self, JsonRpcResponse> {
        let data: Value = serde_json::from_str(raw)
            .map_err(|e| JsonRpcResponse::error(Value::Null, RpcError::parse_error(format!("Parse error: {}", e))))?;

        let Some(obj) = data.as_object() else {
            return Err(JsonRpcResponse::error(Value::Null, RpcError::invalid_request("Invalid Request")));
        };
        let id = obj.get("id").cloned().unwrap_or(Value::Null);
        if !obj.contains_key("method") {
            return Err(JsonRpcResponse::error(id, RpcError::invalid_request("Invalid Request")));
        }

        serde_json::from_value(data)
            .map_err(|e| JsonRpcResponse::error(id, RpcError::invalid_request(format!("Invalid Request: {}", e))))
    }
}

pub const JSONRPC_VERSION: &str = "2.0";

/// Response written back to the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    pub id: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<RpcError>,
}

impl JsonRpcResponse {
    pub fn success(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn error(id: Value, error: RpcError) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            result: None,
            error: Some(error),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    /// Single-line JSON encoding
    pub fn to_line(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| {
            format!(
                r#"{{"jsonrpc":"2.0","id":null,"error":{{"code":{},"message":"serialization failed: {}"}}}}"#,
                ErrorCode::INTERNAL_ERROR,
                e.to_string().replace('"', "'")
            )
        })
    }
}

/// Error object of a JSON-RPC response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcError {
    pub code: i32,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl RpcError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            data: None,
        }
    }

    pub fn parse_error(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::PARSE_ERROR, message)
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::INVALID_REQUEST, message)
    }

    pub fn method_not_found(method: &str) -> Self {
        Self::new(ErrorCode::METHOD_NOT_FOUND, format!("Method not found: {}", method))
    }

    pub fn invalid_params(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::INVALID_PARAMS, message)
    }

    pub fn not_initialized() -> Self {
        Self::new(ErrorCode::NOT_INITIALIZED, "Server not initialized")
    }
}

/// Standard and MCP-specific error codes.
pub struct ErrorCode;

impl ErrorCode {
    pub const PARSE_ERROR: i32 = -32700;
    pub const INVALID_REQUEST: i32 = -32600;
    pub const METHOD_NOT_FOUND: i32 = -32601;
    pub const INVALID_PARAMS: i32 = -32602;
    pub const INTERNAL_ERROR: i32 = -32603;
    /// Request arrived before `notifications/initialized`.
    pub const NOT_INITIALIZED: i32 = -32002;
}
