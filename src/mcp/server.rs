//! MCP request handling
//!
//! Maps protocol methods onto the tool router. Tool failures are reported
//! inside the result (`isError`), never as JSON-RPC errors.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use serde_json::{Value, json};

use crate::envelope::Envelope;
use crate::tools::ToolRouter;

use super::messages::{JsonRpcRequest, JsonRpcResponse, RpcError};

pub const MCP_VERSION: &str = "2024-11-05";
pub const SERVER_NAME: &str = "airtable-mcp";
pub const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Protocol state shared by all in-flight requests
pub struct McpServer {
    router: Arc<dyn ToolRouter>,
    initialized: AtomicBool,
}

impl McpServer {
    pub fn new(router: Arc<dyn ToolRouter>) -> Self {
        Self {
            router,
            initialized: AtomicBool::new(false),
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::SeqCst)
    }

    /// Handle one request; `None` for notifications
    pub async fn handle(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        let method = request.method.as_str();

        if method == "notifications/initialized" {
            self.initialized.store(true, Ordering::SeqCst);
            log::info!("Client initialized");
            return None;
        }

        if request.is_notification() {
            log::debug!("Ignoring notification {}", method);
            return None;
        }
        let id = request.id.clone().unwrap_or(Value::Null);

        let response = match method {
            "initialize" => JsonRpcResponse::success(id, initialize_result(request.params.as_ref())),
            "ping" => JsonRpcResponse::success(id, json!({})),
            _ if !self.is_initialized() => JsonRpcResponse::error(id, RpcError::not_initialized()),
            "tools/list" => {
                let tools = serde_json::to_value(self.router.definitions()).unwrap_or_else(|_| json!([]));
                JsonRpcResponse::success(id, json!({ "tools": tools }))
            }
            "tools/call" => self.call_tool(id, request.params).await,
            other => JsonRpcResponse::error(id, RpcError::method_not_found(other)),
        };
        Some(response)
    }

    async fn call_tool(&self, id: Value, params: Option<Value>) -> JsonRpcResponse {
        let Some(Value::Object(mut params)) = params else {
            return JsonRpcResponse::error(id, RpcError::invalid_params("params must be an object"));
        };
        let Some(name) = params.get("name").and_then(Value::as_str).map(str::to_string) else {
            return JsonRpcResponse::error(id, RpcError::invalid_params("params.name must be a string"));
        };
        let arguments = params.remove("arguments").unwrap_or_else(|| json!({}));

        let envelope = self.router.call(&name, arguments).await;
        JsonRpcResponse::success(id, tool_result(&envelope))
    }
}

fn initialize_result(params: Option<&Value>) -> Value {
    let protocol_version = params
        .and_then(|p| p.get("protocolVersion"))
        .and_then(Value::as_str)
        .unwrap_or(MCP_VERSION);

    json!({
        "protocolVersion": protocol_version,
        "serverInfo": { "name": SERVER_NAME, "version": SERVER_VERSION },
        "capabilities": { "tools": {} }
    })
}

/// Wrap an envelope as an MCP tool result
pub fn tool_result(envelope: &Envelope) -> Value {
    let structured = envelope.to_json();
    let text = serde_json::to_string_pretty(&structured).unwrap_or_else(|_| "{}".to_string());
    json!({
        "content": [{ "type": "text", "text": text }],
        "structuredContent": structured,
        "isError": !envelope.success
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AirtableError;
    use crate::tools::MockToolRouter;

    fn server() -> McpServer {
        let router = MockToolRouter::new()
            .with_tool("list_bases")
            .with_response("list_bases", Envelope::success(json!({ "bases": [] })));
        McpServer::new(Arc::new(router))
    }

    async fn initialized() -> McpServer {
        let server = server();
        server
            .handle(JsonRpcRequest::notification("notifications/initialized"))
            .await;
        server
    }

    #[tokio::test]
    async fn test_initialize_echoes_protocol_version() {
        let server = server();
        let response = server
            .handle(JsonRpcRequest::new(1, "initialize", json!({ "protocolVersion": "2025-03-26" })))
            .await
            .unwrap();
        let result = response.result.unwrap();
        assert_eq!(result["protocolVersion"], "2025-03-26");
        assert_eq!(result["serverInfo"]["name"], SERVER_NAME);
        assert!(result["capabilities"]["tools"].is_object());
    }

    #[tokio::test]
    async fn test_initialize_default_version() {
        let response = server()
            .handle(JsonRpcRequest::new(1, "initialize", json!({})))
            .await
            .unwrap();
        assert_eq!(response.result.unwrap()["protocolVersion"], MCP_VERSION);
    }

    #[tokio::test]
    async fn test_requires_initialized() {
        let server = server();
        let response = server
            .handle(JsonRpcRequest::new(2, "tools/list", json!({})))
            .await
            .unwrap();
        assert_eq!(response.error.unwrap().code, -32002);
    }

    #[tokio::test]
    async fn test_initialized_notification_has_no_response() {
        let server = server();
        let response = server
            .handle(JsonRpcRequest::notification("notifications/initialized"))
            .await;
        assert!(response.is_none());
        assert!(server.is_initialized());
    }

    #[tokio::test]
    async fn test_other_notifications_have_no_response() {
        let server = initialized().await;
        let mut call = JsonRpcRequest::new(0, "tools/call", json!({ "name": "list_bases" }));
        call.id = None;
        assert!(server.handle(call).await.is_none());
        assert!(server.handle(JsonRpcRequest::notification("ping")).await.is_none());
    }

    #[tokio::test]
    async fn test_ping() {
        let response = server().handle(JsonRpcRequest::new(3, "ping", json!({}))).await.unwrap();
        assert_eq!(response.result, Some(json!({})));
    }

    #[tokio::test]
    async fn test_tools_list() {
        let server = initialized().await;
        let response = server
            .handle(JsonRpcRequest::new(4, "tools/list", json!({})))
            .await
            .unwrap();
        let tools = &response.result.unwrap()["tools"];
        assert_eq!(tools[0]["name"], "list_bases");
        assert!(tools[0]["inputSchema"].is_object());
    }

    #[tokio::test]
    async fn test_tools_call_success() {
        let server = initialized().await;
        let response = server
            .handle(JsonRpcRequest::new(
                5,
                "tools/call",
                json!({ "name": "list_bases", "arguments": {} }),
            ))
            .await
            .unwrap();
        let result = response.result.unwrap();
        assert_eq!(result["isError"], false);
        assert_eq!(result["structuredContent"]["data"]["bases"], json!([]));
        let text = result["content"][0]["text"].as_str().unwrap();
        let envelope: Envelope = serde_json::from_str(text).unwrap();
        assert!(envelope.success);
    }

    #[tokio::test]
    async fn test_tools_call_failure_is_result_not_error() {
        let server = initialized().await;
        let response = server
            .handle(JsonRpcRequest::new(6, "tools/call", json!({ "name": "missing_tool" })))
            .await
            .unwrap();
        assert!(response.is_success());
        let result = response.result.unwrap();
        assert_eq!(result["isError"], true);
        assert_eq!(result["structuredContent"]["error"], "Unknown tool: missing_tool");
    }

    #[tokio::test]
    async fn test_tools_call_invalid_params() {
        let server = initialized().await;
        let response = server
            .handle(JsonRpcRequest::new(7, "tools/call", json!({ "arguments": {} })))
            .await
            .unwrap();
        assert_eq!(response.error.unwrap().code, -32602);
    }

    #[tokio::test]
    async fn test_unknown_method() {
        let server = initialized().await;
        let response = server
            .handle(JsonRpcRequest::new(8, "resources/list", json!({})))
            .await
            .unwrap();
        assert_eq!(response.error.unwrap().code, -32601);
    }

    #[test]
    fn test_tool_result_status_code() {
        let err = AirtableError::RequestRejected {
            status: 422,
            message: r#"{"error":"INVALID"}"#.to_string(),
        };
        let result = tool_result(&Envelope::failure(&err));
        assert_eq!(result["isError"], true);
        assert_eq!(result["structuredContent"]["status_code"], 422);
    }
}
