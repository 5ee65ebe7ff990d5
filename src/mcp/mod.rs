//! MCP transport - JSON-RPC 2.0 over stdio

mod messages;
mod server;
mod stdio;

pub use messages::{ErrorCode, JsonRpcRequest, JsonRpcResponse, RpcError};
pub use server::{MCP_VERSION, McpServer, SERVER_NAME, SERVER_VERSION, tool_result};
pub use stdio::{run_stdio, serve};
