//! Connection diagnostics tool

use serde_json::json;

use crate::catalog::{self, OperationRequest};
use crate::client::ApiClient;
use crate::envelope::Envelope;
use crate::error::AirtableError;

use super::definition::ToolDefinition;

pub const CHECK_CONNECTION: &str = "check_connection";

const WHOAMI: &str = "get_user_info";

pub fn check_connection_definition() -> ToolDefinition {
    ToolDefinition::new(
        CHECK_CONNECTION,
        "Verify the broker connection and upstream access; reports the connected user and credential metadata",
        json!({ "type": "object", "properties": {}, "required": [] }),
    )
}

/// Resolve a credential, call `whoami`, and report credential metadata.
/// The token itself is never included.
pub async fn check_connection(client: &ApiClient) -> Envelope {
    let Some(op) = catalog::find(WHOAMI) else {
        return Envelope::failure(&AirtableError::UnknownTool(WHOAMI.to_string()));
    };

    match client.dispatch(op, &OperationRequest::new()).await {
        Ok(user) => {
            let tokens = client.tokens();
            let credential = tokens.cached().await.map(|c| c.info());
            Envelope::success(json!({
                "user": user,
                "credential": credential,
                "refresh_count": tokens.refresh_count(),
                "api_base": client.api_base().as_str(),
            }))
            .with_message("Connection OK")
        }
        Err(e) => {
            log::warn!("Connection check failed: {}", e);
            Envelope::failure(&e)
        }
    }
}
