//! Tool routing and execution
//!
//! Defines the ToolRouter trait consumed by the protocol layer and
//! ToolSurface, which routes every tool to the catalog and the API client.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use serde_json::Value;

use crate::catalog;
use crate::client::ApiClient;
use crate::envelope::Envelope;
use crate::error::AirtableError;

use super::arguments::translate;
use super::definition::ToolDefinition;
use super::diagnostics::{CHECK_CONNECTION, check_connection, check_connection_definition};

/// Trait for listing and calling tools
#[async_trait]
pub trait ToolRouter: Send + Sync {
    /// Tools advertised to clients
    fn definitions(&self) -> Vec<ToolDefinition>;

    /// Invoke a tool by name; every outcome is an envelope
    async fn call(&self, name: &str, arguments: Value) -> Envelope;
}

/// One tool per catalog operation plus the connection diagnostic
pub struct ToolSurface {
    client: Arc<ApiClient>,
}

impl ToolSurface {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &Arc<ApiClient> {
        &self.client
    }
}

#[async_trait]
impl ToolRouter for ToolSurface {
    fn definitions(&self) -> Vec<ToolDefinition> {
        catalog::operations()
            .iter()
            .map(ToolDefinition::from_operation)
            .chain(std::iter::once(check_connection_definition()))
            .collect()
    }

    async fn call(&self, name: &str, arguments: Value) -> Envelope {
        let started = Instant::now();
        log::info!("Tool call: {}", name);

        let envelope = if name == CHECK_CONNECTION {
            check_connection(&self.client).await
        } else {
            match catalog::find(name) {
                Some(op) => match translate(op, &arguments) {
                    Ok(request) => self.client.execute(op, &request).await,
                    Err(e) => {
                        log::warn!("{} rejected before dispatch: {}", name, e);
                        Envelope::failure(&e)
                    }
                },
                None => Envelope::failure(&AirtableError::UnknownTool(name.to_string())),
            }
        };

        log::info!(
            "Tool {} finished in {}ms (success={})",
            name,
            started.elapsed().as_millis(),
            envelope.success
        );
        envelope
    }
}
