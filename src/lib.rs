//! airtable-mcp - Airtable Web API exposed as MCP tools
//!
//! Credentials are never held directly: an OAuth connection managed by a
//! Nango broker supplies the bearer token, which is cached and refreshed
//! reactively when the upstream answers 401.

pub mod auth;
pub mod catalog;
pub mod client;
pub mod envelope;
pub mod error;
pub mod mcp;
pub mod tools;

pub use error::{AirtableError, Result};
