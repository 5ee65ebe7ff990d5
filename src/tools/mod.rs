//! Tool Surface - one callable tool per catalog operation
//!
//! Tool arguments are validated and translated here; dispatch and envelope
//! construction belong to the API client.

mod arguments;
mod definition;
mod diagnostics;
mod router;

pub use arguments::translate;
pub use definition::ToolDefinition;
pub use diagnostics::{CHECK_CONNECTION, check_connection};
pub use router::{ToolRouter, ToolSurface};

#[cfg(test)]
pub(crate) use router::tests::MockToolRouter;
