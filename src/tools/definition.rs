//! Tool definitions derived from catalog descriptors
//!
//! Each operation becomes one tool whose input schema is built from the
//! descriptor's parameter list.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

use crate::catalog::OperationDescriptor;

/// A tool as advertised to protocol clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    /// JSON schema for input parameters
    pub input_schema: Value,
}

impl ToolDefinition {
    pub fn new(name: impl Into<String>, description: impl Into<String>, input_schema: Value) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema,
        }
    }

    /// Build the definition for a catalog operation
    pub fn from_operation(op: &OperationDescriptor) -> Self {
        let mut properties = Map::new();
        let mut required = Vec::new();

        for param in op.params {
            properties.insert(param.name.to_string(), param.json_schema());
            if param.required {
                required.push(Value::String(param.name.to_string()));
            }
        }

        let mut description = op.description.to_string();
        if !op.one_of.is_empty() {
            description.push_str(&format!(" (requires one of: {})", op.one_of.join(", ")));
        }

        let schema = json!({
            "type": "object",
            "properties": properties,
            "required": required,
        });

        Self::new(op.name, description, schema)
    }

    /// Names listed under the schema's `required` key
    pub fn required(&self) -> Vec<&str> {
        self.input_schema["required"]
            .as_array()
            .map(|items| items.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }
}
