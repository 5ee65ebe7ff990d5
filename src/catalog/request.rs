//! Concrete request parameters for one call

use std::collections::BTreeMap;

use serde_json::Value;

/// Path, query and body values for one operation call
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OperationRequest {
    pub path_params: BTreeMap<String, String>,
    /// Ordered pairs; repeated keys are sent repeatedly
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl OperationRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_path(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.path_params.insert(name.into(), value.into());
        self
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_builder() {
        let request = OperationRequest::new()
            .with_path("base_id", "appA")
            .with_query("fields[]", "Name")
            .with_query("fields[]", "Age")
            .with_body(json!({ "fields": {} }));

        assert_eq!(request.path_params["base_id"], "appA");
        assert_eq!(request.query.len(), 2);
        assert_eq!(request.query[0], ("fields[]".to_string(), "Name".to_string()));
        assert!(request.body.is_some());
    }
}
