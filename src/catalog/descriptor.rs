//! Operation descriptors and parameter specifications
//!
//! Descriptors are plain `'static` data; nothing here performs I/O.

use serde_json::{Map, Value, json};

use crate::error::{AirtableError, Result};

/// HTTP method of an upstream operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        }
    }

    pub fn to_reqwest(self) -> reqwest::Method {
        match self {
            Self::Get => reqwest::Method::GET,
            Self::Post => reqwest::Method::POST,
            Self::Patch => reqwest::Method::PATCH,
            Self::Delete => reqwest::Method::DELETE,
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What an operation acts on and how its response is shaped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    /// One record in, one record out
    SingleRecord,
    /// Ordered batch of records, all-or-nothing upstream
    Bulk,
    /// Base, table, field, view or collaborator metadata
    Schema,
    /// Paged listing; `cursor` names the response field carrying the next page token
    List { cursor: &'static str },
    /// Everything else (comments, webhooks, shares, enterprise admin)
    Action,
}

impl OperationKind {
    pub fn cursor_field(&self) -> Option<&'static str> {
        match self {
            Self::List { cursor } => Some(cursor),
            _ => None,
        }
    }

    pub fn is_list(&self) -> bool {
        matches!(self, Self::List { .. })
    }
}

/// How body parameters are assembled into the request payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyShape {
    /// The operation sends no body
    None,
    /// Body parameters become keys of one JSON object; dotted wire names nest
    Object,
    /// A single `{user|group, permissionLevel}` entry wrapped in `collaborators`
    Collaborator,
}

/// JSON type accepted for a parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    String,
    Integer,
    Boolean,
    StringList,
    Object,
    ObjectList,
    /// List of `{field, direction}` objects
    SortList,
}

impl ParamKind {
    /// JSON schema fragment for tool definitions
    pub fn json_schema(&self) -> Value {
        match self {
            Self::String => json!({ "type": "string" }),
            Self::Integer => json!({ "type": "integer" }),
            Self::Boolean => json!({ "type": "boolean" }),
            Self::StringList => json!({ "type": "array", "items": { "type": "string" } }),
            Self::Object => json!({ "type": "object" }),
            Self::ObjectList => json!({ "type": "array", "items": { "type": "object" } }),
            Self::SortList => json!({
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "field": { "type": "string" },
                        "direction": { "type": "string", "enum": ["asc", "desc"] }
                    },
                    "required": ["field"]
                }
            }),
        }
    }

    /// Human-readable type name used in argument errors
    pub fn label(&self) -> &'static str {
        match self {
            Self::String => "a string",
            Self::Integer => "an integer",
            Self::Boolean => "a boolean",
            Self::StringList => "an array of strings",
            Self::Object => "an object",
            Self::ObjectList => "an array of objects",
            Self::SortList => "an array of {field, direction} objects",
        }
    }

    /// Check a supplied value against this kind
    pub fn accepts(&self, value: &Value) -> bool {
        match self {
            Self::String => value.is_string(),
            Self::Integer => value.is_i64() || value.is_u64(),
            Self::Boolean => value.is_boolean(),
            Self::StringList => value
                .as_array()
                .map(|items| items.iter().all(Value::is_string))
                .unwrap_or(false),
            Self::Object => value.is_object(),
            Self::ObjectList | Self::SortList => value
                .as_array()
                .map(|items| items.iter().all(Value::is_object))
                .unwrap_or(false),
        }
    }
}

/// Where a parameter travels in the HTTP request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Path,
    Query,
    Body,
}

/// One caller-facing parameter of an operation
#[derive(Debug, Clone, Copy)]
pub struct ParamSpec {
    /// Name the caller uses
    pub name: &'static str,
    /// Name on the wire (query key, body key, or path placeholder)
    pub wire: &'static str,
    pub kind: ParamKind,
    pub placement: Placement,
    pub required: bool,
    pub description: &'static str,
}

impl ParamSpec {
    pub const fn path(name: &'static str, description: &'static str) -> Self {
        Self {
            name,
            wire: name,
            kind: ParamKind::String,
            placement: Placement::Path,
            required: true,
            description,
        }
    }

    pub const fn query(name: &'static str, wire: &'static str, kind: ParamKind, description: &'static str) -> Self {
        Self {
            name,
            wire,
            kind,
            placement: Placement::Query,
            required: false,
            description,
        }
    }

    pub const fn body(name: &'static str, wire: &'static str, kind: ParamKind, description: &'static str) -> Self {
        Self {
            name,
            wire,
            kind,
            placement: Placement::Body,
            required: false,
            description,
        }
    }

    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// JSON schema property for this parameter
    pub fn json_schema(&self) -> Value {
        let mut schema = self.kind.json_schema();
        if let Some(obj) = schema.as_object_mut() {
            obj.insert("description".to_string(), Value::String(self.description.to_string()));
        }
        schema
    }
}

/// Static description of one upstream capability
#[derive(Debug, Clone, Copy)]
pub struct OperationDescriptor {
    pub name: &'static str,
    pub description: &'static str,
    pub method: HttpMethod,
    /// Path relative to the API base, with `{placeholder}` segments
    pub path: &'static str,
    pub kind: OperationKind,
    pub body: BodyShape,
    pub params: &'static [ParamSpec],
    /// At least one of these parameters must be supplied
    pub one_of: &'static [&'static str],
}

impl OperationDescriptor {
    /// Placeholder names in template order
    pub fn placeholders(&self) -> impl Iterator<Item = &'static str> {
        self.path.split('/').filter_map(placeholder_name)
    }

    /// Look up a parameter by its caller-facing name
    pub fn param(&self, name: &str) -> Option<&'static ParamSpec> {
        self.params.iter().find(|p| p.name == name)
    }

    pub fn params_in(&self, placement: Placement) -> impl Iterator<Item = &'static ParamSpec> {
        self.params.iter().filter(move |p| p.placement == placement)
    }

    pub fn accepts_body(&self) -> bool {
        self.body != BodyShape::None
    }

    /// Assemble the JSON payload from body parameters keyed by wire name
    pub fn assemble_body(&self, fields: Map<String, Value>) -> Result<Option<Value>> {
        match self.body {
            BodyShape::None => {
                if fields.is_empty() {
                    Ok(None)
                } else {
                    Err(AirtableError::InvalidArgument(format!(
                        "{} does not accept a request body",
                        self.name
                    )))
                }
            }
            BodyShape::Object => {
                let mut body = Map::new();
                for (wire, value) in fields {
                    insert_dotted(&mut body, &wire, value);
                }
                Ok(Some(Value::Object(body)))
            }
            BodyShape::Collaborator => collaborator_body(fields).map(Some),
        }
    }
}

pub(crate) fn placeholder_name(segment: &str) -> Option<&str> {
    segment.strip_prefix('{').and_then(|s| s.strip_suffix('}'))
}

fn insert_dotted(target: &mut Map<String, Value>, wire: &str, value: Value) {
    match wire.split_once('.') {
        None => {
            target.insert(wire.to_string(), value);
        }
        Some((head, rest)) => {
            let entry = target
                .entry(head.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !entry.is_object() {
                *entry = Value::Object(Map::new());
            }
            if let Some(nested) = entry.as_object_mut() {
                insert_dotted(nested, rest, value);
            }
        }
    }
}

const DEFAULT_PERMISSION_LEVEL: &str = "read";

fn collaborator_body(mut fields: Map<String, Value>) -> Result<Value> {
    let user = fields.remove("user");
    let group = fields.remove("group");
    let permission = fields
        .remove("permissionLevel")
        .unwrap_or_else(|| Value::String(DEFAULT_PERMISSION_LEVEL.to_string()));

    let principal = match (user, group) {
        (Some(id), None) => json!({ "user": { "id": id }, "permissionLevel": permission }),
        (None, Some(id)) => json!({ "group": { "id": id }, "permissionLevel": permission }),
        (Some(_), Some(_)) => {
            return Err(AirtableError::InvalidArgument(
                "supply either user_id or group_id, not both".to_string(),
            ));
        }
        (None, None) => return Err(AirtableError::MissingParameter("user_id or group_id".to_string())),
    };

    Ok(json!({ "collaborators": [principal] }))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PARAMS: &[ParamSpec] = &[
        ParamSpec::path("base_id", "Base"),
        ParamSpec::body("records", "records", ParamKind::ObjectList, "Records"),
        ParamSpec::body(
            "fields_to_merge_on",
            "performUpsert.fieldsToMergeOn",
            ParamKind::StringList,
            "Merge fields",
        ),
    ];

    const OP: OperationDescriptor = OperationDescriptor {
        name: "test_op",
        description: "Test",
        method: HttpMethod::Patch,
        path: "{base_id}/things/{thing_id}",
        kind: OperationKind::Bulk,
        body: BodyShape::Object,
        params: PARAMS,
        one_of: &[],
    };

    #[test]
    fn test_placeholders_in_order() {
        let names: Vec<_> = OP.placeholders().collect();
        assert_eq!(names, vec!["base_id", "thing_id"]);
    }

    #[test]
    fn test_required_builder() {
        let spec = ParamSpec::query("view", "view", ParamKind::String, "View").required();
        assert!(spec.required);
        assert_eq!(spec.placement, Placement::Query);
    }

    #[test]
    fn test_param_kind_accepts() {
        assert!(ParamKind::String.accepts(&json!("x")));
        assert!(!ParamKind::String.accepts(&json!(1)));
        assert!(ParamKind::Integer.accepts(&json!(10)));
        assert!(!ParamKind::Integer.accepts(&json!(1.5)));
        assert!(ParamKind::StringList.accepts(&json!(["a", "b"])));
        assert!(!ParamKind::StringList.accepts(&json!(["a", 1])));
        assert!(ParamKind::ObjectList.accepts(&json!([{ "fields": {} }])));
        assert!(!ParamKind::ObjectList.accepts(&json!({ "fields": {} })));
        assert!(ParamKind::SortList.accepts(&json!([{ "field": "Name" }])));
    }

    #[test]
    fn test_assemble_dotted_body() {
        let mut fields = Map::new();
        fields.insert("records".to_string(), json!([{ "fields": { "Name": "A" } }]));
        fields.insert("performUpsert.fieldsToMergeOn".to_string(), json!(["Name"]));

        let body = OP.assemble_body(fields).unwrap().unwrap();
        assert_eq!(body["performUpsert"]["fieldsToMergeOn"], json!(["Name"]));
        assert_eq!(body["records"][0]["fields"]["Name"], "A");
    }

    #[test]
    fn test_assemble_none_rejects_fields() {
        let op = OperationDescriptor {
            body: BodyShape::None,
            ..OP
        };
        assert!(op.assemble_body(Map::new()).unwrap().is_none());

        let mut fields = Map::new();
        fields.insert("x".to_string(), json!(1));
        assert!(matches!(op.assemble_body(fields), Err(AirtableError::InvalidArgument(_))));
    }

    #[test]
    fn test_collaborator_body_defaults_to_read() {
        let op = OperationDescriptor {
            body: BodyShape::Collaborator,
            ..OP
        };
        let mut fields = Map::new();
        fields.insert("user".to_string(), json!("usrABC"));

        let body = op.assemble_body(fields).unwrap().unwrap();
        assert_eq!(
            body,
            json!({ "collaborators": [{ "user": { "id": "usrABC" }, "permissionLevel": "read" }] })
        );
    }

    #[test]
    fn test_collaborator_body_group() {
        let op = OperationDescriptor {
            body: BodyShape::Collaborator,
            ..OP
        };
        let mut fields = Map::new();
        fields.insert("group".to_string(), json!("ugpXYZ"));
        fields.insert("permissionLevel".to_string(), json!("edit"));

        let body = op.assemble_body(fields).unwrap().unwrap();
        assert_eq!(body["collaborators"][0]["group"]["id"], "ugpXYZ");
        assert_eq!(body["collaborators"][0]["permissionLevel"], "edit");
    }

    #[test]
    fn test_collaborator_body_requires_principal() {
        let op = OperationDescriptor {
            body: BodyShape::Collaborator,
            ..OP
        };
        let result = op.assemble_body(Map::new());
        assert!(matches!(result, Err(AirtableError::MissingParameter(_))));
    }

    #[test]
    fn test_list_kind_cursor() {
        let kind = OperationKind::List { cursor: "offset" };
        assert!(kind.is_list());
        assert_eq!(kind.cursor_field(), Some("offset"));
        assert_eq!(OperationKind::Bulk.cursor_field(), None);
    }

    #[test]
    fn test_method_mapping() {
        assert_eq!(HttpMethod::Patch.to_reqwest(), reqwest::Method::PATCH);
        assert_eq!(HttpMethod::Delete.to_string(), "DELETE");
    }
}
