//! Translation of tool arguments into operation requests
//!
//! Arguments arrive as one JSON object keyed by caller-facing parameter
//! names. Every check here runs before any network activity.

use serde_json::{Map, Value};

use crate::catalog::{OperationDescriptor, OperationRequest, ParamKind, ParamSpec, Placement};
use crate::error::{AirtableError, Result};

/// Build an [`OperationRequest`] from raw tool arguments
pub fn translate(op: &OperationDescriptor, arguments: &Value) -> Result<OperationRequest> {
    let empty = Map::new();
    let args = match arguments {
        Value::Object(map) => map,
        Value::Null => &empty,
        _ => {
            return Err(AirtableError::InvalidArgument(format!(
                "arguments for {} must be a JSON object",
                op.name
            )));
        }
    };

    for key in args.keys() {
        if op.param(key).is_none() {
            log::debug!("{} ignoring unknown argument {}", op.name, key);
        }
    }

    let missing: Vec<&str> = op
        .params
        .iter()
        .filter(|p| p.required && supplied(args, p).is_none())
        .map(|p| p.name)
        .collect();
    if !missing.is_empty() {
        return Err(AirtableError::MissingParameter(missing.join(", ")));
    }

    if !op.one_of.is_empty() {
        let given: Vec<&str> = op
            .one_of
            .iter()
            .copied()
            .filter(|name| args.get(*name).is_some_and(|v| !v.is_null()))
            .collect();
        match given.len() {
            0 => return Err(AirtableError::MissingParameter(op.one_of.join(" or "))),
            1 => {}
            _ => {
                return Err(AirtableError::InvalidArgument(format!(
                    "supply only one of {}, not {}",
                    op.one_of.join(" or "),
                    given.join(" and ")
                )));
            }
        }
    }

    let mut request = OperationRequest::new();
    let mut body = Map::new();

    for param in op.params {
        let Some(value) = supplied(args, param) else {
            continue;
        };
        if !param.kind.accepts(value) {
            return Err(AirtableError::InvalidArgument(format!(
                "{} must be {}",
                param.name,
                param.kind.label()
            )));
        }

        match param.placement {
            Placement::Path => {
                if let Some(s) = value.as_str() {
                    request.path_params.insert(param.wire.to_string(), s.to_string());
                }
            }
            Placement::Query => push_query(&mut request.query, param, value)?,
            Placement::Body => {
                body.insert(param.wire.to_string(), value.clone());
            }
        }
    }

    request.body = op.assemble_body(body)?;
    Ok(request)
}

/// Present, non-null value; empty strings count as absent for path params
fn supplied<'a>(args: &'a Map<String, Value>, param: &ParamSpec) -> Option<&'a Value> {
    let value = args.get(param.name).filter(|v| !v.is_null())?;
    if param.placement == Placement::Path && value.as_str().is_some_and(str::is_empty) {
        return None;
    }
    Some(value)
}

fn push_query(query: &mut Vec<(String, String)>, param: &ParamSpec, value: &Value) -> Result<()> {
    match param.kind {
        ParamKind::String | ParamKind::Integer | ParamKind::Boolean => {
            query.push((param.wire.to_string(), scalar(value)));
        }
        ParamKind::StringList => {
            for item in value.as_array().into_iter().flatten() {
                query.push((param.wire.to_string(), scalar(item)));
            }
        }
        ParamKind::SortList => {
            for (i, item) in value.as_array().into_iter().flatten().enumerate() {
                let field = item.get("field").and_then(Value::as_str).ok_or_else(|| {
                    AirtableError::InvalidArgument(format!("{}[{}] needs a string `field`", param.name, i))
                })?;
                query.push((format!("{}[{}][field]", param.wire, i), field.to_string()));

                if let Some(direction) = item.get("direction").filter(|v| !v.is_null()) {
                    let direction = direction.as_str().filter(|d| matches!(*d, "asc" | "desc")).ok_or_else(|| {
                        AirtableError::InvalidArgument(format!("{}[{}].direction must be asc or desc", param.name, i))
                    })?;
                    query.push((format!("{}[{}][direction]", param.wire, i), direction.to_string()));
                }
            }
        }
        ParamKind::Object | ParamKind::ObjectList => {
            return Err(AirtableError::InvalidArgument(format!(
                "{} cannot be sent as a query parameter",
                param.name
            )));
        }
    }
    Ok(())
}

fn scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
