//! Lightweight argument checks against a tool's JSON Schema.
//!
//! Only the parts of a schema that catch common model mistakes are enforced:
//! the top-level object shape, `required` properties and primitive `type`
//! declarations of each property. Everything else is left to the server.

use serde_json::{Map, Value};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaViolation {
    #[error("arguments must be a JSON object, got {found}")]
    NotAnObject { found: &'static str },
    #[error("missing required argument '{field}'")]
    MissingField { field: String },
    #[error("argument '{field}' must be of type {expected}, got {found}")]
    WrongType {
        field: String,
        expected: String,
        found: &'static str,
    },
}

/// Returns the normalised arguments (`null` becomes `{}`) or the first violation.
pub fn validate_arguments(schema: &Value, arguments: Value) -> Result<Value, SchemaViolation> {
    let provided = match arguments {
        Value::Null => Map::new(),
        Value::Object(map) => map,
        other => {
            return Err(SchemaViolation::NotAnObject {
                found: type_name(&other),
            });
        }
    };

    if let Some(required) = schema.get("required").and_then(Value::as_array) {
        for field in required.iter().filter_map(Value::as_str) {
            if !provided.contains_key(field) {
                return Err(SchemaViolation::MissingField {
                    field: field.to_string(),
                });
            }
        }
    }

    if let Some(properties) = schema.get("properties").and_then(Value::as_object) {
        for (field, value) in &provided {
            let Some(declared) = properties.get(field).and_then(|p| p.get("type")) else {
                continue;
            };
            let accepted: Vec<&str> = match declared {
                Value::String(single) => vec![single.as_str()],
                Value::Array(many) => many.iter().filter_map(Value::as_str).collect(),
                _ => continue,
            };
            if !accepted.is_empty() && !accepted.iter().any(|ty| matches_type(ty, value)) {
                return Err(SchemaViolation::WrongType {
                    field: field.clone(),
                    expected: accepted.join(" | "),
                    found: type_name(value),
                });
            }
        }
    }

    Ok(Value::Object(provided))
}

fn matches_type(expected: &str, value: &Value) -> bool {
    match expected {
        "string" => value.is_string(),
        "integer" => value.is_i64() || value.is_u64(),
        "number" => value.is_number(),
        "boolean" => value.is_boolean(),
        "array" => value.is_array(),
        "object" => value.is_object(),
        "null" => value.is_null(),
        _ => true,
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
