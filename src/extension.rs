//! The pluggable value-parsing hook.
//!
//! Literal values found in annotations (`example`, `defaultValue`, extension
//! values) and schema overrides supplied as JSON text are interpreted through a
//! [`ValueParser`]. [`JsonValueParser`] is used unless the caller supplies its own.

use crate::schema::{Schema, SchemaType};
use log::warn;
use serde_json::{Number, Value};

pub trait ValueParser {
    /// Interprets a raw literal, guided by the schema type it belongs to
    fn parse_value(&self, raw: &str, schema_type: Option<SchemaType>) -> Option<Value>;

    /// Parses a JSON schema document into a Schema Node
    fn parse_schema(&self, json: &str) -> Option<Schema>;
}

/// Interprets values as JSON literals, falling back to the raw string
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonValueParser;

impl ValueParser for JsonValueParser {
    fn parse_value(&self, raw: &str, schema_type: Option<SchemaType>) -> Option<Value> {
        let trimmed = raw.trim();

        if trimmed.starts_with('{') || trimmed.starts_with('[') {
            if let Ok(value) = serde_json::from_str::<Value>(trimmed) {
                return Some(value);
            }
        }

        match schema_type {
            Some(SchemaType::Number) | Some(SchemaType::Integer) => {
                if let Ok(number) = trimmed.parse::<Number>() {
                    return Some(Value::Number(number));
                }
            }
            Some(SchemaType::Boolean) => match trimmed {
                "true" => return Some(Value::Bool(true)),
                "false" => return Some(Value::Bool(false)),
                _ => {}
            },
            _ => {}
        }

        Some(Value::String(raw.to_string()))
    }

    fn parse_schema(&self, json: &str) -> Option<Schema> {
        let mut value = match serde_json::from_str::<Value>(json) {
            Ok(Value::Object(map)) => map,
            Ok(other) => {
                warn!("Schema definition is not a JSON object: {}", other);
                return None;
            }
            Err(e) => {
                warn!("Unable to parse schema definition: {}", e);
                return None;
            }
        };

        let extensions: Vec<(String, Value)> = value
            .iter()
            .filter(|(key, _)| key.starts_with("x-"))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        value.retain(|key, _| !key.starts_with("x-"));

        match serde_json::from_value::<Schema>(Value::Object(value)) {
            Ok(mut schema) => {
                // Unknown keywords land in the flattened map too; only extensions stay
                schema.extensions = extensions.into_iter().collect();
                Some(schema)
            }
            Err(e) => {
                warn!("Invalid schema definition: {}", e);
                None
            }
        }
    }
}
