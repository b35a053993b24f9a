//! JSON bridge.
//!
//! Reads JSON documents into [`Value`] trees using the schema to pick integer vs
//! float, string vs symbol and bytes (base64 text) vs text, and writes values back
//! out as plain JSON.

use base64::{engine::general_purpose::STANDARD, Engine};
use serde_json::Value as Json;
use thiserror::Error;

use avrodyn_value::{Map, Record, Value};

use crate::schema::{Schema, SchemaKind};

#[derive(Error, Debug)]
pub enum JsonError {
    #[error("{path}: expected JSON for {expected}, got {found}")]
    Mismatch {
        path: String,
        expected: SchemaKind,
        found: &'static str,
    },

    #[error("{path}: invalid base64: {source}")]
    Base64 {
        path: String,
        #[source]
        source: base64::DecodeError,
    },

    #[error("{path}: no union member accepts {found}")]
    Union { path: String, found: &'static str },
}

/// Build a value from JSON, guided by `schema`.
pub fn value_from_json(json: &Json, schema: &Schema) -> Result<Value, JsonError> {
    from_json(json, schema, &mut String::from("$"))
}

fn from_json(json: &Json, schema: &Schema, path: &mut String) -> Result<Value, JsonError> {
    let mismatch = |path: &String| JsonError::Mismatch {
        path: path.clone(),
        expected: schema.kind(),
        found: json_kind(json),
    };

    match (schema, json) {
        (Schema::Null, Json::Null) => Ok(Value::Null),
        (Schema::Boolean, Json::Bool(b)) => Ok(Value::Bool(*b)),
        (Schema::Int | Schema::Long, Json::Number(n)) => n.as_i64().map(Value::Int).ok_or_else(|| mismatch(path)),
        (Schema::Float | Schema::Double, Json::Number(n)) => {
            n.as_f64().map(Value::Float).ok_or_else(|| mismatch(path))
        }
        (Schema::String, Json::String(s)) => Ok(Value::String(s.clone())),
        (Schema::Enum { .. }, Json::String(s)) => Ok(Value::EnumSymbol(s.clone())),
        (Schema::Bytes | Schema::Fixed { .. }, Json::String(s)) => STANDARD
            .decode(s)
            .map(Value::Bytes)
            .map_err(|source| JsonError::Base64 {
                path: path.clone(),
                source,
            }),
        (Schema::Array { element }, Json::Array(items)) => {
            let mut values = Vec::with_capacity(items.len());
            for (i, item) in items.iter().enumerate() {
                let mark = path.len();
                path.push_str(&format!("[{i}]"));
                values.push(from_json(item, element, path)?);
                path.truncate(mark);
            }
            Ok(Value::sequence(values))
        }
        (Schema::Map { value }, Json::Object(entries)) => {
            let mut map = Vec::with_capacity(entries.len());
            for (key, entry) in entries {
                let mark = path.len();
                path.push_str(&format!("{{{key}}}"));
                map.push((key.clone(), from_json(entry, value, path)?));
                path.truncate(mark);
            }
            Ok(Value::Map(map.into_iter().collect::<Map>()))
        }
        (Schema::Record { fields, .. }, Json::Object(entries)) => {
            let mut record = Vec::with_capacity(fields.len());
            for field in fields {
                let Some(entry) = entries.get(&field.name) else {
                    continue;
                };
                let mark = path.len();
                path.push('.');
                path.push_str(&field.name);
                record.push((field.name.clone(), from_json(entry, &field.schema, path)?));
                path.truncate(mark);
            }
            Ok(Value::Record(record.into_iter().collect::<Record>()))
        }
        (Schema::Union { members }, json) => {
            if json.is_null() && members.iter().any(|m| matches!(m, Schema::Null)) {
                return Ok(Value::Null);
            }
            let mark = path.len();
            for member in members.iter().filter(|m| !matches!(m, Schema::Null)) {
                match from_json(json, member, path) {
                    Ok(value) => return Ok(value),
                    Err(_) => path.truncate(mark),
                }
            }
            Err(JsonError::Union {
                path: path.clone(),
                found: json_kind(json),
            })
        }
        _ => Err(mismatch(path)),
    }
}

/// Render a value as JSON. Bytes become base64 text.
///
/// JSON has no representation for NaN or infinities, so non-finite floats render
/// as `null`. Such a document does not read back into the original value.
pub fn value_to_json(value: &Value) -> Json {
    match value {
        Value::Null => Json::Null,
        Value::Bool(b) => Json::Bool(*b),
        Value::Int(n) => Json::from(*n),
        Value::Float(f) => serde_json::Number::from_f64(*f).map(Json::Number).unwrap_or(Json::Null),
        Value::String(s) | Value::EnumSymbol(s) => Json::String(s.clone()),
        Value::Bytes(bytes) => Json::String(STANDARD.encode(bytes)),
        Value::Sequence(items) => Json::Array(items.iter().map(value_to_json).collect()),
        Value::Record(record) => Json::Object(
            record
                .iter()
                .map(|(name, v)| (name.to_string(), value_to_json(v)))
                .collect(),
        ),
        Value::Map(map) => Json::Object(
            map.iter()
                .map(|(key, v)| (key.clone(), value_to_json(v)))
                .collect(),
        ),
    }
}

fn json_kind(json: &Json) -> &'static str {
    match json {
        Json::Null => "null",
        Json::Bool(_) => "boolean",
        Json::Number(_) => "number",
        Json::String(_) => "string",
        Json::Array(_) => "array",
        Json::Object(_) => "object",
    }
}
