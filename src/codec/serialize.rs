//! Encode path: [`Value`] + [`Schema`] -> [`GenericNode`].

use std::collections::HashMap;

use avrodyn_value::Value;

use super::coerce::{is_byte_element, narrow_float, narrow_int};
use super::{union, GenericNode, Walk};
use crate::config::SizePolicy;
use crate::error::{CodecError, Segment};
use crate::schema::Schema;

pub(crate) fn encode(walk: &mut Walk<'_>, schema: &Schema, value: &Value) -> Result<GenericNode, CodecError> {
    walk.visit()?;

    match (schema, value) {
        (Schema::Null, Value::Null) => Ok(GenericNode::Null),
        (Schema::Boolean, Value::Bool(b)) => Ok(GenericNode::Boolean(*b)),
        (Schema::Int, Value::Int(n)) => Ok(GenericNode::Int(narrow_int(walk, *n)?)),
        (Schema::Long, Value::Int(n)) => Ok(GenericNode::Long(*n)),
        (Schema::Float, Value::Float(f)) => Ok(GenericNode::Float(narrow_float(walk, *f)?)),
        (Schema::Double, Value::Float(f)) => Ok(GenericNode::Double(*f)),
        (Schema::String, Value::String(s) | Value::EnumSymbol(s)) => {
            walk.check_payload(s.len())?;
            Ok(GenericNode::String(s.clone()))
        }
        (Schema::Bytes, Value::Bytes(bytes)) => {
            walk.check_payload(bytes.len())?;
            Ok(GenericNode::Bytes(bytes.to_vec()))
        }
        (Schema::Enum { symbols, .. }, Value::String(s) | Value::EnumSymbol(s)) => {
            let index = symbols
                .iter()
                .position(|symbol| symbol == s)
                .ok_or_else(|| CodecError::UnknownSymbol {
                    path: walk.path(),
                    symbol: s.clone(),
                })?;
            Ok(GenericNode::Enum(index as u32, s.clone()))
        }
        (Schema::Fixed { size, .. }, Value::Bytes(bytes)) => {
            walk.check_payload(bytes.len())?;
            check_fixed_size(walk, *size, bytes.len())?;
            Ok(GenericNode::Fixed(bytes.len(), bytes.to_vec()))
        }
        (Schema::Array { element }, Value::Sequence(items)) => {
            walk.check_sequence(items.len())?;
            let mut nodes = Vec::with_capacity(items.len());
            for (i, item) in items.iter().enumerate() {
                walk.enter(Segment::Index(i))?;
                nodes.push(encode(walk, element, item)?);
                walk.leave();
            }
            Ok(GenericNode::Array(nodes))
        }
        (Schema::Array { element }, Value::Bytes(bytes)) if is_byte_element(element) => {
            walk.check_sequence(bytes.len())?;
            let nodes = bytes
                .iter()
                .map(|b| match element.as_ref() {
                    Schema::Long => GenericNode::Long(i64::from(*b)),
                    _ => GenericNode::Int(i32::from(*b)),
                })
                .collect();
            Ok(GenericNode::Array(nodes))
        }
        (Schema::Map { value: value_schema }, Value::Map(map)) => {
            walk.check_sequence(map.len())?;
            encode_entries(walk, value_schema, map.iter().map(|(k, v)| (k.as_str(), v)), map.len())
        }
        (Schema::Map { value: value_schema }, Value::Record(record)) => {
            walk.check_sequence(record.len())?;
            encode_entries(walk, value_schema, record.iter(), record.len())
        }
        (Schema::Record { fields, .. }, Value::Record(_) | Value::Map(_)) => {
            let mut nodes = Vec::with_capacity(fields.len());
            for field in fields {
                let bound = field_of(value, &field.name).unwrap_or(&Value::Null);
                walk.enter(Segment::Field(field.name.clone()))?;
                nodes.push((field.name.clone(), encode(walk, &field.schema, bound)?));
                walk.leave();
            }
            Ok(GenericNode::Record(nodes))
        }
        (Schema::Union { members }, value) => {
            let (index, member) =
                union::select_for_value(members, value).ok_or_else(|| CodecError::UnionResolution {
                    path: walk.path(),
                    members: schema.to_string(),
                    found: value.kind().to_string(),
                })?;
            walk.enter(Segment::Branch(index))?;
            let node = encode(walk, member, value)?;
            walk.leave();
            Ok(GenericNode::Union(index as u32, Box::new(node)))
        }
        (schema, value) => Err(walk.mismatch(schema, value.kind())),
    }
}

fn encode_entries<'v>(
    walk: &mut Walk<'_>,
    value_schema: &Schema,
    entries: impl Iterator<Item = (&'v str, &'v Value)>,
    len: usize,
) -> Result<GenericNode, CodecError> {
    let mut nodes = HashMap::with_capacity(len);
    for (key, entry) in entries {
        walk.enter(Segment::Key(key.to_string()))?;
        nodes.insert(key.to_string(), encode(walk, value_schema, entry)?);
        walk.leave();
    }
    Ok(GenericNode::Map(nodes))
}

fn field_of<'v>(value: &'v Value, name: &str) -> Option<&'v Value> {
    match value {
        Value::Record(record) => record.get(name),
        Value::Map(map) => map.get(name),
        _ => None,
    }
}

pub(crate) fn check_fixed_size(walk: &Walk<'_>, size: usize, actual: usize) -> Result<(), CodecError> {
    if actual != size && walk.options.fixed_size == SizePolicy::Strict {
        return Err(CodecError::FixedSize {
            path: walk.path(),
            expected: size,
            actual,
        });
    }
    Ok(())
}
