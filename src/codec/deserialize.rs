//! Decode path: [`GenericNode`] + [`Schema`] + [`TargetType`] -> [`Value`].
//!
//! Numbers widen to 64 bits and byte payloads are copied out of the node. The
//! target descriptor decides between string and symbol for text, between bytes
//! and sequence for integer arrays, and between record and map for structured
//! data. A value built under a read-only descriptor is frozen once complete.

use std::collections::BTreeMap;

use avrodyn_value::{Map, PrimitiveKind, Record, Sequence, TargetType, Value};

use super::coerce::{first_structural_field, node_label, resolve};
use super::serialize::check_fixed_size;
use super::{union, GenericNode, Walk};
use crate::error::{CodecError, Segment};
use crate::schema::{Field, Schema, SchemaKind};

static ANY: TargetType = TargetType::Any;

pub(crate) fn decode(
    walk: &mut Walk<'_>,
    schema: &Schema,
    node: &GenericNode,
    target: &TargetType,
) -> Result<Value, CodecError> {
    walk.visit()?;

    if let Schema::Union { members } = schema {
        return decode_union(walk, schema, members, node, target);
    }

    // A branch wrapper only belongs under a union schema.
    let node = match node {
        GenericNode::Union(_, inner) => inner.as_ref(),
        other => other,
    };

    if let GenericNode::Null = node {
        return match schema {
            Schema::Null => Ok(Value::Null),
            other => Err(walk.mismatch(other, node_label(node))),
        };
    }

    let resolved = resolve(target, schema).ok_or_else(|| CodecError::TargetMismatch {
        path: walk.path(),
        schema: schema.kind(),
        target: target.to_string(),
    })?;

    let mut value = decode_resolved(walk, schema, node, resolved.ty)?;
    if resolved.readonly {
        value.freeze();
    }
    Ok(value)
}

fn decode_union(
    walk: &mut Walk<'_>,
    schema: &Schema,
    members: &[Schema],
    node: &GenericNode,
    target: &TargetType,
) -> Result<Value, CodecError> {
    let (index, member, payload) =
        union::select_for_node(members, node).ok_or_else(|| CodecError::UnionResolution {
            path: walk.path(),
            members: schema.to_string(),
            found: node_label(node),
        })?;

    if let GenericNode::Null = payload {
        return Ok(Value::Null);
    }

    walk.enter(Segment::Branch(index))?;
    let value = decode(walk, member, payload, target)?;
    walk.leave();
    Ok(value)
}

fn decode_resolved(
    walk: &mut Walk<'_>,
    schema: &Schema,
    node: &GenericNode,
    target: &TargetType,
) -> Result<Value, CodecError> {
    match (schema, node) {
        (Schema::Boolean, GenericNode::Boolean(b)) => Ok(Value::Bool(*b)),
        (Schema::Int | Schema::Long, GenericNode::Int(n) | GenericNode::Date(n) | GenericNode::TimeMillis(n)) => {
            Ok(Value::Int(i64::from(*n)))
        }
        (
            Schema::Long,
            GenericNode::Long(n)
            | GenericNode::TimeMicros(n)
            | GenericNode::TimestampMillis(n)
            | GenericNode::TimestampMicros(n)
            | GenericNode::TimestampNanos(n)
            | GenericNode::LocalTimestampMillis(n)
            | GenericNode::LocalTimestampMicros(n)
            | GenericNode::LocalTimestampNanos(n),
        ) => Ok(Value::Int(*n)),
        (Schema::Float | Schema::Double, GenericNode::Float(f)) => Ok(Value::Float(f64::from(*f))),
        (Schema::Double, GenericNode::Double(f)) => Ok(Value::Float(*f)),
        (Schema::String, GenericNode::String(s)) => {
            walk.check_payload(s.len())?;
            Ok(text(s.clone(), target, false))
        }
        (Schema::String, GenericNode::Uuid(uuid)) => Ok(text(uuid.to_string(), target, false)),
        (Schema::Enum { symbols, .. }, GenericNode::Enum(_, symbol)) => {
            if !symbols.contains(symbol) {
                return Err(CodecError::UnknownSymbol {
                    path: walk.path(),
                    symbol: symbol.clone(),
                });
            }
            Ok(text(symbol.clone(), target, true))
        }
        (Schema::Bytes, GenericNode::Bytes(bytes)) => {
            walk.check_payload(bytes.len())?;
            Ok(Value::Bytes(bytes.to_vec()))
        }
        (Schema::Fixed { size, .. }, GenericNode::Fixed(_, bytes)) => {
            walk.check_payload(bytes.len())?;
            check_fixed_size(walk, *size, bytes.len())?;
            Ok(Value::Bytes(bytes.to_vec()))
        }
        (Schema::Array { element }, GenericNode::Array(items)) => {
            walk.check_sequence(items.len())?;
            match target {
                TargetType::Bytes => decode_byte_array(walk, element, items),
                TargetType::Array { element: element_target } => {
                    decode_array(walk, element, items, element_target)
                }
                _ => decode_array(walk, element, items, &ANY),
            }
        }
        (Schema::Map { value: value_schema }, GenericNode::Map(entries)) => {
            walk.check_sequence(entries.len())?;
            // Sorted so decoding visits (and fails on) entries deterministically.
            let sorted: BTreeMap<&str, &GenericNode> =
                entries.iter().map(|(k, v)| (k.as_str(), v)).collect();
            match target {
                TargetType::Record { .. } => {
                    let mut record = Record::with_capacity(sorted.len());
                    for (key, entry) in sorted {
                        let entry_target = target.field(key).unwrap_or(&ANY);
                        walk.enter(Segment::Key(key.to_string()))?;
                        let value = decode(walk, value_schema, entry, entry_target)?;
                        bind_field(walk, &mut record, key, value)?;
                        walk.leave();
                    }
                    Ok(Value::Record(record))
                }
                _ => {
                    let value_target = map_value_target(target);
                    let mut map = Map::new();
                    for (key, entry) in sorted {
                        walk.enter(Segment::Key(key.to_string()))?;
                        let value = decode(walk, value_schema, entry, value_target)?;
                        map.insert(key, value).map_err(|source| CodecError::Immutable {
                            path: walk.path(),
                            source,
                        })?;
                        walk.leave();
                    }
                    Ok(Value::Map(map))
                }
            }
        }
        (Schema::Record { fields, .. }, GenericNode::Record(node_fields)) => {
            decode_record(walk, fields, node_fields, target)
        }
        (schema, node) => Err(walk.mismatch(schema, node_label(node))),
    }
}

fn decode_array(
    walk: &mut Walk<'_>,
    element: &Schema,
    items: &[GenericNode],
    element_target: &TargetType,
) -> Result<Value, CodecError> {
    let mut sequence = Sequence::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        walk.enter(Segment::Index(i))?;
        let value = decode(walk, element, item, element_target)?;
        sequence.push(value).map_err(|source| CodecError::Immutable {
            path: walk.path(),
            source,
        })?;
        walk.leave();
    }
    Ok(Value::Sequence(sequence))
}

/// An `array<int>` or `array<long>` read into a byte string.
fn decode_byte_array(
    walk: &mut Walk<'_>,
    element: &Schema,
    items: &[GenericNode],
) -> Result<Value, CodecError> {
    let mut bytes = Vec::with_capacity(items.len());
    for (i, item) in items.iter().enumerate() {
        walk.enter(Segment::Index(i))?;
        walk.visit()?;
        let n = match item {
            GenericNode::Int(n) => i64::from(*n),
            GenericNode::Long(n) => *n,
            other => return Err(walk.mismatch(element, node_label(other))),
        };
        let byte = u8::try_from(n).map_err(|_| CodecError::NumericOverflow {
            path: walk.path(),
            value: n.to_string(),
            schema: element.kind(),
        })?;
        bytes.push(byte);
        walk.leave();
    }
    Ok(Value::Bytes(bytes))
}

fn decode_record(
    walk: &mut Walk<'_>,
    fields: &[Field],
    node_fields: &[(String, GenericNode)],
    target: &TargetType,
) -> Result<Value, CodecError> {
    if let TargetType::Map { value } = target {
        let mut map = Map::new();
        for field in fields {
            walk.enter(Segment::Field(field.name.clone()))?;
            let decoded = match lookup(node_fields, &field.name) {
                Some(node) => decode(walk, &field.schema, node, value)?,
                None => Value::Null,
            };
            map.insert(field.name.as_str(), decoded).map_err(|source| CodecError::Immutable {
                path: walk.path(),
                source,
            })?;
            walk.leave();
        }
        return Ok(Value::Map(map));
    }

    let mut record = Record::with_capacity(fields.len());
    for field in fields {
        walk.enter(Segment::Field(field.name.clone()))?;
        let decoded = match lookup(node_fields, &field.name) {
            Some(node) => {
                let field_target = field_target(walk, target, field)?;
                decode(walk, &field.schema, node, field_target)?
            }
            None => Value::Null,
        };
        bind_field(walk, &mut record, &field.name, decoded)?;
        walk.leave();
    }
    Ok(Value::Record(record))
}

/// Descriptor for one field of a record being decoded.
///
/// Map and record fields take the first structurally matching field of the target
/// record, whatever its name. Other fields are looked up by name.
fn field_target<'t>(
    walk: &Walk<'_>,
    target: &'t TargetType,
    field: &Field,
) -> Result<&'t TargetType, CodecError> {
    let TargetType::Record { fields: target_fields } = target else {
        return Ok(&ANY);
    };
    match field.schema.kind() {
        kind @ (SchemaKind::Map | SchemaKind::Record) => first_structural_field(target_fields, kind)
            .ok_or_else(|| CodecError::FieldResolution {
                path: walk.path(),
                field: field.name.clone(),
                kind,
            }),
        _ => Ok(target.field(&field.name).unwrap_or(&ANY)),
    }
}

fn lookup<'n>(node_fields: &'n [(String, GenericNode)], name: &str) -> Option<&'n GenericNode> {
    node_fields.iter().find(|(n, _)| n == name).map(|(_, node)| node)
}

fn bind_field(walk: &Walk<'_>, record: &mut Record, name: &str, value: Value) -> Result<(), CodecError> {
    record.set(name, value).map_err(|source| CodecError::Immutable {
        path: walk.path(),
        source,
    })?;
    Ok(())
}

fn map_value_target(target: &TargetType) -> &TargetType {
    match target {
        TargetType::Map { value } => value,
        _ => &ANY,
    }
}

/// Text under a string or symbol descriptor. Under `any`, enum nodes stay symbols.
fn text(s: String, target: &TargetType, from_enum: bool) -> Value {
    match target {
        TargetType::Primitive(PrimitiveKind::Symbol) => Value::EnumSymbol(s),
        TargetType::Primitive(PrimitiveKind::String) => Value::String(s),
        _ if from_enum => Value::EnumSymbol(s),
        _ => Value::String(s),
    }
}
