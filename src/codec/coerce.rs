//! Numeric narrowing and target descriptor resolution.

use avrodyn_value::{PrimitiveKind, TargetField, TargetType};

use super::{GenericNode, Walk};
use crate::config::NarrowingPolicy;
use crate::error::CodecError;
use crate::schema::{Schema, SchemaKind};

// ============================================================================
// Numeric narrowing (encode path)
// ============================================================================

pub(crate) fn narrow_int(walk: &Walk<'_>, n: i64) -> Result<i32, CodecError> {
    match walk.options.narrowing {
        NarrowingPolicy::Truncate => Ok(n as i32),
        NarrowingPolicy::Checked => i32::try_from(n).map_err(|_| CodecError::NumericOverflow {
            path: walk.path(),
            value: n.to_string(),
            schema: SchemaKind::Int,
        }),
    }
}

pub(crate) fn narrow_float(walk: &Walk<'_>, f: f64) -> Result<f32, CodecError> {
    let narrowed = f as f32;
    if walk.options.narrowing == NarrowingPolicy::Checked && f.is_finite() && narrowed.is_infinite() {
        return Err(CodecError::NumericOverflow {
            path: walk.path(),
            value: f.to_string(),
            schema: SchemaKind::Float,
        });
    }
    Ok(narrowed)
}

/// Element schema of an array that can carry a byte string.
pub(crate) fn is_byte_element(element: &Schema) -> bool {
    matches!(element, Schema::Int | Schema::Long)
}

// ============================================================================
// Generic node inspection (decode path)
// ============================================================================

/// Schema kind a node was produced for. Logical nodes report their underlying
/// primitive; nodes with no counterpart in the Schema Model report `None`.
pub(crate) fn node_kind(node: &GenericNode) -> Option<SchemaKind> {
    let kind = match node {
        GenericNode::Null => SchemaKind::Null,
        GenericNode::Boolean(_) => SchemaKind::Boolean,
        GenericNode::Int(_) | GenericNode::Date(_) | GenericNode::TimeMillis(_) => SchemaKind::Int,
        GenericNode::Long(_)
        | GenericNode::TimeMicros(_)
        | GenericNode::TimestampMillis(_)
        | GenericNode::TimestampMicros(_)
        | GenericNode::TimestampNanos(_)
        | GenericNode::LocalTimestampMillis(_)
        | GenericNode::LocalTimestampMicros(_)
        | GenericNode::LocalTimestampNanos(_) => SchemaKind::Long,
        GenericNode::Float(_) => SchemaKind::Float,
        GenericNode::Double(_) => SchemaKind::Double,
        GenericNode::Bytes(_) => SchemaKind::Bytes,
        GenericNode::String(_) | GenericNode::Uuid(_) => SchemaKind::String,
        GenericNode::Enum(..) => SchemaKind::Enum,
        GenericNode::Fixed(..) => SchemaKind::Fixed,
        GenericNode::Array(_) => SchemaKind::Array,
        GenericNode::Map(_) => SchemaKind::Map,
        GenericNode::Record(_) => SchemaKind::Record,
        GenericNode::Union(..) => SchemaKind::Union,
        _ => return None,
    };
    Some(kind)
}

/// Short description of a node for error messages.
pub(crate) fn node_label(node: &GenericNode) -> String {
    match node_kind(node) {
        Some(kind) => format!("{kind} node"),
        None => format!("{:?} node", apache_avro::schema::SchemaKind::from(node)),
    }
}

// ============================================================================
// Target resolution
// ============================================================================

/// Structural descriptor selected for a schema, plus whether any `Wrapped` layer
/// crossed on the way asked for a read-only result.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Resolved<'t> {
    pub ty: &'t TargetType,
    pub readonly: bool,
}

/// Find the descriptor inside `target` that can hold a value decoded from `schema`.
pub(crate) fn resolve<'t>(target: &'t TargetType, schema: &Schema) -> Option<Resolved<'t>> {
    match target {
        TargetType::Wrapped { inner, readonly } => resolve(inner, schema).map(|r| Resolved {
            ty: r.ty,
            readonly: r.readonly || *readonly,
        }),
        TargetType::Union { members } => members.iter().find_map(|m| resolve(m, schema)),
        ty if accepts(ty, schema) => Some(Resolved {
            ty,
            readonly: false,
        }),
        _ => None,
    }
}

fn accepts(target: &TargetType, schema: &Schema) -> bool {
    match (target, schema) {
        (TargetType::Any, _) => true,
        (TargetType::Primitive(PrimitiveKind::Nil), Schema::Null) => true,
        (TargetType::Primitive(PrimitiveKind::Boolean), Schema::Boolean) => true,
        (TargetType::Primitive(PrimitiveKind::Int), Schema::Int | Schema::Long) => true,
        (TargetType::Primitive(PrimitiveKind::Float), Schema::Float | Schema::Double) => true,
        (
            TargetType::Primitive(PrimitiveKind::String | PrimitiveKind::Symbol),
            Schema::String | Schema::Enum { .. },
        ) => true,
        (TargetType::Bytes, Schema::Bytes | Schema::Fixed { .. }) => true,
        (TargetType::Bytes, Schema::Array { element }) => is_byte_element(element),
        (TargetType::Array { .. }, Schema::Array { .. }) => true,
        (TargetType::Map { .. } | TargetType::Record { .. }, Schema::Map { .. } | Schema::Record { .. }) => {
            true
        }
        _ => false,
    }
}

/// First field of a target record whose descriptor is structurally a map (or a
/// record), looking through `Wrapped` layers and into union members.
///
/// Field names play no part in the match.
pub(crate) fn first_structural_field(
    fields: &[TargetField],
    kind: SchemaKind,
) -> Option<&TargetType> {
    fields.iter().find_map(|field| structural_match(&field.ty, kind))
}

fn structural_match(ty: &TargetType, kind: SchemaKind) -> Option<&TargetType> {
    match (ty.unwrapped(), kind) {
        (TargetType::Map { .. }, SchemaKind::Map) | (TargetType::Record { .. }, SchemaKind::Record) => {
            Some(ty)
        }
        (TargetType::Union { members }, _) => members.iter().find_map(|m| structural_match(m, kind)),
        _ => None,
    }
}
