//! Union member selection.
//!
//! Encode: the value's kind maps to a set of compatible member kinds and the first
//! declared member in that set wins. A `Null` value goes straight to the `null`
//! member wherever it is declared.
//!
//! Decode: the wire codec has already committed to a branch, so the node's
//! concrete kind (and the branch index when present) picks the member.

use avrodyn_value::Value;

use super::coerce::{is_byte_element, node_kind};
use super::GenericNode;
use crate::schema::Schema;

pub(crate) fn select_for_value<'s>(members: &'s [Schema], value: &Value) -> Option<(usize, &'s Schema)> {
    let selected = if value.is_null() {
        members.iter().enumerate().find(|(_, m)| matches!(m, Schema::Null))
    } else {
        members.iter().enumerate().find(|(_, m)| accepts_value(m, value))
    };
    if let Some((index, member)) = selected {
        tracing::trace!(index, member = %member.kind(), value = %value.kind(), "selected union member");
    }
    selected
}

fn accepts_value(member: &Schema, value: &Value) -> bool {
    match (value, member) {
        (Value::Bool(_), Schema::Boolean) => true,
        (Value::Int(_), Schema::Int | Schema::Long) => true,
        (Value::Float(_), Schema::Float | Schema::Double) => true,
        (Value::String(_) | Value::EnumSymbol(_), Schema::String | Schema::Enum { .. }) => true,
        (Value::Bytes(_), Schema::Bytes | Schema::Fixed { .. }) => true,
        (Value::Bytes(_), Schema::Array { element }) => is_byte_element(element),
        (Value::Sequence(_), Schema::Array { .. }) => true,
        (Value::Record(_) | Value::Map(_), Schema::Map { .. } | Schema::Record { .. }) => true,
        _ => false,
    }
}

/// Select the member for a decoded node. Returns the member index, its schema and
/// the payload node with any `Union` wrapper removed.
pub(crate) fn select_for_node<'s, 'n>(
    members: &'s [Schema],
    node: &'n GenericNode,
) -> Option<(usize, &'s Schema, &'n GenericNode)> {
    let (branch, payload) = match node {
        GenericNode::Union(index, inner) => (Some(*index as usize), inner.as_ref()),
        other => (None, other),
    };
    let kind = node_kind(payload)?;

    let by_branch = branch
        .and_then(|i| members.get(i).map(|m| (i, m)))
        .filter(|(_, m)| m.kind() == kind);
    let (index, member) = by_branch.or_else(|| {
        members.iter().enumerate().find(|(_, m)| m.kind() == kind)
    })?;

    tracing::trace!(index, member = %member.kind(), "dispatched union node");
    Some((index, member, payload))
}
