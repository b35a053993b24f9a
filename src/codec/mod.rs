//! Schema-directed codec between [`Value`] trees and Avro generic nodes.
//!
//! - `serialize` - encode path: value + schema -> node
//! - `deserialize` - decode path: node + schema + target -> value
//! - `union` - union member selection for both directions
//! - `coerce` - numeric narrowing/widening and target descriptor resolution
//!
//! Every call walks the schema recursively and fails on the first structural
//! mismatch; no partial output is ever returned. Schemas and target descriptors are
//! only borrowed, so one schema can serve any number of concurrent calls.

mod coerce;
mod deserialize;
mod serialize;
mod union;

use avrodyn_value::{TargetType, Value};

use crate::config::{CodecOptions, Limits};
use crate::error::{CodecError, Path, SerializationError, DeserializationError, Segment};
use crate::schema::Schema;

/// Canonical node tree exchanged with the binary wire codec.
pub type GenericNode = apache_avro::types::Value;

/// Encoder/decoder configured with a set of [`CodecOptions`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Codec {
    options: CodecOptions,
}

impl Codec {
    pub fn new(options: CodecOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &CodecOptions {
        &self.options
    }

    /// Encode `value` into a generic node shaped by `schema`.
    pub fn encode(&self, schema: &Schema, value: &Value) -> Result<GenericNode, SerializationError> {
        let mut walk = Walk::new(&self.options);
        let node = serialize::encode(&mut walk, schema, value).map_err(|e| {
            tracing::debug!(schema = %schema.kind(), error = %e, "encode failed");
            e
        })?;
        tracing::trace!(schema = %schema.kind(), nodes = walk.nodes, "encoded value");
        Ok(node)
    }

    /// Decode `node` under `schema` into a value shaped by `target`.
    pub fn decode(
        &self,
        schema: &Schema,
        node: &GenericNode,
        target: &TargetType,
    ) -> Result<Value, DeserializationError> {
        let mut walk = Walk::new(&self.options);
        let value = deserialize::decode(&mut walk, schema, node, target).map_err(|e| {
            tracing::debug!(schema = %schema.kind(), error = %e, "decode failed");
            e
        })?;
        tracing::trace!(schema = %schema.kind(), nodes = walk.nodes, "decoded value");
        Ok(value)
    }
}

/// Encode with default options.
pub fn encode(schema: &Schema, value: &Value) -> Result<GenericNode, SerializationError> {
    Codec::default().encode(schema, value)
}

/// Decode with default options.
pub fn decode(
    schema: &Schema,
    node: &GenericNode,
    target: &TargetType,
) -> Result<Value, DeserializationError> {
    Codec::default().decode(schema, node, target)
}

/// Per-call traversal state: current path and limit accounting.
pub(crate) struct Walk<'o> {
    pub(crate) options: &'o CodecOptions,
    path: Path,
    nodes: usize,
}

impl<'o> Walk<'o> {
    pub(crate) fn new(options: &'o CodecOptions) -> Self {
        Self {
            options,
            path: Path::root(),
            nodes: 0,
        }
    }

    fn limits(&self) -> &Limits {
        &self.options.limits
    }

    pub(crate) fn path(&self) -> Path {
        self.path.clone()
    }

    /// Step into a child. Fails once the nesting depth limit is reached.
    pub(crate) fn enter(&mut self, segment: Segment) -> Result<(), CodecError> {
        self.path.push(segment);
        if self.path.segments().len() > self.limits().max_depth {
            return Err(self.limit("depth", self.limits().max_depth));
        }
        Ok(())
    }

    pub(crate) fn leave(&mut self) {
        self.path.pop();
    }

    /// Count one visited node against the node limit.
    pub(crate) fn visit(&mut self) -> Result<(), CodecError> {
        self.nodes += 1;
        if self.nodes > self.limits().max_node_count {
            return Err(self.limit("node count", self.limits().max_node_count));
        }
        Ok(())
    }

    pub(crate) fn check_payload(&self, len: usize) -> Result<(), CodecError> {
        if len > self.limits().max_payload_size {
            return Err(self.limit("payload size", self.limits().max_payload_size));
        }
        Ok(())
    }

    pub(crate) fn check_sequence(&self, len: usize) -> Result<(), CodecError> {
        if len > self.limits().max_sequence_len {
            return Err(self.limit("sequence length", self.limits().max_sequence_len));
        }
        Ok(())
    }

    fn limit(&self, limit: &'static str, max: usize) -> CodecError {
        tracing::debug!(path = %self.path, limit, max, "limit exceeded");
        CodecError::LimitExceeded {
            path: self.path(),
            limit,
            max,
        }
    }

    pub(crate) fn mismatch(&self, schema: &Schema, found: impl ToString) -> CodecError {
        CodecError::SchemaMismatch {
            path: self.path(),
            expected: schema.kind(),
            found: found.to_string(),
        }
    }
}
