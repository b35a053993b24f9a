//! Byte-level facade over the Avro binary datum codec.
//!
//! Two top-level schemas bypass the wire codec:
//!
//! - `null` encodes to the single sentinel byte `0x00`; decoding accepts the
//!   sentinel or an empty buffer. Any other leading byte is a schema mismatch.
//! - `fixed` is the caller's raw bytes, checked against the declared size according
//!   to the configured [`SizePolicy`](crate::config::SizePolicy).

use std::collections::HashMap;

use apache_avro::schema::{Name, ResolvedSchema};
use avrodyn_value::{TargetType, Value};

use crate::codec::{Codec, GenericNode};
use crate::error::{CodecError, DeserializationError, Path, SchemaError, Segment, SerializationError};
use crate::schema::{Schema, SchemaHash, SchemaKind};

/// Sentinel payload for a top-level `null` datum.
pub const NULL_SENTINEL: [u8; 1] = [0x00];

/// A parsed Avro schema together with its Schema Model.
#[derive(Debug, Clone)]
pub struct AvroSchema {
    wire: apache_avro::Schema,
    model: Schema,
    /// Whether the wire schema declares any logical type.
    logical: bool,
}

impl AvroSchema {
    /// Parse an Avro schema definition (JSON text).
    pub fn parse_str(json: &str) -> Result<Self, SchemaError> {
        let wire = apache_avro::Schema::parse_str(json).map_err(SchemaError::Parse)?;
        Self::from_wire(wire)
    }

    pub fn from_wire(wire: apache_avro::Schema) -> Result<Self, SchemaError> {
        let model = Schema::try_from(&wire)?;
        let logical = declares_logical(&wire);
        Ok(Self { wire, model, logical })
    }

    pub fn model(&self) -> &Schema {
        &self.model
    }

    pub fn wire(&self) -> &apache_avro::Schema {
        &self.wire
    }

    pub fn fingerprint(&self) -> SchemaHash {
        self.model.fingerprint()
    }
}

impl Codec {
    /// Encode `value` into an Avro binary datum.
    pub fn to_avro(&self, schema: &AvroSchema, value: &Value) -> Result<Vec<u8>, SerializationError> {
        let _span = tracing::debug_span!("to_avro", schema = %schema.model.kind()).entered();

        let node = self.encode(&schema.model, value)?;
        let bytes = match (&schema.model, node) {
            (Schema::Null, GenericNode::Null) => NULL_SENTINEL.to_vec(),
            (Schema::Fixed { .. }, GenericNode::Fixed(_, bytes)) => bytes,
            (_, node) => {
                let node = if schema.logical {
                    let resolved = ResolvedSchema::try_from(&schema.wire).map_err(SerializationError::Wire)?;
                    with_logical(node, &schema.wire, resolved.get_names(), &mut Path::root())?
                } else {
                    node
                };
                apache_avro::to_avro_datum(&schema.wire, node).map_err(|e| {
                    tracing::debug!(error = %e, "wire encode failed");
                    SerializationError::Wire(e)
                })?
            }
        };

        tracing::debug!(len = bytes.len(), "encoded datum");
        Ok(bytes)
    }

    /// Decode an Avro binary datum into a value shaped by `target`.
    pub fn from_avro(
        &self,
        schema: &AvroSchema,
        bytes: &[u8],
        target: &TargetType,
    ) -> Result<Value, DeserializationError> {
        let _span = tracing::debug_span!("from_avro", schema = %schema.model.kind(), len = bytes.len()).entered();

        let limit = self.options().limits.max_buffer_size;
        if bytes.len() > limit {
            tracing::debug!(size = bytes.len(), limit, "buffer too large");
            return Err(DeserializationError::BufferTooLarge {
                size: bytes.len(),
                limit,
            });
        }

        let node = match &schema.model {
            Schema::Null => match bytes {
                [] | [0x00] => GenericNode::Null,
                [0x00, rest @ ..] => {
                    return Err(DeserializationError::TrailingBytes {
                        remaining: rest.len(),
                    })
                }
                [byte, ..] => {
                    return Err(CodecError::SchemaMismatch {
                        path: Path::root(),
                        expected: SchemaKind::Null,
                        found: format!("sentinel byte 0x{byte:02x}"),
                    }
                    .into())
                }
            },
            Schema::Fixed { .. } => GenericNode::Fixed(bytes.len(), bytes.to_vec()),
            _ => {
                let mut reader = bytes;
                let node = apache_avro::from_avro_datum(&schema.wire, &mut reader, None).map_err(|e| {
                    tracing::debug!(error = %e, "wire decode failed");
                    DeserializationError::Wire(e)
                })?;
                if !reader.is_empty() {
                    return Err(DeserializationError::TrailingBytes {
                        remaining: reader.len(),
                    });
                }
                node
            }
        };

        self.decode(&schema.model, &node, target)
    }
}

/// Encode with default options.
pub fn to_avro(schema: &AvroSchema, value: &Value) -> Result<Vec<u8>, SerializationError> {
    Codec::default().to_avro(schema, value)
}

/// Decode with default options.
pub fn from_avro(schema: &AvroSchema, bytes: &[u8], target: &TargetType) -> Result<Value, DeserializationError> {
    Codec::default().from_avro(schema, bytes, target)
}

fn declares_logical(wire: &apache_avro::Schema) -> bool {
    use apache_avro::Schema as Wire;
    match wire {
        Wire::Date
        | Wire::TimeMillis
        | Wire::TimeMicros
        | Wire::TimestampMillis
        | Wire::TimestampMicros
        | Wire::TimestampNanos
        | Wire::LocalTimestampMillis
        | Wire::LocalTimestampMicros
        | Wire::LocalTimestampNanos
        | Wire::Uuid => true,
        Wire::Array(array) => declares_logical(&array.items),
        Wire::Map(map) => declares_logical(&map.types),
        Wire::Union(union) => union.variants().iter().any(declares_logical),
        Wire::Record(record) => record.fields.iter().any(|f| declares_logical(&f.schema)),
        _ => false,
    }
}

/// Re-tag plain primitive nodes with the logical variant the wire schema declares
/// at their position. The Schema Model collapses logical types, so the encode path
/// only ever produces the underlying primitive.
fn with_logical(
    node: GenericNode,
    wire: &apache_avro::Schema,
    names: &HashMap<Name, &apache_avro::Schema>,
    path: &mut Path,
) -> Result<GenericNode, CodecError> {
    use apache_avro::Schema as Wire;
    let node = match (node, wire) {
        (node, Wire::Ref { name }) => match names.get(name) {
            Some(defined) => with_logical(node, defined, names, path)?,
            None => node,
        },
        (GenericNode::Int(n), Wire::Date) => GenericNode::Date(n),
        (GenericNode::Int(n), Wire::TimeMillis) => GenericNode::TimeMillis(n),
        (GenericNode::Long(n), Wire::TimeMicros) => GenericNode::TimeMicros(n),
        (GenericNode::Long(n), Wire::TimestampMillis) => GenericNode::TimestampMillis(n),
        (GenericNode::Long(n), Wire::TimestampMicros) => GenericNode::TimestampMicros(n),
        (GenericNode::Long(n), Wire::TimestampNanos) => GenericNode::TimestampNanos(n),
        (GenericNode::Long(n), Wire::LocalTimestampMillis) => GenericNode::LocalTimestampMillis(n),
        (GenericNode::Long(n), Wire::LocalTimestampMicros) => GenericNode::LocalTimestampMicros(n),
        (GenericNode::Long(n), Wire::LocalTimestampNanos) => GenericNode::LocalTimestampNanos(n),
        (GenericNode::String(s), Wire::Uuid) => match uuid::Uuid::parse_str(&s) {
            Ok(id) => GenericNode::Uuid(id),
            Err(_) => {
                return Err(CodecError::SchemaMismatch {
                    path: path.clone(),
                    expected: SchemaKind::String,
                    found: format!("malformed uuid '{s}'"),
                })
            }
        },
        (GenericNode::Array(items), Wire::Array(array)) => {
            let mut nodes = Vec::with_capacity(items.len());
            for (i, item) in items.into_iter().enumerate() {
                path.push(Segment::Index(i));
                nodes.push(with_logical(item, &array.items, names, path)?);
                path.pop();
            }
            GenericNode::Array(nodes)
        }
        (GenericNode::Map(entries), Wire::Map(map)) => {
            let mut nodes = HashMap::with_capacity(entries.len());
            for (key, entry) in entries {
                path.push(Segment::Key(key.clone()));
                let entry = with_logical(entry, &map.types, names, path)?;
                path.pop();
                nodes.insert(key, entry);
            }
            GenericNode::Map(nodes)
        }
        (GenericNode::Record(fields), Wire::Record(record)) => {
            let mut nodes = Vec::with_capacity(fields.len());
            for (name, field) in fields {
                let field = match record.fields.iter().find(|f| f.name == name) {
                    Some(declared) => {
                        path.push(Segment::Field(name.clone()));
                        let field = with_logical(field, &declared.schema, names, path)?;
                        path.pop();
                        field
                    }
                    None => field,
                };
                nodes.push((name, field));
            }
            GenericNode::Record(nodes)
        }
        (GenericNode::Union(index, inner), Wire::Union(union)) => {
            let inner = match union.variants().get(index as usize) {
                Some(member) => {
                    path.push(Segment::Branch(index as usize));
                    let inner = with_logical(*inner, member, names, path)?;
                    path.pop();
                    inner
                }
                None => *inner,
            };
            GenericNode::Union(index, Box::new(inner))
        }
        (node, _) => node,
    };
    Ok(node)
}
