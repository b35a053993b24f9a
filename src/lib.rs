//! avrodyn: a schema-directed codec between Avro and a dynamic value model
//!
//! Values on the host side are untyped trees ([`Value`]). Avro datums are shaped
//! by a [`Schema`]. This crate converts between the two in both directions.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │  datum   - bytes <-> generic node (wire)     │
//! ├──────────────────────────────────────────────┤
//! │  codec   - generic node <-> Value            │
//! │            union resolution, narrowing,      │
//! │            target descriptors, freezing      │
//! ├──────────────────────────────────────────────┤
//! │  schema  - Schema Model, fingerprints        │
//! └──────────────────────────────────────────────┘
//! ```
//!
//! Encoding is driven by the schema alone. Decoding is additionally shaped by a
//! caller-declared [`TargetType`]: it decides between string and symbol, bytes and
//! sequence, record and map, and marks results read-only.
//!
//! ```no_run
//! use avrodyn::{AvroSchema, TargetType, Value};
//!
//! let schema = AvroSchema::parse_str(r#"["null", "string"]"#)?;
//! let bytes = avrodyn::to_avro(&schema, &Value::from("hello"))?;
//! let back = avrodyn::from_avro(&schema, &bytes, &TargetType::nilable(TargetType::string()))?;
//! assert_eq!(back, Value::from("hello"));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod codec;
pub mod config;
pub mod datum;
pub mod error;
pub mod json;
pub mod schema;

pub use avrodyn_value::{
    ConversionError, FromValue, ImmutableValueError, Map, PrimitiveKind, Record, Sequence,
    TargetField, TargetType, Value, ValueKind,
};
pub use codec::{decode, encode, Codec, GenericNode};
pub use config::{CodecOptions, Limits, NarrowingPolicy, SizePolicy};
pub use datum::{from_avro, to_avro, AvroSchema};
pub use error::{CodecError, DeserializationError, Path, SchemaError, Segment, SerializationError};
pub use schema::{Field, Schema, SchemaHash, SchemaKind};
