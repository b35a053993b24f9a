//! Error taxonomy for the codec.
//!
//! Structural failures are [`CodecError`]s and carry the [`Path`] into the value
//! where they arose. The top-level wrappers [`SerializationError`] and
//! [`DeserializationError`] add failures of the binary wire codec.

use std::fmt;

use avrodyn_value::ImmutableValueError;
use thiserror::Error;

use crate::schema::SchemaKind;

/// One step from a parent value into a child.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Field(String),
    Index(usize),
    Key(String),
    /// Union member index.
    Branch(usize),
}

/// Location inside a value, rendered as `$.field[3]{key}<2>`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Path(Vec<Segment>);

impl Path {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn segments(&self) -> &[Segment] {
        &self.0
    }

    pub(crate) fn push(&mut self, segment: Segment) {
        self.0.push(segment);
    }

    pub(crate) fn pop(&mut self) {
        self.0.pop();
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("$")?;
        for segment in &self.0 {
            match segment {
                Segment::Field(name) => write!(f, ".{name}")?,
                Segment::Index(i) => write!(f, "[{i}]")?,
                Segment::Key(key) => write!(f, "{{{key}}}")?,
                Segment::Branch(i) => write!(f, "<{i}>")?,
            }
        }
        Ok(())
    }
}

/// Structural failure during encode or decode.
#[derive(Error, Debug)]
pub enum CodecError {
    #[error("{path}: {found} is not compatible with schema {expected}")]
    SchemaMismatch {
        path: Path,
        expected: SchemaKind,
        found: String,
    },

    #[error("{path}: no member of union {members} accepts {found}")]
    UnionResolution {
        path: Path,
        members: String,
        found: String,
    },

    #[error("{path}: no {kind} descriptor found for field '{field}' in target record")]
    FieldResolution {
        path: Path,
        field: String,
        kind: SchemaKind,
    },

    #[error("{path}: {source}")]
    Immutable {
        path: Path,
        #[source]
        source: ImmutableValueError,
    },

    #[error("{path}: schema {schema} cannot produce target type {target}")]
    TargetMismatch {
        path: Path,
        schema: SchemaKind,
        target: String,
    },

    #[error("{path}: {value} does not fit in schema {schema}")]
    NumericOverflow {
        path: Path,
        value: String,
        schema: SchemaKind,
    },

    #[error("{path}: fixed size mismatch: schema declares {expected} bytes, got {actual}")]
    FixedSize {
        path: Path,
        expected: usize,
        actual: usize,
    },

    #[error("{path}: '{symbol}' is not a symbol of the enum")]
    UnknownSymbol { path: Path, symbol: String },

    #[error("{path}: {limit} limit exceeded (max {max})")]
    LimitExceeded {
        path: Path,
        limit: &'static str,
        max: usize,
    },
}

impl CodecError {
    pub fn path(&self) -> &Path {
        match self {
            CodecError::SchemaMismatch { path, .. }
            | CodecError::UnionResolution { path, .. }
            | CodecError::FieldResolution { path, .. }
            | CodecError::Immutable { path, .. }
            | CodecError::TargetMismatch { path, .. }
            | CodecError::NumericOverflow { path, .. }
            | CodecError::FixedSize { path, .. }
            | CodecError::UnknownSymbol { path, .. }
            | CodecError::LimitExceeded { path, .. } => path,
        }
    }
}

/// Failure of the encode path.
#[derive(Error, Debug)]
pub enum SerializationError {
    #[error("serialization failed: {0}")]
    Codec(#[from] CodecError),

    #[error("serialization failed in wire codec: {0}")]
    Wire(#[source] apache_avro::Error),
}

/// Failure of the decode path.
#[derive(Error, Debug)]
pub enum DeserializationError {
    #[error("deserialization failed: {0}")]
    Codec(#[from] CodecError),

    #[error("deserialization failed in wire codec: {0}")]
    Wire(#[source] apache_avro::Error),

    #[error("{remaining} trailing bytes after datum")]
    TrailingBytes { remaining: usize },

    #[error("buffer of {size} bytes exceeds limit of {limit}")]
    BufferTooLarge { size: usize, limit: usize },
}

/// Failure building a [`Schema`](crate::schema::Schema) from an Avro definition.
#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("invalid schema: {0}")]
    Parse(#[source] apache_avro::Error),

    #[error("recursive type '{0}' is not supported")]
    Recursive(String),

    #[error("unsupported schema type: {0}")]
    Unsupported(String),

    #[error("reference to undefined type '{0}'")]
    UnknownReference(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_renders_all_segment_kinds() {
        let mut path = Path::root();
        path.push(Segment::Field("orders".into()));
        path.push(Segment::Index(3));
        path.push(Segment::Key("eu".into()));
        path.push(Segment::Branch(1));
        assert_eq!(path.to_string(), "$.orders[3]{eu}<1>");

        path.pop();
        assert_eq!(path.to_string(), "$.orders[3]{eu}");
    }

    #[test]
    fn codec_error_message_includes_path() {
        let mut path = Path::root();
        path.push(Segment::Field("id".into()));
        let err = CodecError::SchemaMismatch {
            path,
            expected: SchemaKind::Long,
            found: "string".into(),
        };
        assert_eq!(err.to_string(), "$.id: string is not compatible with schema long");
    }
}
