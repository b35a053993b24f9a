//! Schema Model
//!
//! An immutable tree describing the wire shape of a datum. Schemas are built
//! once (usually from a parsed Avro definition, see [`Schema::try_from`]) and
//! then shared read-only across any number of encode/decode calls.

mod convert;
mod fingerprint;

pub use fingerprint::{SchemaHash, SchemaHasher};

use std::fmt;

/// Wire-level type of a datum.
#[derive(Debug, Clone, PartialEq)]
pub enum Schema {
    Null,
    Boolean,
    Int,
    Long,
    Float,
    Double,
    Bytes,
    String,
    Enum { name: String, symbols: Vec<String> },
    Fixed { name: String, size: usize },
    Array { element: Box<Schema> },
    Map { value: Box<Schema> },
    Record { name: String, fields: Vec<Field> },
    Union { members: Vec<Schema> },
}

/// A named record field.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub name: String,
    pub schema: Schema,
}

impl Field {
    pub fn new(name: impl Into<String>, schema: Schema) -> Self {
        Self {
            name: name.into(),
            schema,
        }
    }
}

/// Fieldless tag of a [`Schema`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaKind {
    Null,
    Boolean,
    Int,
    Long,
    Float,
    Double,
    Bytes,
    String,
    Enum,
    Fixed,
    Array,
    Map,
    Record,
    Union,
}

impl fmt::Display for SchemaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SchemaKind::Null => "null",
            SchemaKind::Boolean => "boolean",
            SchemaKind::Int => "int",
            SchemaKind::Long => "long",
            SchemaKind::Float => "float",
            SchemaKind::Double => "double",
            SchemaKind::Bytes => "bytes",
            SchemaKind::String => "string",
            SchemaKind::Enum => "enum",
            SchemaKind::Fixed => "fixed",
            SchemaKind::Array => "array",
            SchemaKind::Map => "map",
            SchemaKind::Record => "record",
            SchemaKind::Union => "union",
        };
        f.write_str(name)
    }
}

impl Schema {
    pub fn kind(&self) -> SchemaKind {
        match self {
            Schema::Null => SchemaKind::Null,
            Schema::Boolean => SchemaKind::Boolean,
            Schema::Int => SchemaKind::Int,
            Schema::Long => SchemaKind::Long,
            Schema::Float => SchemaKind::Float,
            Schema::Double => SchemaKind::Double,
            Schema::Bytes => SchemaKind::Bytes,
            Schema::String => SchemaKind::String,
            Schema::Enum { .. } => SchemaKind::Enum,
            Schema::Fixed { .. } => SchemaKind::Fixed,
            Schema::Array { .. } => SchemaKind::Array,
            Schema::Map { .. } => SchemaKind::Map,
            Schema::Record { .. } => SchemaKind::Record,
            Schema::Union { .. } => SchemaKind::Union,
        }
    }

    pub fn record<N, I>(name: impl Into<String>, fields: I) -> Self
    where
        N: Into<String>,
        I: IntoIterator<Item = (N, Schema)>,
    {
        Schema::Record {
            name: name.into(),
            fields: fields
                .into_iter()
                .map(|(field, schema)| Field::new(field, schema))
                .collect(),
        }
    }

    pub fn enumeration<S, I>(name: impl Into<String>, symbols: I) -> Self
    where
        S: Into<String>,
        I: IntoIterator<Item = S>,
    {
        Schema::Enum {
            name: name.into(),
            symbols: symbols.into_iter().map(Into::into).collect(),
        }
    }

    pub fn fixed(name: impl Into<String>, size: usize) -> Self {
        Schema::Fixed {
            name: name.into(),
            size,
        }
    }

    pub fn array(element: Schema) -> Self {
        Schema::Array {
            element: Box::new(element),
        }
    }

    pub fn map(value: Schema) -> Self {
        Schema::Map {
            value: Box::new(value),
        }
    }

    pub fn union(members: impl IntoIterator<Item = Schema>) -> Self {
        Schema::Union {
            members: members.into_iter().collect(),
        }
    }

    /// `["null", inner]`
    pub fn nullable(inner: Schema) -> Self {
        Schema::Union {
            members: vec![Schema::Null, inner],
        }
    }

    /// Type name of a named schema (record, enum, fixed).
    pub fn name(&self) -> Option<&str> {
        match self {
            Schema::Enum { name, .. } | Schema::Fixed { name, .. } | Schema::Record { name, .. } => {
                Some(name)
            }
            _ => None,
        }
    }

    /// Declared fields of a record schema.
    pub fn fields(&self) -> Option<&[Field]> {
        match self {
            Schema::Record { fields, .. } => Some(fields),
            _ => None,
        }
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Schema::Enum { name, .. } | Schema::Fixed { name, .. } | Schema::Record { name, .. } => {
                write!(f, "{} {}", self.kind(), name)
            }
            Schema::Array { element } => write!(f, "array<{element}>"),
            Schema::Map { value } => write!(f, "map<{value}>"),
            Schema::Union { members } => {
                f.write_str("[")?;
                for (i, member) in members.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{member}")?;
                }
                f.write_str("]")
            }
            other => write!(f, "{}", other.kind()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nullable_puts_null_first() {
        let schema = Schema::nullable(Schema::String);
        assert_eq!(
            schema,
            Schema::Union {
                members: vec![Schema::Null, Schema::String]
            }
        );
    }

    #[test]
    fn display_names_named_types() {
        let rec = Schema::record("com.example.Point", [("x", Schema::Int)]);
        assert_eq!(rec.to_string(), "record com.example.Point");
        assert_eq!(Schema::nullable(Schema::Long).to_string(), "[null, long]");
    }
}
