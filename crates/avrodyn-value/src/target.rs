//! Target type descriptors
//!
//! A [`TargetType`] describes the host-side shape a decoded value must take.
//! It mirrors the structural types of the host: primitives, byte strings,
//! records, arrays, maps, unions, and a `Wrapped` layer that carries the
//! read-only modifier.

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

/// Primitive host types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PrimitiveKind {
    Nil,
    Boolean,
    Int,
    Float,
    /// Text, produced as `Value::String`.
    String,
    /// Text, produced as `Value::EnumSymbol`.
    Symbol,
}

/// One named field of a record descriptor.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TargetField {
    pub name: String,
    pub ty: TargetType,
}

impl TargetField {
    pub fn new(name: impl Into<String>, ty: TargetType) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// Caller-declared host type for the decode path.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum TargetType {
    /// Unconstrained; the schema alone decides the value shape.
    Any,
    Primitive(PrimitiveKind),
    Bytes,
    /// Fields are kept in declaration order.
    Record { fields: Vec<TargetField> },
    Array { element: Box<TargetType> },
    Map { value: Box<TargetType> },
    Union { members: Vec<TargetType> },
    /// Modifier layer. With `readonly` set, the constructed value is frozen.
    Wrapped { inner: Box<TargetType>, readonly: bool },
}

impl Default for TargetType {
    fn default() -> Self {
        TargetType::Any
    }
}

impl TargetType {
    pub fn any() -> Self {
        TargetType::Any
    }

    pub fn nil() -> Self {
        TargetType::Primitive(PrimitiveKind::Nil)
    }

    pub fn boolean() -> Self {
        TargetType::Primitive(PrimitiveKind::Boolean)
    }

    pub fn int() -> Self {
        TargetType::Primitive(PrimitiveKind::Int)
    }

    pub fn float() -> Self {
        TargetType::Primitive(PrimitiveKind::Float)
    }

    pub fn string() -> Self {
        TargetType::Primitive(PrimitiveKind::String)
    }

    pub fn symbol() -> Self {
        TargetType::Primitive(PrimitiveKind::Symbol)
    }

    pub fn bytes() -> Self {
        TargetType::Bytes
    }

    pub fn array(element: TargetType) -> Self {
        TargetType::Array {
            element: Box::new(element),
        }
    }

    pub fn map(value: TargetType) -> Self {
        TargetType::Map {
            value: Box::new(value),
        }
    }

    pub fn record<K, I>(fields: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, TargetType)>,
    {
        TargetType::Record {
            fields: fields
                .into_iter()
                .map(|(name, ty)| TargetField::new(name, ty))
                .collect(),
        }
    }

    pub fn union(members: impl IntoIterator<Item = TargetType>) -> Self {
        TargetType::Union {
            members: members.into_iter().collect(),
        }
    }

    /// `T?`: the type itself or nil.
    pub fn nilable(inner: TargetType) -> Self {
        TargetType::Union {
            members: alloc::vec![inner, TargetType::nil()],
        }
    }

    pub fn readonly(inner: TargetType) -> Self {
        Self::wrapped(inner, true)
    }

    pub fn wrapped(inner: TargetType, readonly: bool) -> Self {
        TargetType::Wrapped {
            inner: Box::new(inner),
            readonly,
        }
    }

    /// Strip every `Wrapped` layer.
    pub fn unwrapped(&self) -> &TargetType {
        let mut current = self;
        while let TargetType::Wrapped { inner, .. } = current {
            current = inner;
        }
        current
    }

    /// True when any `Wrapped` layer on the outside is read-only.
    pub fn is_readonly(&self) -> bool {
        let mut current = self;
        while let TargetType::Wrapped { inner, readonly } = current {
            if *readonly {
                return true;
            }
            current = inner;
        }
        false
    }

    /// Descriptor of field `name`, if this is a record descriptor (after unwrapping).
    pub fn field(&self, name: &str) -> Option<&TargetType> {
        match self.unwrapped() {
            TargetType::Record { fields } => fields.iter().find(|f| f.name == name).map(|f| &f.ty),
            _ => None,
        }
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PrimitiveKind::Nil => "()",
            PrimitiveKind::Boolean => "boolean",
            PrimitiveKind::Int => "int",
            PrimitiveKind::Float => "float",
            PrimitiveKind::String => "string",
            PrimitiveKind::Symbol => "symbol",
        };
        f.write_str(name)
    }
}

impl fmt::Display for TargetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TargetType::Any => f.write_str("any"),
            TargetType::Primitive(kind) => write!(f, "{kind}"),
            TargetType::Bytes => f.write_str("byte[]"),
            TargetType::Record { fields } => {
                f.write_str("record {")?;
                for (i, field) in fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, " {} {}", field.ty, field.name)?;
                }
                f.write_str(" }")
            }
            TargetType::Array { element } => write!(f, "{element}[]"),
            TargetType::Map { value } => write!(f, "map<{value}>"),
            TargetType::Union { members } => {
                for (i, member) in members.iter().enumerate() {
                    if i > 0 {
                        f.write_str("|")?;
                    }
                    write!(f, "{member}")?;
                }
                Ok(())
            }
            TargetType::Wrapped { inner, readonly: true } => write!(f, "readonly {inner}"),
            TargetType::Wrapped { inner, readonly: false } => write!(f, "{inner}"),
        }
    }
}
