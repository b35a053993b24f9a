//! Errors raised by the value model

use alloc::boxed::Box;
use alloc::string::String;
use core::fmt;

/// A mutation was attempted on a frozen container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImmutableValueError {
    container: &'static str,
}

impl ImmutableValueError {
    pub(crate) const fn new(container: &'static str) -> Self {
        Self { container }
    }

    /// The kind of container that rejected the mutation (`record`, `map`, `sequence`).
    pub fn container(&self) -> &'static str {
        self.container
    }
}

impl fmt::Display for ImmutableValueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cannot modify a read-only {}", self.container)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ImmutableValueError {}

/// Failure converting a [`Value`](crate::Value) into a Rust type.
#[derive(Debug, Clone, PartialEq)]
pub enum ConversionError {
    /// The value has a different kind than the one requested.
    TypeMismatch { expected: String, got: String },
    /// Conversion of a sequence item failed.
    IndexError(usize, Box<ConversionError>),
    /// Conversion of a record field failed.
    FieldError(String, Box<ConversionError>),
    /// A required record field is absent.
    MissingField(String),
}

impl fmt::Display for ConversionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConversionError::TypeMismatch { expected, got } => {
                write!(f, "type mismatch: expected {}, got {}", expected, got)
            }
            ConversionError::IndexError(index, inner) => write!(f, "at index {}: {}", index, inner),
            ConversionError::FieldError(name, inner) => write!(f, "in field '{}': {}", name, inner),
            ConversionError::MissingField(name) => write!(f, "missing field '{}'", name),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ConversionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ConversionError::IndexError(_, inner) | ConversionError::FieldError(_, inner) => {
                Some(inner.as_ref())
            }
            _ => None,
        }
    }
}
