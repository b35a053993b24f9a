//! Host-side values for the avrodyn codec.
//!
//! This crate holds the two host-facing halves of the bridge:
//!
//! - [`Value`] - the dynamic, structurally typed value tree that callers hand to
//!   `encode` and receive from `decode`.
//! - [`TargetType`] - the caller-declared shape a decoded value must conform to,
//!   including read-only and nilable modifiers.
//!
//! Containers ([`Record`], [`Map`], [`Sequence`]) can be frozen. Freezing is deep and
//! one-way; every mutating accessor on a frozen container fails with
//! [`ImmutableValueError`].
//!
//! The crate is `no_std` + `alloc`. The `std` feature (default) adds
//! `std::error::Error` impls, and the `serde` feature derives serde traits for the
//! target descriptor so it can be loaded from configuration files.

#![no_std]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

mod error;
mod target;
mod value;

pub use error::{ConversionError, ImmutableValueError};
pub use target::{PrimitiveKind, TargetField, TargetType};
pub use value::{FromValue, Map, Record, Sequence, Value, ValueKind};
