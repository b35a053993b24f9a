//! Structural fingerprints for schemas.
//!
//! Schemas are hashed as a Merkle tree. Record field names and enum symbols are part
//! of the hash; type names are not, so `Point` and `Vec2` with the same fields share
//! a fingerprint.
//!
//! - Primitives have fixed hashes
//! - `hash(array<T>) = sha256(TAG_ARRAY, hash(T))`
//! - `hash(record { x: int }) = sha256(TAG_RECORD, 1, "x", hash(int))`
//! - Union member order is significant (it is part of the wire encoding)

use sha2::{Digest, Sha256};

use super::Schema;

/// A 256-bit schema fingerprint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SchemaHash([u8; 32]);

impl SchemaHash {
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{:02x}", b)).collect()
    }
}

impl std::fmt::Display for SchemaHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

const fn primitive(code: u8) -> SchemaHash {
    let mut bytes = [0u8; 32];
    bytes[1] = code;
    SchemaHash(bytes)
}

pub const HASH_NULL: SchemaHash = primitive(0x01);
pub const HASH_BOOLEAN: SchemaHash = primitive(0x02);
pub const HASH_INT: SchemaHash = primitive(0x03);
pub const HASH_LONG: SchemaHash = primitive(0x04);
pub const HASH_FLOAT: SchemaHash = primitive(0x05);
pub const HASH_DOUBLE: SchemaHash = primitive(0x06);
pub const HASH_BYTES: SchemaHash = primitive(0x07);
pub const HASH_STRING: SchemaHash = primitive(0x08);

const TAG_ENUM: u8 = 0x10;
const TAG_FIXED: u8 = 0x11;
const TAG_ARRAY: u8 = 0x12;
const TAG_MAP: u8 = 0x13;
const TAG_RECORD: u8 = 0x14;
const TAG_UNION: u8 = 0x15;

/// Builder for computing schema hashes.
pub struct SchemaHasher {
    hasher: Sha256,
}

impl SchemaHasher {
    pub fn new() -> Self {
        Self {
            hasher: Sha256::new(),
        }
    }

    /// Add a tag byte identifying the constructor being hashed.
    pub fn tag(mut self, tag: u8) -> Self {
        self.hasher.update([tag]);
        self
    }

    /// Add a length-prefixed string.
    pub fn string(mut self, s: &str) -> Self {
        self.hasher.update((s.len() as u32).to_le_bytes());
        self.hasher.update(s.as_bytes());
        self
    }

    pub fn child(mut self, hash: &SchemaHash) -> Self {
        self.hasher.update(hash.as_bytes());
        self
    }

    pub fn count(mut self, n: usize) -> Self {
        self.hasher.update((n as u64).to_le_bytes());
        self
    }

    pub fn finish(self) -> SchemaHash {
        let result = self.hasher.finalize();
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&result);
        SchemaHash(bytes)
    }
}

impl Default for SchemaHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl Schema {
    /// Structural fingerprint of this schema.
    pub fn fingerprint(&self) -> SchemaHash {
        match self {
            Schema::Null => HASH_NULL,
            Schema::Boolean => HASH_BOOLEAN,
            Schema::Int => HASH_INT,
            Schema::Long => HASH_LONG,
            Schema::Float => HASH_FLOAT,
            Schema::Double => HASH_DOUBLE,
            Schema::Bytes => HASH_BYTES,
            Schema::String => HASH_STRING,
            Schema::Enum { symbols, .. } => {
                let mut hasher = SchemaHasher::new().tag(TAG_ENUM).count(symbols.len());
                for symbol in symbols {
                    hasher = hasher.string(symbol);
                }
                hasher.finish()
            }
            Schema::Fixed { size, .. } => SchemaHasher::new().tag(TAG_FIXED).count(*size).finish(),
            Schema::Array { element } => SchemaHasher::new()
                .tag(TAG_ARRAY)
                .child(&element.fingerprint())
                .finish(),
            Schema::Map { value } => SchemaHasher::new()
                .tag(TAG_MAP)
                .child(&value.fingerprint())
                .finish(),
            Schema::Record { fields, .. } => {
                let mut hasher = SchemaHasher::new().tag(TAG_RECORD).count(fields.len());
                for field in fields {
                    hasher = hasher.string(&field.name).child(&field.schema.fingerprint());
                }
                hasher.finish()
            }
            Schema::Union { members } => {
                let mut hasher = SchemaHasher::new().tag(TAG_UNION).count(members.len());
                for member in members {
                    hasher = hasher.child(&member.fingerprint());
                }
                hasher.finish()
            }
        }
    }
}
