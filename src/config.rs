//! Codec options and resource limits.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Resource limits applied to every encode/decode call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Limits {
    /// Maximum nesting depth of the value being walked.
    pub max_depth: usize,
    /// Maximum number of nodes produced or consumed by one call.
    pub max_node_count: usize,
    /// Maximum length of a single string or byte payload.
    pub max_payload_size: usize,
    /// Maximum number of items in one array or entries in one map.
    pub max_sequence_len: usize,
    /// Maximum size of a raw datum handed to the wire codec.
    pub max_buffer_size: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_depth: 128,
            max_node_count: 1_000_000,
            max_payload_size: 8 * 1024 * 1024,
            max_sequence_len: 1_000_000,
            max_buffer_size: 16 * 1024 * 1024,
        }
    }
}

/// What to do when a byte sequence does not match a fixed schema's size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SizePolicy {
    /// Fail with `CodecError::FixedSize`.
    #[default]
    Strict,
    /// Pass the bytes through unchanged.
    Lenient,
}

/// How 64-bit host numbers are narrowed to 32-bit `int`/`float` schemas.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NarrowingPolicy {
    /// Truncating cast, no range check.
    #[default]
    Truncate,
    /// Fail with `CodecError::NumericOverflow` when the value does not fit.
    Checked,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecOptions {
    pub limits: Limits,
    pub fixed_size: SizePolicy,
    pub narrowing: NarrowingPolicy,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read options file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid options file: {0}")]
    Json(#[from] serde_json::Error),
}

impl CodecOptions {
    /// Load options from a JSON file. Missing keys take their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    pub fn with_fixed_size(mut self, policy: SizePolicy) -> Self {
        self.fixed_size = policy;
        self
    }

    pub fn with_narrowing(mut self, policy: NarrowingPolicy) -> Self {
        self.narrowing = policy;
        self
    }
}
