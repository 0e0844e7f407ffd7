//! Decoder configuration.

use serde::{Deserialize, Serialize};

/// Configuration for reading QG8 files.
///
/// Serializable so front ends can load it from a JSON file; missing fields
/// take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// Reject non-zero reserved bytes in chunk frames and tensor headers
    strict_reserved: bool,

    /// Check each tensor's computed payload length against its chunk's skip value
    verify_payload_len: bool,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            strict_reserved: false,
            verify_payload_len: true,
        }
    }
}

impl CodecConfig {
    /// Create a new CodecConfig with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether non-zero reserved bytes are an error.
    pub fn strict_reserved(mut self, strict: bool) -> Self {
        self.strict_reserved = strict;
        self
    }

    /// Set whether payload lengths are verified against skip values.
    pub fn verify_payload_len(mut self, verify: bool) -> Self {
        self.verify_payload_len = verify;
        self
    }

    pub fn is_strict_reserved(&self) -> bool {
        self.strict_reserved
    }

    pub fn should_verify_payload_len(&self) -> bool {
        self.verify_payload_len
    }
}
