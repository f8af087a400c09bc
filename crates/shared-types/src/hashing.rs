//! # Packed Keccak-256 Hashing
//!
//! Integrity tags bind record fields together by hashing their tightly packed
//! encoding: identity keys as 20 bytes, hashes as 32 bytes and integers as
//! 32-byte big-endian words. The same bytes always produce the same tag.

use crate::entities::{AgentId, Hash};
use sha3::{Digest, Keccak256};

/// Computes the Keccak-256 hash of data.
#[must_use]
pub fn keccak256(data: &[u8]) -> Hash {
    let mut hasher = Keccak256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Builds a fixed 32-byte protocol constant from an ASCII label.
///
/// The label is copied into the leading bytes and the rest is zero. Labels
/// longer than 32 bytes are truncated.
#[must_use]
pub const fn pad_label(label: &[u8]) -> Hash {
    let mut out = [0u8; 32];
    let mut i = 0;
    while i < label.len() && i < 32 {
        out[i] = label[i];
        i += 1;
    }
    out
}

/// ASCII case-insensitive substring search for any of the marker tokens.
///
/// Empty tokens never match.
#[must_use]
pub fn contains_marker(text: &str, markers: &[String]) -> bool {
    let haystack = text.to_ascii_lowercase();
    markers
        .iter()
        .filter(|m| !m.is_empty())
        .any(|m| haystack.contains(&m.to_ascii_lowercase()))
}

/// Incremental tightly-packed encoder that finishes into a Keccak-256 tag.
#[derive(Debug, Default, Clone)]
pub struct PackedEncoder {
    buf: Vec<u8>,
}

impl PackedEncoder {
    /// Creates an empty encoder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buf: Vec::with_capacity(160),
        }
    }

    /// Appends a 32-byte hash or constant.
    pub fn hash(&mut self, value: &Hash) -> &mut Self {
        self.buf.extend_from_slice(value);
        self
    }

    /// Appends a 20-byte identity key.
    pub fn agent(&mut self, id: &AgentId) -> &mut Self {
        self.buf.extend_from_slice(id.as_bytes());
        self
    }

    /// Appends an integer as a 32-byte big-endian word.
    pub fn word(&mut self, value: u64) -> &mut Self {
        self.buf.extend_from_slice(&[0u8; 24]);
        self.buf.extend_from_slice(&value.to_be_bytes());
        self
    }

    /// Appends raw bytes.
    pub fn bytes(&mut self, data: &[u8]) -> &mut Self {
        self.buf.extend_from_slice(data);
        self
    }

    /// Returns the packed bytes accumulated so far.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Hashes the packed encoding.
    #[must_use]
    pub fn finish(&self) -> Hash {
        keccak256(&self.buf)
    }
}
