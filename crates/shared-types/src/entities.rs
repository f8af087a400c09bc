//! # Core Domain Entities
//!
//! Primitive value types used across the ledger.
//!
//! - `AgentId`: the 20-byte identity key of a participant
//! - `Hash`: a 32-byte Keccak-256 digest or fingerprint
//! - `Timestamp`: seconds supplied by the sequencing layer
//! - `MessageId`: monotonically increasing ledger identifier

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A 32-byte hash (Keccak-256 digest, public-key or content fingerprint).
pub type Hash = [u8; 32];

/// The all-zero hash. Treated as "empty" wherever a fingerprint is required.
pub const ZERO_HASH: Hash = [0u8; 32];

/// Timestamp in seconds. Always taken from the transaction envelope.
pub type Timestamp = u64;

/// Ledger message identifier. The first message gets id 1.
pub type MessageId = u64;

/// Returns true if the hash is the empty (all-zero) value.
#[must_use]
pub fn is_empty_hash(hash: &Hash) -> bool {
    hash == &ZERO_HASH
}

// =============================================================================
// AGENT ID (20 bytes)
// =============================================================================

/// Identity key of a participant.
///
/// Ordered so it can key the `BTreeMap`s that keep state iteration
/// deterministic across replicas.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct AgentId(pub [u8; 20]);

impl AgentId {
    /// The zero identity. Never a valid caller or participant.
    pub const ZERO: Self = Self([0u8; 20]);

    /// Creates an identity key from a 20-byte array.
    #[must_use]
    pub const fn new(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    /// Creates an identity key from a slice. Returns None if wrong length.
    #[must_use]
    pub fn from_slice(slice: &[u8]) -> Option<Self> {
        if slice.len() == 20 {
            let mut bytes = [0u8; 20];
            bytes.copy_from_slice(slice);
            Some(Self(bytes))
        } else {
            None
        }
    }

    /// Returns the underlying bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    /// Returns true if this is the zero identity.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 20]
    }
}

impl fmt::Debug for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}...{}", hex::encode(&self.0[..4]), hex::encode(&self.0[18..]))
    }
}

impl From<[u8; 20]> for AgentId {
    fn from(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }
}

impl From<AgentId> for [u8; 20] {
    fn from(id: AgentId) -> Self {
        id.0
    }
}

/// Error returned when parsing an `AgentId` from hex fails.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid agent id: {0}")]
pub struct ParseAgentIdError(pub String);

impl FromStr for AgentId {
    type Err = ParseAgentIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(digits).map_err(|e| ParseAgentIdError(e.to_string()))?;
        Self::from_slice(&bytes)
            .ok_or_else(|| ParseAgentIdError(format!("expected 20 bytes, got {}", bytes.len())))
    }
}
