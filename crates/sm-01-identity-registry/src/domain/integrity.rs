//! # Identity Integrity Tags
//!
//! A tag binds an identity key to its public-key fingerprint:
//!
//! ```text
//! tag = keccak256(IDENTITY_SIGNATURE_CONST ‖ id ‖ fingerprint ‖ IDENTITY_PROTOCOL_CONST)
//! ```
//!
//! The tag detects accidental corruption of a stored record. It is not a
//! signature: anyone who knows the constants can recompute it, which is the
//! point of publishing them through [`integrity_constants`].

use serde::{Deserialize, Serialize};
use shared_types::{pad_label, AgentId, Hash, PackedEncoder};

/// Leading protocol constant for identity tags.
pub const IDENTITY_SIGNATURE_CONST: Hash = pad_label(b"SM_IDENTITY_NEURAL_SIGNATURE_V1");

/// Trailing protocol constant for identity tags.
pub const IDENTITY_PROTOCOL_CONST: Hash = pad_label(b"SM_IDENTITY_QUANTUM_PROTOCOL_V1");

/// The constants external verifiers need to recompute identity tags.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntegrityConstants {
    /// Prepended to the packed fields.
    pub signature: Hash,
    /// Appended to the packed fields.
    pub protocol: Hash,
}

/// Result of re-checking a stored tag.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntegrityCheck {
    /// Stored tag equals the recomputed one.
    pub valid: bool,
    /// Marker flag stored on the record.
    pub enhanced: bool,
}

/// Returns the identity tag constants.
#[must_use]
pub const fn integrity_constants() -> IntegrityConstants {
    IntegrityConstants {
        signature: IDENTITY_SIGNATURE_CONST,
        protocol: IDENTITY_PROTOCOL_CONST,
    }
}

/// Computes the identity integrity tag.
#[must_use]
pub fn identity_integrity_tag(id: &AgentId, fingerprint: &Hash) -> Hash {
    PackedEncoder::new()
        .hash(&IDENTITY_SIGNATURE_CONST)
        .agent(id)
        .hash(fingerprint)
        .hash(&IDENTITY_PROTOCOL_CONST)
        .finish()
}
