//! Message integrity tags.
//!
//! ```text
//! tag = keccak256(MESSAGE_PATTERN_CONST ‖ from ‖ to ‖ fingerprint ‖ timestamp ‖ MESSAGE_MARKER_CONST)
//! ```
//!
//! The timestamp is packed as a 32-byte big-endian word.

use serde::{Deserialize, Serialize};
use shared_types::{pad_label, AgentId, Hash, PackedEncoder, Timestamp};

/// Leading protocol constant for message tags.
pub const MESSAGE_PATTERN_CONST: Hash = pad_label(b"SM_MESSAGE_NEURAL_PATTERN_V1");

/// Trailing protocol constant for message tags.
pub const MESSAGE_MARKER_CONST: Hash = pad_label(b"SM_MESSAGE_QUANTUM_MARKER_V1");

/// The constants external verifiers need to recompute message tags.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageIntegrityConstants {
    pub pattern: Hash,
    pub marker: Hash,
}

#[must_use]
pub const fn message_integrity_constants() -> MessageIntegrityConstants {
    MessageIntegrityConstants {
        pattern: MESSAGE_PATTERN_CONST,
        marker: MESSAGE_MARKER_CONST,
    }
}

/// Computes the message integrity tag.
#[must_use]
pub fn message_integrity_tag(
    from: &AgentId,
    to: &AgentId,
    content_fingerprint: &Hash,
    timestamp: Timestamp,
) -> Hash {
    PackedEncoder::new()
        .hash(&MESSAGE_PATTERN_CONST)
        .agent(from)
        .agent(to)
        .hash(content_fingerprint)
        .word(timestamp)
        .hash(&MESSAGE_MARKER_CONST)
        .finish()
}
