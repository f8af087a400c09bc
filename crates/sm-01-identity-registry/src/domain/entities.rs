//! Registry entities: the `Agent` record and its `Role`.

use super::integrity::identity_integrity_tag;
use serde::{Deserialize, Serialize};
use shared_types::{AgentId, Hash, Timestamp};
use std::fmt;

/// Role held by a registered agent. New agents start as `Participant`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum Role {
    /// Default role for every new registration.
    #[default]
    Participant,
    /// Evaluates credit and risk.
    Underwriter,
    /// Screens traffic for fraud patterns.
    FraudDetector,
    /// Regulatory and policy checks.
    Compliance,
    /// Orchestrates multi-party workflows.
    Coordinator,
}

impl Role {
    /// All roles in declaration order.
    pub const ALL: [Role; 5] = [
        Role::Participant,
        Role::Underwriter,
        Role::FraudDetector,
        Role::Compliance,
        Role::Coordinator,
    ];

    /// Stable uppercase label.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Participant => "PARTICIPANT",
            Self::Underwriter => "UNDERWRITER",
            Self::FraudDetector => "FRAUD_DETECTOR",
            Self::Compliance => "COMPLIANCE",
            Self::Coordinator => "COORDINATOR",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A registered participant.
///
/// `id`, `fingerprint` and `integrity_tag` never change once written. `role`
/// and `active` are the only mutable fields, and only through the registry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agent {
    /// Identity key.
    pub id: AgentId,
    /// Public-key fingerprint bound to this identity.
    pub fingerprint: Hash,
    /// Free-form identity document (typically a DID document).
    pub identity_document: String,
    /// Current role.
    pub role: Role,
    /// Timestamp of the registration that created this record.
    pub registered_at: Timestamp,
    /// Whether the agent may currently act.
    pub active: bool,
    /// `H(IDENTITY_SIGNATURE_CONST ‖ id ‖ fingerprint ‖ IDENTITY_PROTOCOL_CONST)`.
    pub integrity_tag: Hash,
    /// Set when the identity document carries a recognized marker token.
    pub enhanced: bool,
}

impl Agent {
    /// Recomputes the integrity tag and compares it with the stored one.
    #[must_use]
    pub fn verify_integrity(&self) -> bool {
        identity_integrity_tag(&self.id, &self.fingerprint) == self.integrity_tag
    }
}
