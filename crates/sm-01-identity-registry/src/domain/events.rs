//! Events emitted by successful registry operations.
//!
//! The engine wraps these into sequenced, tagged journal records.

use super::entities::Role;
use serde::{Deserialize, Serialize};
use shared_types::{AgentId, Hash, Timestamp};

/// Registry event.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum IdentityEvent {
    /// A new (or re-entering) agent was registered.
    AgentRegistered {
        agent: AgentId,
        fingerprint: Hash,
        role: Role,
        registered_at: Timestamp,
    },
    /// Integrity tag computed for a registration.
    IntegrityVerified {
        agent: AgentId,
        integrity_tag: Hash,
        enhanced: bool,
    },
    /// Administrator changed an agent's role.
    RoleUpdated {
        agent: AgentId,
        previous: Role,
        role: Role,
    },
    /// Agent deactivated by itself or by an administrator.
    AgentDeactivated { agent: AgentId, by: AgentId },
}

impl IdentityEvent {
    /// Identity keys involved in the event, subject first.
    #[must_use]
    pub fn agents(&self) -> Vec<AgentId> {
        match self {
            Self::AgentRegistered { agent, .. }
            | Self::IntegrityVerified { agent, .. }
            | Self::RoleUpdated { agent, .. } => vec![*agent],
            Self::AgentDeactivated { agent, by } if agent != by => vec![*agent, *by],
            Self::AgentDeactivated { agent, .. } => vec![*agent],
        }
    }

    /// Integrity tag carried by the event, if any.
    #[must_use]
    pub fn subject_tag(&self) -> Option<Hash> {
        match self {
            Self::IntegrityVerified { integrity_tag, .. } => Some(*integrity_tag),
            _ => None,
        }
    }
}
