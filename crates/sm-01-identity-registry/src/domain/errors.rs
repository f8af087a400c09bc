//! Registry error types.

use shared_types::{AgentId, ErrorKind};
use thiserror::Error;

/// Errors returned by registry operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentityError {
    /// Caller is already an active agent.
    #[error("agent {0} is already registered")]
    AlreadyRegistered(AgentId),

    /// Fingerprint is empty or bound to an existing record.
    #[error("invalid fingerprint: {reason}")]
    InvalidFingerprint { reason: &'static str },

    /// Identity document is empty or too large.
    #[error("invalid identity document: {reason}")]
    InvalidDocument { reason: &'static str },

    /// The zero identity cannot register or be targeted.
    #[error("invalid identity key")]
    InvalidIdentity,

    /// Target agent is unknown or inactive.
    #[error("agent {0} not found")]
    NotFound(AgentId),

    /// Target agent is already inactive.
    #[error("agent {0} is not active")]
    NotActive(AgentId),

    /// Caller may not act on the target agent.
    #[error("caller {caller} is not authorized for agent {target}")]
    Unauthorized { caller: AgentId, target: AgentId },
}

impl IdentityError {
    /// Maps the error onto the shared taxonomy.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::AlreadyRegistered(_) => ErrorKind::AlreadyExists,
            Self::InvalidFingerprint { .. }
            | Self::InvalidDocument { .. }
            | Self::InvalidIdentity => ErrorKind::InvalidInput,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::NotActive(_) => ErrorKind::NotActive,
            Self::Unauthorized { .. } => ErrorKind::Unauthorized,
        }
    }
}
