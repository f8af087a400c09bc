//! Ledger error types.

use super::entities::MessageStatus;
use shared_types::{AgentId, ErrorKind, MessageId};
use thiserror::Error;

/// Errors returned by ledger operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// Caller is not an active registered agent.
    #[error("agent {0} is not registered or not active")]
    NotRegistered(AgentId),

    /// Recipient is the sender, zero, unknown or inactive.
    #[error("invalid recipient {recipient}: {reason}")]
    InvalidRecipient {
        recipient: AgentId,
        reason: &'static str,
    },

    /// Recipient has blocked the sender.
    #[error("recipient {recipient} has blocked sender {sender}")]
    RecipientBlocked { sender: AgentId, recipient: AgentId },

    /// Sender is under the administrator's global filter.
    #[error("sender {0} is globally filtered")]
    SenderFiltered(AgentId),

    /// Content fingerprint is empty.
    #[error("content fingerprint is empty")]
    InvalidFingerprint,

    /// Storage reference is empty or too long.
    #[error("invalid storage reference: {reason}")]
    InvalidReference { reason: &'static str },

    /// Metadata exceeds the configured maximum.
    #[error("invalid metadata: {reason}")]
    InvalidMetadata { reason: &'static str },

    /// Unknown message identifier.
    #[error("message {0} not found")]
    MessageNotFound(MessageId),

    /// Caller is not allowed to perform the operation.
    #[error("caller {caller} is not authorized: {reason}")]
    Unauthorized {
        caller: AgentId,
        reason: &'static str,
    },

    /// Status change rejected by the configured policy.
    #[error("status change {from} -> {to} is not allowed")]
    InvalidTransition {
        from: MessageStatus,
        to: MessageStatus,
    },

    /// An agent cannot block itself.
    #[error("agent cannot block itself")]
    CannotBlockSelf,

    /// Sender already blocked by this recipient.
    #[error("sender {0} is already blocked")]
    AlreadyBlocked(AgentId),

    /// Sender is not blocked by this recipient.
    #[error("sender {0} is not blocked")]
    NotBlocked(AgentId),

    /// Zero identity given where an agent is required.
    #[error("invalid identity key")]
    InvalidIdentity,

    /// Permission resource name is empty or too long.
    #[error("invalid permission resource: {reason}")]
    InvalidResource { reason: &'static str },

    /// Permission already granted.
    #[error("agent {agent} already holds permission '{resource}'")]
    PermissionExists { agent: AgentId, resource: String },

    /// Permission not held.
    #[error("agent {agent} does not hold permission '{resource}'")]
    PermissionMissing { agent: AgentId, resource: String },

    /// A counter would overflow.
    #[error("counter overflow")]
    CounterOverflow,
}

impl LedgerError {
    /// Maps the error onto the shared taxonomy.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotRegistered(_) => ErrorKind::NotActive,
            Self::RecipientBlocked { .. } | Self::SenderFiltered(_) => ErrorKind::RecipientBlocked,
            Self::InvalidRecipient { .. }
            | Self::InvalidFingerprint
            | Self::InvalidReference { .. }
            | Self::InvalidMetadata { .. }
            | Self::CannotBlockSelf
            | Self::InvalidIdentity
            | Self::InvalidResource { .. } => ErrorKind::InvalidInput,
            Self::MessageNotFound(_) | Self::NotBlocked(_) | Self::PermissionMissing { .. } => {
                ErrorKind::NotFound
            }
            Self::AlreadyBlocked(_) | Self::PermissionExists { .. } => ErrorKind::AlreadyExists,
            Self::Unauthorized { .. } => ErrorKind::Unauthorized,
            Self::InvalidTransition { .. } => ErrorKind::InvalidTransition,
            Self::CounterOverflow => ErrorKind::ResourceExhausted,
        }
    }
}
