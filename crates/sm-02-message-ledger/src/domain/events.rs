//! Events emitted by successful ledger operations.

use super::entities::{MessageStatus, Priority};
use serde::{Deserialize, Serialize};
use shared_types::{AgentId, Hash, MessageId, Timestamp};

/// Ledger event.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageEvent {
    /// A message record was created.
    MessageSent {
        id: MessageId,
        from: AgentId,
        to: AgentId,
        content_fingerprint: Hash,
        priority: Priority,
        timestamp: Timestamp,
    },
    /// Integrity tag computed for a new message.
    MessageIntegrity {
        id: MessageId,
        integrity_tag: Hash,
        enhanced: bool,
    },
    /// A message reached `DELIVERED`.
    MessageDelivered { id: MessageId, to: AgentId },
    /// Status changed through `update_status`.
    StatusChanged {
        id: MessageId,
        by: AgentId,
        previous: MessageStatus,
        status: MessageStatus,
    },
    SenderBlocked { recipient: AgentId, sender: AgentId },
    SenderUnblocked { recipient: AgentId, sender: AgentId },
    GlobalFilterSet {
        agent: AgentId,
        filtered: bool,
        by: AgentId,
    },
    PermissionGranted {
        agent: AgentId,
        resource: String,
        by: AgentId,
    },
    PermissionRevoked {
        agent: AgentId,
        resource: String,
        by: AgentId,
    },
}

impl MessageEvent {
    /// Identity keys involved in the event, subject first, without duplicates.
    #[must_use]
    pub fn agents(&self) -> Vec<AgentId> {
        let mut agents = match self {
            Self::MessageSent { from, to, .. } => vec![*from, *to],
            Self::MessageIntegrity { .. } => Vec::new(),
            Self::MessageDelivered { to, .. } => vec![*to],
            Self::StatusChanged { by, .. } => vec![*by],
            Self::SenderBlocked { recipient, sender } | Self::SenderUnblocked { recipient, sender } => {
                vec![*recipient, *sender]
            }
            Self::GlobalFilterSet { agent, by, .. }
            | Self::PermissionGranted { agent, by, .. }
            | Self::PermissionRevoked { agent, by, .. } => vec![*agent, *by],
        };
        agents.dedup();
        agents
    }

    /// Message the event refers to, if any.
    #[must_use]
    pub fn message_id(&self) -> Option<MessageId> {
        match self {
            Self::MessageSent { id, .. }
            | Self::MessageIntegrity { id, .. }
            | Self::MessageDelivered { id, .. }
            | Self::StatusChanged { id, .. } => Some(*id),
            _ => None,
        }
    }

    /// Integrity tag carried by the event, if any.
    #[must_use]
    pub fn subject_tag(&self) -> Option<Hash> {
        match self {
            Self::MessageIntegrity { integrity_tag, .. } => Some(*integrity_tag),
            Self::MessageSent {
                content_fingerprint,
                ..
            } => Some(*content_fingerprint),
            _ => None,
        }
    }
}
