//! Transaction envelope and receipt.
//!
//! The sequencing layer orders transactions and attributes each one to an
//! authenticated caller before it reaches the engine. The timestamp comes
//! from that layer too; the engine never reads a clock.

use crate::events::{EventRecord, OperationName};
use serde::{Deserialize, Serialize};
use shared_types::{AgentId, Hash, MessageId, Timestamp};
use sm_01_identity_registry::Role;
use sm_02_message_ledger::{MessageStatus, SendRequest};
use std::ops::Range;

/// A mutating operation and its arguments.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Call {
    Register {
        fingerprint: Hash,
        identity_document: String,
    },
    UpdateRole {
        agent: AgentId,
        role: Role,
    },
    Deactivate {
        agent: AgentId,
    },
    SendMessage {
        request: SendRequest,
    },
    SendMessageWithReference {
        request: SendRequest,
        storage_reference: String,
    },
    UpdateMessageStatus {
        id: MessageId,
        status: MessageStatus,
    },
    BlockSender {
        sender: AgentId,
    },
    UnblockSender {
        sender: AgentId,
    },
    SetGlobalFilter {
        agent: AgentId,
        filtered: bool,
    },
    GrantPermission {
        agent: AgentId,
        resource: String,
    },
    RevokePermission {
        agent: AgentId,
        resource: String,
    },
    GrantAdmin {
        agent: AgentId,
    },
    RevokeAdmin {
        agent: AgentId,
    },
    Pause,
    Unpause,
}

impl Call {
    #[must_use]
    pub fn operation(&self) -> OperationName {
        match self {
            Self::Register { .. } => OperationName::Register,
            Self::UpdateRole { .. } => OperationName::UpdateRole,
            Self::Deactivate { .. } => OperationName::Deactivate,
            Self::SendMessage { .. } => OperationName::SendMessage,
            Self::SendMessageWithReference { .. } => OperationName::SendMessageWithReference,
            Self::UpdateMessageStatus { .. } => OperationName::UpdateMessageStatus,
            Self::BlockSender { .. } => OperationName::BlockSender,
            Self::UnblockSender { .. } => OperationName::UnblockSender,
            Self::SetGlobalFilter { .. } => OperationName::SetGlobalFilter,
            Self::GrantPermission { .. } => OperationName::GrantPermission,
            Self::RevokePermission { .. } => OperationName::RevokePermission,
            Self::GrantAdmin { .. } => OperationName::GrantAdmin,
            Self::RevokeAdmin { .. } => OperationName::RevokeAdmin,
            Self::Pause => OperationName::Pause,
            Self::Unpause => OperationName::Unpause,
        }
    }

    /// Capability the caller must hold, as declared at the boundary.
    #[must_use]
    pub fn requirement(&self) -> Requirement {
        match self {
            Self::Register { .. } => Requirement::None,
            Self::Deactivate { .. } => Requirement::AgentOrAdministrator,
            Self::SendMessage { .. }
            | Self::SendMessageWithReference { .. }
            | Self::BlockSender { .. }
            | Self::UnblockSender { .. } => Requirement::RegisteredAgent,
            Self::UpdateMessageStatus { .. } => Requirement::MessageParticipant,
            Self::UpdateRole { .. }
            | Self::SetGlobalFilter { .. }
            | Self::GrantPermission { .. }
            | Self::RevokePermission { .. }
            | Self::GrantAdmin { .. }
            | Self::RevokeAdmin { .. }
            | Self::Pause
            | Self::Unpause => Requirement::Administrator,
        }
    }
}

/// Capability requirement of an operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Requirement {
    None,
    RegisteredAgent,
    MessageParticipant,
    AgentOrAdministrator,
    Administrator,
}

/// A totally ordered, attributed transaction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub caller: AgentId,
    pub timestamp: Timestamp,
    pub call: Call,
}

impl Transaction {
    pub fn new(caller: AgentId, timestamp: Timestamp, call: Call) -> Self {
        Self {
            caller,
            timestamp,
            call,
        }
    }
}

/// What a successful transition produced beyond its events.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Applied,
    MessageCreated(MessageId),
}

/// Result of a successful transition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Receipt {
    pub operation: OperationName,
    pub caller: AgentId,
    /// Journal positions of the records in `events`.
    pub sequence_range: Range<u64>,
    pub events: Vec<EventRecord>,
    pub gas_used: u64,
    pub outcome: Outcome,
}

impl Receipt {
    /// Identifier of the created message, for sends.
    #[must_use]
    pub fn message_id(&self) -> Option<MessageId> {
        match self.outcome {
            Outcome::MessageCreated(id) => Some(id),
            Outcome::Applied => None,
        }
    }
}
