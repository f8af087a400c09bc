//! # Event Journal Records
//!
//! Every successful transition appends one or more records. Records are
//! never mutated or removed. Each carries a sequence position independent
//! of wall-clock time and a deterministic tag:
//!
//! ```text
//! tag = keccak256(EVENT_CONST ‖ sequence ‖ operation ‖ agents… ‖ subject_tag)
//! ```
//!
//! `subject_tag` is the integrity tag or content fingerprint the event
//! carries, or 32 zero bytes.

use serde::{Deserialize, Serialize};
use shared_types::{pad_label, AgentId, Hash, MessageId, PackedEncoder, ZERO_HASH};
use sm_01_identity_registry::IdentityEvent;
use sm_02_message_ledger::MessageEvent;
use std::fmt;

/// Protocol constant for event record tags.
pub const EVENT_CONST: Hash = pad_label(b"SM_EVENT_RECORD_V1");

/// Stable name of a boundary operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OperationName {
    Register,
    UpdateRole,
    Deactivate,
    SendMessage,
    SendMessageWithReference,
    UpdateMessageStatus,
    BlockSender,
    UnblockSender,
    SetGlobalFilter,
    GrantPermission,
    RevokePermission,
    GrantAdmin,
    RevokeAdmin,
    Pause,
    Unpause,
}

impl OperationName {
    /// Name as recorded in the journal and hashed into tags.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Register => "register",
            Self::UpdateRole => "updateRole",
            Self::Deactivate => "deactivate",
            Self::SendMessage => "sendMessage",
            Self::SendMessageWithReference => "sendMessageWithReference",
            Self::UpdateMessageStatus => "updateMessageStatus",
            Self::BlockSender => "blockSender",
            Self::UnblockSender => "unblockSender",
            Self::SetGlobalFilter => "setGlobalFilter",
            Self::GrantPermission => "grantPermission",
            Self::RevokePermission => "revokePermission",
            Self::GrantAdmin => "grantAdmin",
            Self::RevokeAdmin => "revokeAdmin",
            Self::Pause => "pause",
            Self::Unpause => "unpause",
        }
    }
}

impl fmt::Display for OperationName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Events emitted by the engine itself.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AdminEvent {
    Paused { by: AgentId },
    Unpaused { by: AgentId },
    AdminGranted { agent: AgentId, by: AgentId },
    AdminRevoked { agent: AgentId, by: AgentId },
}

impl AdminEvent {
    fn agents(&self) -> Vec<AgentId> {
        match self {
            Self::Paused { by } | Self::Unpaused { by } => vec![*by],
            Self::AdminGranted { agent, by } | Self::AdminRevoked { agent, by } if agent != by => {
                vec![*agent, *by]
            }
            Self::AdminGranted { agent, .. } | Self::AdminRevoked { agent, .. } => vec![*agent],
        }
    }
}

/// Any event a transition can emit.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LedgerEvent {
    Identity(IdentityEvent),
    Message(MessageEvent),
    Admin(AdminEvent),
}

impl LedgerEvent {
    /// Identity keys involved, subject first.
    #[must_use]
    pub fn agents(&self) -> Vec<AgentId> {
        match self {
            Self::Identity(e) => e.agents(),
            Self::Message(e) => e.agents(),
            Self::Admin(e) => e.agents(),
        }
    }

    #[must_use]
    pub fn subject_tag(&self) -> Option<Hash> {
        match self {
            Self::Identity(e) => e.subject_tag(),
            Self::Message(e) => e.subject_tag(),
            Self::Admin(_) => None,
        }
    }

    #[must_use]
    pub fn message_id(&self) -> Option<MessageId> {
        match self {
            Self::Message(e) => e.message_id(),
            _ => None,
        }
    }
}

impl From<IdentityEvent> for LedgerEvent {
    fn from(e: IdentityEvent) -> Self {
        Self::Identity(e)
    }
}

impl From<MessageEvent> for LedgerEvent {
    fn from(e: MessageEvent) -> Self {
        Self::Message(e)
    }
}

impl From<AdminEvent> for LedgerEvent {
    fn from(e: AdminEvent) -> Self {
        Self::Admin(e)
    }
}

/// One journal entry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Position in the journal, starting at 0.
    pub sequence: u64,
    pub operation: OperationName,
    pub agents: Vec<AgentId>,
    pub message_id: Option<MessageId>,
    pub tag: Hash,
    pub event: LedgerEvent,
}

impl EventRecord {
    /// Builds a record and computes its tag.
    pub fn new(sequence: u64, operation: OperationName, event: LedgerEvent) -> Self {
        let agents = event.agents();
        let tag = event_tag(sequence, operation, &agents, event.subject_tag());
        Self {
            sequence,
            operation,
            agents,
            message_id: event.message_id(),
            tag,
            event,
        }
    }

    /// Recomputes the tag from the record's fields.
    #[must_use]
    pub fn verify_tag(&self) -> bool {
        event_tag(
            self.sequence,
            self.operation,
            &self.agents,
            self.event.subject_tag(),
        ) == self.tag
    }
}

/// Computes an event record tag.
#[must_use]
pub fn event_tag(
    sequence: u64,
    operation: OperationName,
    agents: &[AgentId],
    subject_tag: Option<Hash>,
) -> Hash {
    let mut enc = PackedEncoder::new();
    enc.hash(&EVENT_CONST)
        .word(sequence)
        .bytes(operation.as_str().as_bytes());
    for agent in agents {
        enc.agent(agent);
    }
    enc.hash(&subject_tag.unwrap_or(ZERO_HASH));
    enc.finish()
}
