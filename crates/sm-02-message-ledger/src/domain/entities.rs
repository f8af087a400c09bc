//! Ledger entities: `Message`, `Priority`, `MessageStatus` and the send request.

use serde::{Deserialize, Serialize};
use shared_types::{AgentId, Hash, MessageId, Timestamp};
use std::fmt;

/// Message priority, `Low` through `Emergency`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum Priority {
    Low,
    #[default]
    Normal,
    High,
    Critical,
    Emergency,
}

impl Priority {
    /// Number of priority levels.
    pub const COUNT: usize = 5;

    /// All priorities in ascending order.
    pub const ALL: [Priority; Self::COUNT] = [
        Priority::Low,
        Priority::Normal,
        Priority::High,
        Priority::Critical,
        Priority::Emergency,
    ];

    /// Position in `ALL`, `0..COUNT`.
    #[must_use]
    pub fn ordinal(&self) -> usize {
        match self {
            Self::Low => 0,
            Self::Normal => 1,
            Self::High => 2,
            Self::Critical => 3,
            Self::Emergency => 4,
        }
    }

    /// Stable lowercase label, used as a metrics label value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Normal => "normal",
            Self::High => "high",
            Self::Critical => "critical",
            Self::Emergency => "emergency",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Delivery status of a message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MessageStatus {
    /// Accepted by the ledger.
    Sent,
    /// Confirmed as received.
    Delivered,
    /// Opened by the recipient.
    Read,
    /// Acknowledged by the recipient.
    Acknowledged,
    /// Delivery or processing failed.
    Failed,
}

impl MessageStatus {
    /// Returns true if the status can only be changed by the recipient.
    #[must_use]
    pub fn recipient_only(&self) -> bool {
        matches!(self, Self::Read | Self::Acknowledged)
    }

    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sent => "SENT",
            Self::Delivered => "DELIVERED",
            Self::Read => "READ",
            Self::Acknowledged => "ACKNOWLEDGED",
            Self::Failed => "FAILED",
        }
    }
}

impl fmt::Display for MessageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One routed communication.
///
/// Everything except `status` is fixed at creation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Monotonic identifier, first message is 1.
    pub id: MessageId,
    pub from: AgentId,
    pub to: AgentId,
    /// Hash of the off-ledger encrypted payload.
    pub content_fingerprint: Hash,
    /// Off-ledger storage reference, only for reference sends.
    pub storage_reference: Option<String>,
    /// Free-form metadata.
    pub metadata: String,
    pub priority: Priority,
    pub status: MessageStatus,
    pub created_at: Timestamp,
    /// `H(MESSAGE_PATTERN_CONST ‖ from ‖ to ‖ fingerprint ‖ created_at ‖ MESSAGE_MARKER_CONST)`.
    pub integrity_tag: Hash,
    /// Set when the metadata carries a recognized marker token.
    pub enhanced: bool,
    /// Metered cost of the send that created this record.
    pub resource_cost: u64,
}

impl Message {
    /// Returns true if `agent` is the sender or the recipient.
    #[must_use]
    pub fn is_participant(&self, agent: &AgentId) -> bool {
        self.from == *agent || self.to == *agent
    }
}

/// Arguments of a send, shared by plain and reference sends.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendRequest {
    pub to: AgentId,
    pub content_fingerprint: Hash,
    pub metadata: String,
    pub priority: Priority,
}

impl SendRequest {
    /// Creates a request with empty metadata and `Normal` priority.
    pub fn new(to: AgentId, content_fingerprint: Hash) -> Self {
        Self {
            to,
            content_fingerprint,
            metadata: String::new(),
            priority: Priority::Normal,
        }
    }

    /// Sets the metadata.
    #[must_use]
    pub fn with_metadata(mut self, metadata: impl Into<String>) -> Self {
        self.metadata = metadata.into();
        self
    }

    /// Sets the priority.
    #[must_use]
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }
}
