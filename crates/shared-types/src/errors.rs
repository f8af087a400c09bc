//! # Error Taxonomy
//!
//! Every component error maps onto one `ErrorKind`, so callers and indexers
//! can tell which class of invariant a rejected transition violated without
//! knowing each component's error enum.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Class of a rejected operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Empty, oversized or malformed arguments.
    InvalidInput,
    /// Unknown identifier.
    NotFound,
    /// Identity or record already present (covers `AlreadyRegistered`).
    AlreadyExists,
    /// Caller lacks the required capability.
    Unauthorized,
    /// Caller or target is not an active agent (covers `NotRegistered`).
    NotActive,
    /// Recipient has blocked the sender, or the sender is globally filtered.
    RecipientBlocked,
    /// Mutations are suspended by the administrator.
    Paused,
    /// Message status change not allowed by the configured policy.
    InvalidTransition,
    /// Metered cost or a counter exceeded its bound.
    ResourceExhausted,
    /// Nested call into a transition already in progress.
    Reentrant,
}

impl ErrorKind {
    /// Stable lowercase label, used for metrics and logs.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidInput => "invalid_input",
            Self::NotFound => "not_found",
            Self::AlreadyExists => "already_exists",
            Self::Unauthorized => "unauthorized",
            Self::NotActive => "not_active",
            Self::RecipientBlocked => "recipient_blocked",
            Self::Paused => "paused",
            Self::InvalidTransition => "invalid_transition",
            Self::ResourceExhausted => "resource_exhausted",
            Self::Reentrant => "reentrant",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Serializable error for receipts and external indexers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorPayload {
    /// Error class.
    pub kind: ErrorKind,
    /// Human-readable description of the violated invariant.
    pub message: String,
}

impl ErrorPayload {
    /// Creates a payload from a kind and anything printable.
    pub fn new(kind: ErrorKind, message: impl fmt::Display) -> Self {
        Self {
            kind,
            message: message.to_string(),
        }
    }
}
