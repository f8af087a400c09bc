//! # Message Status Policy
//!
//! ```text
//! Lattice (default):
//!
//!   SENT ──→ DELIVERED ──→ READ ──→ ACKNOWLEDGED
//!     │          │  └──────────────────↑
//!     │          │          │
//!     └──────────┴──────────┴──→ FAILED
//! ```
//!
//! `ACKNOWLEDGED` and `FAILED` are terminal under the lattice. `Permissive`
//! accepts any change, including moving backwards.
//!
//! Who may make a change (sender, recipient) is checked by the ledger, not here.

use super::entities::MessageStatus;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which status changes are accepted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StatusPolicy {
    /// Forward-only lattice with terminal states.
    #[default]
    Lattice,
    /// Any party-authorized change is accepted.
    Permissive,
}

impl StatusPolicy {
    /// Returns true if `from → to` is allowed.
    #[must_use]
    pub fn allows(&self, from: MessageStatus, to: MessageStatus) -> bool {
        use MessageStatus::*;
        match self {
            Self::Permissive => true,
            Self::Lattice => matches!(
                (from, to),
                (Sent, Delivered)
                    | (Sent, Failed)
                    | (Delivered, Read)
                    | (Delivered, Acknowledged)
                    | (Delivered, Failed)
                    | (Read, Acknowledged)
                    | (Read, Failed)
            ),
        }
    }
}

impl fmt::Display for StatusPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lattice => f.write_str("lattice"),
            Self::Permissive => f.write_str("permissive"),
        }
    }
}

/// Unrecognized policy name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown status policy: {0}")]
pub struct ParseStatusPolicyError(String);

impl FromStr for StatusPolicy {
    type Err = ParseStatusPolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "lattice" | "strict" => Ok(Self::Lattice),
            "permissive" => Ok(Self::Permissive),
            other => Err(ParseStatusPolicyError(other.to_string())),
        }
    }
}
