//! # Message Ledger Subsystem (sm-02)
//!
//! Append-only store of routed messages. Only a content fingerprint of each
//! payload is recorded; the payload itself lives off-ledger.
//!
//! ## Domain Invariants
//!
//! | ID | Invariant | Enforcement |
//! |----|-----------|-------------|
//! | INVARIANT-1 | Message ids strictly increasing, never reused | `domain/ledger.rs` - `create()` |
//! | INVARIANT-2 | Sender and recipient active and distinct at send time | `validate_send()` |
//! | INVARIANT-3 | Only `status` changes after creation | `update_status()` is the only writer |
//! | INVARIANT-4 | `READ` / `ACKNOWLEDGED` set only by the recipient | `MessageStatus::recipient_only` |
//! | INVARIANT-5 | Stats are derived from ledger writes only | `domain/stats.rs` has no public setters |
//!
//! ## Send Flow
//!
//! ```text
//! send ──→ validate_send ──→ preview counters ──→ insert + index ──→ events
//!               │                   │
//!               └──── Err ──────────┴──→ state untouched
//! ```
//!
//! ## Outbound Dependencies
//!
//! | Subsystem | Trait | Purpose |
//! |-----------|-------|---------|
//! | 1 (Identity Registry) | `AgentDirectory` | Sender/recipient activity checks |

pub mod adapters;
pub mod domain;
pub mod ports;

pub use domain::{
    message_integrity_constants, message_integrity_tag, AccessFilter, AgentStats, LedgerConfig,
    LedgerError, Message, MessageEvent, MessageIntegrityConstants, MessageLedger, MessageStatus,
    ParseStatusPolicyError, Priority, SendOutcome, SendRequest, StatsAggregator, StatusPolicy,
    MESSAGE_MARKER_CONST, MESSAGE_PATTERN_CONST,
};
pub use ports::AgentDirectory;

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
