//! # Ledger Engine Subsystem (sm-03)
//!
//! Deterministic state-transition engine over the Identity Registry (sm-01)
//! and the Message Ledger (sm-02). Transactions arrive totally ordered and
//! attributed to an authenticated caller; the engine applies each one as a
//! single all-or-nothing step and appends tagged records to its journal.
//!
//! ## Domain Invariants
//!
//! | ID | Invariant | Enforcement |
//! |----|-----------|-------------|
//! | INVARIANT-1 | Rejected transitions leave state bit-identical | validate-then-mutate in every component |
//! | INVARIANT-2 | Journal sequence strictly increasing, gap-free | `engine.rs` - `execute()` |
//! | INVARIANT-3 | No nested transition on one instance | `guard.rs` - `TransitionGuard` |
//! | INVARIANT-4 | Paused ledger rejects every mutation but `unpause` | `engine.rs` - `execute()` |
//! | INVARIANT-5 | At least one administrator at all times | `AdminSet::revoke` |
//! | INVARIANT-6 | Metered cost never exceeds the configured ceiling | `gas.rs` + `execute()` |
//!
//! ## Boundary Operations
//!
//! | Operation | Requirement |
//! |-----------|-------------|
//! | `register` | none (caller registers itself) |
//! | `sendMessage`, `sendMessageWithReference`, `blockSender`, `unblockSender` | registered agent |
//! | `updateMessageStatus` | message participant |
//! | `deactivate` | the agent itself or an administrator |
//! | `updateRole`, `setGlobalFilter`, `grantPermission`, `revokePermission`, `grantAdmin`, `revokeAdmin`, `pause`, `unpause` | administrator |
//!
//! ## Module Structure (Hexagonal Architecture)
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  service.rs  - LedgerService (Arc<Mutex<StateEngine>>)          │
//! └─────────────────────────────────────────────────────────────────┘
//!                          ↓ serializes ↓
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  engine.rs   - StateEngine: apply / replay / snapshot / digest  │
//! │  gas.rs      - cost schedule     guard.rs - reentrancy flag     │
//! └─────────────────────────────────────────────────────────────────┘
//!                          ↓ publishes ↓
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  ports/outbound.rs - EventSink   adapters/journal.rs - in-memory│
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod adapters;
pub mod config;
pub mod engine;
pub mod errors;
pub mod events;
pub mod gas;
pub mod guard;
pub mod metrics;
pub mod ports;
pub mod service;
pub mod transaction;

pub use adapters::InMemoryJournal;
pub use config::EngineConfig;
pub use engine::{EngineState, StateEngine};
pub use errors::EngineError;
pub use events::{event_tag, AdminEvent, EventRecord, LedgerEvent, OperationName, EVENT_CONST};
pub use guard::TransitionGuard;
pub use ports::EventSink;
pub use service::{LedgerService, ServiceStats};
pub use transaction::{Call, Outcome, Receipt, Requirement, Transaction};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
