//! # Secure Messaging Ledger Test Suite
//!
//! Unified test crate containing:
//!
//! ## Structure
//!
//! ```text
//! tests/src/
//! ├── benchmarks/       # Workload builders shared with benches/
//! ├── exploits/         # Attack simulations and property tests
//! │   ├── abuse.rs      # Spam, blocking games, admin takeover attempts
//! │   └── properties.rs # proptest invariants over random schedules
//! └── integration/      # Cross-crate scenarios through the engine
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p sm-tests
//!
//! # By category
//! cargo test -p sm-tests integration::
//! cargo test -p sm-tests exploits::
//!
//! # Benchmarks
//! cargo bench -p sm-tests
//! ```

#![allow(dead_code)]

pub mod benchmarks;
pub mod exploits;

use shared_types::AgentId;
use sm_02_message_ledger::SendRequest;
use sm_03_ledger_engine::{Call, EngineConfig, EngineError, Receipt, StateEngine, Transaction};

/// Administrator used by every fixture.
pub const GENESIS_ADMIN: AgentId = AgentId([0xAD; 20]);

/// Deterministic agent identity for index `i`.
pub fn agent(i: u8) -> AgentId {
    let mut bytes = [0u8; 20];
    bytes[0] = 0xA6;
    bytes[19] = i;
    AgentId(bytes)
}

/// Engine with the default configuration and [`GENESIS_ADMIN`].
pub fn fresh_engine() -> StateEngine {
    StateEngine::new(EngineConfig::default(), GENESIS_ADMIN)
        .unwrap_or_else(|e| panic!("genesis failed: {e}"))
}

pub fn register_tx(who: AgentId, fingerprint: u8, timestamp: u64) -> Transaction {
    Transaction::new(
        who,
        timestamp,
        Call::Register {
            fingerprint: [fingerprint; 32],
            identity_document: format!("{{\"did\":\"did:sm:{who}\"}}"),
        },
    )
}

pub fn send_tx(from: AgentId, to: AgentId, content: u8, timestamp: u64) -> Transaction {
    Transaction::new(
        from,
        timestamp,
        Call::SendMessage {
            request: SendRequest::new(to, [content; 32]),
        },
    )
}

/// Registers `count` agents `agent(1)..=agent(count)`.
pub fn engine_with_agents(count: u8) -> StateEngine {
    let mut engine = fresh_engine();
    for i in 1..=count {
        apply_ok(&mut engine, register_tx(agent(i), i, u64::from(i)));
    }
    engine
}

/// Applies a transaction that the fixture expects to succeed.
pub fn apply_ok(engine: &mut StateEngine, tx: Transaction) -> Receipt {
    match engine.apply(tx) {
        Ok(receipt) => receipt,
        Err(err) => panic!("fixture transaction rejected: {err}"),
    }
}

/// Applies a transaction and returns only the error, if any.
pub fn apply_err(engine: &mut StateEngine, tx: Transaction) -> Option<EngineError> {
    engine.apply(tx).err()
}
