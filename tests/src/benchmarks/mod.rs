//! # Ledger Benchmarks
//!
//! Workload builders shared by `benches/ledger_benchmarks.rs`. Each builder
//! returns a ready engine plus the transactions to time, so criterion only
//! measures the transitions themselves.
//!
//! Brutal Conditions:
//! - thousands of registered agents
//! - long per-agent histories for pagination
//! - mixed valid and rejected sends

use crate::{agent, engine_with_agents, send_tx};
use rand::{rngs::StdRng, Rng, SeedableRng};
use sm_03_ledger_engine::{StateEngine, Transaction};

/// Identity for a benchmark agent beyond the `u8` fixture range.
pub fn wide_agent(i: u32) -> shared_types::AgentId {
    let mut bytes = [0u8; 20];
    bytes[0] = 0xBE;
    bytes[16..].copy_from_slice(&i.to_be_bytes());
    shared_types::AgentId(bytes)
}

/// Fingerprint unique to index `i`.
pub fn wide_fingerprint(i: u32) -> shared_types::Hash {
    let mut fp = [0x01; 32];
    fp[28..].copy_from_slice(&i.to_be_bytes());
    fp
}

/// Registration transactions for `count` agents.
pub fn registrations(count: u32) -> Vec<Transaction> {
    (0..count)
        .map(|i| {
            Transaction::new(
                wide_agent(i),
                u64::from(i),
                sm_03_ledger_engine::Call::Register {
                    fingerprint: wide_fingerprint(i),
                    identity_document: format!("{{\"agent\":{i},\"sig\":\"aicube_neural_sig\"}}"),
                },
            )
        })
        .collect()
}

/// Engine with 16 agents and `count` random sends between them, a tenth of
/// which are self-sends that the engine rejects.
pub fn mixed_sends(count: usize, seed: u64) -> (StateEngine, Vec<Transaction>) {
    let engine = engine_with_agents(16);
    let mut rng = StdRng::seed_from_u64(seed);
    let txs = (0..count)
        .map(|n| {
            let from = rng.gen_range(1..=16u8);
            let to = if rng.gen_ratio(1, 10) {
                from
            } else {
                (from % 16) + 1
            };
            send_tx(agent(from), agent(to), rng.gen_range(1..=255), n as u64)
        })
        .collect();
    (engine, txs)
}

/// Engine where `agent(1)` has `history` messages.
pub fn long_history(history: usize) -> StateEngine {
    let mut engine = engine_with_agents(2);
    for n in 0..history {
        let _ = engine.apply(send_tx(agent(1), agent(2), 1, n as u64));
    }
    engine
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wide_agents_are_distinct_and_registerable() {
        let mut engine = crate::fresh_engine();
        let results = engine.replay(registrations(300));
        assert!(results.iter().all(Result::is_ok));
        assert!(engine.verify(&wide_agent(299)));
    }

    #[test]
    fn test_mixed_sends_reproducible() {
        let (_, a) = mixed_sends(50, 7);
        let (_, b) = mixed_sends(50, 7);
        assert_eq!(a, b);
    }

    #[test]
    fn test_long_history_builds() {
        let engine = long_history(40);
        assert_eq!(engine.total_message_count(), 40);
    }
}
