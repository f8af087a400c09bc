//! # Service Flows
//!
//! Tests that `LedgerService` serializes concurrent submitters, feeds the
//! journal sink in sequence order, and that snapshots and replays converge
//! on the same state digest.

#[cfg(test)]
mod tests {
    use crate::{agent, apply_ok, engine_with_agents, fresh_engine, register_tx, send_tx, GENESIS_ADMIN};
    use parking_lot::Mutex;
    use sm_02_message_ledger::StatusPolicy;
    use sm_03_ledger_engine::{
        EngineConfig, EngineError, EventRecord, EventSink, InMemoryJournal, LedgerService,
        OperationName, StateEngine, Transaction,
    };
    use std::sync::Arc;
    use std::thread;

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    fn service_with_agents(count: u8) -> LedgerService {
        let service = LedgerService::new(EngineConfig::default(), GENESIS_ADMIN).unwrap();
        for i in 1..=count {
            service.submit(register_tx(agent(i), i, u64::from(i))).unwrap();
        }
        service
    }

    /// Sink that records the sequence numbers it observes.
    #[derive(Default)]
    struct SequenceProbe {
        seen: Mutex<Vec<u64>>,
    }

    impl EventSink for SequenceProbe {
        fn publish(&self, record: &EventRecord) {
            self.seen.lock().push(record.sequence);
        }
    }

    // =============================================================================
    // CONCURRENCY
    // =============================================================================

    #[test]
    fn test_concurrent_senders_get_unique_ids() {
        let service = service_with_agents(4);
        let probe = Arc::new(SequenceProbe::default());
        service.add_sink(probe.clone()).unwrap();

        let handles: Vec<_> = (1u8..=4)
            .map(|i| {
                let service = service.clone();
                thread::spawn(move || {
                    let to = agent(i % 4 + 1);
                    (0..25u8)
                        .map(|n| {
                            service
                                .submit(send_tx(agent(i), to, n.wrapping_add(1), 1_000))
                                .map(|r| r.message_id().unwrap_or_default())
                        })
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let mut ids: Vec<u64> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .map(|r| r.unwrap())
            .collect();
        ids.sort_unstable();
        assert_eq!(ids, (1..=100).collect::<Vec<_>>());

        let seen = probe.seen.lock().clone();
        assert_eq!(seen.len(), 300);
        assert!(seen.windows(2).all(|w| w[1] == w[0] + 1));

        let stats = service.stats();
        assert_eq!(stats.transactions_applied, 104);
        assert_eq!(stats.transactions_rejected, 0);
    }

    #[test]
    fn test_journal_sink_mirrors_engine_journal() {
        let service = service_with_agents(2);
        let journal = Arc::new(InMemoryJournal::new());
        service.add_sink(journal.clone()).unwrap();

        service.submit(send_tx(agent(1), agent(2), 9, 50)).unwrap();
        assert!(service.submit(send_tx(agent(1), agent(1), 9, 51)).is_err());

        assert_eq!(journal.len(), 3);
        assert_eq!(journal.by_operation(OperationName::SendMessage).len(), 3);
        assert_eq!(journal.involving(&agent(2)).len(), 2);
        let tail = service
            .with_engine(|e| e.events_since(journal.records()[0].sequence).to_vec())
            .unwrap();
        assert_eq!(tail, journal.records());
    }

    // =============================================================================
    // DETERMINISM
    // =============================================================================

    fn workload() -> Vec<Transaction> {
        let mut txs: Vec<Transaction> = (1..=5).map(|i| register_tx(agent(i), i, 1)).collect();
        for round in 0..20u8 {
            let from = agent(round % 5 + 1);
            let to = agent((round + 2) % 5 + 1);
            txs.push(send_tx(from, to, round + 1, 10 + u64::from(round)));
        }
        // A few rejections mixed in.
        txs.push(send_tx(agent(1), agent(1), 1, 99));
        txs.push(register_tx(agent(2), 2, 99));
        txs
    }

    #[test]
    fn test_replicas_converge_on_digest() {
        let mut left = fresh_engine();
        let mut right = fresh_engine();
        let left_results = left.replay(workload());
        let right_results = right.replay(workload());

        assert_eq!(left_results, right_results);
        assert_eq!(left.state_digest().unwrap(), right.state_digest().unwrap());
        assert_eq!(left.total_message_count(), 20);
    }

    #[test]
    fn test_restore_from_service_snapshot() {
        let service = service_with_agents(3);
        service.submit(send_tx(agent(1), agent(3), 4, 40)).unwrap();
        let bytes = service.snapshot().unwrap();

        let restored = StateEngine::restore(EngineConfig::default(), &bytes).unwrap();
        assert_eq!(restored.state_digest().unwrap(), service.state_digest().unwrap());
        assert_eq!(restored.total_message_count(), 1);

        let resumed = LedgerService::from_engine(restored);
        let receipt = resumed.submit(send_tx(agent(3), agent(1), 5, 41)).unwrap();
        assert_eq!(receipt.message_id(), Some(2));
    }

    #[test]
    fn test_restore_under_other_policy_is_refused() {
        let service = service_with_agents(2);
        let bytes = service.snapshot().unwrap();

        let permissive = EngineConfig {
            status_policy: StatusPolicy::Permissive,
            auto_deliver: false,
            ..EngineConfig::default()
        };
        assert_eq!(
            StateEngine::restore(permissive, &bytes).err(),
            Some(EngineError::ConfigMismatch)
        );

        let recorded = StateEngine::snapshot_config(&bytes).unwrap();
        let restored = StateEngine::restore(recorded, &bytes).unwrap();
        assert_eq!(restored.config().status_policy, StatusPolicy::Lattice);
        assert!(restored.config().auto_deliver);
    }

    #[test]
    fn test_paused_service_still_answers_reads() {
        let service = service_with_agents(2);
        service
            .submit(Transaction::new(GENESIS_ADMIN, 5, sm_03_ledger_engine::Call::Pause))
            .unwrap();
        assert!(service.is_paused().unwrap());
        assert_eq!(
            service.submit(send_tx(agent(1), agent(2), 1, 6)).unwrap_err(),
            EngineError::Paused
        );
        assert!(service.with_engine(|e| e.verify(&agent(1))).unwrap());
    }

    #[test]
    fn test_fixture_engine_matches_service_state() {
        let mut engine = engine_with_agents(2);
        apply_ok(&mut engine, send_tx(agent(1), agent(2), 3, 10));

        let service = service_with_agents(2);
        service.submit(send_tx(agent(1), agent(2), 3, 10)).unwrap();

        assert_eq!(engine.state_digest().unwrap(), service.state_digest().unwrap());
    }
}
