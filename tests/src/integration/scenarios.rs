//! # Ledger Scenarios
//!
//! Reference flows for the identity registry and message ledger:
//!
//! 1. **Register → send → block → unblock**: ids, statuses and stats
//! 2. **Self-send**: rejected with no state change
//! 3. **Deactivation**: sender locked out, history still readable
//! 4. **Reference sends and status lifecycle**
//! 5. **Conversation window and pagination**

#[cfg(test)]
mod tests {
    use crate::{agent, apply_err, apply_ok, engine_with_agents, register_tx, send_tx, GENESIS_ADMIN};
    use shared_types::ErrorKind;
    use sm_02_message_ledger::{LedgerError, MessageStatus, Priority, SendRequest};
    use sm_03_ledger_engine::{Call, EngineError, OperationName, Outcome, Transaction};

    // =============================================================================
    // SCENARIO 1: REGISTER, SEND, BLOCK, UNBLOCK
    // =============================================================================

    #[test]
    fn test_register_send_block_unblock() {
        let (a, b) = (agent(1), agent(2));
        let mut engine = engine_with_agents(2);
        assert!(engine.verify(&a));
        assert_eq!(engine.lookup_by_fingerprint(&[1; 32]), Some(a));
        assert_eq!(engine.lookup_by_fingerprint(&[2; 32]), Some(b));

        let receipt = apply_ok(
            &mut engine,
            Transaction::new(
                a,
                10,
                Call::SendMessage {
                    request: SendRequest::new(b, [0x4D; 32]).with_priority(Priority::Normal),
                },
            ),
        );
        assert_eq!(receipt.outcome, Outcome::MessageCreated(1));
        assert_eq!(engine.get_message(b, 1).unwrap().status, MessageStatus::Delivered);
        assert_eq!(engine.agent_stats(a, a).unwrap().total_messages, 1);

        apply_ok(&mut engine, Transaction::new(b, 11, Call::BlockSender { sender: a }));
        assert!(engine.is_blocked(&b, &a));
        let err = apply_err(&mut engine, send_tx(a, b, 0x4E, 12)).unwrap();
        assert!(matches!(
            err,
            EngineError::Ledger(LedgerError::RecipientBlocked { .. })
        ));

        apply_ok(&mut engine, Transaction::new(b, 13, Call::UnblockSender { sender: a }));
        let receipt = apply_ok(&mut engine, send_tx(a, b, 0x4E, 14));
        assert_eq!(receipt.message_id(), Some(2));
        assert_eq!(engine.total_message_count(), 2);
    }

    // =============================================================================
    // SCENARIO 2: SELF-SEND
    // =============================================================================

    #[test]
    fn test_self_send_rejected_without_side_effects() {
        let a = agent(1);
        let mut engine = engine_with_agents(1);
        let digest = engine.state_digest().unwrap();

        let err = apply_err(&mut engine, send_tx(a, a, 1, 5)).unwrap();
        assert!(matches!(
            err,
            EngineError::Ledger(LedgerError::InvalidRecipient { .. })
        ));
        assert_eq!(engine.total_message_count(), 0);
        assert_eq!(engine.state_digest().unwrap(), digest);
    }

    // =============================================================================
    // SCENARIO 3: DEACTIVATION
    // =============================================================================

    #[test]
    fn test_deactivated_sender_history_stays_readable() {
        let (a, b) = (agent(1), agent(2));
        let mut engine = engine_with_agents(2);
        apply_ok(&mut engine, send_tx(a, b, 7, 10));

        apply_ok(
            &mut engine,
            Transaction::new(GENESIS_ADMIN, 11, Call::Deactivate { agent: a }),
        );
        assert!(!engine.verify(&a));
        assert!(!engine.get_agent(&a).unwrap().active);

        let err = apply_err(&mut engine, send_tx(a, b, 8, 12)).unwrap();
        assert!(matches!(err, EngineError::Ledger(LedgerError::NotRegistered(_))));

        // Sends towards the deactivated agent fail too.
        let err = apply_err(&mut engine, send_tx(b, a, 9, 13)).unwrap();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);

        let msg = engine.get_message(b, 1).unwrap();
        assert_eq!(msg.from, a);
        assert_eq!(engine.conversation(b, a, b, 10).unwrap().len(), 1);
    }

    #[test]
    fn test_reregistration_requires_fresh_fingerprint() {
        let a = agent(1);
        let mut engine = engine_with_agents(1);
        apply_ok(&mut engine, Transaction::new(a, 2, Call::Deactivate { agent: a }));

        let err = apply_err(&mut engine, register_tx(a, 1, 3)).unwrap();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);

        apply_ok(&mut engine, register_tx(a, 0x51, 4));
        let record = engine.get_agent(&a).unwrap();
        assert!(record.active);
        assert_eq!(record.registered_at, 4);
        assert_eq!(engine.lookup_by_fingerprint(&[1; 32]), Some(a));
        assert_eq!(engine.lookup_by_fingerprint(&[0x51; 32]), Some(a));
    }

    // =============================================================================
    // SCENARIO 4: REFERENCE SENDS AND STATUS LIFECYCLE
    // =============================================================================

    #[test]
    fn test_reference_send_lifecycle() {
        let (a, b) = (agent(1), agent(2));
        let mut engine = engine_with_agents(2);

        let receipt = apply_ok(
            &mut engine,
            Transaction::new(
                a,
                20,
                Call::SendMessageWithReference {
                    request: SendRequest::new(b, [0x33; 32])
                        .with_metadata("quantum_protected envelope")
                        .with_priority(Priority::Critical),
                    storage_reference: "ipfs://bafy-sm-ledger".into(),
                },
            ),
        );
        let id = receipt.message_id().unwrap();
        let msg = engine.get_message(a, id).unwrap();
        assert_eq!(msg.status, MessageStatus::Sent);
        assert_eq!(msg.storage_reference.as_deref(), Some("ipfs://bafy-sm-ledger"));
        assert!(msg.enhanced);

        for status in [
            MessageStatus::Delivered,
            MessageStatus::Read,
            MessageStatus::Acknowledged,
        ] {
            let caller = if status == MessageStatus::Delivered { a } else { b };
            apply_ok(
                &mut engine,
                Transaction::new(caller, 21, Call::UpdateMessageStatus { id, status }),
            );
        }
        assert_eq!(engine.get_message(b, id).unwrap().status, MessageStatus::Acknowledged);

        let check = engine.message_integrity(b, id).unwrap();
        assert!(check.valid);
        assert!(check.enhanced);
        assert_eq!(engine.agent_stats(a, a).unwrap().priority_count(Priority::Critical), 1);
    }

    #[test]
    fn test_failed_message_counts_against_sender() {
        let (a, b) = (agent(1), agent(2));
        let mut engine = engine_with_agents(2);
        apply_ok(&mut engine, send_tx(a, b, 1, 30));

        apply_ok(
            &mut engine,
            Transaction::new(
                b,
                31,
                Call::UpdateMessageStatus {
                    id: 1,
                    status: MessageStatus::Failed,
                },
            ),
        );
        let stats = engine.agent_stats(a, a).unwrap();
        assert_eq!(stats.total_messages, 1);
        assert_eq!(stats.failed_messages, 1);
    }

    // =============================================================================
    // SCENARIO 5: CONVERSATIONS AND PAGINATION
    // =============================================================================

    #[test]
    fn test_conversation_returns_latest_window() {
        let (a, b, c) = (agent(1), agent(2), agent(3));
        let mut engine = engine_with_agents(3);
        for i in 0..6u8 {
            let (from, to) = if i % 2 == 0 { (a, b) } else { (b, a) };
            apply_ok(&mut engine, send_tx(from, to, i + 1, 100 + u64::from(i)));
        }
        apply_ok(&mut engine, send_tx(a, c, 0x77, 200));

        let window: Vec<u64> = engine
            .conversation(b, b, a, 4)
            .unwrap()
            .iter()
            .map(|m| m.id)
            .collect();
        assert_eq!(window, vec![3, 4, 5, 6]);
        assert_eq!(engine.conversation(a, a, b, 100).unwrap().len(), 6);
    }

    #[test]
    fn test_agent_history_pagination() {
        let (a, b, c) = (agent(1), agent(2), agent(3));
        let mut engine = engine_with_agents(3);
        apply_ok(&mut engine, send_tx(a, b, 1, 1));
        apply_ok(&mut engine, send_tx(c, a, 2, 2));
        apply_ok(&mut engine, send_tx(b, c, 3, 3));
        apply_ok(&mut engine, send_tx(a, c, 4, 4));

        let ids = |offset, limit| -> Vec<u64> {
            engine
                .agent_messages(a, a, offset, limit)
                .unwrap()
                .iter()
                .map(|m| m.id)
                .collect()
        };
        assert_eq!(ids(0, 10), vec![1, 2, 4]);
        assert_eq!(ids(1, 1), vec![2]);
        assert_eq!(ids(2, 5), vec![4]);
        assert!(ids(3, 5).is_empty());
    }

    #[test]
    fn test_journal_orders_every_operation() {
        let (a, b) = (agent(1), agent(2));
        let mut engine = engine_with_agents(2);
        apply_ok(&mut engine, send_tx(a, b, 1, 10));
        apply_ok(&mut engine, Transaction::new(GENESIS_ADMIN, 11, Call::Pause));
        apply_ok(&mut engine, Transaction::new(GENESIS_ADMIN, 12, Call::Unpause));

        let journal = engine.journal();
        assert!(journal.windows(2).all(|w| w[1].sequence == w[0].sequence + 1));
        assert!(journal.iter().all(|r| r.verify_tag()));
        let last = journal.last().unwrap();
        assert_eq!(last.operation, OperationName::Unpause);
        assert_eq!(
            journal
                .iter()
                .filter(|r| r.operation == OperationName::SendMessage)
                .count(),
            3
        );
    }
}
