//! # Abuse Simulations
//!
//! Attack patterns a hostile participant could run against a live ledger:
//!
//! | Attack | Defense |
//! |--------|---------|
//! | Sybil spam around a block | global filter by administrator |
//! | Inflating a sender's failure count | `FAILED` is terminal |
//! | Oversized payloads | configured byte limits, metered cost ceiling |
//! | Admin takeover after rotation | capability minted per transition |
//! | Re-entering the ledger from an event sink | `Reentrant` before locking |

#[cfg(test)]
mod tests {
    use crate::{agent, apply_err, apply_ok, engine_with_agents, send_tx, GENESIS_ADMIN};
    use parking_lot::Mutex;
    use rand::{rngs::StdRng, Rng, SeedableRng};
    use shared_types::ErrorKind;
    use sm_02_message_ledger::{MessageStatus, SendRequest};
    use sm_03_ledger_engine::{
        Call, EngineConfig, EngineError, EventRecord, EventSink, LedgerService, StateEngine,
        Transaction,
    };
    use std::sync::Arc;

    // =============================================================================
    // SPAM
    // =============================================================================

    /// ATTACK: Spammer rotates sybil identities after being blocked
    #[test]
    fn test_sybil_rotation_stopped_by_global_filter() {
        let victim = agent(1);
        let mut engine = engine_with_agents(4);
        let sybils = [agent(2), agent(3), agent(4)];

        apply_ok(&mut engine, send_tx(sybils[0], victim, 1, 10));
        apply_ok(
            &mut engine,
            Transaction::new(victim, 11, Call::BlockSender { sender: sybils[0] }),
        );
        // Blocking is per sender; the next sybil gets through.
        apply_ok(&mut engine, send_tx(sybils[1], victim, 1, 12));

        for sybil in &sybils[1..] {
            apply_ok(
                &mut engine,
                Transaction::new(
                    GENESIS_ADMIN,
                    13,
                    Call::SetGlobalFilter {
                        agent: *sybil,
                        filtered: true,
                    },
                ),
            );
        }
        for sybil in sybils {
            let err = apply_err(&mut engine, send_tx(sybil, victim, 2, 14)).unwrap();
            assert_eq!(err.kind(), ErrorKind::RecipientBlocked);
        }
        assert_eq!(engine.total_message_count(), 2);
    }

    /// ATTACK: Random spray of malformed sends never mints an id
    #[test]
    fn test_random_malformed_sends_leave_no_trace() {
        let mut engine = engine_with_agents(3);
        let digest = engine.state_digest().unwrap();
        let mut rng = StdRng::seed_from_u64(0x5EED);

        for _ in 0..200 {
            let from = agent(rng.gen_range(1..=3));
            let tx = match rng.gen_range(0..3) {
                0 => send_tx(from, from, rng.gen_range(1..=255), 1),
                1 => send_tx(from, agent(rng.gen_range(4..=9)), 1, 1),
                _ => send_tx(from, agent(rng.gen_range(1..=3)), 0, 1),
            };
            assert!(engine.apply(tx).is_err());
        }
        assert_eq!(engine.state_digest().unwrap(), digest);
    }

    // =============================================================================
    // STATS POISONING
    // =============================================================================

    /// ATTACK: Recipient marks the same message failed twice
    #[test]
    fn test_failure_cannot_be_counted_twice() {
        let (a, b) = (agent(1), agent(2));
        let mut engine = engine_with_agents(2);
        apply_ok(&mut engine, send_tx(a, b, 1, 10));

        let fail = || {
            Transaction::new(
                b,
                11,
                Call::UpdateMessageStatus {
                    id: 1,
                    status: MessageStatus::Failed,
                },
            )
        };
        apply_ok(&mut engine, fail());
        let err = apply_err(&mut engine, fail()).unwrap();
        assert_eq!(err.kind(), ErrorKind::InvalidTransition);
        assert_eq!(engine.agent_stats(GENESIS_ADMIN, a).unwrap().failed_messages, 1);
    }

    // =============================================================================
    // RESOURCE EXHAUSTION
    // =============================================================================

    /// ATTACK: Metadata just past the configured bound
    #[test]
    fn test_oversized_metadata_rejected() {
        let mut engine = engine_with_agents(2);
        let limit = engine.config().max_metadata_bytes;
        let tx = |len: usize| {
            Transaction::new(
                agent(1),
                5,
                Call::SendMessage {
                    request: SendRequest::new(agent(2), [9; 32]).with_metadata("m".repeat(len)),
                },
            )
        };
        let err = apply_err(&mut engine, tx(limit + 1)).unwrap();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        assert_eq!(engine.total_message_count(), 0);
        apply_ok(&mut engine, tx(limit));
    }

    /// ATTACK: Payload that fits the byte limits but not the cost ceiling
    #[test]
    fn test_gas_ceiling_applies_before_validation() {
        let config = EngineConfig {
            gas_limit_per_transition: 100_000,
            ..EngineConfig::default()
        };
        let mut engine = StateEngine::new(config, GENESIS_ADMIN).unwrap();
        for i in 1..=2 {
            apply_ok(&mut engine, crate::register_tx(agent(i), i, 1));
        }

        let heavy = Transaction::new(
            agent(1),
            2,
            Call::SendMessage {
                request: SendRequest::new(agent(2), [9; 32]).with_metadata("m".repeat(4_000)),
            },
        );
        let err = engine.apply(heavy).unwrap_err();
        assert!(matches!(err, EngineError::GasLimitExceeded { limit: 100_000, .. }));
        assert_eq!(err.kind(), ErrorKind::ResourceExhausted);
        apply_ok(&mut engine, send_tx(agent(1), agent(2), 9, 3));
    }

    /// ATTACK: Oversized permission resource names bloat the table
    #[test]
    fn test_resource_name_limit_follows_config() {
        let config = EngineConfig {
            max_resource_bytes: 8,
            ..EngineConfig::default()
        };
        let mut engine = StateEngine::new(config, GENESIS_ADMIN).unwrap();
        apply_ok(&mut engine, crate::register_tx(agent(1), 1, 1));

        let grant = |resource: &str| {
            Transaction::new(
                GENESIS_ADMIN,
                2,
                Call::GrantPermission {
                    agent: agent(1),
                    resource: resource.into(),
                },
            )
        };
        let err = apply_err(&mut engine, grant("ledger.audit")).unwrap();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        apply_ok(&mut engine, grant("audit"));
        assert!(engine.check_permission(&agent(1), "audit"));
    }

    // =============================================================================
    // ADMIN TAKEOVER
    // =============================================================================

    /// ATTACK: Former administrator keeps acting after rotation
    #[test]
    fn test_rotated_out_admin_loses_every_privilege() {
        let successor = agent(1);
        let mut engine = engine_with_agents(2);
        apply_ok(
            &mut engine,
            Transaction::new(GENESIS_ADMIN, 1, Call::GrantAdmin { agent: successor }),
        );
        apply_ok(
            &mut engine,
            Transaction::new(successor, 2, Call::RevokeAdmin { agent: GENESIS_ADMIN }),
        );

        let privileged = [
            Call::Pause,
            Call::GrantAdmin { agent: GENESIS_ADMIN },
            Call::Deactivate { agent: agent(2) },
            Call::GrantPermission {
                agent: agent(2),
                resource: "audit".into(),
            },
        ];
        for call in privileged {
            let err = apply_err(&mut engine, Transaction::new(GENESIS_ADMIN, 3, call)).unwrap();
            assert_eq!(err.kind(), ErrorKind::Unauthorized);
        }
        assert!(engine.agent_stats(GENESIS_ADMIN, agent(2)).is_err());
        assert!(engine.agent_stats(successor, agent(2)).is_ok());
    }

    /// ATTACK: Duplicate and phantom permission changes
    #[test]
    fn test_permission_table_rejects_duplicates() {
        let mut engine = engine_with_agents(1);
        let grant = || {
            Transaction::new(
                GENESIS_ADMIN,
                1,
                Call::GrantPermission {
                    agent: agent(1),
                    resource: "ledger.audit".into(),
                },
            )
        };
        apply_ok(&mut engine, grant());
        assert!(engine.check_permission(&agent(1), "ledger.audit"));
        assert_eq!(apply_err(&mut engine, grant()).unwrap().kind(), ErrorKind::AlreadyExists);

        let revoke = Transaction::new(
            GENESIS_ADMIN,
            2,
            Call::RevokePermission {
                agent: agent(1),
                resource: "ledger.export".into(),
            },
        );
        assert_eq!(apply_err(&mut engine, revoke).unwrap().kind(), ErrorKind::NotFound);
    }

    // =============================================================================
    // REENTRANCY
    // =============================================================================

    /// Sink that answers every sent message by sending one back.
    struct AutoReply {
        service: Mutex<Option<LedgerService>>,
        errors: Mutex<Vec<EngineError>>,
    }

    impl EventSink for AutoReply {
        fn publish(&self, record: &EventRecord) {
            let Some(service) = self.service.lock().clone() else {
                return;
            };
            if let [from, to] = record.agents[..] {
                if let Err(err) = service.submit(send_tx(to, from, 1, 99)) {
                    self.errors.lock().push(err);
                }
            }
        }
    }

    /// ATTACK: Event consumer re-enters the ledger to amplify traffic
    #[test]
    fn test_sink_cannot_amplify_sends() {
        let service = LedgerService::new(EngineConfig::default(), GENESIS_ADMIN).unwrap();
        for i in 1..=2 {
            service.submit(crate::register_tx(agent(i), i, 1)).unwrap();
        }
        let sink = Arc::new(AutoReply {
            service: Mutex::new(None),
            errors: Mutex::new(Vec::new()),
        });
        service.add_sink(sink.clone()).unwrap();
        *sink.service.lock() = Some(service.clone());

        service.submit(send_tx(agent(1), agent(2), 5, 10)).unwrap();

        let errors = sink.errors.lock().clone();
        assert!(!errors.is_empty());
        assert!(errors.iter().all(|e| *e == EngineError::Reentrant));
        assert_eq!(service.with_engine(StateEngine::total_message_count).unwrap(), 1);

        *sink.service.lock() = None;
    }
}
