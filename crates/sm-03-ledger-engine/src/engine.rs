//! # State Engine
//!
//! Applies one transaction at a time as an atomic transition:
//!
//! ```text
//! apply(tx)
//!   ├─ guard.enter()                  Reentrant if already inside
//!   ├─ pause check                    Paused (except unpause)
//!   ├─ meter cost                     GasLimitExceeded
//!   ├─ reserve sequence numbers       SequenceExhausted
//!   ├─ component operation            validates fully, then mutates
//!   ├─ append records to journal      infallible
//!   └─ publish to sinks               infallible
//! ```
//!
//! Every component operation returns before touching state if any check
//! fails, so a rejected transaction leaves the engine bit-identical.

use crate::config::EngineConfig;
use crate::errors::EngineError;
use crate::events::{AdminEvent, EventRecord, LedgerEvent};
use crate::gas::{self, MAX_EVENTS_PER_TRANSITION};
use crate::guard::TransitionGuard;
use crate::metrics;
use crate::ports::EventSink;
use crate::transaction::{Call, Outcome, Receipt, Transaction};
use serde::{Deserialize, Serialize};
use shared_types::{keccak256, AdminSet, AgentId, Hash, MessageId, Timestamp};
use sm_01_identity_registry::{
    integrity_constants, Agent, IdentityError, IdentityRegistry, IntegrityCheck,
    IntegrityConstants,
};
use sm_02_message_ledger::{
    message_integrity_constants, AgentStats, Message, MessageIntegrityConstants, MessageLedger,
};
use sm_telemetry::{log_agent_event, log_message_event, log_rejection};
use std::sync::Arc;
use tracing::info;

/// Everything that is replicated. Snapshots and digests cover exactly this,
/// including the configuration the state was built under.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineState {
    pub config: EngineConfig,
    pub admins: AdminSet,
    pub paused: bool,
    pub registry: IdentityRegistry,
    pub ledger: MessageLedger,
    pub next_sequence: u64,
    pub journal: Vec<EventRecord>,
}

/// The deterministic state machine.
pub struct StateEngine {
    state: EngineState,
    guard: Arc<TransitionGuard>,
    sinks: Vec<Arc<dyn EventSink>>,
}

impl StateEngine {
    /// Creates an empty engine with one genesis administrator.
    ///
    /// # Errors
    /// `Capability(InvalidAdministrator)` for the zero identity.
    pub fn new(config: EngineConfig, genesis_admin: AgentId) -> Result<Self, EngineError> {
        let state = EngineState {
            admins: AdminSet::genesis(genesis_admin)?,
            paused: false,
            registry: IdentityRegistry::new(config.registry_config()),
            ledger: MessageLedger::new(config.ledger_config()),
            next_sequence: 0,
            journal: Vec::new(),
            config,
        };
        Ok(Self::from_state(state))
    }

    fn from_state(state: EngineState) -> Self {
        Self {
            state,
            guard: Arc::new(TransitionGuard::new()),
            sinks: Vec::new(),
        }
    }

    /// Registers a consumer of committed records.
    pub fn add_sink(&mut self, sink: Arc<dyn EventSink>) {
        self.sinks.push(sink);
    }

    /// Shared handle to the reentrancy guard.
    pub fn guard(&self) -> Arc<TransitionGuard> {
        Arc::clone(&self.guard)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.state.config
    }

    pub fn state(&self) -> &EngineState {
        &self.state
    }

    // =========================================================================
    // TRANSITIONS
    // =========================================================================

    /// Applies one transaction atomically.
    pub fn apply(&mut self, tx: Transaction) -> Result<Receipt, EngineError> {
        let guard = Arc::clone(&self.guard);
        let _token = guard.enter()?;

        let operation = tx.call.operation();
        let caller = tx.caller;
        let result = self.execute(tx);

        match &result {
            Ok(receipt) => {
                info!(
                    operation = %operation,
                    caller = %caller,
                    events = receipt.events.len(),
                    gas_used = receipt.gas_used,
                    "transition applied"
                );
            }
            Err(err) => {
                let kind = err.kind();
                metrics::record_rejection(kind.as_str());
                log_rejection!(operation.as_str(), caller, kind, err);
            }
        }
        result
    }

    /// Applies transactions in order, collecting every result. Failures do
    /// not stop the replay.
    pub fn replay<I>(&mut self, transactions: I) -> Vec<Result<Receipt, EngineError>>
    where
        I: IntoIterator<Item = Transaction>,
    {
        transactions.into_iter().map(|tx| self.apply(tx)).collect()
    }

    fn execute(&mut self, tx: Transaction) -> Result<Receipt, EngineError> {
        let Transaction {
            caller,
            timestamp,
            call,
        } = tx;
        let operation = call.operation();

        if self.state.paused && !matches!(call, Call::Unpause) {
            return Err(EngineError::Paused);
        }

        let limit = self.state.config.gas_limit_per_transition;
        let gas_used = gas::cost(&call);
        if gas_used > limit {
            return Err(EngineError::GasLimitExceeded {
                required: gas_used,
                limit,
            });
        }

        let start = self.state.next_sequence;
        start
            .checked_add(MAX_EVENTS_PER_TRANSITION)
            .ok_or(EngineError::SequenceExhausted)?;

        let (events, outcome) = self.dispatch(caller, timestamp, call, gas_used)?;

        // Committed. Only bookkeeping below.
        let records: Vec<EventRecord> = events
            .into_iter()
            .zip(start..)
            .map(|(event, sequence)| EventRecord::new(sequence, operation, event))
            .collect();
        let end = start + records.len() as u64;
        self.state.next_sequence = end;
        self.state.journal.extend(records.iter().cloned());

        for record in &records {
            for sink in &self.sinks {
                sink.publish(record);
            }
        }

        Ok(Receipt {
            operation,
            caller,
            sequence_range: start..end,
            events: records,
            gas_used,
            outcome,
        })
    }

    fn dispatch(
        &mut self,
        caller: AgentId,
        now: Timestamp,
        call: Call,
        gas_used: u64,
    ) -> Result<(Vec<LedgerEvent>, Outcome), EngineError> {
        let state = &mut self.state;

        let events: Vec<LedgerEvent> = match call {
            Call::Register {
                fingerprint,
                identity_document,
            } => {
                let events = state
                    .registry
                    .register(caller, fingerprint, identity_document, now)?;
                metrics::record_agent_registered();
                log_agent_event!(info, "registry", "agent registered", caller);
                into_events(events)
            }

            Call::UpdateRole { agent, role } => {
                let cap = state.admins.authorize(caller)?;
                let events = state.registry.update_role(&cap, agent, role)?;
                log_agent_event!(info, "registry", "role updated", agent, role = %role);
                into_events(events)
            }

            Call::Deactivate { agent } => {
                let cap = state.admins.try_authorize(caller);
                let events = state.registry.deactivate(caller, cap.as_ref(), agent)?;
                log_agent_event!(info, "registry", "agent deactivated", agent, by = %caller);
                into_events(events)
            }

            Call::SendMessage { request } => {
                let priority = request.priority;
                let sent = state
                    .ledger
                    .send(&state.registry, caller, request, now, gas_used)?;
                metrics::record_message_sent(priority.as_str());
                log_message_event!(info, "ledger", "message sent", sent.id, from = %caller);
                return Ok((into_events(sent.events), Outcome::MessageCreated(sent.id)));
            }

            Call::SendMessageWithReference {
                request,
                storage_reference,
            } => {
                let priority = request.priority;
                let sent = state.ledger.send_with_reference(
                    &state.registry,
                    caller,
                    request,
                    storage_reference,
                    now,
                    gas_used,
                )?;
                metrics::record_message_sent(priority.as_str());
                log_message_event!(info, "ledger", "message sent with reference", sent.id, from = %caller);
                return Ok((into_events(sent.events), Outcome::MessageCreated(sent.id)));
            }

            Call::UpdateMessageStatus { id, status } => {
                let events = state.ledger.update_status(caller, id, status, now)?;
                log_message_event!(debug, "ledger", "status updated", id, status = %status);
                into_events(events)
            }

            Call::BlockSender { sender } => {
                into_events(state.ledger.block_sender(&state.registry, caller, sender)?)
            }

            Call::UnblockSender { sender } => {
                into_events(state.ledger.unblock_sender(&state.registry, caller, sender)?)
            }

            Call::SetGlobalFilter { agent, filtered } => {
                let cap = state.admins.authorize(caller)?;
                into_events(state.ledger.set_global_filter(&cap, agent, filtered)?)
            }

            Call::GrantPermission { agent, resource } => {
                let cap = state.admins.authorize(caller)?;
                into_events(state.ledger.grant_permission(&cap, agent, resource)?)
            }

            Call::RevokePermission { agent, resource } => {
                let cap = state.admins.authorize(caller)?;
                into_events(state.ledger.revoke_permission(&cap, agent, resource)?)
            }

            Call::GrantAdmin { agent } => {
                let cap = state.admins.authorize(caller)?;
                state.admins.grant(&cap, agent)?;
                log_agent_event!(info, "engine", "administrator granted", agent, by = %caller);
                vec![AdminEvent::AdminGranted { agent, by: caller }.into()]
            }

            Call::RevokeAdmin { agent } => {
                let cap = state.admins.authorize(caller)?;
                state.admins.revoke(&cap, agent)?;
                log_agent_event!(info, "engine", "administrator revoked", agent, by = %caller);
                vec![AdminEvent::AdminRevoked { agent, by: caller }.into()]
            }

            Call::Pause => {
                state.admins.authorize(caller)?;
                state.paused = true;
                metrics::set_paused(true);
                log_agent_event!(warn, "engine", "ledger paused", caller);
                vec![AdminEvent::Paused { by: caller }.into()]
            }

            Call::Unpause => {
                state.admins.authorize(caller)?;
                if !state.paused {
                    return Err(EngineError::NotPaused);
                }
                state.paused = false;
                metrics::set_paused(false);
                log_agent_event!(info, "engine", "ledger unpaused", caller);
                vec![AdminEvent::Unpaused { by: caller }.into()]
            }
        };

        Ok((events, Outcome::Applied))
    }

    // =========================================================================
    // QUERIES (available while paused)
    // =========================================================================

    pub fn is_paused(&self) -> bool {
        self.state.paused
    }

    pub fn is_admin(&self, agent: &AgentId) -> bool {
        self.state.admins.contains(agent)
    }

    /// Returns true if the agent is registered and active.
    pub fn verify(&self, agent: &AgentId) -> bool {
        self.state.registry.verify(agent)
    }

    pub fn lookup_by_fingerprint(&self, fingerprint: &Hash) -> Option<AgentId> {
        self.state.registry.lookup_by_fingerprint(fingerprint)
    }

    /// Full agent record, active or not.
    pub fn get_agent(&self, agent: &AgentId) -> Result<&Agent, EngineError> {
        self.state
            .registry
            .get(agent)
            .ok_or(EngineError::Identity(IdentityError::NotFound(*agent)))
    }

    /// Recomputes an agent's integrity tag.
    pub fn integrity_tag(&self, agent: &AgentId) -> IntegrityCheck {
        self.state.registry.integrity_check(agent)
    }

    pub fn integrity_constants(&self) -> IntegrityConstants {
        integrity_constants()
    }

    pub fn message_integrity_constants(&self) -> MessageIntegrityConstants {
        message_integrity_constants()
    }

    pub fn get_message(&self, caller: AgentId, id: MessageId) -> Result<&Message, EngineError> {
        Ok(self.state.ledger.get_message(caller, id)?)
    }

    pub fn agent_messages(
        &self,
        caller: AgentId,
        agent: AgentId,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<&Message>, EngineError> {
        let cap = self.state.admins.try_authorize(caller);
        Ok(self
            .state
            .ledger
            .agent_messages(caller, cap.as_ref(), agent, offset, limit)?)
    }

    pub fn conversation(
        &self,
        caller: AgentId,
        a: AgentId,
        b: AgentId,
        limit: usize,
    ) -> Result<Vec<&Message>, EngineError> {
        let cap = self.state.admins.try_authorize(caller);
        Ok(self
            .state
            .ledger
            .conversation(caller, cap.as_ref(), a, b, limit)?)
    }

    pub fn agent_stats(&self, caller: AgentId, agent: AgentId) -> Result<AgentStats, EngineError> {
        let cap = self.state.admins.try_authorize(caller);
        Ok(self.state.ledger.stats(caller, cap.as_ref(), agent)?)
    }

    pub fn message_integrity(
        &self,
        caller: AgentId,
        id: MessageId,
    ) -> Result<IntegrityCheck, EngineError> {
        Ok(self.state.ledger.message_integrity(caller, id)?)
    }

    pub fn total_message_count(&self) -> u64 {
        self.state.ledger.total_message_count()
    }

    pub fn is_blocked(&self, recipient: &AgentId, sender: &AgentId) -> bool {
        self.state.ledger.is_blocked(recipient, sender)
    }

    pub fn check_permission(&self, agent: &AgentId, resource: &str) -> bool {
        self.state.ledger.check_permission(agent, resource)
    }

    /// Journal records in sequence order.
    pub fn journal(&self) -> &[EventRecord] {
        &self.state.journal
    }

    /// Journal records with `sequence >= from`.
    pub fn events_since(&self, from: u64) -> &[EventRecord] {
        let start = self
            .state
            .journal
            .partition_point(|r| r.sequence < from);
        &self.state.journal[start..]
    }

    // =========================================================================
    // CHECKPOINTING
    // =========================================================================

    /// Encodes the replicated state.
    pub fn snapshot(&self) -> Result<Vec<u8>, EngineError> {
        Ok(bincode::serialize(&self.state)?)
    }

    /// Rebuilds an engine from a snapshot. Sinks are not restored.
    ///
    /// # Errors
    /// - `Snapshot` for undecodable bytes
    /// - `ConfigMismatch` if the snapshot was taken under a different
    ///   configuration than `config`
    pub fn restore(config: EngineConfig, bytes: &[u8]) -> Result<Self, EngineError> {
        let state: EngineState = bincode::deserialize(bytes)?;
        if state.config != config
            || *state.registry.config() != config.registry_config()
            || *state.ledger.config() != config.ledger_config()
        {
            return Err(EngineError::ConfigMismatch);
        }
        Ok(Self::from_state(state))
    }

    /// Configuration recorded in a snapshot, for restoring without
    /// knowing it up front.
    pub fn snapshot_config(bytes: &[u8]) -> Result<EngineConfig, EngineError> {
        let state: EngineState = bincode::deserialize(bytes)?;
        Ok(state.config)
    }

    /// Keccak-256 of the encoded state. Equal on every replica that applied
    /// the same transactions under the same configuration.
    pub fn state_digest(&self) -> Result<Hash, EngineError> {
        Ok(keccak256(&self.snapshot()?))
    }
}

fn into_events<E: Into<LedgerEvent>>(events: Vec<E>) -> Vec<LedgerEvent> {
    events.into_iter().map(Into::into).collect()
}
