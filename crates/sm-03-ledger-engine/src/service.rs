//! # Ledger Service
//!
//! Thread-safe façade over [`StateEngine`]. Submissions from any number of
//! threads are serialized through one mutex, so transitions never overlap.
//!
//! A submission from the thread that is currently inside a transition (an
//! event sink calling back in) is rejected with `Reentrant` before the lock
//! is touched.

use crate::config::EngineConfig;
use crate::engine::StateEngine;
use crate::errors::EngineError;
use crate::guard::TransitionGuard;
use crate::ports::EventSink;
use crate::transaction::{Receipt, Transaction};
use parking_lot::{Mutex, RwLock};
use shared_types::{AgentId, Hash};
use std::sync::Arc;
use tracing::{debug, instrument, warn};

/// Statistics for the Ledger Service.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ServiceStats {
    /// Transactions submitted.
    pub transactions_submitted: u64,
    /// Transactions applied.
    pub transactions_applied: u64,
    /// Transactions rejected by validation.
    pub transactions_rejected: u64,
    /// Nested submissions refused.
    pub reentrant_rejections: u64,
    /// Total metered cost of applied transactions.
    pub total_gas_used: u64,
}

/// Shared handle to a state engine.
#[derive(Clone)]
pub struct LedgerService {
    engine: Arc<Mutex<StateEngine>>,
    guard: Arc<TransitionGuard>,
    stats: Arc<RwLock<ServiceStats>>,
}

impl LedgerService {
    /// Creates a service around a fresh engine.
    pub fn new(config: EngineConfig, genesis_admin: AgentId) -> Result<Self, EngineError> {
        Ok(Self::from_engine(StateEngine::new(config, genesis_admin)?))
    }

    /// Wraps an existing engine, e.g. one restored from a snapshot.
    pub fn from_engine(engine: StateEngine) -> Self {
        let guard = engine.guard();
        Self {
            engine: Arc::new(Mutex::new(engine)),
            guard,
            stats: Arc::new(RwLock::new(ServiceStats::default())),
        }
    }

    /// Get current service statistics.
    pub fn stats(&self) -> ServiceStats {
        self.stats.read().clone()
    }

    /// Registers an event sink on the underlying engine.
    pub fn add_sink(&self, sink: Arc<dyn EventSink>) -> Result<(), EngineError> {
        self.with_engine_mut(|engine| engine.add_sink(sink))
    }

    /// Applies one transaction.
    #[instrument(skip(self, tx), fields(caller = %tx.caller, operation = %tx.call.operation()))]
    pub fn submit(&self, tx: Transaction) -> Result<Receipt, EngineError> {
        self.stats.write().transactions_submitted += 1;

        if self.guard.held_by_current_thread() {
            warn!("Nested submission from inside a transition");
            self.stats.write().reentrant_rejections += 1;
            return Err(EngineError::Reentrant);
        }

        let result = self.engine.lock().apply(tx);

        let mut stats = self.stats.write();
        match &result {
            Ok(receipt) => {
                stats.transactions_applied += 1;
                stats.total_gas_used = stats.total_gas_used.saturating_add(receipt.gas_used);
                debug!(gas_used = receipt.gas_used, "Transaction applied");
            }
            Err(_) => stats.transactions_rejected += 1,
        }
        result
    }

    /// Applies transactions in order; failures do not stop the batch.
    pub fn submit_batch(&self, txs: Vec<Transaction>) -> Vec<Result<Receipt, EngineError>> {
        txs.into_iter().map(|tx| self.submit(tx)).collect()
    }

    /// Runs a read against the engine.
    ///
    /// # Errors
    /// `Reentrant` when called from inside a transition on this thread.
    pub fn with_engine<R>(&self, f: impl FnOnce(&StateEngine) -> R) -> Result<R, EngineError> {
        if self.guard.held_by_current_thread() {
            return Err(EngineError::Reentrant);
        }
        let engine = self.engine.lock();
        Ok(f(&*engine))
    }

    fn with_engine_mut<R>(&self, f: impl FnOnce(&mut StateEngine) -> R) -> Result<R, EngineError> {
        if self.guard.held_by_current_thread() {
            return Err(EngineError::Reentrant);
        }
        let mut engine = self.engine.lock();
        Ok(f(&mut *engine))
    }

    pub fn is_paused(&self) -> Result<bool, EngineError> {
        self.with_engine(StateEngine::is_paused)
    }

    pub fn state_digest(&self) -> Result<Hash, EngineError> {
        self.with_engine(StateEngine::state_digest)?
    }

    pub fn snapshot(&self) -> Result<Vec<u8>, EngineError> {
        self.with_engine(StateEngine::snapshot)?
    }
}
