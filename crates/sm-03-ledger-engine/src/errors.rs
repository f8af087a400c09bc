//! Engine error types.

use shared_types::{CapabilityError, ErrorKind, ErrorPayload};
use sm_01_identity_registry::IdentityError;
use sm_02_message_ledger::LedgerError;
use thiserror::Error;

/// Errors returned by the engine and the service façade.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error(transparent)]
    Identity(#[from] IdentityError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error(transparent)]
    Capability(#[from] CapabilityError),

    /// Mutations are suspended.
    #[error("ledger is paused")]
    Paused,

    /// `unpause` while not paused.
    #[error("ledger is not paused")]
    NotPaused,

    /// Nested submission while a transition is in progress.
    #[error("reentrant call into a transition in progress")]
    Reentrant,

    /// Metered cost above the per-transition ceiling.
    #[error("metered cost {required} exceeds limit {limit}")]
    GasLimitExceeded { required: u64, limit: u64 },

    /// The journal sequence counter would overflow.
    #[error("event sequence exhausted")]
    SequenceExhausted,

    /// Snapshot could not be encoded or decoded.
    #[error("snapshot error: {0}")]
    Snapshot(String),

    /// Snapshot was taken under a different configuration.
    #[error("snapshot configuration does not match the engine configuration")]
    ConfigMismatch,
}

impl EngineError {
    /// Maps the error onto the shared taxonomy.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Identity(e) => e.kind(),
            Self::Ledger(e) => e.kind(),
            Self::Capability(e) => e.kind(),
            Self::Paused => ErrorKind::Paused,
            Self::NotPaused | Self::Snapshot(_) | Self::ConfigMismatch => ErrorKind::InvalidInput,
            Self::Reentrant => ErrorKind::Reentrant,
            Self::GasLimitExceeded { .. } | Self::SequenceExhausted => {
                ErrorKind::ResourceExhausted
            }
        }
    }

    /// Serializable form for receipts and indexers.
    #[must_use]
    pub fn payload(&self) -> ErrorPayload {
        ErrorPayload::new(self.kind(), self)
    }
}

impl From<bincode::Error> for EngineError {
    fn from(e: bincode::Error) -> Self {
        Self::Snapshot(e.to_string())
    }
}
