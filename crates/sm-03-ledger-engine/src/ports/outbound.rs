//! Outbound (Driven) ports for the Ledger Engine.

use crate::events::EventRecord;

/// Consumer of committed journal records (indexers, auditors).
///
/// Called after a transition's mutations are complete but before the
/// transition returns. A sink cannot fail the transition. Submitting back
/// into the same `LedgerService` from inside `publish` is rejected with
/// `Reentrant`.
pub trait EventSink: Send + Sync {
    fn publish(&self, record: &EventRecord);
}
