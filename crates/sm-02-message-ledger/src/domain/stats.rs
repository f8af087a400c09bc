//! Per-agent aggregate counters.
//!
//! Derived state only: counters change as a side effect of ledger writes and
//! are never corrected independently. Updates are computed with checked
//! arithmetic first and applied afterwards, so a counter overflow rejects the
//! whole transition.

use super::entities::Priority;
use super::errors::LedgerError;
use serde::{Deserialize, Serialize};
use shared_types::{AgentId, Timestamp};
use std::collections::BTreeMap;

/// Counters for one agent.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgentStats {
    /// Messages this agent has sent.
    pub total_messages: u64,
    /// Sends accepted by the ledger.
    pub successful_messages: u64,
    /// Messages from this agent that reached `FAILED`.
    pub failed_messages: u64,
    /// Sent messages per priority, indexed by `Priority::ordinal`.
    pub per_priority: [u64; Priority::COUNT],
    /// Timestamp of the last write touching these counters.
    pub last_activity: Timestamp,
}

impl AgentStats {
    /// Sent messages with the given priority.
    #[must_use]
    pub fn priority_count(&self, priority: Priority) -> u64 {
        self.per_priority[priority.ordinal()]
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsAggregator {
    stats: BTreeMap<AgentId, AgentStats>,
}

impl StatsAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counters for `agent`; all zero if it never sent anything.
    #[must_use]
    pub fn get(&self, agent: &AgentId) -> AgentStats {
        self.stats.get(agent).copied().unwrap_or_default()
    }

    /// Computes the counters after one accepted send without applying them.
    ///
    /// Rejected sends leave no state, so failures are counted only when a
    /// message later moves into `FAILED` (see [`preview_failure`](Self::preview_failure)).
    pub fn preview_attempt(
        &self,
        agent: &AgentId,
        priority: Priority,
        now: Timestamp,
    ) -> Result<AgentStats, LedgerError> {
        let mut next = self.get(agent);
        next.total_messages = bump(next.total_messages)?;
        next.successful_messages = bump(next.successful_messages)?;
        let slot = &mut next.per_priority[priority.ordinal()];
        *slot = bump(*slot)?;
        next.last_activity = now;
        Ok(next)
    }

    /// Computes the counters after one of `agent`'s messages failed.
    pub fn preview_failure(&self, agent: &AgentId, now: Timestamp) -> Result<AgentStats, LedgerError> {
        let mut next = self.get(agent);
        next.failed_messages = bump(next.failed_messages)?;
        next.last_activity = now;
        Ok(next)
    }

    /// Stores counters produced by a preview.
    pub fn commit(&mut self, agent: AgentId, stats: AgentStats) {
        self.stats.insert(agent, stats);
    }
}

fn bump(value: u64) -> Result<u64, LedgerError> {
    value.checked_add(1).ok_or(LedgerError::CounterOverflow)
}
