//! Outbound (Driven) ports for the Message Ledger.
//!
//! The ledger never reaches into registry storage. It asks the directory,
//! by key, whether an agent may currently act.

use shared_types::AgentId;

/// Identity lookup provided by Subsystem 1 (Identity Registry).
pub trait AgentDirectory {
    /// Returns true if the agent is registered and active.
    fn is_active(&self, agent: &AgentId) -> bool;
}

/// Fixed set of active agents for testing.
#[cfg(test)]
pub struct StaticDirectory {
    active: std::collections::BTreeSet<AgentId>,
}

#[cfg(test)]
impl StaticDirectory {
    pub fn new(agents: &[AgentId]) -> Self {
        Self {
            active: agents.iter().copied().collect(),
        }
    }

    pub fn deactivate(&mut self, agent: &AgentId) {
        self.active.remove(agent);
    }
}

#[cfg(test)]
impl AgentDirectory for StaticDirectory {
    fn is_active(&self, agent: &AgentId) -> bool {
        self.active.contains(agent)
    }
}
