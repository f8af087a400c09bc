//! # Access Filter
//!
//! Per-recipient block lists, the administrator's global filter and the
//! resource permission table. Entries persist until explicitly cleared.
//!
//! Mutators here do not validate; the ledger checks preconditions first so
//! that every call reaching this module succeeds.

use serde::{Deserialize, Serialize};
use shared_types::AgentId;
use std::collections::{BTreeMap, BTreeSet};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessFilter {
    /// `(recipient, blocked_sender)` pairs.
    blocked: BTreeSet<(AgentId, AgentId)>,
    globally_filtered: BTreeSet<AgentId>,
    permissions: BTreeMap<AgentId, BTreeSet<String>>,
}

impl AccessFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if `recipient` has blocked `sender`.
    #[must_use]
    pub fn is_blocked(&self, recipient: &AgentId, sender: &AgentId) -> bool {
        self.blocked.contains(&(*recipient, *sender))
    }

    pub fn set_blocked(&mut self, recipient: AgentId, sender: AgentId) {
        self.blocked.insert((recipient, sender));
    }

    pub fn clear_blocked(&mut self, recipient: AgentId, sender: AgentId) {
        self.blocked.remove(&(recipient, sender));
    }

    #[must_use]
    pub fn is_globally_filtered(&self, agent: &AgentId) -> bool {
        self.globally_filtered.contains(agent)
    }

    pub fn set_global_filter(&mut self, agent: AgentId, filtered: bool) {
        if filtered {
            self.globally_filtered.insert(agent);
        } else {
            self.globally_filtered.remove(&agent);
        }
    }

    /// Returns true if `agent` holds permission on `resource`.
    #[must_use]
    pub fn check_permission(&self, agent: &AgentId, resource: &str) -> bool {
        self.permissions
            .get(agent)
            .is_some_and(|set| set.contains(resource))
    }

    pub fn grant_permission(&mut self, agent: AgentId, resource: String) {
        self.permissions.entry(agent).or_default().insert(resource);
    }

    pub fn revoke_permission(&mut self, agent: AgentId, resource: &str) {
        if let Some(set) = self.permissions.get_mut(&agent) {
            set.remove(resource);
            if set.is_empty() {
                self.permissions.remove(&agent);
            }
        }
    }
}
