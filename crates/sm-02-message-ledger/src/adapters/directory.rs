//! `AgentDirectory` backed by the Identity Registry.

use crate::ports::AgentDirectory;
use shared_types::AgentId;
use sm_01_identity_registry::IdentityRegistry;

impl AgentDirectory for IdentityRegistry {
    fn is_active(&self, agent: &AgentId) -> bool {
        self.verify(agent)
    }
}
