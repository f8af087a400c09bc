//! # Identity Registry
//!
//! ## Data Structures
//!
//! - `agents`: every record ever created, keyed by identity key
//! - `by_fingerprint`: fingerprint → identity key, never pruned
//!
//! Both maps are `BTreeMap` so that iteration (and therefore snapshots and
//! state digests) is identical on every replica.

use super::entities::{Agent, Role};
use super::errors::IdentityError;
use super::events::IdentityEvent;
use super::integrity::{identity_integrity_tag, IntegrityCheck};
use serde::{Deserialize, Serialize};
use shared_types::{contains_marker, is_empty_hash, AdminCapability, AgentId, Hash, Timestamp};
use std::collections::BTreeMap;
use tracing::debug;

/// Registry configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Tokens whose presence in an identity document sets `Agent::enhanced`.
    pub marker_tokens: Vec<String>,
    /// Maximum identity document size in bytes.
    pub max_document_bytes: usize,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            marker_tokens: vec![
                "aicube_neural_sig".to_string(),
                "quantum_enhanced".to_string(),
                "quantum_protected".to_string(),
            ],
            max_document_bytes: 8 * 1024,
        }
    }
}

/// Registry of participant identities.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityRegistry {
    config: RegistryConfig,
    agents: BTreeMap<AgentId, Agent>,
    by_fingerprint: BTreeMap<Hash, AgentId>,
}

impl IdentityRegistry {
    /// Creates an empty registry.
    pub fn new(config: RegistryConfig) -> Self {
        Self {
            config,
            agents: BTreeMap::new(),
            by_fingerprint: BTreeMap::new(),
        }
    }

    /// Returns the registry configuration.
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Number of records ever created (active and inactive).
    pub fn len(&self) -> usize {
        self.agents.len()
    }

    /// Returns true if no agent ever registered.
    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Number of currently active agents.
    pub fn active_count(&self) -> usize {
        self.agents.values().filter(|a| a.active).count()
    }

    // =========================================================================
    // MUTATIONS
    // =========================================================================

    /// Registers the caller.
    ///
    /// A previously deactivated identity may register again, but only with a
    /// fingerprint that has never been bound to any record. The old record is
    /// overwritten in place; the old fingerprint stays bound to this identity.
    ///
    /// # Errors
    /// - `InvalidIdentity` for the zero caller
    /// - `AlreadyRegistered` if the caller is active
    /// - `InvalidFingerprint` if empty or already bound
    /// - `InvalidDocument` if empty or larger than the configured maximum
    pub fn register(
        &mut self,
        caller: AgentId,
        fingerprint: Hash,
        identity_document: String,
        now: Timestamp,
    ) -> Result<Vec<IdentityEvent>, IdentityError> {
        if caller.is_zero() {
            return Err(IdentityError::InvalidIdentity);
        }
        if self.verify(&caller) {
            return Err(IdentityError::AlreadyRegistered(caller));
        }
        if is_empty_hash(&fingerprint) {
            return Err(IdentityError::InvalidFingerprint { reason: "empty" });
        }
        if self.by_fingerprint.contains_key(&fingerprint) {
            return Err(IdentityError::InvalidFingerprint {
                reason: "already bound to an identity",
            });
        }
        if identity_document.is_empty() {
            return Err(IdentityError::InvalidDocument { reason: "empty" });
        }
        if identity_document.len() > self.config.max_document_bytes {
            return Err(IdentityError::InvalidDocument {
                reason: "exceeds maximum size",
            });
        }

        let integrity_tag = identity_integrity_tag(&caller, &fingerprint);
        let enhanced = contains_marker(&identity_document, &self.config.marker_tokens);

        let agent = Agent {
            id: caller,
            fingerprint,
            identity_document,
            role: Role::Participant,
            registered_at: now,
            active: true,
            integrity_tag,
            enhanced,
        };

        self.agents.insert(caller, agent);
        self.by_fingerprint.insert(fingerprint, caller);

        debug!(agent = %caller, enhanced, "agent registered");

        Ok(vec![
            IdentityEvent::AgentRegistered {
                agent: caller,
                fingerprint,
                role: Role::Participant,
                registered_at: now,
            },
            IdentityEvent::IntegrityVerified {
                agent: caller,
                integrity_tag,
                enhanced,
            },
        ])
    }

    /// Changes an active agent's role.
    ///
    /// # Errors
    /// `NotFound` if the agent is unknown or inactive.
    pub fn update_role(
        &mut self,
        _cap: &AdminCapability,
        agent: AgentId,
        role: Role,
    ) -> Result<Vec<IdentityEvent>, IdentityError> {
        let record = self
            .agents
            .get_mut(&agent)
            .filter(|a| a.active)
            .ok_or(IdentityError::NotFound(agent))?;

        let previous = record.role;
        record.role = role;

        Ok(vec![IdentityEvent::RoleUpdated {
            agent,
            previous,
            role,
        }])
    }

    /// Deactivates an agent. Callable by the agent itself or an administrator.
    ///
    /// # Errors
    /// - `Unauthorized` if the caller is neither the agent nor an administrator
    /// - `NotActive` if the agent is unknown or already inactive
    pub fn deactivate(
        &mut self,
        caller: AgentId,
        admin: Option<&AdminCapability>,
        agent: AgentId,
    ) -> Result<Vec<IdentityEvent>, IdentityError> {
        if caller != agent && admin.is_none() {
            return Err(IdentityError::Unauthorized {
                caller,
                target: agent,
            });
        }

        let record = self
            .agents
            .get_mut(&agent)
            .filter(|a| a.active)
            .ok_or(IdentityError::NotActive(agent))?;

        record.active = false;

        Ok(vec![IdentityEvent::AgentDeactivated { agent, by: caller }])
    }

    // =========================================================================
    // QUERIES
    // =========================================================================

    /// Returns true if the agent is registered and active.
    pub fn verify(&self, agent: &AgentId) -> bool {
        self.agents.get(agent).is_some_and(|a| a.active)
    }

    /// Looks up the identity a fingerprint is bound to.
    pub fn lookup_by_fingerprint(&self, fingerprint: &Hash) -> Option<AgentId> {
        self.by_fingerprint.get(fingerprint).copied()
    }

    /// Returns the full record, active or not.
    pub fn get(&self, agent: &AgentId) -> Option<&Agent> {
        self.agents.get(agent)
    }

    /// Recomputes the integrity tag. Unknown agents report `valid = false`.
    pub fn integrity_check(&self, agent: &AgentId) -> IntegrityCheck {
        self.agents
            .get(agent)
            .map(|a| IntegrityCheck {
                valid: a.verify_integrity(),
                enhanced: a.enhanced,
            })
            .unwrap_or_default()
    }

    /// Iterates all records in key order.
    pub fn iter(&self) -> impl Iterator<Item = &Agent> {
        self.agents.values()
    }
}
