//! # Administrator Capability
//!
//! Privileged operations (role updates, deactivation override, filters,
//! permissions, pause control) take an `AdminCapability` argument instead of
//! consulting a hidden owner field. A capability can only be minted by
//! [`AdminSet::authorize`], so holding one proves the caller was in the
//! administrator set when the current transition started.
//!
//! ```text
//! caller ──authorize──→ AdminCapability ──passed into──→ update_role / pause / ...
//!   │
//!   └── not in set ──→ CapabilityError::NotAdministrator
//! ```

use crate::entities::AgentId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

/// Errors from administrator set management.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CapabilityError {
    /// Caller is not in the administrator set.
    #[error("caller {0} is not an administrator")]
    NotAdministrator(AgentId),

    /// The zero identity cannot hold administrator rights.
    #[error("zero identity cannot be an administrator")]
    InvalidAdministrator,

    /// Agent already holds administrator rights.
    #[error("{0} is already an administrator")]
    AlreadyAdministrator(AgentId),

    /// Agent to revoke is not an administrator.
    #[error("{0} is not in the administrator set")]
    UnknownAdministrator(AgentId),

    /// Revoking would leave the ledger without an administrator.
    #[error("cannot revoke the last administrator")]
    LastAdministrator,
}

impl CapabilityError {
    /// Maps the error onto the shared taxonomy.
    #[must_use]
    pub fn kind(&self) -> crate::ErrorKind {
        match self {
            Self::NotAdministrator(_) => crate::ErrorKind::Unauthorized,
            Self::AlreadyAdministrator(_) => crate::ErrorKind::AlreadyExists,
            Self::UnknownAdministrator(_) => crate::ErrorKind::NotFound,
            Self::InvalidAdministrator | Self::LastAdministrator => crate::ErrorKind::InvalidInput,
        }
    }
}

/// Proof that `holder` was an administrator when the capability was minted.
///
/// Not constructible outside this crate and not deserializable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminCapability {
    holder: AgentId,
}

impl AdminCapability {
    /// The administrator the capability was minted for.
    #[must_use]
    pub fn holder(&self) -> AgentId {
        self.holder
    }
}

/// The rotating set of administrator identities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminSet {
    members: BTreeSet<AgentId>,
}

impl AdminSet {
    /// Creates a set holding the genesis administrator.
    ///
    /// # Errors
    /// `InvalidAdministrator` if `initial` is the zero identity.
    pub fn genesis(initial: AgentId) -> Result<Self, CapabilityError> {
        if initial.is_zero() {
            return Err(CapabilityError::InvalidAdministrator);
        }
        Ok(Self {
            members: BTreeSet::from([initial]),
        })
    }

    /// Returns true if `agent` is an administrator.
    #[must_use]
    pub fn contains(&self, agent: &AgentId) -> bool {
        self.members.contains(agent)
    }

    /// Number of administrators.
    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Always false: a set is created with one member and can never drop below it.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Iterates administrators in key order.
    pub fn iter(&self) -> impl Iterator<Item = &AgentId> {
        self.members.iter()
    }

    /// Mints a capability for `caller`.
    ///
    /// # Errors
    /// `NotAdministrator` if the caller is not in the set.
    pub fn authorize(&self, caller: AgentId) -> Result<AdminCapability, CapabilityError> {
        if self.members.contains(&caller) {
            Ok(AdminCapability { holder: caller })
        } else {
            Err(CapabilityError::NotAdministrator(caller))
        }
    }

    /// Mints a capability only if `caller` is an administrator.
    #[must_use]
    pub fn try_authorize(&self, caller: AgentId) -> Option<AdminCapability> {
        self.authorize(caller).ok()
    }

    /// Adds an administrator.
    ///
    /// # Errors
    /// - `InvalidAdministrator` for the zero identity
    /// - `AlreadyAdministrator` if already present
    pub fn grant(&mut self, _cap: &AdminCapability, agent: AgentId) -> Result<(), CapabilityError> {
        if agent.is_zero() {
            return Err(CapabilityError::InvalidAdministrator);
        }
        if self.members.contains(&agent) {
            return Err(CapabilityError::AlreadyAdministrator(agent));
        }
        self.members.insert(agent);
        Ok(())
    }

    /// Removes an administrator. An administrator may revoke itself as long
    /// as another one remains.
    ///
    /// # Errors
    /// - `UnknownAdministrator` if `agent` is not in the set
    /// - `LastAdministrator` if the set would become empty
    pub fn revoke(&mut self, _cap: &AdminCapability, agent: AgentId) -> Result<(), CapabilityError> {
        if !self.members.contains(&agent) {
            return Err(CapabilityError::UnknownAdministrator(agent));
        }
        if self.members.len() == 1 {
            return Err(CapabilityError::LastAdministrator);
        }
        self.members.remove(&agent);
        Ok(())
    }
}
