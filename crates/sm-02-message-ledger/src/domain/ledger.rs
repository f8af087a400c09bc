//! # Message Ledger
//!
//! ## Data Structures
//!
//! - `messages`: `MessageId` → `Message`, append-only
//! - `agent_index`: agent → ids it sent or received, insertion order
//! - `conversations`: unordered pair → ids exchanged, insertion order
//! - `filter`: block lists, global filter, permissions
//! - `stats`: per-sender counters
//!
//! Every mutation validates first and only then writes, so a rejected call
//! leaves all five structures untouched.

use super::access_filter::AccessFilter;
use super::entities::{Message, MessageStatus, SendRequest};
use super::errors::LedgerError;
use super::events::MessageEvent;
use super::integrity::message_integrity_tag;
use super::stats::{AgentStats, StatsAggregator};
use super::status::StatusPolicy;
use crate::ports::AgentDirectory;
use serde::{Deserialize, Serialize};
use shared_types::{
    contains_marker, is_empty_hash, AdminCapability, AgentId, MessageId, Timestamp,
};
use sm_01_identity_registry::IntegrityCheck;
use std::collections::BTreeMap;
use tracing::debug;

/// Ledger configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Plain sends start as `DELIVERED` instead of `SENT`.
    pub auto_deliver: bool,
    pub status_policy: StatusPolicy,
    /// Tokens whose presence in metadata sets `Message::enhanced`.
    pub marker_tokens: Vec<String>,
    pub max_metadata_bytes: usize,
    pub max_reference_bytes: usize,
    pub max_resource_bytes: usize,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            auto_deliver: true,
            status_policy: StatusPolicy::Lattice,
            marker_tokens: vec![
                "aicube_neural_sig".to_string(),
                "quantum_enhanced".to_string(),
                "quantum_protected".to_string(),
            ],
            max_metadata_bytes: 4 * 1024,
            max_reference_bytes: 256,
            max_resource_bytes: 64,
        }
    }
}

/// Result of a successful send.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SendOutcome {
    pub id: MessageId,
    pub events: Vec<MessageEvent>,
}

/// Append-only message store with its indexes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageLedger {
    config: LedgerConfig,
    next_id: MessageId,
    message_count: u64,
    messages: BTreeMap<MessageId, Message>,
    agent_index: BTreeMap<AgentId, Vec<MessageId>>,
    conversations: BTreeMap<(AgentId, AgentId), Vec<MessageId>>,
    filter: AccessFilter,
    stats: StatsAggregator,
}

impl Default for MessageLedger {
    fn default() -> Self {
        Self::new(LedgerConfig::default())
    }
}

/// Conversation index key: the unordered pair, smaller key first.
fn conversation_key(a: AgentId, b: AgentId) -> (AgentId, AgentId) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

impl MessageLedger {
    pub fn new(config: LedgerConfig) -> Self {
        Self {
            config,
            next_id: 1,
            message_count: 0,
            messages: BTreeMap::new(),
            agent_index: BTreeMap::new(),
            conversations: BTreeMap::new(),
            filter: AccessFilter::new(),
            stats: StatsAggregator::new(),
        }
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    // =========================================================================
    // SENDS
    // =========================================================================

    /// Creates a message. With `auto_deliver` the record starts as `DELIVERED`.
    ///
    /// # Errors
    /// - `NotRegistered` if the caller is not active
    /// - `RecipientBlocked` / `SenderFiltered`
    /// - `InvalidRecipient` for self-sends and inactive recipients
    /// - `InvalidFingerprint` for an empty fingerprint
    /// - `InvalidMetadata` if the metadata is too large
    /// - `CounterOverflow` if an identifier or counter would wrap
    pub fn send(
        &mut self,
        directory: &dyn AgentDirectory,
        caller: AgentId,
        request: SendRequest,
        now: Timestamp,
        resource_cost: u64,
    ) -> Result<SendOutcome, LedgerError> {
        self.create(directory, caller, request, None, now, resource_cost)
    }

    /// Creates a message pointing at off-ledger storage. Never auto-delivered.
    ///
    /// # Errors
    /// As [`send`](Self::send), plus `InvalidReference` if the reference is
    /// empty or too long.
    pub fn send_with_reference(
        &mut self,
        directory: &dyn AgentDirectory,
        caller: AgentId,
        request: SendRequest,
        storage_reference: String,
        now: Timestamp,
        resource_cost: u64,
    ) -> Result<SendOutcome, LedgerError> {
        self.create(
            directory,
            caller,
            request,
            Some(storage_reference),
            now,
            resource_cost,
        )
    }

    fn validate_send(
        &self,
        directory: &dyn AgentDirectory,
        caller: AgentId,
        request: &SendRequest,
        reference: Option<&str>,
    ) -> Result<(), LedgerError> {
        if !directory.is_active(&caller) {
            return Err(LedgerError::NotRegistered(caller));
        }
        if self.filter.is_globally_filtered(&caller) {
            return Err(LedgerError::SenderFiltered(caller));
        }
        if self.filter.is_blocked(&request.to, &caller) {
            return Err(LedgerError::RecipientBlocked {
                sender: caller,
                recipient: request.to,
            });
        }
        if request.to == caller {
            return Err(LedgerError::InvalidRecipient {
                recipient: request.to,
                reason: "sender and recipient are the same agent",
            });
        }
        if !directory.is_active(&request.to) {
            return Err(LedgerError::InvalidRecipient {
                recipient: request.to,
                reason: "recipient is not an active agent",
            });
        }
        if is_empty_hash(&request.content_fingerprint) {
            return Err(LedgerError::InvalidFingerprint);
        }
        if request.metadata.len() > self.config.max_metadata_bytes {
            return Err(LedgerError::InvalidMetadata {
                reason: "exceeds maximum size",
            });
        }
        if let Some(reference) = reference {
            if reference.is_empty() {
                return Err(LedgerError::InvalidReference { reason: "empty" });
            }
            if reference.len() > self.config.max_reference_bytes {
                return Err(LedgerError::InvalidReference {
                    reason: "exceeds maximum size",
                });
            }
        }
        Ok(())
    }

    fn create(
        &mut self,
        directory: &dyn AgentDirectory,
        caller: AgentId,
        request: SendRequest,
        storage_reference: Option<String>,
        now: Timestamp,
        resource_cost: u64,
    ) -> Result<SendOutcome, LedgerError> {
        self.validate_send(directory, caller, &request, storage_reference.as_deref())?;

        let id = self.next_id;
        let next_id = id.checked_add(1).ok_or(LedgerError::CounterOverflow)?;
        let message_count = self
            .message_count
            .checked_add(1)
            .ok_or(LedgerError::CounterOverflow)?;
        let sender_stats = self
            .stats
            .preview_attempt(&caller, request.priority, now)?;

        // Validation complete; nothing below can fail.
        let integrity_tag =
            message_integrity_tag(&caller, &request.to, &request.content_fingerprint, now);
        let enhanced = contains_marker(&request.metadata, &self.config.marker_tokens);
        let delivered = storage_reference.is_none() && self.config.auto_deliver;

        let message = Message {
            id,
            from: caller,
            to: request.to,
            content_fingerprint: request.content_fingerprint,
            storage_reference,
            metadata: request.metadata,
            priority: request.priority,
            status: if delivered {
                MessageStatus::Delivered
            } else {
                MessageStatus::Sent
            },
            created_at: now,
            integrity_tag,
            enhanced,
            resource_cost,
        };

        let to = message.to;
        let priority = message.priority;
        let content_fingerprint = message.content_fingerprint;

        self.messages.insert(id, message);
        self.agent_index.entry(caller).or_default().push(id);
        self.agent_index.entry(to).or_default().push(id);
        self.conversations
            .entry(conversation_key(caller, to))
            .or_default()
            .push(id);
        self.stats.commit(caller, sender_stats);
        self.next_id = next_id;
        self.message_count = message_count;

        debug!(message_id = id, from = %caller, to = %to, %priority, delivered, "message created");

        let mut events = vec![
            MessageEvent::MessageSent {
                id,
                from: caller,
                to,
                content_fingerprint,
                priority,
                timestamp: now,
            },
            MessageEvent::MessageIntegrity {
                id,
                integrity_tag,
                enhanced,
            },
        ];
        if delivered {
            events.push(MessageEvent::MessageDelivered { id, to });
        }
        Ok(SendOutcome { id, events })
    }

    // =========================================================================
    // STATUS
    // =========================================================================

    /// Changes a message's status.
    ///
    /// Only the sender or the recipient may change it, `READ` and
    /// `ACKNOWLEDGED` only the recipient. Moving into `FAILED` counts a
    /// failure against the sender.
    ///
    /// # Errors
    /// - `MessageNotFound`
    /// - `Unauthorized`
    /// - `InvalidTransition` if the configured policy rejects the change
    pub fn update_status(
        &mut self,
        caller: AgentId,
        id: MessageId,
        status: MessageStatus,
        now: Timestamp,
    ) -> Result<Vec<MessageEvent>, LedgerError> {
        let message = self
            .messages
            .get(&id)
            .ok_or(LedgerError::MessageNotFound(id))?;

        if !message.is_participant(&caller) {
            return Err(LedgerError::Unauthorized {
                caller,
                reason: "not a participant of the message",
            });
        }
        if status.recipient_only() && caller != message.to {
            return Err(LedgerError::Unauthorized {
                caller,
                reason: "only the recipient may mark a message read or acknowledged",
            });
        }

        let previous = message.status;
        if !self.config.status_policy.allows(previous, status) {
            return Err(LedgerError::InvalidTransition {
                from: previous,
                to: status,
            });
        }

        let sender = message.from;
        let recipient = message.to;
        let failure_stats = if status == MessageStatus::Failed && previous != MessageStatus::Failed
        {
            Some(self.stats.preview_failure(&sender, now)?)
        } else {
            None
        };

        if let Some(record) = self.messages.get_mut(&id) {
            record.status = status;
        }
        if let Some(stats) = failure_stats {
            self.stats.commit(sender, stats);
        }

        debug!(message_id = id, by = %caller, %previous, %status, "message status changed");

        let mut events = vec![MessageEvent::StatusChanged {
            id,
            by: caller,
            previous,
            status,
        }];
        if status == MessageStatus::Delivered {
            events.push(MessageEvent::MessageDelivered { id, to: recipient });
        }
        Ok(events)
    }

    // =========================================================================
    // ACCESS FILTER
    // =========================================================================

    /// Blocks `sender` from messaging the caller.
    ///
    /// # Errors
    /// `NotRegistered`, `InvalidIdentity`, `CannotBlockSelf`, `AlreadyBlocked`.
    pub fn block_sender(
        &mut self,
        directory: &dyn AgentDirectory,
        caller: AgentId,
        sender: AgentId,
    ) -> Result<Vec<MessageEvent>, LedgerError> {
        if !directory.is_active(&caller) {
            return Err(LedgerError::NotRegistered(caller));
        }
        if sender.is_zero() {
            return Err(LedgerError::InvalidIdentity);
        }
        if sender == caller {
            return Err(LedgerError::CannotBlockSelf);
        }
        if self.filter.is_blocked(&caller, &sender) {
            return Err(LedgerError::AlreadyBlocked(sender));
        }

        self.filter.set_blocked(caller, sender);
        Ok(vec![MessageEvent::SenderBlocked {
            recipient: caller,
            sender,
        }])
    }

    /// Lifts a block set by the caller.
    ///
    /// # Errors
    /// `NotRegistered`, `NotBlocked`.
    pub fn unblock_sender(
        &mut self,
        directory: &dyn AgentDirectory,
        caller: AgentId,
        sender: AgentId,
    ) -> Result<Vec<MessageEvent>, LedgerError> {
        if !directory.is_active(&caller) {
            return Err(LedgerError::NotRegistered(caller));
        }
        if !self.filter.is_blocked(&caller, &sender) {
            return Err(LedgerError::NotBlocked(sender));
        }

        self.filter.clear_blocked(caller, sender);
        Ok(vec![MessageEvent::SenderUnblocked {
            recipient: caller,
            sender,
        }])
    }

    /// Sets or clears the global filter on `agent`.
    pub fn set_global_filter(
        &mut self,
        cap: &AdminCapability,
        agent: AgentId,
        filtered: bool,
    ) -> Result<Vec<MessageEvent>, LedgerError> {
        if agent.is_zero() {
            return Err(LedgerError::InvalidIdentity);
        }
        self.filter.set_global_filter(agent, filtered);
        Ok(vec![MessageEvent::GlobalFilterSet {
            agent,
            filtered,
            by: cap.holder(),
        }])
    }

    fn validate_resource(&self, resource: &str) -> Result<(), LedgerError> {
        if resource.is_empty() {
            return Err(LedgerError::InvalidResource { reason: "empty" });
        }
        if resource.len() > self.config.max_resource_bytes {
            return Err(LedgerError::InvalidResource {
                reason: "exceeds maximum size",
            });
        }
        Ok(())
    }

    /// Grants `agent` permission on `resource`.
    pub fn grant_permission(
        &mut self,
        cap: &AdminCapability,
        agent: AgentId,
        resource: String,
    ) -> Result<Vec<MessageEvent>, LedgerError> {
        if agent.is_zero() {
            return Err(LedgerError::InvalidIdentity);
        }
        self.validate_resource(&resource)?;
        if self.filter.check_permission(&agent, &resource) {
            return Err(LedgerError::PermissionExists { agent, resource });
        }

        self.filter.grant_permission(agent, resource.clone());
        Ok(vec![MessageEvent::PermissionGranted {
            agent,
            resource,
            by: cap.holder(),
        }])
    }

    /// Revokes `agent`'s permission on `resource`.
    pub fn revoke_permission(
        &mut self,
        cap: &AdminCapability,
        agent: AgentId,
        resource: String,
    ) -> Result<Vec<MessageEvent>, LedgerError> {
        if !self.filter.check_permission(&agent, &resource) {
            return Err(LedgerError::PermissionMissing { agent, resource });
        }

        self.filter.revoke_permission(agent, &resource);
        Ok(vec![MessageEvent::PermissionRevoked {
            agent,
            resource,
            by: cap.holder(),
        }])
    }

    // =========================================================================
    // QUERIES
    // =========================================================================

    /// Returns a message to one of its participants.
    pub fn get_message(&self, caller: AgentId, id: MessageId) -> Result<&Message, LedgerError> {
        let message = self
            .messages
            .get(&id)
            .ok_or(LedgerError::MessageNotFound(id))?;
        if !message.is_participant(&caller) {
            return Err(LedgerError::Unauthorized {
                caller,
                reason: "not a participant of the message",
            });
        }
        Ok(message)
    }

    /// Page of `agent`'s merged history (sent and received) in insertion order.
    ///
    /// Empty when `offset` is past the end.
    pub fn agent_messages(
        &self,
        caller: AgentId,
        admin: Option<&AdminCapability>,
        agent: AgentId,
        offset: usize,
        limit: usize,
    ) -> Result<Vec<&Message>, LedgerError> {
        if caller != agent && admin.is_none() {
            return Err(LedgerError::Unauthorized {
                caller,
                reason: "history is visible to its owner and administrators",
            });
        }
        let ids = self.agent_index.get(&agent).map(Vec::as_slice).unwrap_or(&[]);
        Ok(ids
            .iter()
            .skip(offset)
            .take(limit)
            .filter_map(|id| self.messages.get(id))
            .collect())
    }

    /// Number of messages in `agent`'s history.
    pub fn agent_message_count(&self, agent: &AgentId) -> usize {
        self.agent_index.get(agent).map_or(0, Vec::len)
    }

    /// The most recent `limit` messages between `a` and `b`, oldest first.
    pub fn conversation(
        &self,
        caller: AgentId,
        admin: Option<&AdminCapability>,
        a: AgentId,
        b: AgentId,
        limit: usize,
    ) -> Result<Vec<&Message>, LedgerError> {
        if caller != a && caller != b && admin.is_none() {
            return Err(LedgerError::Unauthorized {
                caller,
                reason: "conversation is visible to its participants and administrators",
            });
        }
        let ids = self
            .conversations
            .get(&conversation_key(a, b))
            .map(Vec::as_slice)
            .unwrap_or(&[]);
        let start = ids.len().saturating_sub(limit);
        Ok(ids[start..]
            .iter()
            .filter_map(|id| self.messages.get(id))
            .collect())
    }

    /// Counters for `agent`, visible to the agent itself and administrators.
    pub fn stats(
        &self,
        caller: AgentId,
        admin: Option<&AdminCapability>,
        agent: AgentId,
    ) -> Result<AgentStats, LedgerError> {
        if caller != agent && admin.is_none() {
            return Err(LedgerError::Unauthorized {
                caller,
                reason: "statistics are visible to their owner and administrators",
            });
        }
        Ok(self.stats.get(&agent))
    }

    /// Recomputes a message's tag for one of its participants.
    pub fn message_integrity(
        &self,
        caller: AgentId,
        id: MessageId,
    ) -> Result<IntegrityCheck, LedgerError> {
        let message = self.get_message(caller, id)?;
        let expected = message_integrity_tag(
            &message.from,
            &message.to,
            &message.content_fingerprint,
            message.created_at,
        );
        Ok(IntegrityCheck {
            valid: expected == message.integrity_tag,
            enhanced: message.enhanced,
        })
    }

    /// Number of messages ever created.
    pub fn total_message_count(&self) -> u64 {
        self.message_count
    }

    /// Identifier the next message will receive.
    pub fn next_message_id(&self) -> MessageId {
        self.next_id
    }

    pub fn is_blocked(&self, recipient: &AgentId, sender: &AgentId) -> bool {
        self.filter.is_blocked(recipient, sender)
    }

    pub fn is_globally_filtered(&self, agent: &AgentId) -> bool {
        self.filter.is_globally_filtered(agent)
    }

    pub fn check_permission(&self, agent: &AgentId, resource: &str) -> bool {
        self.filter.check_permission(agent, resource)
    }

    /// Read-only view of the access filter.
    pub fn filter(&self) -> &AccessFilter {
        &self.filter
    }
}
