//! # Resource Metering
//!
//! Deterministic cost schedule for transitions. The cost depends only on the
//! call and its argument sizes, so every replica meters the same amount.
//!
//! ```text
//! cost = TX_BASE
//!      + PER_BYTE × payload bytes
//!      + RECORD_WRITE × new records
//!      + INDEX_WRITE × index entries
//!      + SLOT_WRITE × updated fields
//!      + EVENT × events
//! ```

use crate::transaction::Call;

/// Cost constants.
pub mod costs {
    /// Base cost of any transition.
    pub const TX_BASE: u64 = 21_000;
    /// Per byte of document, metadata, reference or resource name.
    pub const PER_BYTE: u64 = 16;
    /// Creating a new agent or message record.
    pub const RECORD_WRITE: u64 = 20_000;
    /// Appending to an index (fingerprint, per-agent, conversation).
    pub const INDEX_WRITE: u64 = 5_000;
    /// Overwriting a single field or set membership.
    pub const SLOT_WRITE: u64 = 2_900;
    /// Emitting one event record.
    pub const EVENT: u64 = 375;
}

fn bytes(len: usize) -> u64 {
    (len as u64).saturating_mul(costs::PER_BYTE)
}

/// Metered cost of a call.
#[must_use]
pub fn cost(call: &Call) -> u64 {
    use costs::*;

    let variable = match call {
        // record + fingerprint index, registration + integrity events
        Call::Register {
            identity_document, ..
        } => bytes(identity_document.len()) + RECORD_WRITE + INDEX_WRITE + 2 * EVENT,

        // record + sender, recipient, conversation indexes + stats,
        // sent + integrity + delivered events
        Call::SendMessage { request } => {
            bytes(request.metadata.len()) + RECORD_WRITE + 3 * INDEX_WRITE + SLOT_WRITE + 3 * EVENT
        }
        Call::SendMessageWithReference {
            request,
            storage_reference,
        } => {
            bytes(request.metadata.len())
                + bytes(storage_reference.len())
                + RECORD_WRITE
                + 3 * INDEX_WRITE
                + SLOT_WRITE
                + 2 * EVENT
        }

        // status + possible failure counter, changed + delivered events
        Call::UpdateMessageStatus { .. } => 2 * SLOT_WRITE + 2 * EVENT,

        Call::GrantPermission { resource, .. } | Call::RevokePermission { resource, .. } => {
            bytes(resource.len()) + SLOT_WRITE + EVENT
        }

        Call::UpdateRole { .. }
        | Call::Deactivate { .. }
        | Call::BlockSender { .. }
        | Call::UnblockSender { .. }
        | Call::SetGlobalFilter { .. }
        | Call::GrantAdmin { .. }
        | Call::RevokeAdmin { .. }
        | Call::Pause
        | Call::Unpause => SLOT_WRITE + EVENT,
    };

    TX_BASE.saturating_add(variable)
}

/// Upper bound on events a single transition emits.
pub const MAX_EVENTS_PER_TRANSITION: u64 = 3;
