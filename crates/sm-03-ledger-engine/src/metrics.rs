//! # Ledger Metrics
//!
//! Prometheus metrics for the engine.
//!
//! ## Usage
//!
//! Enable with the `metrics` feature:
//! ```toml
//! sm-03-ledger-engine = { path = "...", features = ["metrics"] }
//! ```
//!
//! ## Metrics Exported
//!
//! - `ledger_agents_registered_total` - Counter of successful registrations
//! - `ledger_messages_sent_total` - Counter of created messages (by priority)
//! - `ledger_transitions_rejected_total` - Counter of rejected transitions (by kind)
//! - `ledger_paused` - Gauge, 1 while mutations are suspended

#[cfg(feature = "metrics")]
use lazy_static::lazy_static;

#[cfg(feature = "metrics")]
use prometheus::{
    register_gauge, register_int_counter, register_int_counter_vec, Gauge, IntCounter,
    IntCounterVec,
};

#[cfg(feature = "metrics")]
lazy_static! {
    /// Total successful registrations
    pub static ref AGENTS_REGISTERED: IntCounter = register_int_counter!(
        "ledger_agents_registered_total",
        "Total number of successful agent registrations"
    )
    .expect("Failed to create AGENTS_REGISTERED metric");

    /// Total messages created, labeled by priority
    pub static ref MESSAGES_SENT: IntCounterVec = register_int_counter_vec!(
        "ledger_messages_sent_total",
        "Total number of messages created",
        &["priority"]
    )
    .expect("Failed to create MESSAGES_SENT metric");

    /// Total rejected transitions, labeled by error kind
    pub static ref TRANSITIONS_REJECTED: IntCounterVec = register_int_counter_vec!(
        "ledger_transitions_rejected_total",
        "Total number of rejected transitions",
        &["kind"]
    )
    .expect("Failed to create TRANSITIONS_REJECTED metric");

    /// Pause flag
    pub static ref LEDGER_PAUSED: Gauge = register_gauge!(
        "ledger_paused",
        "Whether mutations are suspended (0=no, 1=yes)"
    )
    .expect("Failed to create LEDGER_PAUSED metric");
}

// =============================================================================
// METRIC RECORDING FUNCTIONS
// =============================================================================

/// Record a successful registration
#[cfg(feature = "metrics")]
pub fn record_agent_registered() {
    AGENTS_REGISTERED.inc();
}

/// Record a created message
#[cfg(feature = "metrics")]
pub fn record_message_sent(priority: &str) {
    MESSAGES_SENT.with_label_values(&[priority]).inc();
}

/// Record a rejected transition
#[cfg(feature = "metrics")]
pub fn record_rejection(kind: &str) {
    TRANSITIONS_REJECTED.with_label_values(&[kind]).inc();
}

/// Update the pause gauge
#[cfg(feature = "metrics")]
pub fn set_paused(paused: bool) {
    LEDGER_PAUSED.set(if paused { 1.0 } else { 0.0 });
}

// =============================================================================
// NO-OP IMPLEMENTATIONS (when metrics feature disabled)
// =============================================================================

#[cfg(not(feature = "metrics"))]
pub fn record_agent_registered() {}

#[cfg(not(feature = "metrics"))]
pub fn record_message_sent(_priority: &str) {}

#[cfg(not(feature = "metrics"))]
pub fn record_rejection(_kind: &str) {}

#[cfg(not(feature = "metrics"))]
pub fn set_paused(_paused: bool) {}
