//! Structured logging macros.
//!
//! Every ledger log line carries the same field names so log queries can
//! filter on them:
//! - `component`: registry, ledger or engine
//! - `agent`: identity key, `Display` form
//! - `message_id`: ledger message identifier
//! - `operation`: operation name as recorded in the event journal

/// Log an agent-related event with standard fields.
///
/// ```rust,ignore
/// log_agent_event!(info, "registry", "agent registered", agent_id, role = %role);
/// ```
#[macro_export]
macro_rules! log_agent_event {
    ($level:ident, $component:expr, $msg:expr, $agent:expr $(, $($field:tt)*)?) => {
        $crate::tracing::$level!(
            component = $component,
            agent = %$agent,
            $($($field)*,)?
            $msg
        )
    };
}

/// Log a message-related event with standard fields.
#[macro_export]
macro_rules! log_message_event {
    ($level:ident, $component:expr, $msg:expr, $message_id:expr $(, $($field:tt)*)?) => {
        $crate::tracing::$level!(
            component = $component,
            message_id = $message_id,
            $($($field)*,)?
            $msg
        )
    };
}

/// Log a rejected transition with its error class.
#[macro_export]
macro_rules! log_rejection {
    ($operation:expr, $caller:expr, $kind:expr, $err:expr) => {
        $crate::tracing::warn!(
            component = "engine",
            operation = $operation,
            caller = %$caller,
            kind = %$kind,
            error = %$err,
            "transition rejected"
        )
    };
}
