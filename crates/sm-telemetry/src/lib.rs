//! # Ledger Telemetry
//!
//! Structured logging for the messaging ledger.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use sm_telemetry::{init_telemetry, TelemetryConfig};
//!
//! fn main() {
//!     let _guard = init_telemetry(TelemetryConfig::from_env()).expect("telemetry");
//!     // Ledger code here; `tracing` events now reach the subscriber.
//! }
//! ```
//!
//! ## Environment Variables
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `OTEL_SERVICE_NAME` | `secure-messaging-ledger` | Service name in logs |
//! | `SM_LOG_LEVEL` / `RUST_LOG` | `info` | Log level filter |
//! | `SM_JSON_LOGS` | `false` (`true` in containers) | JSON output |
//! | `SM_CONSOLE_OUTPUT` | `true` | Write logs to stdout |

mod config;
mod logging;
mod tracing_setup;

pub use config::TelemetryConfig;
pub use tracing_setup::{build_filter, TracingGuard};

#[doc(hidden)]
pub use tracing;

use thiserror::Error;

/// Telemetry initialization errors
#[derive(Error, Debug)]
pub enum TelemetryError {
    #[error("Failed to install tracing subscriber: {0}")]
    SubscriberInit(String),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

/// Initialize logging and tracing.
///
/// Returns a guard that should be held for the lifetime of the application.
pub fn init_telemetry(config: TelemetryConfig) -> Result<TelemetryGuard, TelemetryError> {
    let tracing_guard = tracing_setup::init_tracing(&config)?;
    Ok(TelemetryGuard {
        _tracing: tracing_guard,
    })
}

/// Guard that keeps telemetry active.
pub struct TelemetryGuard {
    _tracing: TracingGuard,
}

/// Convenience macro for creating a span with component context.
#[macro_export]
macro_rules! component_span {
    ($name:expr, $($field:tt)*) => {
        $crate::tracing::info_span!($name, $($field)*)
    };
}
