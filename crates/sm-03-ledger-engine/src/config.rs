//! Engine configuration.
//!
//! The configuration is part of the deterministic input: replicas replaying
//! the same transactions under the same configuration reach the same digest.

use serde::{Deserialize, Serialize};
use sm_01_identity_registry::RegistryConfig;
use sm_02_message_ledger::{LedgerConfig, StatusPolicy};
use std::env;

/// Engine configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Plain sends start as `DELIVERED`.
    pub auto_deliver: bool,
    /// Accepted message status changes.
    pub status_policy: StatusPolicy,
    /// Marker tokens for the enhancement flags, matched case-insensitively.
    pub marker_tokens: Vec<String>,
    /// Maximum identity document size in bytes.
    pub max_document_bytes: usize,
    /// Maximum message metadata size in bytes.
    pub max_metadata_bytes: usize,
    /// Maximum storage reference size in bytes.
    pub max_reference_bytes: usize,
    /// Maximum permission resource name size in bytes.
    pub max_resource_bytes: usize,
    /// Metered cost ceiling for a single transition.
    pub gas_limit_per_transition: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            auto_deliver: true,
            status_policy: StatusPolicy::Lattice,
            marker_tokens: vec![
                "aicube_neural_sig".to_string(),
                "quantum_enhanced".to_string(),
                "quantum_protected".to_string(),
            ],
            max_document_bytes: 8 * 1024,
            max_metadata_bytes: 4 * 1024,
            max_reference_bytes: 256,
            max_resource_bytes: 64,
            gas_limit_per_transition: 1_000_000,
        }
    }
}

impl EngineConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `SM_AUTO_DELIVER`: Auto-deliver plain sends (default: true)
    /// - `SM_STATUS_POLICY`: `lattice` or `permissive` (default: lattice)
    /// - `SM_GAS_LIMIT`: Per-transition cost ceiling (default: 1000000)
    /// - `SM_MARKER_TOKENS`: Comma-separated marker tokens
    /// - `SM_MAX_DOCUMENT_BYTES`, `SM_MAX_METADATA_BYTES`, `SM_MAX_REFERENCE_BYTES`,
    ///   `SM_MAX_RESOURCE_BYTES`
    ///
    /// Unparseable values fall back to the default.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            auto_deliver: env::var("SM_AUTO_DELIVER")
                .map(|v| v.to_lowercase() != "false" && v != "0")
                .unwrap_or(defaults.auto_deliver),

            status_policy: env::var("SM_STATUS_POLICY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.status_policy),

            marker_tokens: env::var("SM_MARKER_TOKENS")
                .map(|v| {
                    v.split(',')
                        .map(str::trim)
                        .filter(|t| !t.is_empty())
                        .map(String::from)
                        .collect()
                })
                .unwrap_or(defaults.marker_tokens),

            max_document_bytes: parse_env("SM_MAX_DOCUMENT_BYTES")
                .unwrap_or(defaults.max_document_bytes),

            max_metadata_bytes: parse_env("SM_MAX_METADATA_BYTES")
                .unwrap_or(defaults.max_metadata_bytes),

            max_reference_bytes: parse_env("SM_MAX_REFERENCE_BYTES")
                .unwrap_or(defaults.max_reference_bytes),

            max_resource_bytes: parse_env("SM_MAX_RESOURCE_BYTES")
                .unwrap_or(defaults.max_resource_bytes),

            gas_limit_per_transition: parse_env("SM_GAS_LIMIT")
                .unwrap_or(defaults.gas_limit_per_transition),
        }
    }

    /// Registry view of the configuration.
    pub fn registry_config(&self) -> RegistryConfig {
        RegistryConfig {
            marker_tokens: self.marker_tokens.clone(),
            max_document_bytes: self.max_document_bytes,
        }
    }

    /// Ledger view of the configuration.
    pub fn ledger_config(&self) -> LedgerConfig {
        LedgerConfig {
            auto_deliver: self.auto_deliver,
            status_policy: self.status_policy,
            marker_tokens: self.marker_tokens.clone(),
            max_metadata_bytes: self.max_metadata_bytes,
            max_reference_bytes: self.max_reference_bytes,
            max_resource_bytes: self.max_resource_bytes,
        }
    }
}

fn parse_env<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.trim().parse().ok())
}
