//! Ports: interfaces the ledger depends on.

pub mod outbound;

pub use outbound::AgentDirectory;
