//! Adapters connecting the ledger ports to concrete components.

pub mod directory;
