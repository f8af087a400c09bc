//! # Shared Types Crate
//!
//! Primitives shared by every component of the ledger state machine.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: identity keys, hashes and timestamps are
//!   defined once and reused by the registry, the ledger and the engine.
//! - **Back-references by key**: components refer to each other's records
//!   through `AgentId` / `MessageId` lookups, never through pointers.
//! - **Explicit authority**: privileged calls take an [`AdminCapability`]
//!   that can only be minted by an [`AdminSet`].

pub mod capability;
pub mod entities;
pub mod errors;
pub mod hashing;

pub use capability::{AdminCapability, AdminSet, CapabilityError};
pub use entities::*;
pub use errors::*;
pub use hashing::{contains_marker, keccak256, pad_label, PackedEncoder};
