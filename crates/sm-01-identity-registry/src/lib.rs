//! # Identity Registry Subsystem (sm-01)
//!
//! The registry is the authority on who may act on the ledger. It stores one
//! record per identity key, enforces uniqueness of keys and public-key
//! fingerprints, manages roles and the active/inactive lifecycle, and stamps
//! every record with a deterministic integrity tag.
//!
//! ## Domain Invariants
//!
//! | ID | Invariant | Enforcement |
//! |----|-----------|-------------|
//! | INVARIANT-1 | Identity key bound to exactly one record | `domain/registry.rs` - `register()` |
//! | INVARIANT-2 | Fingerprint bound to exactly one identity, never released | `by_fingerprint` index |
//! | INVARIANT-3 | Active agents cannot re-register | `register()` |
//! | INVARIANT-4 | Records are never deleted, only deactivated | no removal path exists |
//! | INVARIANT-5 | Integrity tag is a pure function of key and fingerprint | `domain/integrity.rs` |
//!
//! ## Lifecycle
//!
//! ```text
//! [UNKNOWN] ──register──→ [ACTIVE] ──deactivate──→ [INACTIVE]
//!                            ↑                          │
//!                            └─ register (fresh fprint) ┘
//! ```
//!
//! All operations validate completely before mutating, so a rejected call
//! leaves the registry untouched.

pub mod domain;

pub use domain::{
    identity_integrity_tag, integrity_constants, Agent, IdentityError, IdentityEvent,
    IdentityRegistry, IntegrityCheck, IntegrityConstants, RegistryConfig, Role,
    IDENTITY_PROTOCOL_CONST, IDENTITY_SIGNATURE_CONST,
};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
