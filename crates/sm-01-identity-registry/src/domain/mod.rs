//! # Domain Layer
//!
//! Pure registry logic. No I/O, no clocks: timestamps arrive as arguments.
//!
//! - `entities`: `Agent`, `Role`
//! - `integrity`: protocol constants and tag computation
//! - `registry`: `IdentityRegistry` state and operations
//! - `events`: records emitted by successful operations
//! - `errors`: `IdentityError`

pub mod entities;
pub mod errors;
pub mod events;
pub mod integrity;
pub mod registry;

pub use entities::*;
pub use errors::*;
pub use events::*;
pub use integrity::*;
pub use registry::*;
