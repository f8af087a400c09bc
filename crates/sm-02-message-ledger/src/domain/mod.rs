//! Domain layer: message records, status policy, access filter and statistics.

pub mod access_filter;
pub mod entities;
pub mod errors;
pub mod events;
pub mod integrity;
pub mod ledger;
pub mod stats;
pub mod status;

pub use access_filter::*;
pub use entities::*;
pub use errors::*;
pub use events::*;
pub use integrity::*;
pub use ledger::*;
pub use stats::*;
pub use status::*;
