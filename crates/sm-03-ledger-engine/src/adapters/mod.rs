//! Adapters implementing the engine ports.

pub mod journal;

pub use journal::InMemoryJournal;
