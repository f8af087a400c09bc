//! Ports: interfaces the engine publishes through.

pub mod outbound;

pub use outbound::EventSink;
