//! # Exploit Simulations
//!
//! Hostile usage patterns against the full engine and randomized property
//! checks that must hold for every transaction schedule.

pub mod abuse;
