//! Per-instance reentrancy guard.
//!
//! The flag is checked and set atomically at transition entry and cleared
//! when the returned token drops. It records the owning thread so the
//! service can turn a nested submission from inside a transition (for
//! example from an event sink) into `Reentrant` instead of a deadlock.

use crate::errors::EngineError;
use parking_lot::Mutex;
use std::thread::{self, ThreadId};

#[derive(Debug, Default)]
pub struct TransitionGuard {
    owner: Mutex<Option<ThreadId>>,
}

impl TransitionGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a transition as in progress.
    ///
    /// # Errors
    /// `Reentrant` if a transition is already in progress.
    pub fn enter(&self) -> Result<GuardToken<'_>, EngineError> {
        let mut owner = self.owner.lock();
        if owner.is_some() {
            return Err(EngineError::Reentrant);
        }
        *owner = Some(thread::current().id());
        Ok(GuardToken { guard: self })
    }

    /// Returns true while a transition is in progress.
    pub fn is_active(&self) -> bool {
        self.owner.lock().is_some()
    }

    /// Returns true if the current thread is inside a transition.
    pub fn held_by_current_thread(&self) -> bool {
        *self.owner.lock() == Some(thread::current().id())
    }
}

/// Clears the guard on drop.
#[derive(Debug)]
pub struct GuardToken<'a> {
    guard: &'a TransitionGuard,
}

impl Drop for GuardToken<'_> {
    fn drop(&mut self) {
        *self.guard.owner.lock() = None;
    }
}
