//! Last-write-wins save scheduling.
//!
//! Rapid edits are collapsed into a single save that fires once the editor has been
//! idle for a configured window. Time is passed in explicitly, so the caller owns the
//! clock and tests need no sleeping.

use std::time::{Duration, Instant};
use tracing::debug;

#[derive(Debug, Clone)]
struct PendingSave<K, V> {
    key: K,
    value: V,
    deadline: Instant,
}

#[derive(Debug, Clone)]
pub struct DebouncedSave<K, V> {
    window: Duration,
    pending: Option<PendingSave<K, V>>,
}

impl<K, V> DebouncedSave<K, V> {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: None,
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn pending_key(&self) -> Option<&K> {
        self.pending.as_ref().map(|p| &p.key)
    }

    /// Replaces any pending save and restarts the idle window.
    pub fn schedule(&mut self, key: K, value: V, now: Instant) {
        if self.pending.is_some() {
            debug!("Replacing pending save");
        }
        self.pending = Some(PendingSave {
            key,
            value,
            deadline: now + self.window,
        });
    }

    /// Takes the pending save once its idle window has passed.
    pub fn poll(&mut self, now: Instant) -> Option<(K, V)> {
        match &self.pending {
            Some(pending) if now >= pending.deadline => {
                self.pending.take().map(|p| (p.key, p.value))
            }
            _ => None,
        }
    }

    /// Takes the pending save right away, when tearing down or switching models.
    ///
    /// The save is discarded if `exists` says its target has gone away in the meantime.
    pub fn flush<F>(&mut self, exists: F) -> Option<(K, V)>
    where
        F: FnOnce(&K) -> bool,
    {
        let pending = self.pending.take()?;
        if exists(&pending.key) {
            Some((pending.key, pending.value))
        } else {
            debug!("Discarded pending save for a target that no longer exists");
            None
        }
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }
}
