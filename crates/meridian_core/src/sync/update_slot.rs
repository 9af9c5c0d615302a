//! # Latest-Wins Update Slot
//!
//! The channel between the threads that compute map state and the render
//! thread that consumes it. Exactly one snapshot is "current" at a time; a
//! new one entirely replaces the old. This is intentional lossy coalescing:
//! if three updates land between two frames, the render thread draws the
//! third and the first two are never observed.

use std::sync::Arc;

use parking_lot::Mutex;

/// Mutex-guarded single-slot channel holding the latest frame snapshot.
///
/// The lock is held only for the pointer swap or clone, never while the
/// snapshot is being produced or consumed.
pub struct UpdateSlot<P> {
    slot: Mutex<Option<Arc<P>>>,
}

impl<P> UpdateSlot<P> {
    /// Creates an empty slot.
    #[must_use]
    pub fn new() -> Self {
        Self {
            slot: Mutex::new(None),
        }
    }

    /// Publishes a snapshot, replacing (never merging with) the previous one.
    ///
    /// Callable from any thread. Returns true if an unconsumed snapshot was
    /// discarded - the coalescing case.
    pub fn publish(&self, params: Arc<P>) -> bool {
        self.slot.lock().replace(params).is_some()
    }

    /// Returns the current snapshot, if any.
    ///
    /// The snapshot stays in the slot; a repaint with no intervening update
    /// re-renders the same parameters. An empty slot is the normal idle
    /// state, not an error.
    #[must_use]
    pub fn latest(&self) -> Option<Arc<P>> {
        self.slot.lock().clone()
    }

    /// Returns true if nothing has been published yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slot.lock().is_none()
    }
}

impl<P> Default for UpdateSlot<P> {
    fn default() -> Self {
        Self::new()
    }
}
