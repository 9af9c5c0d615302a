//! # Thread-Affinity Tokens
//!
//! MERIDIAN's concurrency contract is enforced, not documented away:
//! operations that may only run on a specific thread capture that thread's
//! identity and assert it at every entry point. A violation is a programming
//! error and panics immediately rather than corrupting GPU state.
//!
//! Two flavors exist:
//!
//! - [`ThreadBound`] captures the current thread at construction. Used for
//!   the client thread, which is known the moment the map is built.
//! - [`LateThreadBound`] starts unbound and captures a thread later. Used
//!   for the render thread, which is unknown until the first renderer is
//!   created on it.

use std::thread::{self, ThreadId};

use parking_lot::Mutex;

/// A thread identity captured eagerly at construction.
///
/// Cheap to check; the check is a plain `ThreadId` comparison.
#[derive(Debug)]
pub struct ThreadBound {
    id: ThreadId,
    role: &'static str,
}

impl ThreadBound {
    /// Captures the calling thread as the owner for `role`.
    #[must_use]
    pub fn capture(role: &'static str) -> Self {
        Self {
            id: thread::current().id(),
            role,
        }
    }

    /// Returns true if the calling thread is the captured owner.
    #[must_use]
    pub fn is_current(&self) -> bool {
        thread::current().id() == self.id
    }

    /// Asserts that the calling thread is the captured owner.
    ///
    /// # Panics
    ///
    /// Panics if called from any other thread. This is a contract violation,
    /// not a recoverable error.
    pub fn assert_current(&self) {
        assert!(
            self.is_current(),
            "thread affinity violated: {} operation called from a foreign thread",
            self.role
        );
    }
}

/// A thread identity captured lazily, absent until first bound.
///
/// The render thread is only known once a renderer is created on it; until
/// then the token is unbound and affinity checks against it fail loudly.
/// Rebinding happens only when the owning resource is rebuilt (renderer
/// destroyed, then created on a fresh context thread); for the life of one
/// renderer the identity never changes.
#[derive(Debug)]
pub struct LateThreadBound {
    id: Mutex<Option<ThreadId>>,
    role: &'static str,
}

impl LateThreadBound {
    /// Creates an unbound token for `role`.
    #[must_use]
    pub fn unbound(role: &'static str) -> Self {
        Self {
            id: Mutex::new(None),
            role,
        }
    }

    /// Binds (or rebinds, across a resource rebuild) to the calling thread.
    pub fn bind_current(&self) {
        *self.id.lock() = Some(thread::current().id());
    }

    /// Returns true if a thread has been captured.
    #[must_use]
    pub fn is_bound(&self) -> bool {
        self.id.lock().is_some()
    }

    /// Returns true if the calling thread is the bound owner.
    ///
    /// Unbound tokens match no thread.
    #[must_use]
    pub fn is_current(&self) -> bool {
        *self.id.lock() == Some(thread::current().id())
    }

    /// Asserts that the calling thread is the bound owner.
    ///
    /// # Panics
    ///
    /// Panics if the token is unbound or bound to a different thread.
    pub fn assert_current(&self) {
        let bound = *self.id.lock();
        match bound {
            None => panic!(
                "thread affinity violated: {} operation called before a thread was bound",
                self.role
            ),
            Some(id) => assert!(
                id == thread::current().id(),
                "thread affinity violated: {} operation called from a foreign thread",
                self.role
            ),
        }
    }

    /// Asserts affinity only if a thread has been bound.
    ///
    /// Used by operations that are legal before the owning resource exists
    /// (e.g. a frame request before the first renderer is created).
    pub fn assert_current_if_bound(&self) {
        if self.is_bound() {
            self.assert_current();
        }
    }
}
