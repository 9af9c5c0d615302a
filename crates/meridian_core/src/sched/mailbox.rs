//! # Completion Mailboxes
//!
//! A [`Mailbox`] is the delivery target for one asynchronous worker's
//! completions. Workers push boxed closures into it from any thread; the
//! render thread later receives them one at a time via the scheduler drain.
//!
//! Ownership is the cancellation model. The worker (and its producers) hold
//! the `Arc<Mailbox>`; the scheduler queue only ever holds a `Weak`. When
//! the owning worker is torn down, pending deliveries silently no-op - there
//! is no explicit cancel call and no retry.

use std::collections::VecDeque;
use std::sync::{Arc, Weak};

use parking_lot::Mutex;

/// A deferred completion, run on the receiving thread.
type Task = Box<dyn FnOnce() + Send>;

/// Inbox state behind the mailbox lock.
struct Inbox {
    tasks: VecDeque<Task>,
    closed: bool,
}

/// Delivery target for asynchronous completions.
///
/// Each `push` is paired with one `schedule` on the task scheduler, and each
/// drained queue entry triggers at most one `receive`. A mailbox whose owner
/// has disappeared (dead `Weak`) or that has been [`close`](Mailbox::close)d
/// is skipped silently.
pub struct Mailbox {
    inbox: Mutex<Inbox>,
}

impl Mailbox {
    /// Creates a new, open mailbox.
    #[must_use]
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            inbox: Mutex::new(Inbox {
                tasks: VecDeque::new(),
                closed: false,
            }),
        })
    }

    /// Enqueues a completion for later receipt.
    ///
    /// Callable from any thread. Returns false (and drops the task) if the
    /// mailbox has been closed.
    pub fn push(&self, task: impl FnOnce() + Send + 'static) -> bool {
        let mut inbox = self.inbox.lock();
        if inbox.closed {
            return false;
        }
        inbox.tasks.push_back(Box::new(task));
        true
    }

    /// Closes the mailbox, dropping all pending completions.
    ///
    /// Delivery attempts after close are silent no-ops even while strong
    /// references remain. This covers an owner tearing down while one of its
    /// completions is still queued on a scheduler.
    pub fn close(&self) {
        let mut inbox = self.inbox.lock();
        inbox.closed = true;
        inbox.tasks.clear();
    }

    /// Returns true if the mailbox has been closed.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.inbox.lock().closed
    }

    /// Number of completions waiting for receipt.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.inbox.lock().tasks.len()
    }

    /// Receives at most one pending completion.
    ///
    /// The task is popped under the lock but run outside it, so a completion
    /// may push follow-up work into its own mailbox without deadlocking.
    pub fn receive(&self) {
        let task = {
            let mut inbox = self.inbox.lock();
            if inbox.closed {
                None
            } else {
                inbox.tasks.pop_front()
            }
        };
        if let Some(task) = task {
            task();
        }
    }

    /// Attempts delivery through a weak handle.
    ///
    /// Best-effort: a dead or closed mailbox is skipped without error. This
    /// is how the scheduler models cancellation.
    pub fn try_deliver(mailbox: &Weak<Self>) {
        if let Some(mailbox) = mailbox.upgrade() {
            mailbox.receive();
        }
    }
}
