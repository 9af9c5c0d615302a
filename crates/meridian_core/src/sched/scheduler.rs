//! # Task Scheduler
//!
//! Decouples "a worker finished something" from "the render thread processes
//! it", while giving interested parties a cheap way to learn that work is
//! pending.
//!
//! ```text
//! worker thread                         render thread
//! ─────────────                         ─────────────
//! mailbox.push(completion)
//! scheduler.schedule(weak)  ──┐
//!   append to queue (lock)    │
//!   fire notify callbacks  ───┼──►  wakeup (windowing layer)
//!                             │         │
//!                             │         ▼
//!                             │     frame render (GPU)
//!                             │         │
//!                             └────►    ▼
//!                                   scheduler.process_events()
//!                                     swap queue, deliver batch
//! ```
//!
//! The notify step runs on whatever thread scheduled the work and must stay
//! trivial (post a wakeup, nothing more). The drain step runs only on the
//! render thread, after GPU work, so completions never mutate map state
//! mid-frame.

use std::collections::VecDeque;
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::sched::mailbox::Mailbox;
use crate::thread::LateThreadBound;

/// Nullary wakeup callback fired on every `schedule`.
///
/// The scheduler holds these weakly; the registering side keeps the `Arc`
/// and drops it to detach. Bodies must be cheap and non-blocking.
pub type NotifyFn = Box<dyn Fn() + Send + Sync>;

/// Cross-thread task queue with per-frame batch draining.
///
/// `schedule` is callable from any thread. `process_events` is
/// render-thread-only, enforced with a lazily bound thread identity; calling
/// it from anywhere else is a fatal contract violation.
pub struct TaskScheduler {
    render_thread: LateThreadBound,
    queue: Mutex<VecDeque<Weak<Mailbox>>>,
    notifiers: Mutex<Vec<Weak<NotifyFn>>>,
}

impl TaskScheduler {
    /// Creates a scheduler with no bound render thread.
    #[must_use]
    pub fn new() -> Self {
        Self {
            render_thread: LateThreadBound::unbound("scheduler drain"),
            queue: Mutex::new(VecDeque::new()),
            notifiers: Mutex::new(Vec::new()),
        }
    }

    /// Binds the drain side to the calling thread.
    ///
    /// Called by the render coordinator when the renderer is created; until
    /// then the render thread is unknown. Rebinding happens only across a
    /// renderer rebuild.
    pub fn bind_render_thread(&self) {
        self.render_thread.bind_current();
    }

    /// Enqueues a mailbox for delivery on the render thread.
    ///
    /// Callable from any thread. Appends under the queue lock, then fires
    /// every live notify callback in registration order, pruning dead ones
    /// in the same pass. No lock is held while a callback runs.
    pub fn schedule(&self, mailbox: Weak<Mailbox>) {
        let pending = {
            let mut queue = self.queue.lock();
            queue.push_back(mailbox);
            queue.len()
        };
        trace!(pending, "mailbox scheduled");

        // Upgrade live callbacks and drop dead entries inside the registry
        // lock; invocation happens after the lock is released.
        let live: Vec<Arc<NotifyFn>> = {
            let mut notifiers = self.notifiers.lock();
            let mut live = Vec::with_capacity(notifiers.len());
            notifiers.retain(|weak| match weak.upgrade() {
                Some(callback) => {
                    live.push(callback);
                    true
                }
                None => false,
            });
            live
        };
        for callback in live {
            callback();
        }
    }

    /// Registers a weakly-held wakeup callback.
    ///
    /// Multiple attachments are allowed and independent; no duplicate
    /// detection is performed. The registration expires when the caller
    /// drops its `Arc` - no explicit detach exists or is needed.
    pub fn attach(&self, callback: &Arc<NotifyFn>) {
        self.notifiers.lock().push(Arc::downgrade(callback));
    }

    /// Drains and delivers every mailbox scheduled before this call.
    ///
    /// Render-thread-only. Swaps the queue with an empty one in a single
    /// lock acquisition - mailboxes scheduled during the drain land in the
    /// next batch, never lost, never double-delivered. Delivery is
    /// best-effort FIFO: a mailbox whose owner is gone is skipped silently
    /// and permanently.
    ///
    /// Returns the number of delivery attempts in this batch.
    ///
    /// # Panics
    ///
    /// Panics if called before [`bind_render_thread`](Self::bind_render_thread)
    /// or from any thread other than the bound one.
    pub fn process_events(&self) -> usize {
        self.render_thread.assert_current();

        let batch = {
            let mut queue = self.queue.lock();
            std::mem::take(&mut *queue)
        };
        let attempts = batch.len();
        for mailbox in &batch {
            Mailbox::try_deliver(mailbox);
        }
        if attempts > 0 {
            debug!(attempts, "task queue drained");
        }
        attempts
    }

    /// Number of mailboxes waiting for the next drain.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.queue.lock().len()
    }

    /// Number of currently live notify registrations.
    #[must_use]
    pub fn attached(&self) -> usize {
        self.notifiers
            .lock()
            .iter()
            .filter(|weak| weak.strong_count() > 0)
            .count()
    }
}

impl Default for TaskScheduler {
    fn default() -> Self {
        Self::new()
    }
}
