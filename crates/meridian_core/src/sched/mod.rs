//! # Cross-Thread Work Scheduling
//!
//! Workers finish asynchronously; the render thread consumes on its own
//! schedule. This module is the handoff between the two:
//!
//! - [`Mailbox`] - one worker's delivery target, weakly reachable
//! - [`TaskScheduler`] - any-thread enqueue, render-thread-only batch drain

mod mailbox;
mod scheduler;

pub use mailbox::Mailbox;
pub use scheduler::{NotifyFn, TaskScheduler};
