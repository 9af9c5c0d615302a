//! # MERIDIAN Core
//!
//! Scheduling and frame-synchronization kernel for a GPU-bound map renderer:
//! one render thread, arbitrarily many asynchronous workers, zero GPU access
//! from anywhere else.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                      WORKER THREADS                          │
//! │  tile fetch / parse / layout ──► Mailbox::push + schedule()  │
//! └───────────────────────┬──────────────────────────────────────┘
//!                         │ notify (cheap, any thread)
//!                         ▼
//! ┌──────────────────────────────────────────────────────────────┐
//! │                      RENDER THREAD                           │
//! │  UpdateSlot::latest ──► GPU frame ──► process_events()       │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Contract Rules
//!
//! 1. **Narrow locks only** - queue and slot locks guard O(1) pointer work,
//!    never GPU calls or client callbacks
//! 2. **Weak ownership at the seams** - the scheduler never keeps a mailbox
//!    or a notify callback alive
//! 3. **Wrong thread = panic** - render-thread-only operations assert their
//!    bound identity and fail fast

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod sched;
pub mod sync;
pub mod thread;

pub use sched::{Mailbox, NotifyFn, TaskScheduler};
pub use sync::UpdateSlot;
pub use thread::{LateThreadBound, ThreadBound};
