//! # Frame Synchronization Primitives
//!
//! ## The Problem
//!
//! ```text
//! Thread 1..N (map state):  PUBLISH new frame parameters
//! Thread R (render):        CONSUME the latest parameters
//!
//! Without synchronization: TORN FRAME
//! With a wide lock:        PRODUCERS STALL BEHIND THE GPU
//! ```
//!
//! ## The Solution: Single-Slot Latest-Wins Handoff
//!
//! Producers swap an `Arc` into a slot under a lock held for O(1) pointer
//! work; the render thread clones it out the same way. Neither side ever
//! holds the lock across state computation or GPU calls, and intermediate
//! snapshots are deliberately dropped - only the newest frame matters.

mod update_slot;

pub use update_slot::UpdateSlot;
