//! # MERIDIAN Rendering
//!
//! Render-thread frame coordination for the map engine:
//!
//! - [`RenderFrontend`] - drives one frame: latest snapshot in, GPU pass,
//!   scheduler drain out
//! - [`RendererBackend`] - facade over the embedder's GPU surface
//! - [`FrameGeometry`] - cross-thread resize with render-thread application
//! - [`RenderClient`] / [`RenderPass`] - the seams to the embedder and to
//!   the actual drawing code
//!
//! ## RENDER THREAD MANDATE
//!
//! - GPU state is touched from exactly one thread, asserted at every entry
//! - Completions are drained after the frame, never mid-draw
//! - Resize recorded anywhere, applied only at the top of a frame

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod backend;
pub mod client;
pub mod frontend;
pub mod geometry;
pub mod pass;

pub use backend::{AssumedState, ProcResolver, RendererBackend};
pub use client::{ProcAddress, RenderClient};
pub use frontend::{FrameStats, RenderFrontend, SizeSink};
pub use geometry::{FrameGeometry, Size};
pub use pass::{RenderPass, RenderPassFactory};
