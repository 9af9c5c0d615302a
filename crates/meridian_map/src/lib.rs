//! # MERIDIAN Map
//!
//! The map facade: camera and style state on the client side, snapshot
//! publication in the middle, the render frontend on the other end.
//!
//! ## Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────┐
//! │                     CLIENT THREAD(S)                       │
//! │  jump_to / set_style_url / set_size ──► publish snapshot   │
//! └────────────────────────────┬───────────────────────────────┘
//!                              ▼
//! ┌────────────────────────────────────────────────────────────┐
//! │   update slot (latest wins)   task scheduler (mailboxes)   │
//! └────────────────────────────┬───────────────────────────────┘
//!                              ▼
//! ┌────────────────────────────────────────────────────────────┐
//! │                       RENDER THREAD                        │
//! │  render(): snapshot ──► GPU pass ──► drain completions     │
//! └────────────────────────────────────────────────────────────┘
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod map;
pub mod observer;
pub mod options;
pub mod params;
pub mod style;
pub mod transform;

pub use map::Map;
pub use observer::{MapChange, MapLoadError, MapObserver, NullObserver};
pub use options::{MapOptions, OptionsError};
pub use params::{DebugOptions, UpdateParameters};
pub use style::StyleSnapshot;
pub use transform::{CameraOptions, TransformState};

// Re-exports for embedders wiring up the render side.
pub use meridian_core::{Mailbox, TaskScheduler};
pub use meridian_rendering::{
    ProcAddress, RenderClient, RenderPass, RenderPassFactory, RendererBackend, Size,
};
