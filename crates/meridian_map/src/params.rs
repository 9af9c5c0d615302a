//! Frame snapshots.
//!
//! An [`UpdateParameters`] value is everything the render pass needs to draw
//! one frame, frozen at publication time. Snapshots are immutable and shared
//! between the publishing thread and the render thread for the duration of
//! one frame; a newer snapshot replaces, never merges with, an older one.

use std::sync::Arc;

use crate::style::StyleSnapshot;
use crate::transform::TransformState;

/// Debug rendering toggles.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DebugOptions {
    /// Draw tile boundaries.
    pub tile_borders: bool,
    /// Draw tile parse status.
    pub parse_status: bool,
    /// Draw tile load timestamps.
    pub timestamps: bool,
    /// Draw collision boxes.
    pub collision: bool,
    /// Visualize overdraw.
    pub overdraw: bool,
}

impl DebugOptions {
    /// Advances to the next debug preset, wrapping back to all-off.
    ///
    /// Each step adds one more overlay; after all five the cycle restarts.
    pub fn cycle(&mut self) {
        *self = if !self.tile_borders {
            Self {
                tile_borders: true,
                ..Self::default()
            }
        } else if !self.parse_status {
            Self {
                parse_status: true,
                ..*self
            }
        } else if !self.timestamps {
            Self {
                timestamps: true,
                ..*self
            }
        } else if !self.collision {
            Self {
                collision: true,
                ..*self
            }
        } else if !self.overdraw {
            Self {
                overdraw: true,
                ..*self
            }
        } else {
            Self::default()
        };
    }
}

/// Immutable description of one frame.
#[derive(Clone, Debug)]
pub struct UpdateParameters {
    /// Camera/viewport state frozen at publication.
    pub camera: TransformState,
    /// Style reference frozen at publication.
    pub style: Arc<StyleSnapshot>,
    /// Debug overlays frozen at publication.
    pub debug: DebugOptions,
    /// Monotonic publication counter, for diagnostics and tests.
    pub revision: u64,
}
