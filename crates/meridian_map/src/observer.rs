//! The observer boundary.
//!
//! Content failures (styles that fail to fetch or parse, missing resources)
//! are not scheduler errors; they are reported to the embedding application
//! through this interface and never interrupt the frame cycle.

use thiserror::Error;

/// Content-pipeline failures surfaced to the embedder.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MapLoadError {
    /// The style document could not be parsed.
    #[error("style parse error: {0}")]
    StyleParse(String),

    /// The style document could not be fetched.
    #[error("style load error: {0}")]
    StyleLoad(String),

    /// A requested resource does not exist.
    #[error("resource not found: {0}")]
    NotFound(String),

    /// Anything the pipeline could not classify.
    #[error("unknown map load error: {0}")]
    Unknown(String),
}

/// Lifecycle milestones reported to the embedder.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MapChange {
    /// A new style URL was set and loading began.
    WillStartLoadingMap,
    /// All sources and tiles for the current viewport finished loading.
    DidFinishLoadingMap,
    /// The current style finished loading and is ready to render.
    DidFinishLoadingStyle,
}

/// Embedder-implemented observer for map lifecycle events.
///
/// Callbacks may arrive from worker threads; implementations must be cheap
/// and must not call back into the map synchronously.
pub trait MapObserver: Send + Sync {
    /// A lifecycle milestone was reached.
    fn on_map_changed(&self, _change: MapChange) {}

    /// Content failed to load; the map keeps rendering what it has.
    fn on_map_load_error(&self, _error: &MapLoadError) {}
}

/// Observer that ignores every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullObserver;

impl MapObserver for NullObserver {}
