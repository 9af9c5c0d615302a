//! # The Map Facade
//!
//! One handle for the embedding application. The map owns the camera and
//! style state on the client side and the render frontend on the other; every
//! mutation freezes the current state into an immutable snapshot and
//! publishes it, which in turn asks the client to repaint.
//!
//! ```text
//! client thread            any thread              render thread
//! ─────────────            ──────────              ─────────────
//! jump_to / move_by        set_style_url           create_renderer
//!      │                   set_size / set_debug    render
//!      └────────┬──────────────────┘               destroy_renderer
//!               ▼
//!        publish snapshot ──► update slot ──► next frame
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{info, warn};

use meridian_core::{TaskScheduler, ThreadBound};
use meridian_rendering::{
    FrameGeometry, FrameStats, RenderClient, RenderFrontend, RenderPassFactory, Size,
};

use crate::observer::{MapChange, MapLoadError, MapObserver};
use crate::options::MapOptions;
use crate::params::{DebugOptions, UpdateParameters};
use crate::style::StyleSnapshot;
use crate::transform::{CameraOptions, TransformState};

/// The engine's public handle.
///
/// Camera mutators are client-thread-affine (asserted; the thread that built
/// the map owns its state). `set_style_url`, `set_size` and `set_debug` are
/// callable from any thread. The render-side operations are passed through to
/// the frontend and follow its render-thread contract.
pub struct Map {
    frontend: Arc<RenderFrontend<UpdateParameters>>,
    transform: Arc<Mutex<TransformState>>,
    style: Mutex<Arc<StyleSnapshot>>,
    debug: Mutex<DebugOptions>,
    observer: Arc<dyn MapObserver>,
    client_thread: ThreadBound,
    revision: AtomicU64,
}

impl Map {
    /// Builds a map from startup options.
    ///
    /// Captures the calling thread as the client thread. If the options name
    /// a style URL it is applied through the regular style path, so the
    /// first snapshot is published before this returns.
    #[must_use]
    pub fn new(
        client: Arc<dyn RenderClient>,
        observer: Arc<dyn MapObserver>,
        options: &MapOptions,
        factory: RenderPassFactory<UpdateParameters>,
    ) -> Self {
        let transform = Arc::new(Mutex::new(TransformState::new(
            options.size(),
            options.pixel_ratio,
        )));

        let sink_transform = Arc::clone(&transform);
        let frontend = Arc::new(RenderFrontend::new(
            client,
            FrameGeometry::new(options.size(), options.pixel_ratio),
            factory,
            Some(Box::new(move |size| {
                sink_transform.lock().size = size;
            })),
        ));

        let map = Self {
            frontend,
            transform,
            style: Mutex::new(Arc::new(StyleSnapshot::default())),
            debug: Mutex::new(DebugOptions::default()),
            observer,
            client_thread: ThreadBound::capture("map client"),
            revision: AtomicU64::new(0),
        };
        if let Some(url) = &options.style_url {
            map.set_style_url(url);
        }
        map
    }

    /// Freezes the current state into a snapshot and hands it to the
    /// frontend, which requests a repaint.
    fn publish(&self) {
        let camera = *self.transform.lock();
        let style = self.style.lock().clone();
        let debug = *self.debug.lock();
        let parameters = UpdateParameters {
            camera,
            style,
            debug,
            revision: self.revision.fetch_add(1, Ordering::Relaxed) + 1,
        };
        self.frontend.update(Arc::new(parameters));
    }

    /// Applies a partial camera change. Client thread only.
    pub fn jump_to(&self, camera: CameraOptions) {
        self.client_thread.assert_current();
        self.transform.lock().apply(camera);
        self.publish();
    }

    /// Pans the camera by a screen-pixel offset. Client thread only.
    pub fn move_by(&self, dx: f64, dy: f64) {
        self.client_thread.assert_current();
        self.transform.lock().move_by(dx, dy);
        self.publish();
    }

    /// Sets the zoom level. Client thread only.
    pub fn set_zoom(&self, zoom: f64) {
        self.jump_to(CameraOptions {
            zoom: Some(zoom),
            ..CameraOptions::default()
        });
    }

    /// Sets the bearing in degrees clockwise from north. Client thread only.
    pub fn set_bearing(&self, bearing: f64) {
        self.jump_to(CameraOptions {
            bearing: Some(bearing),
            ..CameraOptions::default()
        });
    }

    /// Current camera/viewport state.
    #[must_use]
    pub fn camera(&self) -> TransformState {
        *self.transform.lock()
    }

    /// Replaces the current style. Thread safe.
    ///
    /// The previous style snapshot stays alive as long as an in-flight frame
    /// still references it.
    pub fn set_style_url(&self, url: &str) {
        *self.style.lock() = StyleSnapshot::from_url(url);
        info!(url, "style changed");
        self.observer.on_map_changed(MapChange::WillStartLoadingMap);
        self.publish();
    }

    /// URL of the current style; empty if none was set.
    #[must_use]
    pub fn style_url(&self) -> String {
        self.style.lock().url.clone()
    }

    /// Replaces the debug overlay selection.
    pub fn set_debug(&self, debug: DebugOptions) {
        *self.debug.lock() = debug;
        self.publish();
    }

    /// Advances to the next debug overlay preset.
    pub fn cycle_debug_options(&self) {
        self.debug.lock().cycle();
        self.publish();
    }

    /// Current debug overlay selection.
    #[must_use]
    pub fn debug(&self) -> DebugOptions {
        *self.debug.lock()
    }

    /// Resizes the viewport. Any thread.
    ///
    /// The frontend records the size for the render thread and forwards it
    /// into the transform, so the snapshot published here already reflects
    /// it.
    pub fn set_size(&self, size: Size) {
        self.frontend.set_size(size);
        self.publish();
    }

    /// Requests a repaint of the current state. Any thread.
    pub fn trigger_repaint(&self) {
        self.publish();
    }

    /// Reports a lifecycle milestone from the content pipeline to the
    /// embedder's observer.
    pub fn report_change(&self, change: MapChange) {
        self.observer.on_map_changed(change);
    }

    /// Reports a content failure from the pipeline to the embedder's
    /// observer. The frame cycle is unaffected.
    pub fn report_load_error(&self, error: &MapLoadError) {
        warn!(%error, "map load error");
        self.observer.on_map_load_error(error);
    }

    /// The scheduler asynchronous workers deliver completions through.
    #[must_use]
    pub fn scheduler(&self) -> Arc<TaskScheduler> {
        Arc::clone(self.frontend.scheduler())
    }

    /// Explicitly creates the renderer on the calling (render) thread.
    pub fn create_renderer(&self) {
        self.frontend.create_renderer();
    }

    /// Destroys the renderer. Render thread only once one exists.
    pub fn destroy_renderer(&self) {
        self.frontend.destroy_renderer();
    }

    /// Runs one frame on the calling (render) thread.
    pub fn render(&self) {
        self.frontend.render();
    }

    /// Replaces the default framebuffer object the backend draws into.
    pub fn set_default_framebuffer(&self, framebuffer: u32) {
        self.frontend.set_default_framebuffer(framebuffer);
    }

    /// Frame counters since construction.
    #[must_use]
    pub fn frame_stats(&self) -> FrameStats {
        self.frontend.stats()
    }
}
