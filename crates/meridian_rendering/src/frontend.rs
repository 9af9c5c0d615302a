//! # Render Coordinator
//!
//! Owns the render-thread-only GPU backend and drives one frame at a time:
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                        FRAME TIMELINE                          │
//! ├────────────────────────────────────────────────────────────────┤
//! │  1. Copy the latest snapshot out of the update slot            │
//! │     └─ empty slot → idle, return (normal, not an error)        │
//! │  2. Lazily create the renderer (first frame only)              │
//! │  3. Re-read embedding viewport origin, move the backend        │
//! │  4. Geometry snapshot: copy + clear dirty flag (one lock)      │
//! │     └─ dirty → resize + rebind the backend (render thread!)    │
//! │  5. Render pass with the snapshot                              │
//! │  6. Drain the task scheduler (deliver worker completions)      │
//! └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Step 6 after step 5 guarantees a worker's completion is visible no later
//! than the very next frame after it was scheduled, and never lands while
//! GPU work is in flight.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, info, trace};

use meridian_core::{LateThreadBound, NotifyFn, TaskScheduler, UpdateSlot};

use crate::backend::RendererBackend;
use crate::client::RenderClient;
use crate::geometry::{FrameGeometry, Size};
use crate::pass::{RenderPass, RenderPassFactory};

/// Downstream sink receiving resize forwards, so the state layer computing
/// snapshots already reflects the new size in its next one.
pub type SizeSink = Box<dyn Fn(Size) + Send + Sync>;

/// Per-frontend frame counters.
#[derive(Clone, Copy, Debug, Default)]
pub struct FrameStats {
    /// Frames that reached the render pass.
    pub frames: u64,
    /// Render calls that found an empty update slot.
    pub idle_frames: u64,
    /// Deferred resizes applied to the backend.
    pub resizes: u64,
    /// Mailbox delivery attempts drained after frames.
    pub deliveries: u64,
}

/// Render-thread-owned half of the frontend.
struct RenderState<P> {
    factory: RenderPassFactory<P>,
    backend: Option<RendererBackend>,
    pass: Option<Box<dyn RenderPass<P>>>,
    repaint_notify: Option<Arc<NotifyFn>>,
    default_framebuffer: u32,
    stats: FrameStats,
}

/// Coordinates snapshot consumption, renderer lifecycle and the post-frame
/// scheduler drain for one map.
///
/// `update` and `set_size` are callable from any thread; `render`,
/// `create_renderer` and `destroy_renderer` belong to the render thread,
/// whose identity is captured at first renderer creation and asserted from
/// then on. Violations panic - the alternative is corrupted GPU state.
pub struct RenderFrontend<P> {
    scheduler: Arc<TaskScheduler>,
    client: Arc<dyn RenderClient>,
    updates: UpdateSlot<P>,
    geometry: Mutex<FrameGeometry>,
    state: Mutex<RenderState<P>>,
    render_thread: LateThreadBound,
    size_sink: Option<SizeSink>,
}

impl<P: Send + Sync + 'static> RenderFrontend<P> {
    /// Creates a frontend with no renderer yet.
    ///
    /// `factory` builds the render pass when the renderer is created (and
    /// again after a destroy/create cycle). `size_sink`, when present,
    /// receives every cross-thread resize after it is recorded.
    #[must_use]
    pub fn new(
        client: Arc<dyn RenderClient>,
        geometry: FrameGeometry,
        factory: RenderPassFactory<P>,
        size_sink: Option<SizeSink>,
    ) -> Self {
        Self {
            scheduler: Arc::new(TaskScheduler::new()),
            client,
            updates: UpdateSlot::new(),
            geometry: Mutex::new(geometry),
            state: Mutex::new(RenderState {
                factory,
                backend: None,
                pass: None,
                repaint_notify: None,
                default_framebuffer: 0,
                stats: FrameStats::default(),
            }),
            render_thread: LateThreadBound::unbound("renderer"),
            size_sink,
        }
    }

    /// The scheduler asynchronous workers deliver completions through.
    #[must_use]
    pub fn scheduler(&self) -> &Arc<TaskScheduler> {
        &self.scheduler
    }

    /// Publishes new frame parameters. Any thread.
    ///
    /// The previous snapshot, if unconsumed, is dropped - newest wins. The
    /// client repaint hook fires unconditionally afterwards; hooks are
    /// required to coalesce.
    pub fn update(&self, parameters: Arc<P>) {
        let coalesced = self.updates.publish(parameters);
        trace!(coalesced, "frame parameters published");
        self.client.schedule_repaint();
    }

    /// Records a new logical viewport size. Any thread.
    ///
    /// The backend is untouched here; the resize is applied at the top of
    /// the next frame on the render thread. The size is forwarded to the
    /// downstream sink after the geometry lock is released.
    pub fn set_size(&self, size: Size) {
        {
            let mut geometry = self.geometry.lock();
            geometry.size = size;
            geometry.size_dirty = true;
        }
        debug!(width = size.width, height = size.height, "resize recorded");
        if let Some(sink) = &self.size_sink {
            sink(size);
        }
    }

    /// Replaces the default framebuffer object the backend draws into.
    ///
    /// Forwarded immediately if a backend exists; otherwise picked up at
    /// creation.
    pub fn set_default_framebuffer(&self, framebuffer: u32) {
        let mut state = self.state.lock();
        state.default_framebuffer = framebuffer;
        if let Some(backend) = state.backend.as_mut() {
            backend.set_default_framebuffer(framebuffer);
        }
    }

    /// Explicitly creates the renderer on the calling thread.
    ///
    /// Captures the render thread identity and registers the repaint notify
    /// callback with the scheduler. `render` does this lazily on the first
    /// frame; embedders with explicit context setup call it directly.
    ///
    /// # Panics
    ///
    /// Panics if a renderer already exists - two `create_renderer` calls
    /// require an intervening `destroy_renderer`.
    pub fn create_renderer(&self) {
        let snapshot = *self.geometry.lock();
        let mut state = self.state.lock();
        self.create_renderer_with(&mut state, snapshot);
    }

    fn create_renderer_with(&self, state: &mut RenderState<P>, geometry: FrameGeometry) {
        assert!(
            state.backend.is_none() && state.pass.is_none(),
            "renderer already exists; destroy_renderer must run before another create_renderer"
        );
        self.render_thread.bind_current();
        self.scheduler.bind_render_thread();

        let resolver_client = Arc::clone(&self.client);
        state.backend = Some(RendererBackend::new(
            Box::new(move |name| resolver_client.resolve_gl_proc(name)),
            geometry.physical_size(),
            state.default_framebuffer,
        ));
        state.pass = Some((state.factory)(geometry.pixel_ratio));

        let repaint_client = Arc::clone(&self.client);
        let notify: Arc<NotifyFn> = Arc::new(Box::new(move || repaint_client.schedule_repaint()));
        self.scheduler.attach(&notify);
        state.repaint_notify = Some(notify);

        info!(pixel_ratio = geometry.pixel_ratio, "renderer created");
    }

    /// Destroys the renderer. Render-thread-only once one exists.
    ///
    /// Teardown is strict reverse-acquisition order: the notify registration
    /// is released first (no wakeup may observe a half-torn-down renderer),
    /// then the render pass, then the backend. Safe to call before any frame
    /// has run; a no-op if no renderer exists. A fresh renderer may be
    /// created afterwards on a (possibly different) context thread.
    pub fn destroy_renderer(&self) {
        self.render_thread.assert_current_if_bound();
        let mut state = self.state.lock();
        if state.repaint_notify.take().is_some() {
            debug!("repaint notify registration released");
        }
        state.pass = None;
        state.backend = None;
        info!("renderer destroyed");
    }

    /// Runs one frame. Render-thread-only once the renderer exists.
    ///
    /// With an empty update slot this returns immediately: no GPU work, no
    /// renderer creation, no drain - the normal idle case. Otherwise the
    /// frame runs against the geometry snapshot taken at its start; a
    /// cross-thread resize landing mid-frame is applied by the next frame.
    pub fn render(&self) {
        self.render_thread.assert_current_if_bound();

        let Some(parameters) = self.updates.latest() else {
            self.state.lock().stats.idle_frames += 1;
            trace!("no pending frame parameters; idle");
            return;
        };

        let origin = self.client.viewport_origin();
        let snapshot = {
            let mut geometry = self.geometry.lock();
            geometry.origin = origin;
            let snapshot = *geometry;
            geometry.size_dirty = false;
            snapshot
        };

        {
            let mut state = self.state.lock();
            if state.pass.is_none() {
                self.create_renderer_with(&mut state, snapshot);
            }

            let state = &mut *state;
            if let (Some(backend), Some(pass)) = (state.backend.as_mut(), state.pass.as_mut()) {
                backend.move_to(snapshot.origin.0, snapshot.origin.1);
                if snapshot.size_dirty {
                    backend.resize(snapshot.physical_size());
                    backend.bind();
                    state.stats.resizes += 1;
                }
                pass.render(backend, &parameters);
                state.stats.frames += 1;
            }
        }

        // Completions scheduled during or just before this frame are
        // delivered now, before the next frame's state is computed.
        let delivered = self.scheduler.process_events();
        self.state.lock().stats.deliveries += delivered as u64;
    }

    /// Returns true while a renderer exists.
    #[must_use]
    pub fn has_renderer(&self) -> bool {
        self.state.lock().pass.is_some()
    }

    /// Frame counters since construction.
    #[must_use]
    pub fn stats(&self) -> FrameStats {
        self.state.lock().stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use meridian_core::Mailbox;

    struct TestClient {
        repaints: AtomicUsize,
        origin: Mutex<(i32, i32)>,
    }

    impl TestClient {
        fn new() -> Arc<Self> {
            Arc::new(Self {
                repaints: AtomicUsize::new(0),
                origin: Mutex::new((0, 0)),
            })
        }

        fn repaints(&self) -> usize {
            self.repaints.load(Ordering::SeqCst)
        }
    }

    impl RenderClient for TestClient {
        fn schedule_repaint(&self) {
            self.repaints.fetch_add(1, Ordering::SeqCst);
        }

        fn resolve_gl_proc(&self, _name: &str) -> crate::client::ProcAddress {
            std::ptr::null()
        }

        fn viewport_origin(&self) -> (i32, i32) {
            *self.origin.lock()
        }
    }

    struct RecordingPass {
        rendered: Arc<Mutex<Vec<(u32, Size)>>>,
    }

    impl RenderPass<u32> for RecordingPass {
        fn render(&mut self, backend: &mut RendererBackend, parameters: &u32) {
            self.rendered
                .lock()
                .push((*parameters, backend.framebuffer_size()));
        }
    }

    fn frontend_with(
        client: Arc<TestClient>,
        sink: Option<SizeSink>,
    ) -> (RenderFrontend<u32>, Arc<Mutex<Vec<(u32, Size)>>>) {
        let rendered = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&rendered);
        let frontend = RenderFrontend::new(
            client,
            FrameGeometry::new(Size::new(400, 300), 1.0),
            Box::new(move |_pixel_ratio| {
                Box::new(RecordingPass {
                    rendered: Arc::clone(&log),
                })
            }),
            sink,
        );
        (frontend, rendered)
    }

    #[test]
    fn test_render_without_update_is_idle() {
        let client = TestClient::new();
        let (frontend, rendered) = frontend_with(Arc::clone(&client), None);

        frontend.render();

        assert!(rendered.lock().is_empty());
        assert!(!frontend.has_renderer());
        assert_eq!(frontend.stats().frames, 0);
        assert_eq!(frontend.stats().idle_frames, 1);
    }

    #[test]
    fn test_latest_update_wins() {
        let client = TestClient::new();
        let (frontend, rendered) = frontend_with(Arc::clone(&client), None);

        frontend.update(Arc::new(1));
        frontend.update(Arc::new(2));
        frontend.render();

        let frames = rendered.lock();
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].0, 2);
    }

    #[test]
    fn test_update_requests_repaint_each_time() {
        let client = TestClient::new();
        let (frontend, _rendered) = frontend_with(Arc::clone(&client), None);

        frontend.update(Arc::new(1));
        frontend.update(Arc::new(2));
        frontend.update(Arc::new(3));

        assert_eq!(client.repaints(), 3);
    }

    #[test]
    fn test_renderer_created_lazily_on_first_frame() {
        let client = TestClient::new();
        let (frontend, rendered) = frontend_with(Arc::clone(&client), None);
        assert!(!frontend.has_renderer());

        frontend.update(Arc::new(9));
        frontend.render();
        assert!(frontend.has_renderer());

        // A repaint with no intervening update re-renders the same snapshot.
        frontend.render();
        assert_eq!(rendered.lock().len(), 2);
        assert_eq!(frontend.stats().frames, 2);
    }

    #[test]
    #[should_panic(expected = "renderer already exists")]
    fn test_double_create_panics() {
        let client = TestClient::new();
        let (frontend, _rendered) = frontend_with(client, None);

        frontend.create_renderer();
        frontend.create_renderer();
    }

    #[test]
    fn test_destroy_then_recreate() {
        let client = TestClient::new();
        let (frontend, _rendered) = frontend_with(client, None);

        // Destroy before any renderer exists is a safe no-op.
        frontend.destroy_renderer();

        frontend.create_renderer();
        assert!(frontend.has_renderer());
        frontend.destroy_renderer();
        assert!(!frontend.has_renderer());
        frontend.create_renderer();
        assert!(frontend.has_renderer());
    }

    #[test]
    fn test_destroy_releases_notify_registration() {
        let client = TestClient::new();
        let (frontend, _rendered) = frontend_with(Arc::clone(&client), None);

        frontend.create_renderer();
        assert_eq!(frontend.scheduler().attached(), 1);

        frontend.destroy_renderer();
        assert_eq!(frontend.scheduler().attached(), 0);

        // A late completion must not reach the dead registration.
        let before = client.repaints();
        let mailbox = Mailbox::new();
        frontend.scheduler().schedule(Arc::downgrade(&mailbox));
        assert_eq!(client.repaints(), before);
    }

    #[test]
    fn test_scheduled_mailbox_requests_repaint() {
        let client = TestClient::new();
        let (frontend, _rendered) = frontend_with(Arc::clone(&client), None);
        frontend.create_renderer();

        let before = client.repaints();
        let mailbox = Mailbox::new();
        mailbox.push(|| {});
        frontend.scheduler().schedule(Arc::downgrade(&mailbox));
        assert_eq!(client.repaints(), before + 1);
    }

    #[test]
    fn test_resize_is_deferred_and_applied_once() {
        let client = TestClient::new();
        let (frontend, rendered) = frontend_with(Arc::clone(&client), None);

        frontend.update(Arc::new(1));
        frontend.render();
        assert_eq!(frontend.stats().resizes, 1); // initial geometry is dirty

        frontend.set_size(Size::new(800, 600));
        frontend.render();
        frontend.render();

        let frames = rendered.lock();
        assert_eq!(frames[1].1, Size::new(800, 600));
        assert_eq!(frames[2].1, Size::new(800, 600));
        // The dirty flag flipped off exactly once for the resize.
        assert_eq!(frontend.stats().resizes, 2);
    }

    #[test]
    fn test_set_size_forwards_to_sink() {
        let client = TestClient::new();
        let forwarded = Arc::new(Mutex::new(Vec::new()));
        let sink_log = Arc::clone(&forwarded);
        let (frontend, _rendered) = frontend_with(
            client,
            Some(Box::new(move |size| sink_log.lock().push(size))),
        );

        frontend.set_size(Size::new(1024, 768));
        assert_eq!(*forwarded.lock(), vec![Size::new(1024, 768)]);
    }

    #[test]
    fn test_pixel_ratio_scales_framebuffer() {
        let client = TestClient::new();
        let rendered = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&rendered);
        let frontend = RenderFrontend::new(
            client,
            FrameGeometry::new(Size::new(400, 300), 2.0),
            Box::new(move |_pixel_ratio| {
                Box::new(RecordingPass {
                    rendered: Arc::clone(&log),
                })
            }),
            None,
        );

        frontend.update(Arc::new(1));
        frontend.render();
        assert_eq!(rendered.lock()[0].1, Size::new(800, 600));
    }

    #[test]
    fn test_frame_drains_scheduler() {
        let client = TestClient::new();
        let (frontend, _rendered) = frontend_with(client, None);

        let delivered = Arc::new(AtomicUsize::new(0));
        let mailbox = Mailbox::new();
        let counter = Arc::clone(&delivered);
        mailbox.push(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        frontend.scheduler().schedule(Arc::downgrade(&mailbox));

        // Idle render does not drain; the completion waits for a real frame.
        frontend.render();
        assert_eq!(delivered.load(Ordering::SeqCst), 0);

        frontend.update(Arc::new(5));
        frontend.render();
        assert_eq!(delivered.load(Ordering::SeqCst), 1);
        assert_eq!(frontend.stats().deliveries, 1);
    }

    #[test]
    fn test_foreign_thread_render_panics_once_bound() {
        let client = TestClient::new();
        let (frontend, _rendered) = frontend_with(client, None);
        frontend.create_renderer();
        frontend.update(Arc::new(1));

        let frontend = Arc::new(frontend);
        let remote = Arc::clone(&frontend);
        let result = std::thread::spawn(move || remote.render()).join();
        assert!(result.is_err());
    }

    #[test]
    fn test_default_framebuffer_applies_before_and_after_creation() {
        let client = TestClient::new();
        let (frontend, _rendered) = frontend_with(client, None);

        frontend.set_default_framebuffer(5);
        frontend.create_renderer();
        frontend.set_default_framebuffer(9);
        frontend.destroy_renderer();
        frontend.create_renderer();
        assert!(frontend.has_renderer());
    }

    #[test]
    fn test_viewport_origin_probed_each_frame() {
        let client = TestClient::new();
        let rendered = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::clone(&rendered);
        let frontend = RenderFrontend::new(
            Arc::clone(&client) as Arc<dyn RenderClient>,
            FrameGeometry::new(Size::new(100, 100), 1.0),
            Box::new(move |_pixel_ratio| {
                Box::new(OriginPass {
                    origins: Arc::clone(&log),
                })
            }),
            None,
        );

        frontend.update(Arc::new(1));
        frontend.render();
        *client.origin.lock() = (32, 8);
        frontend.render();

        assert_eq!(*rendered.lock(), vec![(0, 0), (32, 8)]);
    }

    struct OriginPass {
        origins: Arc<Mutex<Vec<(i32, i32)>>>,
    }

    impl RenderPass<u32> for OriginPass {
        fn render(&mut self, backend: &mut RendererBackend, _parameters: &u32) {
            self.origins.lock().push(backend.origin());
        }
    }
}
