//! # Renderer Backend Facade
//!
//! Render-thread-owned view of the embedder's GPU surface: the proc-address
//! resolver, the framebuffer it draws into, and the state the render pass
//! may assume after `bind`.
//!
//! The backend performs no GPU calls itself; it is the bookkeeping the
//! render pass builds on. Resizing it is deferred to the render thread by
//! the coordinator so resource reallocation never races draw calls.

use tracing::trace;

use crate::client::ProcAddress;
use crate::geometry::Size;

/// Resolver handed in by the embedding application.
pub type ProcResolver = Box<dyn Fn(&str) -> ProcAddress + Send>;

/// GPU state the render pass may assume after [`RendererBackend::bind`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AssumedState {
    /// Bound framebuffer object.
    pub framebuffer: u32,
    /// Viewport origin in the embedding surface.
    pub viewport_origin: (i32, i32),
    /// Viewport size in physical pixels.
    pub viewport_size: Option<Size>,
}

/// Render-thread-only facade over the embedder's GPU surface.
pub struct RendererBackend {
    resolver: ProcResolver,
    framebuffer_size: Size,
    origin: (i32, i32),
    default_framebuffer: u32,
    assumed: AssumedState,
}

impl RendererBackend {
    /// Creates a backend for a framebuffer of `framebuffer_size` physical
    /// pixels, drawing into `default_framebuffer`.
    #[must_use]
    pub fn new(resolver: ProcResolver, framebuffer_size: Size, default_framebuffer: u32) -> Self {
        trace!(
            width = framebuffer_size.width,
            height = framebuffer_size.height,
            "renderer backend created"
        );
        Self {
            resolver,
            framebuffer_size,
            origin: (0, 0),
            default_framebuffer,
            assumed: AssumedState::default(),
        }
    }

    /// Resolves a GPU entry point through the embedder's loader.
    #[must_use]
    pub fn resolve(&self, name: &str) -> ProcAddress {
        (self.resolver)(name)
    }

    /// Records a new physical framebuffer size.
    pub fn resize(&mut self, framebuffer_size: Size) {
        self.framebuffer_size = framebuffer_size;
    }

    /// Records the viewport origin inside the embedding surface.
    pub fn move_to(&mut self, x: i32, y: i32) {
        self.origin = (x, y);
    }

    /// Binds the default framebuffer and refreshes the assumed state.
    pub fn bind(&mut self) {
        self.assumed = AssumedState {
            framebuffer: self.default_framebuffer,
            viewport_origin: self.origin,
            viewport_size: Some(self.framebuffer_size),
        };
        trace!(
            framebuffer = self.default_framebuffer,
            width = self.framebuffer_size.width,
            height = self.framebuffer_size.height,
            "backend bound"
        );
    }

    /// Current physical framebuffer size.
    #[must_use]
    pub fn framebuffer_size(&self) -> Size {
        self.framebuffer_size
    }

    /// Current viewport origin.
    #[must_use]
    pub fn origin(&self) -> (i32, i32) {
        self.origin
    }

    /// Replaces the default framebuffer object (embedder-driven).
    pub fn set_default_framebuffer(&mut self, framebuffer: u32) {
        self.default_framebuffer = framebuffer;
    }

    /// State the render pass may assume after the last `bind`.
    #[must_use]
    pub fn assumed_state(&self) -> AssumedState {
        self.assumed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn null_resolver() -> ProcResolver {
        Box::new(|_name| std::ptr::null())
    }

    #[test]
    fn test_bind_publishes_assumed_state() {
        let mut backend = RendererBackend::new(null_resolver(), Size::new(1024, 768), 3);
        assert_eq!(backend.assumed_state(), AssumedState::default());

        backend.move_to(8, 16);
        backend.bind();

        assert_eq!(
            backend.assumed_state(),
            AssumedState {
                framebuffer: 3,
                viewport_origin: (8, 16),
                viewport_size: Some(Size::new(1024, 768)),
            }
        );
    }

    #[test]
    fn test_resize_takes_effect_on_next_bind() {
        let mut backend = RendererBackend::new(null_resolver(), Size::new(100, 100), 0);
        backend.bind();
        backend.resize(Size::new(200, 50));

        // The assumed state still describes the previous bind.
        assert_eq!(
            backend.assumed_state().viewport_size,
            Some(Size::new(100, 100))
        );

        backend.bind();
        assert_eq!(
            backend.assumed_state().viewport_size,
            Some(Size::new(200, 50))
        );
    }

    #[test]
    fn test_default_framebuffer_can_be_replaced() {
        let mut backend = RendererBackend::new(null_resolver(), Size::new(64, 64), 0);
        backend.set_default_framebuffer(7);
        backend.bind();
        assert_eq!(backend.assumed_state().framebuffer, 7);
    }

    #[test]
    fn test_resolver_is_passed_through() {
        let backend = RendererBackend::new(
            Box::new(|name| {
                if name == "glViewport" {
                    std::ptr::NonNull::<u8>::dangling().as_ptr().cast()
                } else {
                    std::ptr::null()
                }
            }),
            Size::new(1, 1),
            0,
        );
        assert!(!backend.resolve("glViewport").is_null());
        assert!(backend.resolve("glBogus").is_null());
    }
}
