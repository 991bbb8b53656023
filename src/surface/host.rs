//! Capabilities the host surface and graphics engine provide.
//!
//! The lifecycle manager never talks to a graphics API directly. Hosts
//! implement these traits over whatever they embed (a GL view, a wgpu
//! surface, a test fake).

use std::fmt;
use std::future::Future;

use crate::camera::core::Camera;

/// Stable identity of a graphics context handed out by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContextId(pub u64);

impl fmt::Display for ContextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Token identifying one scheduled animation-frame callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameToken(pub u64);

/// A graphics context owned by the view between its creation and
/// destruction.
pub trait GraphicsContext {
    /// Completion of an asynchronous destroy; resolves to `true` on success.
    type Destroy: Future<Output = bool>;

    /// Identity used to tell a re-delivered context from a new one.
    fn id(&self) -> ContextId;

    /// Actual pixel size of the backing buffer. May differ from the logical
    /// layout size on high-density displays.
    fn drawing_buffer_size(&self) -> (u32, u32);

    /// Told the new logical layout size before the drawing buffer is
    /// queried. Hosts that size the buffer themselves ignore it.
    fn fit_layout(&mut self, _width: u32, _height: u32) {}

    /// Signal that a frame has been rendered and can be presented.
    fn end_frame(&mut self);

    /// Start tearing the context down.
    fn destroy(self) -> Self::Destroy;
}

/// The opaque renderer bound to one graphics context.
pub trait Renderer: Sized {
    /// Context type this renderer draws into.
    type Context: GraphicsContext;
    /// Scene graph handle, passed through unmodified.
    type Scene;

    /// Bind a new renderer to `context`.
    fn create(context: &mut Self::Context) -> Self;

    /// Resize the render target to the drawing-buffer size.
    fn set_size(&mut self, width: u32, height: u32);

    /// Current size of the render target in pixels.
    fn back_buffer_size(&self) -> (u32, u32);

    /// Draw `scene` as seen from `camera`.
    fn render(
        &mut self,
        context: &mut Self::Context,
        scene: &Self::Scene,
        camera: &Camera,
    );

    /// Release every resource the renderer holds.
    fn dispose(self);
}

/// Host animation-frame scheduler (`requestAnimationFrame` and friends).
///
/// The host later calls back into the view with the returned token.
pub trait FrameScheduler {
    /// Ask for one callback on the next frame.
    fn schedule_frame(&mut self) -> FrameToken;

    /// Withdraw a callback that has not fired yet.
    fn cancel_frame(&mut self, token: FrameToken);
}
