//! Host-facing callbacks and the bundle handed to them.

use crate::camera::core::Camera;
use crate::surface::manager::FrameUpdate;
use crate::surface::{FrameScheduler, Renderer, SurfaceLifecycleManager};

/// Frame-loop requests made from inside a listener callback.
///
/// The view is mid-dispatch while callbacks run, so requests are queued and
/// applied in order as soon as the callback returns.
pub struct FrameControl<Sc> {
    requests: Vec<FrameRequest<Sc>>,
}

enum FrameRequest<Sc> {
    Refresh,
    Play(FrameUpdate<Sc>),
    Stop,
}

impl<Sc> Default for FrameControl<Sc> {
    fn default() -> Self {
        Self {
            requests: Vec::new(),
        }
    }
}

impl<Sc: 'static> FrameControl<Sc> {
    /// Render once on the next tick.
    pub fn request_frame(&mut self) {
        self.requests.push(FrameRequest::Refresh);
    }

    /// Start a continuous loop running `update` before every render.
    pub fn start_loop<F>(&mut self, update: F)
    where
        F: FnMut(&mut Sc, &mut Camera) + 'static,
    {
        self.requests.push(FrameRequest::Play(Box::new(update)));
    }

    /// Stop the continuous loop.
    pub fn stop_loop(&mut self) {
        self.requests.push(FrameRequest::Stop);
    }

    pub(crate) fn apply<R, S>(self, surface: &mut SurfaceLifecycleManager<R, S>)
    where
        R: Renderer<Scene = Sc>,
        S: FrameScheduler,
    {
        for request in self.requests {
            match request {
                FrameRequest::Refresh => surface.request_frame(),
                FrameRequest::Play(update) => surface.start_loop(update),
                FrameRequest::Stop => surface.stop_loop(),
            }
        }
    }
}

/// Everything a host needs to set up or adjust its scene when the renderer
/// changes.
pub struct ViewBundle<'a, R: Renderer> {
    /// The live renderer.
    pub renderer: &'a mut R,
    /// The scene rendered by the view.
    pub scene: &'a mut R::Scene,
    /// The view's camera.
    pub camera: &'a mut Camera,
    /// Frame-loop control.
    pub frames: &'a mut FrameControl<R::Scene>,
}

/// Host callbacks. Every method has an empty default.
pub trait ViewListener<R: Renderer> {
    /// A renderer was created (first context, new context, or a layout that
    /// regained area).
    fn on_create(&mut self, _bundle: &mut ViewBundle<'_, R>) {}

    /// The existing renderer was resized; called after
    /// [`on_resize`](Self::on_resize).
    fn on_update(&mut self, _bundle: &mut ViewBundle<'_, R>) {}

    /// The renderer was disposed.
    fn on_dispose(&mut self) {}

    /// The renderer was resized for a new logical layout size.
    fn on_resize(&mut self, _width: u32, _height: u32) {}

    /// Every layout report, changed or not.
    fn on_layout(&mut self, _width: u32, _height: u32) {}

    /// Every wheel event, after the view has zoomed.
    fn on_wheel(&mut self, _delta_y: f32) {}
}

impl<R: Renderer> ViewListener<R> for () {}
