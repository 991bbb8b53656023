//! Graphics context / renderer lifecycle and render-loop scheduling.
//!
//! The manager owns at most one context and at most one renderer. It reacts
//! to layout changes and to contexts arriving or disappearing, and it turns
//! frame requests into host scheduler ticks. Everything here runs on the UI
//! thread; the only asynchronous step is context destruction, handed back to
//! the caller as a [`ContextRelease`].

use std::cell::RefCell;
use std::rc::Rc;

use rustc_hash::FxHashSet;

use crate::camera::core::Camera;
use crate::error::ViewError;
use crate::options::FrameOptions;
use crate::surface::host::{
    ContextId, FrameScheduler, FrameToken, GraphicsContext, Renderer,
};
use crate::surface::release::{ContextRelease, PendingReleases};
use crate::util::frame_timing::FrameTiming;

/// Per-frame update run by the continuous render loop before each render.
pub type FrameUpdate<Sc> = Box<dyn FnMut(&mut Sc, &mut Camera)>;

/// Destroy future of the context type a renderer draws into.
pub type DestroyOf<R> =
    <<R as Renderer>::Context as GraphicsContext>::Destroy;

/// Where the surface is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfacePhase {
    /// No graphics context.
    NoContext,
    /// Context present but the layout has zero area, so no renderer yet.
    ContextNoSurface,
    /// Context, renderer and a positive layout area.
    Ready,
    /// Unmounted; the last context's destruction has not been confirmed.
    Disposing,
}

/// Lifecycle notifications for the host, drained with
/// [`SurfaceLifecycleManager::drain_events`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceEvent {
    /// A renderer was created and bound to the current context.
    Created,
    /// The existing renderer was resized for a new layout.
    Resized {
        /// Logical layout width.
        width: u32,
        /// Logical layout height.
        height: u32,
    },
    /// The renderer was disposed.
    Disposed,
}

/// What the scheduled frame token, if any, is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FrameMode {
    Idle,
    Single,
    Continuous,
}

/// Owns the context, the renderer and the frame schedule of one view.
///
/// Lifecycle changes are queued as [`SurfaceEvent`]s until
/// [`drain_events`](Self::drain_events) is called.
pub struct SurfaceLifecycleManager<R: Renderer, S: FrameScheduler> {
    width: u32,
    height: u32,
    context: Option<R::Context>,
    renderer: Option<R>,
    scheduler: S,
    frame: Option<FrameToken>,
    mode: FrameMode,
    update: Option<FrameUpdate<R::Scene>>,
    pending: PendingReleases,
    /// Context released by the last unmount.
    teardown: Option<ContextId>,
    events: Vec<SurfaceEvent>,
    timing: FrameTiming,
}

impl<R: Renderer, S: FrameScheduler> SurfaceLifecycleManager<R, S> {
    /// Create a manager with no context and a zero-area layout.
    pub fn new(scheduler: S, frame: &FrameOptions) -> Self {
        Self {
            width: 0,
            height: 0,
            context: None,
            renderer: None,
            scheduler,
            frame: None,
            mode: FrameMode::Idle,
            update: None,
            pending: Rc::new(RefCell::new(FxHashSet::default())),
            teardown: None,
            events: Vec::new(),
            timing: FrameTiming::new(frame),
        }
    }

    // ── Accessors ────────────────────────────────────────────────────────

    /// Current lifecycle phase.
    pub fn phase(&self) -> SurfacePhase {
        match (&self.context, &self.renderer) {
            (Some(_), Some(_)) => SurfacePhase::Ready,
            (Some(_), None) => SurfacePhase::ContextNoSurface,
            (None, _) => {
                let disposing = self
                    .teardown
                    .is_some_and(|id| self.pending.borrow().contains(&id));
                if disposing {
                    SurfacePhase::Disposing
                } else {
                    SurfacePhase::NoContext
                }
            }
        }
    }

    /// Logical layout size last reported by the host.
    pub fn layout_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Render target size, if a renderer exists.
    pub fn buffer_size(&self) -> Option<(u32, u32)> {
        self.renderer.as_ref().map(Renderer::back_buffer_size)
    }

    /// The live renderer.
    pub fn renderer(&self) -> Option<&R> {
        self.renderer.as_ref()
    }

    /// The live renderer, mutably.
    pub fn renderer_mut(&mut self) -> Option<&mut R> {
        self.renderer.as_mut()
    }

    /// The live graphics context.
    pub fn context(&self) -> Option<&R::Context> {
        self.context.as_ref()
    }

    /// The live graphics context, mutably. Call [`refit`](Self::refit)
    /// after changing anything that affects its drawing-buffer size.
    pub fn context_mut(&mut self) -> Option<&mut R::Context> {
        self.context.as_mut()
    }

    /// The host scheduler.
    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    /// Whether a continuous render loop is running.
    pub fn is_looping(&self) -> bool {
        self.mode == FrameMode::Continuous
    }

    /// Whether a scheduler tick is outstanding.
    pub fn frame_pending(&self) -> bool {
        self.frame.is_some()
    }

    /// Rendered-frame statistics.
    pub fn frame_timing(&self) -> &FrameTiming {
        &self.timing
    }

    /// Take the lifecycle notifications produced since the last drain.
    ///
    /// Hosts driving the manager directly should drain after every call
    /// that can change the lifecycle. Consecutive resizes are merged into
    /// the latest one while they wait.
    pub fn drain_events(&mut self) -> Vec<SurfaceEvent> {
        std::mem::take(&mut self.events)
    }

    fn has_area(&self) -> bool {
        self.width > 0 && self.height > 0
    }

    // ── Host events ──────────────────────────────────────────────────────

    /// The host laid the view out at `width` × `height` logical pixels.
    pub fn on_layout_changed(
        &mut self,
        width: u32,
        height: u32,
        camera: &mut Camera,
    ) {
        if (width, height) == (self.width, self.height) {
            return;
        }
        self.width = width;
        self.height = height;

        if !self.has_area() {
            self.destroy_renderer(camera);
            return;
        }
        self.fit_to_layout(camera, true);
    }

    /// Re-fit the drawing buffer to the current layout, for changes the
    /// layout size does not show (a display-density change). The renderer is
    /// only resized if the drawing buffer actually changed.
    pub fn refit(&mut self, camera: &mut Camera) {
        if self.has_area() {
            self.fit_to_layout(camera, false);
        }
    }

    /// The host delivered a graphics context, or `None` when it took the
    /// current one away.
    ///
    /// The stored handle is swapped before this returns; the previous
    /// context, if any, comes back as a [`ContextRelease`] the caller must
    /// await. A context whose destruction is still pending is refused.
    pub fn on_context_available(
        &mut self,
        context: Option<R::Context>,
        camera: &mut Camera,
    ) -> Option<ContextRelease<DestroyOf<R>>> {
        let incoming = context.as_ref().map(GraphicsContext::id);
        if incoming == self.context.as_ref().map(GraphicsContext::id) {
            return None;
        }
        if let Some(id) = incoming {
            if self.pending.borrow().contains(&id) {
                log::warn!(
                    "refusing graphics context {id}: its destruction is \
                     still pending"
                );
                return None;
            }
        }

        let bind = context.is_some() && self.has_area();
        if context.is_some() {
            self.dispose_renderer();
        } else {
            self.destroy_renderer(camera);
        }

        let previous = std::mem::replace(&mut self.context, context);
        if let Some(id) = incoming {
            log::debug!("graphics context {id} available");
        }

        if bind {
            if let Some(current) = self.context.as_mut() {
                let (w, h) = fit_buffer(current, self.width, self.height);
                camera.set_aspect(aspect_ratio(w, h));
            }
            self.create_renderer();
        }

        previous.map(|old| self.release(old))
    }

    /// The host lost the current context.
    pub fn on_context_lost(
        &mut self,
        camera: &mut Camera,
    ) -> Option<ContextRelease<DestroyOf<R>>> {
        self.on_context_available(None, camera)
    }

    /// Tear everything down: stop the loop, dispose the renderer and hand
    /// back the context's destruction. Safe to call repeatedly.
    pub fn on_unmount(
        &mut self,
        camera: &mut Camera,
    ) -> Option<ContextRelease<DestroyOf<R>>> {
        self.destroy_renderer(camera);
        let context = self.context.take()?;
        self.teardown = Some(context.id());
        Some(self.release(context))
    }

    /// [`on_unmount`](Self::on_unmount) and wait for the host to confirm
    /// the context is gone.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError::ContextDestruction`] if the host reports that
    /// it could not destroy the context.
    pub async fn unmount(&mut self, camera: &mut Camera) -> Result<(), ViewError> {
        match self.on_unmount(camera) {
            Some(release) => release.await,
            None => Ok(()),
        }
    }

    // ── Frame scheduling ─────────────────────────────────────────────────

    /// Render once on the next tick. Requests made while a tick is already
    /// scheduled are folded into it.
    pub fn request_frame(&mut self) {
        if self.frame.is_none() {
            self.frame = Some(self.scheduler.schedule_frame());
            self.mode = FrameMode::Single;
        }
    }

    /// Run `update` and render on every tick until
    /// [`stop_loop`](Self::stop_loop). Replaces any loop already running.
    pub fn start_loop<F>(&mut self, update: F)
    where
        F: FnMut(&mut R::Scene, &mut Camera) + 'static,
    {
        if let Some(token) = self.frame.take() {
            self.scheduler.cancel_frame(token);
        }
        self.update = Some(Box::new(update));
        self.mode = FrameMode::Continuous;
        self.frame = Some(self.scheduler.schedule_frame());
    }

    /// Cancel the scheduled tick and drop the loop callback.
    pub fn stop_loop(&mut self) {
        if let Some(token) = self.frame.take() {
            self.scheduler.cancel_frame(token);
        }
        self.update = None;
        self.mode = FrameMode::Idle;
    }

    /// The host scheduler fired `token`. Ticks that were cancelled or
    /// superseded are ignored.
    pub fn on_frame(
        &mut self,
        token: FrameToken,
        scene: &mut R::Scene,
        camera: &mut Camera,
    ) {
        if self.frame != Some(token) {
            log::trace!("ignoring stale frame {token:?}");
            return;
        }
        match self.mode {
            FrameMode::Continuous => {
                if let Some(update) = self.update.as_mut() {
                    update(scene, camera);
                }
                self.render(scene, camera);
                self.frame = Some(self.scheduler.schedule_frame());
            }
            FrameMode::Single | FrameMode::Idle => {
                self.frame = None;
                self.mode = FrameMode::Idle;
                self.render(scene, camera);
            }
        }
    }

    /// Draw immediately and signal frame completion to the context. Does
    /// nothing while there is no renderer.
    pub fn render(&mut self, scene: &R::Scene, camera: &Camera) {
        let (Some(renderer), Some(context)) =
            (self.renderer.as_mut(), self.context.as_mut())
        else {
            return;
        };
        renderer.render(context, scene, camera);
        context.end_frame();
        self.timing.end_frame();
    }

    // ── Internals ────────────────────────────────────────────────────────

    fn fit_to_layout(&mut self, camera: &mut Camera, layout_changed: bool) {
        let (width, height) = (self.width, self.height);
        let Some(context) = self.context.as_mut() else {
            return;
        };
        let (buffer_width, buffer_height) = fit_buffer(context, width, height);
        camera.set_aspect(aspect_ratio(buffer_width, buffer_height));

        let Some(renderer) = self.renderer.as_mut() else {
            self.create_renderer();
            return;
        };
        let resized = renderer.back_buffer_size() != (buffer_width, buffer_height);
        if !resized && !layout_changed {
            return;
        }
        renderer.set_size(buffer_width, buffer_height);
        log::debug!(
            "renderer resized to {buffer_width}x{buffer_height} \
             (layout {width}x{height})"
        );
        self.push_event(SurfaceEvent::Resized { width, height });
    }

    /// Queue a notification. A resize replaces a resize queued right before
    /// it, so an undrained queue stays bounded by lifecycle transitions.
    fn push_event(&mut self, event: SurfaceEvent) {
        if let (
            SurfaceEvent::Resized { .. },
            Some(last @ SurfaceEvent::Resized { .. }),
        ) = (event, self.events.last_mut())
        {
            *last = event;
            return;
        }
        self.events.push(event);
    }

    fn create_renderer(&mut self) {
        let Some(context) = self.context.as_mut() else {
            return;
        };
        let (width, height) = context.drawing_buffer_size();
        let mut renderer = R::create(context);
        renderer.set_size(width, height);
        log::debug!(
            "renderer created on context {} at {width}x{height}",
            context.id()
        );
        self.renderer = Some(renderer);
        self.push_event(SurfaceEvent::Created);
    }

    fn dispose_renderer(&mut self) {
        if let Some(renderer) = self.renderer.take() {
            self.push_event(SurfaceEvent::Disposed);
            renderer.dispose();
            log::debug!("renderer disposed");
        }
    }

    fn destroy_renderer(&mut self, camera: &mut Camera) {
        self.stop_loop();
        self.dispose_renderer();
        if camera.aspect != 1.0 {
            camera.set_aspect(1.0);
        }
    }

    fn release(&self, context: R::Context) -> ContextRelease<DestroyOf<R>> {
        let id = context.id();
        ContextRelease::new(id, context.destroy(), Rc::clone(&self.pending))
    }
}

fn fit_buffer<C: GraphicsContext>(context: &mut C, width: u32, height: u32) -> (u32, u32) {
    context.fit_layout(width, height);
    context.drawing_buffer_size()
}

fn aspect_ratio(width: u32, height: u32) -> f32 {
    if height == 0 {
        1.0
    } else {
        width as f32 / height as f32
    }
}
