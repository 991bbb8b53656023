//! The embeddable 3D view: one scene, one orbit camera, one render surface.
//!
//! [`OrbitView`] is the object a host keeps per view. It routes raw input
//! through the [`InputProcessor`] into camera commands, forwards layout,
//! context and frame callbacks to the [`SurfaceLifecycleManager`], and
//! reports lifecycle changes to a [`ViewListener`].
//!
//! # Host wiring
//!
//! ```ignore
//! let mut view = OrbitView::new(scene, &Options::default(), scheduler, listener);
//! view.on_layout(800, 600);
//! if let Some(release) = view.on_context_available(Some(gl)) {
//!     spawn_local(release);
//! }
//! view.handle_input(InputEvent::PanBegan);
//! // ... on the host's animation-frame callback:
//! view.on_frame(token);
//! ```

/// Camera command vocabulary.
pub mod command;
/// Host callbacks and the bundle passed to them.
pub mod listener;

pub use command::ViewCommand;
pub use listener::{FrameControl, ViewBundle, ViewListener};

use crate::camera::controller::OrbitController;
use crate::camera::core::Camera;
use crate::error::ViewError;
use crate::input::{InputEvent, InputProcessor};
use crate::options::Options;
use crate::surface::manager::DestroyOf;
use crate::surface::{
    ContextRelease, FrameScheduler, FrameToken, Renderer, SurfaceEvent,
    SurfaceLifecycleManager,
};

/// An orbit-camera 3D view embedded in a host UI panel.
pub struct OrbitView<R, S, L>
where
    R: Renderer,
    S: FrameScheduler,
    L: ViewListener<R>,
{
    scene: R::Scene,
    controller: OrbitController,
    input: InputProcessor,
    surface: SurfaceLifecycleManager<R, S>,
    listener: L,
}

impl<R, S, L> OrbitView<R, S, L>
where
    R: Renderer,
    R::Scene: 'static,
    S: FrameScheduler,
    L: ViewListener<R>,
{
    /// Create a view with no context and no layout yet.
    pub fn new(scene: R::Scene, options: &Options, scheduler: S, listener: L) -> Self {
        Self {
            scene,
            controller: OrbitController::from_options(&options.camera),
            input: InputProcessor::new(),
            surface: SurfaceLifecycleManager::new(scheduler, &options.frame),
            listener,
        }
    }

    // ── Accessors ────────────────────────────────────────────────────────

    /// The rendered scene.
    pub fn scene(&self) -> &R::Scene {
        &self.scene
    }

    /// The rendered scene, mutably. Call
    /// [`request_frame`](Self::request_frame) after editing it.
    pub fn scene_mut(&mut self) -> &mut R::Scene {
        &mut self.scene
    }

    /// The view's camera.
    pub fn camera(&self) -> &Camera {
        self.controller.camera()
    }

    /// The orbit controller.
    pub fn controller(&self) -> &OrbitController {
        &self.controller
    }

    /// The orbit controller, mutably.
    pub fn controller_mut(&mut self) -> &mut OrbitController {
        &mut self.controller
    }

    /// The render-surface state machine.
    pub fn surface(&self) -> &SurfaceLifecycleManager<R, S> {
        &self.surface
    }

    /// The host listener.
    pub fn listener(&self) -> &L {
        &self.listener
    }

    // ── Input ────────────────────────────────────────────────────────────

    /// Process a platform-agnostic input event.
    ///
    /// Wheel events are passed on to [`ViewListener::on_wheel`] after the
    /// view has zoomed.
    pub fn handle_input(&mut self, event: InputEvent) {
        if let Some(command) = self.input.handle_event(event) {
            self.execute(command);
        }
        if let InputEvent::Wheel { delta_y } = event {
            self.listener.on_wheel(delta_y);
        }
    }

    /// Apply a camera command and request a frame if the camera moved.
    pub fn execute(&mut self, command: ViewCommand) {
        match command {
            ViewCommand::BeginPan => {
                let (_, height) = self.surface.layout_size();
                self.controller.begin_pan(height as f32);
            }
            ViewCommand::UpdatePan {
                delta_x,
                delta_y,
                pointer_count,
                modifier_held,
            } => self.controller.update_pan(
                delta_x,
                delta_y,
                pointer_count,
                modifier_held,
            ),
            ViewCommand::EndPan => self.controller.end_pan(),
            ViewCommand::Zoom { forward } => self.controller.zoom(forward),
        }
        if command.moves_camera() {
            self.surface.request_frame();
        }
    }

    // ── Surface ──────────────────────────────────────────────────────────

    /// The host laid the view out at `width` × `height` logical pixels.
    pub fn on_layout(&mut self, width: u32, height: u32) {
        self.surface
            .on_layout_changed(width, height, self.controller.camera_mut());
        self.dispatch_surface_events();
        self.listener.on_layout(width, height);
    }

    /// The host created (or replaced, or with `None` removed) the graphics
    /// context. The returned release must be awaited.
    pub fn on_context_available(
        &mut self,
        context: Option<R::Context>,
    ) -> Option<ContextRelease<DestroyOf<R>>> {
        let release = self
            .surface
            .on_context_available(context, self.controller.camera_mut());
        self.dispatch_surface_events();
        release
    }

    /// The live graphics context, mutably.
    pub fn context_mut(&mut self) -> Option<&mut R::Context> {
        self.surface.context_mut()
    }

    /// The display density (or anything else behind the drawing-buffer
    /// size) changed while the layout stayed the same.
    pub fn refit(&mut self) {
        self.surface.refit(self.controller.camera_mut());
        self.dispatch_surface_events();
    }

    /// The host lost the graphics context.
    pub fn on_context_lost(&mut self) -> Option<ContextRelease<DestroyOf<R>>> {
        let release = self.surface.on_context_lost(self.controller.camera_mut());
        self.dispatch_surface_events();
        release
    }

    /// Tear down the renderer and context, waiting for the host to confirm
    /// the context is destroyed. Safe to call more than once.
    ///
    /// # Errors
    ///
    /// Returns [`ViewError::ContextDestruction`] if the host could not
    /// destroy the context.
    pub async fn unmount(&mut self) -> Result<(), ViewError> {
        self.controller.end_pan();
        let release = self.surface.on_unmount(self.controller.camera_mut());
        self.dispatch_surface_events();
        match release {
            Some(release) => release.await,
            None => Ok(()),
        }
    }

    // ── Frames ───────────────────────────────────────────────────────────

    /// The host scheduler fired `token`.
    pub fn on_frame(&mut self, token: FrameToken) {
        self.surface
            .on_frame(token, &mut self.scene, self.controller.camera_mut());
    }

    /// Render once on the next tick.
    pub fn request_frame(&mut self) {
        self.surface.request_frame();
    }

    /// Run `update` and render on every tick until
    /// [`stop_loop`](Self::stop_loop).
    pub fn start_loop<F>(&mut self, update: F)
    where
        F: FnMut(&mut R::Scene, &mut Camera) + 'static,
    {
        self.surface.start_loop(update);
    }

    /// Stop the continuous loop.
    pub fn stop_loop(&mut self) {
        self.surface.stop_loop();
    }

    fn dispatch_surface_events(&mut self) {
        for event in self.surface.drain_events() {
            match event {
                SurfaceEvent::Created => self.with_bundle(|listener, bundle| {
                    listener.on_create(bundle);
                }),
                SurfaceEvent::Resized { width, height } => {
                    self.listener.on_resize(width, height);
                    self.with_bundle(|listener, bundle| {
                        listener.on_update(bundle);
                    });
                }
                SurfaceEvent::Disposed => self.listener.on_dispose(),
            }
        }
    }

    fn with_bundle(
        &mut self,
        callback: impl FnOnce(&mut L, &mut ViewBundle<'_, R>),
    ) {
        let mut frames = FrameControl::default();
        let Some(renderer) = self.surface.renderer_mut() else {
            return;
        };
        let mut bundle = ViewBundle {
            renderer,
            scene: &mut self.scene,
            camera: self.controller.camera_mut(),
            frames: &mut frames,
        };
        callback(&mut self.listener, &mut bundle);
        frames.apply(&mut self.surface);
    }
}
