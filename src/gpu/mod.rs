//! wgpu host backend.
//!
//! [`RenderContext`](render_context::RenderContext) is a
//! [`GraphicsContext`](crate::surface::GraphicsContext) over a wgpu device
//! and surface; [`SurfaceRenderer`](surface_renderer::SurfaceRenderer) is
//! the matching [`Renderer`](crate::surface::Renderer).

/// wgpu device, surface, and queue initialization.
pub mod render_context;
/// Camera upload, depth target and the per-frame scene pass.
pub mod surface_renderer;

pub use render_context::{RenderContext, RenderContextError};
pub use surface_renderer::{ScenePass, SurfaceRenderer, DEPTH_FORMAT};
