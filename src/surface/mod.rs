//! Render-surface lifecycle: graphics context, renderer and frame loop.

/// Capability traits implemented by the host.
pub mod host;
/// Context/renderer state machine and frame scheduling.
pub mod manager;
/// Pending context destruction.
pub mod release;
#[cfg(test)]
pub(crate) mod testing;

pub use host::{ContextId, FrameScheduler, FrameToken, GraphicsContext, Renderer};
pub use manager::{SurfaceEvent, SurfaceLifecycleManager, SurfacePhase};
pub use release::ContextRelease;
