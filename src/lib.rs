// -- Lint policy ---------------------------------------------------------
// Clippy, rustc and rustdoc lint levels live in Cargo.toml
// ([workspace.lints]); this file adds nothing on top.

//! Orbit camera control and render-surface lifecycle for 3D views embedded
//! in a host UI.
//!
//! The crate has two halves that meet in [`view::OrbitView`]:
//!
//! - [`camera`]: a look-at [`Camera`](camera::Camera) and the
//!   [`OrbitController`](camera::OrbitController) that maps drag gestures
//!   to orbit rotation or screen-plane translation and steps the camera
//!   toward or away from its target.
//! - [`surface`]: the [`SurfaceLifecycleManager`](surface::SurfaceLifecycleManager)
//!   that owns a graphics context and renderer, reacts to layout changes,
//!   context arrival and loss, and drives single-shot or continuous frames
//!   through a host scheduler.
//!
//! Hosts plug in through the capability traits in [`surface`]
//! ([`GraphicsContext`](surface::GraphicsContext),
//! [`Renderer`](surface::Renderer),
//! [`FrameScheduler`](surface::FrameScheduler)) and receive lifecycle
//! callbacks through [`view::ViewListener`]. With the `wgpu` feature,
//! the `gpu` module provides a ready-made context and renderer.
//!
//! # Key entry points
//!
//! - [`view::OrbitView`] - one embedded view: scene, camera, surface
//! - [`input::InputProcessor`] - raw gestures to [`view::ViewCommand`]s
//! - [`options::Options`] - camera and frame-loop settings (TOML presets)

pub mod camera;
pub mod error;
#[cfg(feature = "wgpu")]
pub mod gpu;
pub mod input;
pub mod options;
pub mod surface;
pub mod util;
pub mod view;

pub use error::ViewError;
pub use view::OrbitView;
