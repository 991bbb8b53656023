//! Camera system for embedded 3D views.
//!
//! Provides a look-at camera, spherical coordinates with pole avoidance,
//! and the orbit controller that turns gestures into camera motion.

/// Orbital camera controller: pan sessions, rotation, translation and zoom.
pub mod controller;
/// Core camera struct and GPU uniform types.
pub mod core;
/// Spherical coordinates in the Y-up convention.
pub mod spherical;

pub use self::controller::{GestureMode, OrbitController, PanSession};
pub use self::core::{Camera, CameraUniform};
pub use self::spherical::Spherical;
