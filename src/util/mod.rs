//! Shared utilities.

/// Frame counting and smoothed FPS.
pub mod frame_timing;
