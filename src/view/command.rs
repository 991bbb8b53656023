//! The view's interactive vocabulary.
//!
//! Every camera interaction, whether it comes from a touch gesture, a
//! wheel, or a programmatic call, is represented as a `ViewCommand`.
//! Consumers construct commands and pass them to
//! [`OrbitView::execute`](super::OrbitView::execute).

/// A camera interaction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewCommand {
    /// Snapshot the camera at the start of a drag.
    BeginPan,
    /// Apply a drag sample.
    UpdatePan {
        /// Horizontal translation since the drag began, in logical pixels.
        delta_x: f32,
        /// Vertical translation since the drag began, in logical pixels.
        delta_y: f32,
        /// Number of pointers down.
        pointer_count: u32,
        /// Whether the pan modifier key is held.
        modifier_held: bool,
    },
    /// Finish the drag.
    EndPan,
    /// Step toward (`forward`) or away from the target.
    Zoom {
        /// `true` to move toward the target.
        forward: bool,
    },
}

impl ViewCommand {
    /// Whether executing this command moves the camera (and therefore needs
    /// a new frame).
    #[must_use]
    pub fn moves_camera(&self) -> bool {
        matches!(self, Self::UpdatePan { .. } | Self::Zoom { .. })
    }
}
