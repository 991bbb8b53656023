//! Converts raw platform events into view commands.
//!
//! The `InputProcessor` owns the transient input state that does not belong
//! to the camera (currently the held modifier key). It is the only thing
//! that sits between raw gesture events and
//! [`OrbitView::execute`](crate::view::OrbitView::execute).

use super::event::InputEvent;
use crate::view::ViewCommand;

/// Converts raw gesture, wheel and modifier events into [`ViewCommand`]s.
///
/// # Usage
///
/// ```ignore
/// // In the host's event handler:
/// if let Some(cmd) = input_processor.handle_event(event) {
///     view.execute(cmd);
/// }
/// ```
#[derive(Debug, Default)]
pub struct InputProcessor {
    /// Whether the shift modifier is currently held.
    shift_pressed: bool,
}

impl InputProcessor {
    /// Create a new processor with no modifier held.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the shift modifier is held.
    #[must_use]
    pub fn shift_pressed(&self) -> bool {
        self.shift_pressed
    }

    /// Process a raw input event and return zero or one commands.
    pub fn handle_event(&mut self, event: InputEvent) -> Option<ViewCommand> {
        match event {
            InputEvent::PanBegan => Some(ViewCommand::BeginPan),
            InputEvent::PanMoved {
                translation_x,
                translation_y,
                pointers,
            } => Some(ViewCommand::UpdatePan {
                delta_x: translation_x,
                delta_y: translation_y,
                pointer_count: pointers,
                modifier_held: self.shift_pressed,
            }),
            InputEvent::PanEnded => Some(ViewCommand::EndPan),
            InputEvent::Pinch { scale } => {
                Some(ViewCommand::Zoom { forward: scale > 1.0 })
            }
            InputEvent::Wheel { delta_y } => {
                Some(ViewCommand::Zoom { forward: delta_y < 0.0 })
            }
            InputEvent::ModifiersChanged { shift } => {
                self.shift_pressed = shift;
                None
            }
        }
    }
}
