/// Platform-agnostic input events.
///
/// These are fed into an [`InputProcessor`](super::InputProcessor) which
/// converts them into [`ViewCommand`](crate::view::ViewCommand) values.
/// Drag translations are totals since the drag began, which is what touch
/// gesture recognizers report.
///
/// # Example
///
/// ```ignore
/// let cmd = input_processor.handle_event(InputEvent::PanMoved {
///     translation_x: 12.0,
///     translation_y: -4.0,
///     pointers: 1,
/// });
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// A drag gesture started.
    PanBegan,
    /// The active drag moved.
    PanMoved {
        /// Horizontal translation since the drag began, in logical pixels.
        translation_x: f32,
        /// Vertical translation since the drag began (positive = down).
        translation_y: f32,
        /// Number of pointers currently down.
        pointers: u32,
    },
    /// The drag finished or was cancelled.
    PanEnded,
    /// Pinch gesture sample; `scale > 1` means the fingers spread apart.
    Pinch {
        /// Pinch scale relative to the gesture start.
        scale: f32,
    },
    /// Scroll wheel (negative `delta_y` = away from the user = zoom in).
    Wheel {
        /// Vertical scroll delta as reported by the platform.
        delta_y: f32,
    },
    /// Modifier key state changed.
    ModifiersChanged {
        /// Whether the shift key is held.
        shift: bool,
    },
}

/// Recognizer state attached to each gesture record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureState {
    /// First record of a gesture.
    Began,
    /// The gesture is in progress.
    Active,
    /// The gesture finished, failed, or was cancelled.
    Ended,
}

/// Raw record from a pan/pinch gesture recognizer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureEvent {
    /// Recognizer state.
    pub state: GestureState,
    /// Horizontal translation since the gesture began.
    pub translation_x: f32,
    /// Vertical translation since the gesture began.
    pub translation_y: f32,
    /// Number of pointers down.
    pub number_of_pointers: u32,
    /// Pinch scale (1.0 for pan recognizers).
    pub scale: f32,
}

impl GestureEvent {
    /// Interpret the record as coming from a pan recognizer.
    #[must_use]
    pub fn pan_input(&self) -> InputEvent {
        match self.state {
            GestureState::Began => InputEvent::PanBegan,
            GestureState::Active => InputEvent::PanMoved {
                translation_x: self.translation_x,
                translation_y: self.translation_y,
                pointers: self.number_of_pointers,
            },
            GestureState::Ended => InputEvent::PanEnded,
        }
    }

    /// Interpret the record as coming from a pinch recognizer. Only active
    /// samples carry a meaningful scale.
    #[must_use]
    pub fn pinch_input(&self) -> Option<InputEvent> {
        (self.state == GestureState::Active)
            .then_some(InputEvent::Pinch { scale: self.scale })
    }
}
