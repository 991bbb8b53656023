use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Frames", inline)]
#[serde(default)]
/// Render-loop timing parameters.
pub struct FrameOptions {
    /// Frame rate the continuous loop is expected to hit (0 = host decides).
    /// Only used for frame statistics; scheduling is the host's job.
    #[schemars(title = "Target FPS", range(min = 0, max = 240))]
    pub target_fps: u32,
    /// Weight of the newest sample in the smoothed FPS average.
    #[schemars(skip)]
    pub fps_smoothing: f32,
}

impl Default for FrameOptions {
    fn default() -> Self {
        Self {
            target_fps: 60,
            fps_smoothing: 0.05,
        }
    }
}
