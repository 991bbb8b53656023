use web_time::{Duration, Instant};

use crate::options::FrameOptions;

/// Frame counter with smoothed FPS, updated after every rendered frame.
#[derive(Debug, Clone)]
pub struct FrameTiming {
    /// Target FPS (0 = unspecified)
    target_fps: u32,
    /// Last frame timestamp (`None` until the first frame)
    last_frame: Option<Instant>,
    /// Duration of the most recent frame interval
    last_interval: Duration,
    /// Smoothed FPS using exponential moving average
    smoothed_fps: f32,
    /// Smoothing factor (lower = smoother, 0.0-1.0)
    smoothing: f32,
    /// Frames rendered since creation
    frames: u64,
}

impl FrameTiming {
    /// Create a timer from frame options.
    #[must_use]
    pub fn new(options: &FrameOptions) -> Self {
        Self {
            target_fps: options.target_fps,
            last_frame: None,
            last_interval: Duration::ZERO,
            // Start at the target so the first samples do not swing wildly
            smoothed_fps: if options.target_fps > 0 {
                options.target_fps as f32
            } else {
                60.0
            },
            smoothing: options.fps_smoothing.clamp(0.0, 1.0),
            frames: 0,
        }
    }

    /// Call after rendering to update timing.
    pub fn end_frame(&mut self) {
        self.record(Instant::now());
    }

    fn record(&mut self, now: Instant) {
        self.frames += 1;
        let Some(last) = self.last_frame.replace(now) else {
            return;
        };
        let elapsed = now.duration_since(last);
        self.last_interval = elapsed;

        let frame_time = elapsed.as_secs_f32();
        if frame_time > 0.0 {
            let instant_fps = 1.0 / frame_time;
            self.smoothed_fps = self.smoothed_fps * (1.0 - self.smoothing)
                + instant_fps * self.smoothing;
        }
    }

    /// Get the current FPS (smoothed)
    #[must_use]
    pub fn fps(&self) -> f32 {
        self.smoothed_fps
    }

    /// Frames rendered so far.
    #[must_use]
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Interval between the last two rendered frames.
    #[must_use]
    pub fn last_interval(&self) -> Duration {
        self.last_interval
    }

    /// Whether the smoothed rate has dropped below the configured target.
    #[must_use]
    pub fn is_behind_target(&self) -> bool {
        self.target_fps > 0 && self.smoothed_fps < self.target_fps as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn timing(target_fps: u32, fps_smoothing: f32) -> FrameTiming {
        FrameTiming::new(&FrameOptions {
            target_fps,
            fps_smoothing,
        })
    }

    #[test]
    fn first_frame_only_counts() {
        let mut t = timing(60, 0.5);
        t.record(Instant::now());
        assert_eq!(t.frames(), 1);
        assert_eq!(t.fps(), 60.0);
        assert_eq!(t.last_interval(), Duration::ZERO);
    }

    #[test]
    fn slow_frames_pull_the_average_down() {
        let mut t = timing(60, 1.0);
        let start = Instant::now();
        t.record(start);
        t.record(start + Duration::from_millis(100));
        assert!((t.fps() - 10.0).abs() < 0.01);
        assert_eq!(t.last_interval(), Duration::from_millis(100));
        assert!(t.is_behind_target());
    }

    #[test]
    fn unspecified_target_is_never_behind() {
        let mut t = timing(0, 1.0);
        let start = Instant::now();
        t.record(start);
        t.record(start + Duration::from_secs(1));
        assert!(!t.is_behind_target());
    }
}
