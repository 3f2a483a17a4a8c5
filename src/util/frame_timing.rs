use web_time::{Duration, Instant};

/// Longest frame delta reported to animation; longer stalls (window drags,
/// debugger breaks) are clamped so damping does not jump.
const MAX_FRAME_DELTA: f32 = 0.25;

/// Per-frame delta time with a smoothed FPS readout.
pub struct FrameTiming {
    /// Last frame timestamp
    last_frame: Instant,
    /// Last time the FPS was reported to the log
    last_report: Instant,
    /// Smoothed FPS using exponential moving average
    smoothed_fps: f32,
    /// Smoothing factor (lower = smoother, 0.0-1.0)
    smoothing: f32,
}

impl Default for FrameTiming {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameTiming {
    /// Create a new frame timer starting now.
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            last_frame: now,
            last_report: now,
            smoothed_fps: 60.0,
            smoothing: 0.05,
        }
    }

    /// Mark the start of a frame. Returns the elapsed seconds since the
    /// previous frame, clamped to a quarter second.
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;
        self.record(elapsed)
    }

    /// Fold an externally measured frame time into the FPS average and
    /// return the clamped delta.
    pub fn record(&mut self, elapsed: f32) -> f32 {
        if elapsed > 0.0 {
            let instant_fps = 1.0 / elapsed;
            self.smoothed_fps = self.smoothed_fps * (1.0 - self.smoothing)
                + instant_fps * self.smoothing;
        }
        elapsed.min(MAX_FRAME_DELTA)
    }

    /// Get the current FPS (smoothed)
    pub fn fps(&self) -> f32 {
        self.smoothed_fps
    }

    /// `true` at most once per `interval`; used to throttle FPS logging.
    pub fn should_report(&mut self, interval: Duration) -> bool {
        let now = Instant::now();
        if now.duration_since(self.last_report) >= interval {
            self.last_report = now;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steady_frames_converge_to_rate() {
        let mut timing = FrameTiming::new();
        for _ in 0..500 {
            let _ = timing.record(1.0 / 120.0);
        }
        assert!((timing.fps() - 120.0).abs() < 1.0);
    }

    #[test]
    fn long_stall_is_clamped() {
        let mut timing = FrameTiming::new();
        assert_eq!(timing.record(3.0), MAX_FRAME_DELTA);
        assert_eq!(timing.record(0.016), 0.016);
    }

    #[test]
    fn zero_delta_leaves_fps_untouched() {
        let mut timing = FrameTiming::new();
        let _ = timing.record(0.0);
        assert_eq!(timing.fps(), 60.0);
    }
}
