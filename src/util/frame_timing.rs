use web_time::{Duration, Instant};

/// Rendered/skipped frame counters with a smoothed FPS over rendered frames.
///
/// Timestamps are passed in by the scheduler rather than sampled here, so a
/// simulated clock drives the statistics exactly like a real one.
#[derive(Debug, Clone)]
pub struct FrameTiming {
    /// Timestamp of the last rendered frame.
    last_frame: Option<Instant>,
    /// Smoothed FPS using exponential moving average
    smoothed_fps: f32,
    /// Smoothing factor (lower = smoother, 0.0-1.0)
    smoothing: f32,
    rendered: u64,
    skipped: u64,
}

impl Default for FrameTiming {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameTiming {
    /// Create an empty frame timer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            last_frame: None,
            smoothed_fps: 60.0, // Start with reasonable default
            smoothing: 0.05,    /* 5% new value, 95% old value for smooth
                                 * display */
            rendered: 0,
            skipped: 0,
        }
    }

    /// Record a tick that produced a frame at `now`.
    pub fn record_rendered(&mut self, now: Instant) {
        self.rendered += 1;
        if let Some(last) = self.last_frame {
            let frame_time = now
                .checked_duration_since(last)
                .unwrap_or(Duration::ZERO)
                .as_secs_f32();
            if frame_time > 0.0 {
                let instant_fps = 1.0 / frame_time;
                self.smoothed_fps = self.smoothed_fps * (1.0 - self.smoothing)
                    + instant_fps * self.smoothing;
            }
        }
        self.last_frame = Some(now);
    }

    /// Record a render-skip tick.
    pub fn record_skipped(&mut self) {
        self.skipped += 1;
    }

    /// Number of ticks that produced a frame.
    #[must_use]
    pub fn rendered_frames(&self) -> u64 {
        self.rendered
    }

    /// Number of render-skip ticks.
    #[must_use]
    pub fn skipped_frames(&self) -> u64 {
        self.skipped
    }

    /// Get the current FPS (smoothed)
    #[must_use]
    pub fn fps(&self) -> f32 {
        self.smoothed_fps
    }
}
