//! Eased camera flights.
//!
//! A flight interpolates the six scalars of a [`CameraPose`] (position xyz,
//! target xyz) independently, each with the same eased parameter. At most one
//! flight exists at a time; starting another supersedes it.

use web_time::{Duration, Instant};

use super::core::CameraPose;
use crate::util::easing::EasingFunction;

/// A single camera flight from one pose to another.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationJob {
    /// Pose at the start of the flight.
    pub from: CameraPose,
    /// Destination pose.
    pub to: CameraPose,
    /// When the flight started.
    pub start: Instant,
    /// Total flight time.
    pub duration: Duration,
    /// Easing curve over normalized time.
    pub easing: EasingFunction,
}

impl AnimationJob {
    /// Normalized time in `[0, 1]` at `now`.
    #[must_use]
    pub fn progress(&self, now: Instant) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now
            .checked_duration_since(self.start)
            .unwrap_or(Duration::ZERO);
        (elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0) as f32
    }

    /// Interpolated pose at `now`. Returns the exact destination once the
    /// flight is complete.
    #[must_use]
    pub fn sample(&self, now: Instant) -> CameraPose {
        let t = self.progress(now);
        if t >= 1.0 {
            return self.to;
        }
        let eased = self.easing.evaluate(t);
        CameraPose {
            position: self.from.position.lerp(self.to.position, eased),
            target: self.from.target.lerp(self.to.target, eased),
        }
    }

    /// Whether the flight has reached its destination at `now`.
    #[must_use]
    pub fn is_finished(&self, now: Instant) -> bool {
        self.progress(now) >= 1.0
    }
}

/// Drives at most one [`AnimationJob`].
#[derive(Debug, Clone, Default)]
pub struct CameraAnimator {
    job: Option<AnimationJob>,
}

impl CameraAnimator {
    /// Create an idle animator.
    #[must_use]
    pub fn new() -> Self {
        Self { job: None }
    }

    /// Start a flight, superseding any active one. Returns `true` if a
    /// previous flight was cancelled.
    pub fn start(&mut self, job: AnimationJob) -> bool {
        log::debug!("camera flight {:?} over {:?}", job.to, job.duration);
        self.job.replace(job).is_some()
    }

    /// Stop the active flight where it is. The camera keeps its last
    /// interpolated pose.
    pub fn cancel(&mut self) -> Option<AnimationJob> {
        self.job.take()
    }

    /// Whether a flight is in progress.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.job.is_some()
    }

    /// The active flight, if any.
    #[must_use]
    pub fn job(&self) -> Option<&AnimationJob> {
        self.job.as_ref()
    }

    /// Advance to `now` and return the pose to write into the camera, or
    /// `None` when idle. The job is dropped on the tick that reaches the
    /// destination.
    pub fn update(&mut self, now: Instant) -> Option<CameraPose> {
        let job = self.job.as_ref()?;
        let pose = job.sample(now);
        if job.is_finished(now) {
            self.job = None;
        }
        Some(pose)
    }
}
