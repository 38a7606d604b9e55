//! Easing functions for camera interpolation.
//!
//! Each curve maps normalized time in `[0, 1]` onto normalized progress in
//! `[0, 1]`, hitting both endpoints exactly.

use serde::{Deserialize, Serialize};

/// Easing function variants for animation curves.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EasingFunction {
    /// Linear interpolation (no easing).
    Linear,
    /// Quadratic ease-out (fast start, slow end).
    QuadraticOut,
    /// Circular ease-out: `sqrt(1 - (t - 1)²)`. Very fast start with a long
    /// gentle settle; the standard camera-flight curve.
    CircularOut,
}

impl EasingFunction {
    /// Default easing function for camera flights.
    pub const DEFAULT: EasingFunction = EasingFunction::CircularOut;

    /// Evaluate the easing function at time t.
    ///
    /// Input t is clamped to [0.0, 1.0].
    /// Returns the eased value, also in [0.0, 1.0].
    #[inline]
    #[must_use]
    pub fn evaluate(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);

        match self {
            EasingFunction::Linear => t,
            EasingFunction::QuadraticOut => {
                let omt = 1.0 - t;
                1.0 - omt * omt
            }
            EasingFunction::CircularOut => {
                let tm1 = t - 1.0;
                (1.0 - tm1 * tm1).max(0.0).sqrt()
            }
        }
    }
}

impl Default for EasingFunction {
    #[inline]
    fn default() -> Self {
        Self::DEFAULT
    }
}
