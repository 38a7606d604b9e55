use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use web_time::Duration;

use crate::util::easing::EasingFunction;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Camera Animation", inline)]
#[serde(default)]
/// Camera flight timing and framing.
pub struct AnimationOptions {
    /// Flight time per world unit travelled, when no duration is given.
    #[schemars(
        title = "Milliseconds per Unit",
        range(min = 0.0, max = 1000.0),
        extend("step" = 5.0)
    )]
    pub ms_per_unit: f32,
    /// Shortest derived flight duration.
    #[schemars(title = "Min Duration (ms)", range(min = 0, max = 10000))]
    pub min_duration_ms: u64,
    /// Longest derived flight duration.
    #[schemars(title = "Max Duration (ms)", range(min = 0, max = 10000))]
    pub max_duration_ms: u64,
    /// Camera distance from a fitted bounding sphere, in radii.
    #[schemars(title = "Fit Radius Factor", range(min = 0.5, max = 10.0), extend("step" = 0.1))]
    pub radius_factor: f32,
    /// Easing curve applied to normalized flight time.
    #[schemars(skip)]
    pub easing: EasingFunction,
}

impl Default for AnimationOptions {
    fn default() -> Self {
        Self {
            ms_per_unit: 125.0,
            min_duration_ms: 600,
            max_duration_ms: 2500,
            radius_factor: 2.0,
            easing: EasingFunction::CircularOut,
        }
    }
}

impl AnimationOptions {
    /// Flight duration for a camera move of `distance` world units.
    #[must_use]
    pub fn duration_for_distance(&self, distance: f32) -> Duration {
        let min = self.min_duration_ms as f32;
        let max = (self.max_duration_ms as f32).max(min);
        let ms = if distance.is_finite() {
            (distance * self.ms_per_unit).clamp(min, max)
        } else {
            max
        };
        Duration::from_micros((ms * 1000.0).round() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derived_duration_is_clamped() {
        let opts = AnimationOptions::default();
        assert_eq!(opts.duration_for_distance(0.0), Duration::from_millis(600));
        assert_eq!(
            opts.duration_for_distance(1_000.0),
            Duration::from_millis(2500)
        );
        let mid = opts.duration_for_distance(10.0).as_secs_f32();
        assert!((mid - 1.25).abs() < 1e-4);
    }

    #[test]
    fn non_finite_distance_uses_max() {
        let opts = AnimationOptions::default();
        assert_eq!(
            opts.duration_for_distance(f32::INFINITY),
            Duration::from_millis(2500)
        );
    }
}
