use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Controls", inline)]
#[serde(default)]
/// Pointer and keyboard camera control parameters.
pub struct ControlOptions {
    /// Rotation sensitivity multiplier.
    #[schemars(title = "Rotate Speed", range(min = 0.1, max = 2.0), extend("step" = 0.05))]
    pub rotate_speed: f32,
    /// Pan sensitivity multiplier.
    #[schemars(title = "Pan Speed", range(min = 0.1, max = 2.0), extend("step" = 0.05))]
    pub pan_speed: f32,
    /// Zoom sensitivity multiplier.
    #[schemars(title = "Zoom Speed", range(min = 0.01, max = 0.5), extend("step" = 0.01))]
    pub zoom_speed: f32,
    /// Whether bound keys move the camera. When enabled, key presses no
    /// longer cancel camera flights.
    #[schemars(title = "Keyboard Navigation")]
    pub keyboard_navigation: bool,
    /// Keyboard step, as a fraction of the distance to the target.
    #[schemars(skip)]
    pub keyboard_step: f32,
    /// Closest dolly distance. Near-plane updates never raise the limit
    /// above this value.
    #[schemars(title = "Min Distance", range(min = 0.001, max = 10.0))]
    pub min_distance: f32,
}

impl Default for ControlOptions {
    fn default() -> Self {
        Self {
            rotate_speed: 0.5,
            pan_speed: 0.5,
            zoom_speed: 0.1,
            keyboard_navigation: false,
            keyboard_step: 0.05,
            min_distance: 0.1,
        }
    }
}
