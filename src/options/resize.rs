use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Resolution", inline)]
#[serde(default)]
/// Render-resolution budget.
pub struct ResizeOptions {
    /// Ceiling on physical pixel count (width × height) of the render
    /// target. Chosen from testing on low-powered hardware.
    #[schemars(title = "Max Texture Budget (px)", range(min = 1.0e4, max = 3.3e7))]
    pub max_texture_budget: f32,
    /// Minimum per-axis size delta, in physical pixels, that triggers a
    /// resize.
    #[schemars(skip)]
    pub epsilon_px: f32,
}

impl Default for ResizeOptions {
    fn default() -> Self {
        Self {
            max_texture_budget: 1.4e6,
            epsilon_px: 0.1,
        }
    }
}
