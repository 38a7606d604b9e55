use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Which projection the viewport camera uses.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum ProjectionKind {
    /// Perspective projection driven by field of view and aspect ratio.
    #[default]
    Perspective,
    /// Orthographic projection driven by left/right/top/bottom extents.
    Orthographic,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Camera", inline)]
#[serde(default)]
/// Camera projection and initial placement.
pub struct CameraOptions {
    /// Projection type.
    #[schemars(title = "Projection")]
    pub projection: ProjectionKind,
    /// Vertical field of view in degrees.
    #[schemars(title = "Field of View", range(min = 20.0, max = 120.0), extend("step" = 1.0))]
    pub fovy: f32,
    /// Near clipping plane distance used until models provide bounds.
    #[schemars(skip)]
    pub znear: f32,
    /// Far clipping plane distance used until models provide bounds.
    #[schemars(skip)]
    pub zfar: f32,
    /// Initial eye position.
    #[schemars(skip)]
    pub position: [f32; 3],
    /// Initial look-at target.
    #[schemars(skip)]
    pub target: [f32; 3],
}

impl Default for CameraOptions {
    fn default() -> Self {
        Self {
            projection: ProjectionKind::Perspective,
            fovy: 60.0,
            znear: 0.1,
            zfar: 10_000.0,
            position: [30.0, 10.0, 50.0],
            target: [0.0, 0.0, 0.0],
        }
    }
}
