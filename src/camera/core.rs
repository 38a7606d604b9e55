use glam::{Mat4, Vec3};

use crate::options::{CameraOptions, ProjectionKind};

/// Camera projection parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Projection {
    /// Perspective projection.
    Perspective {
        /// Vertical field of view in degrees.
        fov_y_degrees: f32,
        /// Viewport aspect ratio (width / height).
        aspect: f32,
    },
    /// Orthographic projection with explicit extents.
    Orthographic {
        /// Left extent.
        left: f32,
        /// Right extent.
        right: f32,
        /// Top extent.
        top: f32,
        /// Bottom extent.
        bottom: f32,
    },
}

/// Camera defined by eye position, target, and projection parameters.
///
/// Invariant: `0 < near < far`. [`set_clip_planes`](Self::set_clip_planes)
/// refuses values that would break it.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraState {
    /// Eye (camera) position in world space.
    pub position: Vec3,
    /// Look-at target position.
    pub target: Vec3,
    /// World up direction.
    pub up: Vec3,
    /// Projection parameters.
    pub projection: Projection,
    near: f32,
    far: f32,
}

/// Position/target pair: the part of the camera a flight interpolates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    /// Eye position.
    pub position: Vec3,
    /// Look-at target.
    pub target: Vec3,
}

impl CameraPose {
    /// Component-wise approximate equality on all six scalars.
    #[must_use]
    pub fn abs_diff_eq(&self, other: &Self, max_abs_diff: f32) -> bool {
        self.position.abs_diff_eq(other.position, max_abs_diff)
            && self.target.abs_diff_eq(other.target, max_abs_diff)
    }
}

impl CameraState {
    /// Build the initial camera from options for a viewport of the given
    /// physical size.
    #[must_use]
    pub fn from_options(options: &CameraOptions, width: f32, height: f32) -> Self {
        let projection = match options.projection {
            ProjectionKind::Perspective => Projection::Perspective {
                fov_y_degrees: options.fovy,
                aspect: aspect_ratio(width, height),
            },
            ProjectionKind::Orthographic => orthographic_extents(width, height),
        };
        let (near, far) = if options.znear > 0.0 && options.zfar > options.znear {
            (options.znear, options.zfar)
        } else {
            log::warn!(
                "invalid clip planes near={} far={}, using defaults",
                options.znear,
                options.zfar
            );
            (0.1, 10_000.0)
        };
        Self {
            position: Vec3::from_array(options.position),
            target: Vec3::from_array(options.target),
            up: Vec3::Y,
            projection,
            near,
            far,
        }
    }

    /// Near clipping plane distance.
    #[must_use]
    pub fn near(&self) -> f32 {
        self.near
    }

    /// Far clipping plane distance.
    #[must_use]
    pub fn far(&self) -> f32 {
        self.far
    }

    /// Set both clipping planes. Returns `false` and leaves the camera
    /// untouched unless `0 < near < far` and both are finite.
    pub fn set_clip_planes(&mut self, near: f32, far: f32) -> bool {
        if !(near.is_finite() && far.is_finite() && near > 0.0 && far > near) {
            return false;
        }
        self.near = near;
        self.far = far;
        true
    }

    /// Current position/target pair.
    #[must_use]
    pub fn pose(&self) -> CameraPose {
        CameraPose {
            position: self.position,
            target: self.target,
        }
    }

    /// Overwrite position and target.
    pub fn set_pose(&mut self, pose: CameraPose) {
        self.position = pose.position;
        self.target = pose.target;
    }

    /// Unit view direction (eye → target). Falls back to `-Z` when the eye
    /// sits on the target.
    #[must_use]
    pub fn forward(&self) -> Vec3 {
        (self.target - self.position)
            .try_normalize()
            .unwrap_or(Vec3::NEG_Z)
    }

    /// Distance from the eye to the target.
    #[must_use]
    pub fn distance_to_target(&self) -> f32 {
        self.position.distance(self.target)
    }

    /// Up vector orthogonal enough to the view direction for `look_at`.
    fn safe_up(&self) -> Vec3 {
        let forward = self.forward();
        if forward.cross(self.up).length_squared() < 1e-8 {
            // Looking straight along up: any perpendicular axis will do
            forward.any_orthonormal_vector()
        } else {
            self.up
        }
    }

    /// View matrix (world → camera).
    #[must_use]
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_to_rh(self.position, self.forward(), self.safe_up())
    }

    /// Projection matrix with `[0, 1]` depth range (wgpu/Vulkan convention).
    #[must_use]
    pub fn projection_matrix(&self) -> Mat4 {
        match self.projection {
            Projection::Perspective {
                fov_y_degrees,
                aspect,
            } => Mat4::perspective_rh(
                fov_y_degrees.to_radians(),
                aspect,
                self.near,
                self.far,
            ),
            Projection::Orthographic {
                left,
                right,
                top,
                bottom,
            } => Mat4::orthographic_rh(left, right, bottom, top, self.near, self.far),
        }
    }

    /// Build the combined view-projection matrix.
    #[must_use]
    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Adapt the projection to a new physical viewport size: aspect ratio
    /// for perspective, extents for orthographic.
    pub fn set_viewport_size(&mut self, width: f32, height: f32) {
        self.projection = match self.projection {
            Projection::Perspective { fov_y_degrees, .. } => {
                Projection::Perspective {
                    fov_y_degrees,
                    aspect: aspect_ratio(width, height),
                }
            }
            Projection::Orthographic { .. } => orthographic_extents(width, height),
        };
    }
}

fn aspect_ratio(width: f32, height: f32) -> f32 {
    if width > 0.0 && height > 0.0 {
        width / height
    } else {
        1.0
    }
}

fn orthographic_extents(width: f32, height: f32) -> Projection {
    let (w, h) = (width.max(1.0), height.max(1.0));
    Projection::Orthographic {
        left: -w,
        right: w,
        top: h,
        bottom: -h,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> CameraState {
        CameraState::from_options(&CameraOptions::default(), 640.0, 480.0)
    }

    #[test]
    fn from_options_uses_defaults() {
        let cam = camera();
        assert_eq!(cam.position, Vec3::new(30.0, 10.0, 50.0));
        assert_eq!(cam.target, Vec3::ZERO);
        assert_eq!(
            cam.projection,
            Projection::Perspective {
                fov_y_degrees: 60.0,
                aspect: 640.0 / 480.0
            }
        );
        assert!(cam.near() > 0.0 && cam.near() < cam.far());
    }

    #[test]
    fn clip_planes_reject_invalid() {
        let mut cam = camera();
        assert!(!cam.set_clip_planes(0.0, 10.0));
        assert!(!cam.set_clip_planes(5.0, 5.0));
        assert!(!cam.set_clip_planes(1.0, f32::INFINITY));
        assert!(cam.set_clip_planes(1.0, 2.0));
        assert_eq!((cam.near(), cam.far()), (1.0, 2.0));
    }

    #[test]
    fn viewport_size_updates_aspect() {
        let mut cam = camera();
        cam.set_viewport_size(1000.0, 500.0);
        assert!(matches!(
            cam.projection,
            Projection::Perspective { aspect, .. } if (aspect - 2.0).abs() < 1e-6
        ));
    }

    #[test]
    fn viewport_size_updates_orthographic_extents() {
        let opts = CameraOptions {
            projection: ProjectionKind::Orthographic,
            ..CameraOptions::default()
        };
        let mut cam = CameraState::from_options(&opts, 100.0, 50.0);
        cam.set_viewport_size(200.0, 80.0);
        assert_eq!(
            cam.projection,
            Projection::Orthographic {
                left: -200.0,
                right: 200.0,
                top: 80.0,
                bottom: -80.0
            }
        );
    }

    #[test]
    fn view_matrix_is_finite_when_looking_straight_down() {
        let mut cam = camera();
        cam.position = Vec3::new(0.0, 10.0, 0.0);
        cam.target = Vec3::ZERO;
        assert!(cam.view_projection().is_finite());
    }

    #[test]
    fn forward_falls_back_when_degenerate() {
        let mut cam = camera();
        cam.target = cam.position;
        assert_eq!(cam.forward(), Vec3::NEG_Z);
    }
}
