use glam::Vec3;

use crate::camera::{CameraState, Projection};
use crate::math::Aabb;

/// Clip planes fitted to the scene, plus the matching orbit dolly limit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipPlanes {
    /// Near plane distance.
    pub near: f32,
    /// Far plane distance.
    pub far: f32,
    /// Closest distance the orbit controls may dolly to their target.
    pub min_distance: f32,
}

/// Smallest near plane used while the camera is outside the scene.
const MIN_NEAR: f32 = 0.1;

/// Fit near/far planes around `scene` as seen by `camera`.
///
/// The near plane sits at the view depth where the frustum first reaches the
/// box, so geometry off the view axis is never clipped. The far plane reaches
/// the farthest box corner beyond the near plane. The returned
/// `min_distance` never exceeds `min_distance_cap`.
///
/// Returns `None` for an empty scene so the configured planes stay in
/// effect.
#[must_use]
pub fn compute_clip_planes(
    scene: &Aabb,
    camera: &CameraState,
    min_distance_cap: f32,
) -> Option<ClipPlanes> {
    let position = camera.position;
    if scene.is_empty() || !position.is_finite() {
        return None;
    }
    let direction = camera.forward();
    let corners = scene.corners();

    let mut near = MIN_NEAR.max(nearest_depth(scene, &corners, camera));
    let far = corners
        .iter()
        .filter(|&&corner| (corner - position).dot(direction) >= near)
        .map(|corner| corner.distance(position))
        .fold(near * 2.0, f32::max);

    if scene.contains_point(position) {
        // Inside the scene there is nothing to cull in front of the eye
        near = MIN_NEAR.min(far / 1000.0);
    }

    Some(ClipPlanes {
        near,
        far,
        min_distance: (scene.diagonal() * 0.02).max(0.1 * near).min(min_distance_cap),
    })
}

/// View depth at which the frustum first touches `scene`.
fn nearest_depth(scene: &Aabb, corners: &[Vec3; 8], camera: &CameraState) -> f32 {
    match camera.projection {
        Projection::Perspective {
            fov_y_degrees,
            aspect,
        } => {
            // A point at depth d inside the frustum is at most d * spread
            // away from the eye, reached along the corner rays.
            let tan_half = (fov_y_degrees.to_radians() * 0.5).tan();
            let spread = tan_half.mul_add(tan_half * aspect.mul_add(aspect, 1.0), 1.0).sqrt();
            scene.distance_to_point(camera.position) / spread
        }
        Projection::Orthographic { .. } => {
            let direction = camera.forward();
            corners
                .iter()
                .map(|&corner| (corner - camera.position).dot(direction))
                .fold(f32::INFINITY, f32::min)
        }
    }
}
