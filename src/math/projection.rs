//! World → viewport mapping.
//!
//! Projection matrices follow glam's right-handed `[0, 1]` depth convention
//! (wgpu/Vulkan), so projected depth is already in the unit range.

use glam::{Mat4, Vec3};

/// A projected point in relative viewport coordinates.
///
/// `x` grows to the right, `y` grows downwards, both in `[0, 1]` when the
/// point is on screen. `z` is the normalized depth.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RelativeViewportPoint(pub Vec3);

impl RelativeViewportPoint {
    /// Whether the point lies inside the view frustum (every axis in
    /// `[0, 1]`).
    #[must_use]
    pub fn is_inside_frustum(&self) -> bool {
        let p = self.0;
        (0.0..=1.0).contains(&p.x)
            && (0.0..=1.0).contains(&p.y)
            && (0.0..=1.0).contains(&p.z)
    }
}

/// Project `point` with `view_proj` into relative viewport coordinates.
///
/// Returns `None` for points at or behind the camera plane, where the
/// perspective divide is meaningless.
#[must_use]
pub fn relative_viewport_coordinates(
    view_proj: &Mat4,
    point: Vec3,
) -> Option<RelativeViewportPoint> {
    let clip = *view_proj * point.extend(1.0);
    if clip.w <= f32::EPSILON {
        return None;
    }
    let ndc = clip.truncate() / clip.w;
    Some(RelativeViewportPoint(Vec3::new(
        (ndc.x + 1.0) * 0.5,
        (1.0 - ndc.y) * 0.5,
        ndc.z,
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn view_proj() -> Mat4 {
        let proj =
            Mat4::perspective_rh(60.0_f32.to_radians(), 4.0 / 3.0, 0.1, 100.0);
        let view =
            Mat4::look_at_rh(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO, Vec3::Y);
        proj * view
    }

    #[test]
    fn target_projects_to_center() {
        let p = relative_viewport_coordinates(&view_proj(), Vec3::ZERO)
            .unwrap_or(RelativeViewportPoint(Vec3::NAN));
        assert!((p.0.x - 0.5).abs() < 1e-5);
        assert!((p.0.y - 0.5).abs() < 1e-5);
        assert!(p.is_inside_frustum());
    }

    #[test]
    fn up_is_top_of_screen() {
        let p = relative_viewport_coordinates(&view_proj(), Vec3::new(0.0, 1.0, 0.0));
        assert!(p.is_some_and(|p| p.0.y < 0.5));
    }

    #[test]
    fn behind_camera_is_rejected() {
        assert!(relative_viewport_coordinates(
            &view_proj(),
            Vec3::new(0.0, 0.0, 20.0)
        )
        .is_none());
    }

    #[test]
    fn beyond_far_plane_is_outside() {
        let p = relative_viewport_coordinates(
            &view_proj(),
            Vec3::new(0.0, 0.0, -500.0),
        );
        assert!(p.is_some_and(|p| !p.is_inside_frustum()));
    }
}
