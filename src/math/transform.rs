use glam::{Mat4, Quat, Vec3};

/// Rigid transform with non-uniform scale, applied as scale → rotate →
/// translate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// World-space translation.
    pub translation: Vec3,
    /// Orientation.
    pub rotation: Quat,
    /// Per-axis scale.
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    /// The identity transform.
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    /// Pure translation.
    #[must_use]
    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Self::IDENTITY
        }
    }

    /// Homogeneous matrix for this transform.
    #[must_use]
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            self.scale,
            self.rotation,
            self.translation,
        )
    }

    /// Decompose a matrix back into a transform.
    #[must_use]
    pub fn from_matrix(matrix: &Mat4) -> Self {
        let (scale, rotation, translation) =
            matrix.to_scale_rotation_translation();
        Self {
            translation,
            rotation,
            scale,
        }
    }

    /// Transform a point.
    #[must_use]
    pub fn apply(&self, point: Vec3) -> Vec3 {
        self.translation + self.rotation * (self.scale * point)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_matches_matrix() {
        let t = Transform {
            translation: Vec3::new(1.0, 2.0, 3.0),
            rotation: Quat::from_rotation_y(0.7),
            scale: Vec3::new(2.0, 1.0, 0.5),
        };
        let p = Vec3::new(-4.0, 0.5, 9.0);
        assert!(t.apply(p).abs_diff_eq(t.matrix().transform_point3(p), 1e-4));
    }

    #[test]
    fn matrix_round_trip() {
        let t = Transform::from_translation(Vec3::new(5.0, -1.0, 0.0));
        let back = Transform::from_matrix(&t.matrix());
        assert!(back.translation.abs_diff_eq(t.translation, 1e-6));
        assert!(back.scale.abs_diff_eq(Vec3::ONE, 1e-6));
    }
}
