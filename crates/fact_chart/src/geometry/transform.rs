//! Local transforms of shape nodes.
use glam::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// Translation, rotation and scale applied to a node relative to its parent.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    pub fn from_translation(translation: Vec3) -> Self {
        Self {
            translation,
            ..Self::IDENTITY
        }
    }

    pub fn from_rotation(rotation: Quat) -> Self {
        Self {
            rotation,
            ..Self::IDENTITY
        }
    }

    pub fn with_translation(mut self, translation: Vec3) -> Self {
        self.translation = translation;
        self
    }

    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    pub fn to_mat4(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }

    pub fn transform_point(&self, p: Vec3) -> Vec3 {
        self.translation + self.rotation * (self.scale * p)
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Builds a rotation from XYZ-ordered Euler angles in radians (`Rx * Ry * Rz`).
pub fn euler_xyz(angles: Vec3) -> Quat {
    Quat::from_rotation_x(angles.x) * Quat::from_rotation_y(angles.y) * Quat::from_rotation_z(angles.z)
}

#[cfg(test)]
mod tests {
    use std::f32::consts::FRAC_PI_2;

    use super::*;

    #[test]
    fn identity_leaves_points_alone() {
        let p = Vec3::new(1.0, -2.0, 3.0);
        assert_eq!(Transform::IDENTITY.transform_point(p), p);
        assert!(Transform::default().is_identity());
    }

    #[test]
    fn transform_point_matches_matrix() {
        let t = Transform::from_translation(Vec3::new(1.0, 2.0, 3.0))
            .with_rotation(Quat::from_rotation_z(FRAC_PI_2))
            .with_scale(Vec3::splat(2.0));
        let p = Vec3::new(1.0, 0.0, 0.0);
        let direct = t.transform_point(p);
        let via_matrix = t.to_mat4().transform_point3(p);
        assert!(direct.abs_diff_eq(via_matrix, 1e-5));
        assert!(direct.abs_diff_eq(Vec3::new(1.0, 4.0, 3.0), 1e-5));
    }

    #[test]
    fn euler_order_is_x_then_y_then_z() {
        let q = euler_xyz(Vec3::new(FRAC_PI_2, 0.0, FRAC_PI_2));
        // Rz first on the vector, then Rx.
        let v = q * Vec3::X;
        assert!(v.abs_diff_eq(Vec3::new(0.0, 0.0, 1.0), 1e-5));
    }
}
