//! Minimal-angle rotation between two directions.
//!
//! Shared by every shape that reorients a canonical axis: the `normal` option of disks and
//! planes, and the direction of translation and moment glyphs.
use std::f32::consts::PI;

use glam::{Quat, Vec3};

/// Below this length a direction is treated as absent and no rotation is applied.
const MIN_DIRECTION_LENGTH: f32 = 1e-6;

/// Dot products within this distance of `-1` take the antiparallel branch.
const ANTIPARALLEL_EPSILON: f32 = 1e-6;

/// Returns the rotation of minimal angle that maps `from` onto `to`.
///
/// Both inputs are normalized first. When either is (close to) zero the identity is returned.
/// When the directions are antiparallel the result is a half turn about an arbitrary axis
/// perpendicular to `from`, so the rotation is always finite and unit length.
pub fn rotation_between(from: Vec3, to: Vec3) -> Quat {
    if from.length_squared() < MIN_DIRECTION_LENGTH * MIN_DIRECTION_LENGTH
        || to.length_squared() < MIN_DIRECTION_LENGTH * MIN_DIRECTION_LENGTH
        || !from.is_finite()
        || !to.is_finite()
    {
        return Quat::IDENTITY;
    }

    let d = from.normalize();
    let t = to.normalize();
    let dot = d.dot(t);

    if dot < -1.0 + ANTIPARALLEL_EPSILON {
        let axis = d.any_orthonormal_vector();
        return Quat::from_axis_angle(axis, PI);
    }

    // Half-angle construction: (d x t, 1 + d.t) normalizes to the rotation by the angle
    // between d and t about their common normal.
    let axis = d.cross(t);
    Quat::from_xyzw(axis.x, axis.y, axis.z, 1.0 + dot).normalize()
}

/// Returns `true` when `q` is finite and unit length within `1e-4`.
pub fn is_valid_rotation(q: Quat) -> bool {
    q.is_finite() && (q.length() - 1.0).abs() < 1e-4
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use super::*;

    const EPS: f32 = 1e-4;

    fn rand01(rng: &mut StdRng) -> f32 {
        (rng.next_u32() as f32) / ((u32::MAX as f32) + 1.0)
    }

    fn random_unit_vector(rng: &mut StdRng) -> Vec3 {
        let z = rand01(rng) * 2.0 - 1.0;
        let a = rand01(rng) * std::f32::consts::TAU;
        let r = (1.0 - z * z).max(0.0).sqrt();
        Vec3::new(r * a.cos(), r * a.sin(), z)
    }

    #[test]
    fn maps_default_axis_onto_random_targets() {
        let mut rng = StdRng::seed_from_u64(7);
        for axis in [Vec3::Z, Vec3::Y, Vec3::X] {
            for _ in 0..500 {
                let target = random_unit_vector(&mut rng);
                let q = rotation_between(axis, target);
                assert!(is_valid_rotation(q));
                let mapped = q * axis;
                assert!(
                    mapped.abs_diff_eq(target, EPS),
                    "{axis:?} -> {target:?} gave {mapped:?}"
                );
            }
        }
    }

    #[test]
    fn antiparallel_target_is_a_half_turn() {
        for axis in [Vec3::Z, Vec3::Y, Vec3::X, Vec3::new(1.0, 2.0, -3.0)] {
            let q = rotation_between(axis, -axis);
            assert!(is_valid_rotation(q));
            let mapped = q * axis.normalize();
            assert!(mapped.abs_diff_eq(-axis.normalize(), EPS));
            let (_, angle) = q.to_axis_angle();
            assert!((angle - PI).abs() < 1e-3);
        }
    }

    #[test]
    fn parallel_target_is_identity() {
        let q = rotation_between(Vec3::Z, Vec3::new(0.0, 0.0, 5.0));
        assert!(q.abs_diff_eq(Quat::IDENTITY, EPS));
    }

    #[test]
    fn degenerate_inputs_fall_back_to_identity() {
        assert_eq!(rotation_between(Vec3::ZERO, Vec3::X), Quat::IDENTITY);
        assert_eq!(rotation_between(Vec3::X, Vec3::ZERO), Quat::IDENTITY);
        assert_eq!(
            rotation_between(Vec3::X, Vec3::new(f32::NAN, 0.0, 0.0)),
            Quat::IDENTITY
        );
    }

    #[test]
    fn rotation_is_minimal() {
        let q = rotation_between(Vec3::Z, Vec3::X);
        let (axis, angle) = q.to_axis_angle();
        assert!((angle - PI / 2.0).abs() < 1e-4);
        assert!(axis.abs_diff_eq(Vec3::Y, EPS));
    }
}
