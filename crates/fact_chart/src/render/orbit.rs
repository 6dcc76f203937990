//! Orbit-style camera controller with optional damping.
//!
//! The controller keeps the camera on a sphere around `target`. Input accumulates into
//! pending deltas; [`OrbitControls::update`] applies them. With damping enabled only a
//! `damping_factor` share of the pending motion is applied per update, and the remainder
//! decays, so motion eases out over several frames.
use std::f32::consts::PI;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::render::camera::PerspectiveCamera;

/// Pending motion below this magnitude is dropped.
const REST_EPSILON: f32 = 1e-6;

/// Keeps the polar angle away from the poles.
const POLE_MARGIN: f32 = 1e-4;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Spherical {
    pub radius: f32,
    /// Polar angle from `+Y`.
    pub phi: f32,
    /// Azimuth around `+Y`, measured from `+Z` towards `+X`.
    pub theta: f32,
}

impl Spherical {
    pub fn from_offset(offset: Vec3) -> Self {
        let radius = offset.length();
        if radius <= 0.0 {
            return Self {
                radius: 0.0,
                phi: 0.0,
                theta: 0.0,
            };
        }
        Self {
            radius,
            phi: (offset.y / radius).clamp(-1.0, 1.0).acos(),
            theta: offset.x.atan2(offset.z),
        }
    }

    pub fn to_offset(self) -> Vec3 {
        let s = self.phi.sin();
        Vec3::new(
            self.radius * s * self.theta.sin(),
            self.radius * self.phi.cos(),
            self.radius * s * self.theta.cos(),
        )
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OrbitControls {
    pub target: Vec3,
    pub enable_damping: bool,
    pub damping_factor: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    spherical: Spherical,
    delta_theta: f32,
    delta_phi: f32,
    /// Pending multiplicative change of the radius.
    scale: f32,
}

impl OrbitControls {
    pub const DEFAULT_DAMPING_FACTOR: f32 = 0.05;

    /// Controls orbiting `camera` around its current target.
    pub fn new(camera: &PerspectiveCamera) -> Self {
        Self {
            target: camera.target,
            enable_damping: false,
            damping_factor: Self::DEFAULT_DAMPING_FACTOR,
            min_distance: 0.0,
            max_distance: f32::INFINITY,
            spherical: Spherical::from_offset(camera.position - camera.target),
            delta_theta: 0.0,
            delta_phi: 0.0,
            scale: 1.0,
        }
    }

    pub fn with_damping(mut self, damping_factor: f32) -> Self {
        self.enable_damping = true;
        self.damping_factor = damping_factor.clamp(0.0, 1.0);
        self
    }

    pub fn with_distance_limits(mut self, min: f32, max: f32) -> Self {
        self.min_distance = min.max(0.0);
        self.max_distance = max.max(self.min_distance);
        self
    }

    pub fn spherical(&self) -> Spherical {
        self.spherical
    }

    /// Queues an orbit: `left` turns around `+Y`, `up` tilts towards the pole, in radians.
    pub fn rotate(&mut self, left: f32, up: f32) {
        self.delta_theta -= left;
        self.delta_phi -= up;
    }

    /// Queues a zoom; factors above 1 move the camera closer.
    pub fn dolly_in(&mut self, factor: f32) {
        if factor > 0.0 {
            self.scale /= factor;
        }
    }

    pub fn dolly_out(&mut self, factor: f32) {
        if factor > 0.0 {
            self.scale *= factor;
        }
    }

    /// Whether motion is still pending.
    pub fn is_moving(&self) -> bool {
        self.delta_theta.abs() > REST_EPSILON
            || self.delta_phi.abs() > REST_EPSILON
            || (self.scale - 1.0).abs() > REST_EPSILON
    }

    /// Applies pending motion to `camera`. Returns whether the camera moved.
    pub fn update(&mut self, camera: &mut PerspectiveCamera) -> bool {
        let share = if self.enable_damping {
            self.damping_factor
        } else {
            1.0
        };

        let before = camera.position;
        let mut s = self.spherical;
        s.theta += self.delta_theta * share;
        s.phi = (s.phi + self.delta_phi * share).clamp(POLE_MARGIN, PI - POLE_MARGIN);
        let scale = 1.0 + (self.scale - 1.0) * share;
        s.radius = (s.radius * scale).clamp(self.min_distance, self.max_distance);
        self.spherical = s;

        camera.target = self.target;
        camera.position = self.target + s.to_offset();

        if self.enable_damping {
            self.delta_theta *= 1.0 - share;
            self.delta_phi *= 1.0 - share;
            self.scale = 1.0 + (self.scale - 1.0) * (1.0 - share);
        } else {
            self.delta_theta = 0.0;
            self.delta_phi = 0.0;
            self.scale = 1.0;
        }
        if !self.is_moving() {
            self.delta_theta = 0.0;
            self.delta_phi = 0.0;
            self.scale = 1.0;
        }

        before.distance_squared(camera.position) > REST_EPSILON * REST_EPSILON
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::FRAC_PI_2;

    use super::*;

    fn camera() -> PerspectiveCamera {
        PerspectiveCamera::default()
            .with_position(Vec3::new(0.0, 1.5, 5.0))
            .look_at(Vec3::ZERO)
    }

    #[test]
    fn spherical_round_trip() {
        let offset = Vec3::new(1.0, 2.0, -3.0);
        let back = Spherical::from_offset(offset).to_offset();
        assert!(back.abs_diff_eq(offset, 1e-5));
    }

    #[test]
    fn update_without_input_keeps_the_camera() {
        let mut cam = camera();
        let mut controls = OrbitControls::new(&cam);
        assert!(!controls.update(&mut cam));
        assert!(cam.position.abs_diff_eq(Vec3::new(0.0, 1.5, 5.0), 1e-5));
    }

    #[test]
    fn undamped_rotation_is_applied_at_once() {
        let mut cam = camera();
        let mut controls = OrbitControls::new(&cam);
        let radius = controls.spherical().radius;
        controls.rotate(-FRAC_PI_2, 0.0);
        assert!(controls.update(&mut cam));
        assert!(!controls.is_moving());
        assert!((cam.position.length() - radius).abs() < 1e-4);
        assert!(cam.position.x > 4.9);
    }

    #[test]
    fn damping_eases_motion_over_frames() {
        let mut cam = camera();
        let mut controls = OrbitControls::new(&cam).with_damping(0.05);
        controls.rotate(1.0, 0.0);
        let start = controls.spherical().theta;
        controls.update(&mut cam);
        let first = controls.spherical().theta - start;
        assert!((first + 0.05).abs() < 1e-5);
        assert!(controls.is_moving());
        for _ in 0..2000 {
            controls.update(&mut cam);
        }
        let total = controls.spherical().theta - start;
        assert!((total + 1.0).abs() < 1e-3);
        assert!(!controls.is_moving());
    }

    #[test]
    fn dolly_respects_distance_limits() {
        let mut cam = camera();
        let mut controls = OrbitControls::new(&cam).with_distance_limits(2.0, 8.0);
        controls.dolly_in(100.0);
        controls.update(&mut cam);
        assert!((cam.position.length() - 2.0).abs() < 1e-4);
        controls.dolly_out(100.0);
        controls.update(&mut cam);
        assert!((cam.position.length() - 8.0).abs() < 1e-4);
    }
}
