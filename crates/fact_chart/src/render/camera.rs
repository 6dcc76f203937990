//! Perspective camera shared by thumbnails and the viewer.
use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

/// A right-handed perspective camera looking at `target`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PerspectiveCamera {
    /// Vertical field of view in degrees.
    pub fov_y_degrees: f32,
    /// Width over height of the viewport the camera renders into.
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
}

impl PerspectiveCamera {
    pub fn new(fov_y_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            fov_y_degrees,
            aspect,
            near,
            far,
            position: Vec3::new(0.0, 0.0, 1.0),
            target: Vec3::ZERO,
            up: Vec3::Y,
        }
    }

    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    /// Points the camera at `target`.
    pub fn look_at(mut self, target: Vec3) -> Self {
        self.target = target;
        self
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    /// OpenGL-style projection (`z` in `[-1, 1]` after the divide).
    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh_gl(
            self.fov_y_degrees.to_radians(),
            self.aspect,
            self.near,
            self.far,
        )
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection() * self.view()
    }

    /// Pixels per world unit at view distance 1 for a viewport `height` pixels tall.
    pub fn focal_length_px(&self, height: f32) -> f32 {
        0.5 * height / (0.5 * self.fov_y_degrees.to_radians()).tan()
    }

    /// Unit vector from the camera towards its target.
    pub fn forward(&self) -> Vec3 {
        (self.target - self.position).normalize_or_zero()
    }

    pub fn is_valid(&self) -> bool {
        self.fov_y_degrees > 0.0
            && self.fov_y_degrees < 180.0
            && self.aspect > 0.0
            && self.near > 0.0
            && self.far > self.near
            && self.position.is_finite()
            && self.position != self.target
    }
}

impl Default for PerspectiveCamera {
    fn default() -> Self {
        Self::new(50.0, 1.0, 0.1, 100.0)
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec4Swizzles;

    use super::*;

    #[test]
    fn target_projects_to_the_center() {
        let camera = PerspectiveCamera::default()
            .with_position(Vec3::new(0.0, 1.0, 4.0))
            .look_at(Vec3::ZERO);
        let clip = camera.view_projection() * Vec3::ZERO.extend(1.0);
        let ndc = clip.xyz() / clip.w;
        assert!(ndc.x.abs() < 1e-5 && ndc.y.abs() < 1e-5);
        assert!(ndc.z > -1.0 && ndc.z < 1.0);
    }

    #[test]
    fn focal_length_matches_fov() {
        let camera = PerspectiveCamera::new(90.0, 1.0, 0.1, 10.0);
        assert!((camera.focal_length_px(100.0) - 50.0).abs() < 1e-3);
    }

    #[test]
    fn validity_checks() {
        assert!(PerspectiveCamera::default().is_valid());
        let mut camera = PerspectiveCamera::default();
        camera.near = 0.0;
        assert!(!camera.is_valid());
    }
}
