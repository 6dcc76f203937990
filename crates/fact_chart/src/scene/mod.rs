//! Scenes: lights plus the shape nodes of one space.
use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::geometry::Color;
use crate::shapes::ShapeNode;

pub mod assembler;

pub use assembler::{PopulateSummary, SceneAssembler};

/// Ambient light intensity of the standard rig.
pub const AMBIENT_INTENSITY: f32 = 0.7;
/// Directional light intensity of the standard rig.
pub const DIRECTIONAL_INTENSITY: f32 = 0.3;
/// Position of the standard directional light; it shines towards the origin.
pub const DIRECTIONAL_POSITION: Vec3 = Vec3::new(2.0, 5.0, 5.0);

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Light {
    Ambient {
        color: Color,
        intensity: f32,
    },
    Directional {
        color: Color,
        intensity: f32,
        position: Vec3,
    },
}

impl Light {
    /// One ambient and one directional white light.
    pub fn standard_rig() -> [Light; 2] {
        [
            Light::Ambient {
                color: Color::WHITE,
                intensity: AMBIENT_INTENSITY,
            },
            Light::Directional {
                color: Color::WHITE,
                intensity: DIRECTIONAL_INTENSITY,
                position: DIRECTIONAL_POSITION,
            },
        ]
    }
}

/// A scene owned by one canvas or thumbnail half; cleared and repopulated in place.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Scene {
    /// Fill color; `None` leaves the renderer's clear color visible.
    pub background: Option<Color>,
    lights: Vec<Light>,
    nodes: Vec<ShapeNode>,
}

impl Scene {
    /// A scene with the standard lighting rig.
    pub fn new(background: Option<Color>) -> Self {
        let mut scene = Self {
            background,
            lights: Vec::with_capacity(2),
            nodes: Vec::new(),
        };
        scene.reset_lights();
        scene
    }

    /// Removes every light and node.
    pub fn clear(&mut self) {
        self.lights.clear();
        self.nodes.clear();
    }

    /// Replaces the lights with the standard rig.
    pub fn reset_lights(&mut self) {
        self.lights.clear();
        self.lights.extend(Light::standard_rig());
    }

    pub fn add_light(&mut self, light: Light) {
        self.lights.push(light);
    }

    pub fn add(&mut self, node: ShapeNode) {
        self.nodes.push(node);
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    pub fn nodes(&self) -> &[ShapeNode] {
        &self.nodes
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of lights plus top-level nodes.
    pub fn object_count(&self) -> usize {
        self.lights.len() + self.nodes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_scene_has_standard_rig() {
        let scene = Scene::new(Some(Color::from_hex(0xddeeff)));
        assert_eq!(scene.lights(), Light::standard_rig());
        assert_eq!(scene.node_count(), 0);
    }

    #[test]
    fn clear_removes_everything() {
        let mut scene = Scene::new(None);
        scene.add(ShapeNode::new("x"));
        scene.clear();
        assert_eq!(scene.object_count(), 0);
        assert_eq!(scene.background, None);
    }
}
