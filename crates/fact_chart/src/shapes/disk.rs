//! Translucent disk with an outline ring and radial spokes.
use std::f32::consts::TAU;

use glam::Vec3;

use crate::geometry::{rotation_between, Color, Transform};
use crate::shapes::glyph::{radiating_element, LineType};
use crate::shapes::node::{Mesh, Polyline, ShapeNode};
use crate::shapes::options::{FieldKind, FieldSpec, MAX_LINE_COUNT, OptionsSchema, ShapeOptions};

/// Axis the disk faces before any `normal` is applied.
pub const DISK_AXIS: Vec3 = Vec3::Z;

pub const DISK_SCHEMA: OptionsSchema = OptionsSchema::new(&[
    FieldSpec::new("radius", FieldKind::Number),
    FieldSpec::new("lineCount", FieldKind::Count),
    FieldSpec::new("color", FieldKind::Color),
    FieldSpec::new("fillColor", FieldKind::Color),
    FieldSpec::new("opacity", FieldKind::Number),
    FieldSpec::new("lineType", FieldKind::Choice),
    FieldSpec::new("only_end", FieldKind::Flag),
    FieldSpec::new("normal", FieldKind::Vector),
    FieldSpec::new("lineRadius", FieldKind::Number),
]);

#[derive(Clone, Debug, PartialEq)]
pub struct DiskParams {
    pub radius: f32,
    /// Number of spokes.
    pub line_count: usize,
    /// Spoke and outline color.
    pub color: Color,
    pub fill_color: Color,
    /// Fill opacity.
    pub opacity: f32,
    pub line_type: LineType,
    pub only_end: bool,
    /// Optional facing direction; the disk faces [`DISK_AXIS`] when absent.
    pub normal: Option<Vec3>,
    pub line_radius: f32,
    /// Tessellation of the fill and outline.
    pub segments: usize,
}

impl DiskParams {
    pub const DEFAULT: DiskParams = DiskParams {
        radius: 1.0,
        line_count: 12,
        color: Color::BLACK,
        fill_color: Color::from_hex(0x88aacc),
        opacity: 0.25,
        line_type: LineType::Line,
        only_end: true,
        normal: None,
        line_radius: 0.01,
        segments: 64,
    };

    pub fn from_options(options: &ShapeOptions) -> Self {
        let d = Self::DEFAULT;
        Self {
            radius: options.non_negative("radius", d.radius),
            line_count: options.count_at_most("lineCount", d.line_count, MAX_LINE_COUNT),
            color: options.color("color", d.color),
            fill_color: options.color("fillColor", d.fill_color),
            opacity: options.number("opacity", d.opacity).clamp(0.0, 1.0),
            line_type: LineType::from_options(options, "lineType"),
            only_end: options.flag("only_end", d.only_end),
            normal: options.optional_vector("normal"),
            line_radius: options.non_negative("lineRadius", d.line_radius),
            segments: d.segments,
        }
    }

    /// Point on the rim at `angle`, in the disk's canonical plane.
    fn rim(&self, angle: f32) -> Vec3 {
        Vec3::new(self.radius * angle.cos(), self.radius * angle.sin(), 0.0)
    }

    /// The un-oriented disk in the XY plane.
    fn body(&self) -> ShapeNode {
        let mut body = ShapeNode::new("disk-body");
        let segments = self.segments.max(3);

        let mut vertices = Vec::with_capacity(segments + 1);
        vertices.push(Vec3::ZERO);
        vertices.extend((0..segments).map(|i| self.rim(TAU * i as f32 / segments as f32)));
        let triangles = (0..segments as u32)
            .map(|i| [0, 1 + i, 1 + (i + 1) % segments as u32])
            .collect();
        body.push(Mesh::new(vertices.clone(), triangles, self.fill_color, self.opacity));

        body.push(Polyline::new(
            vertices[1..].to_vec(),
            true,
            self.color,
            self.line_radius,
        ));

        for i in 0..self.line_count {
            let angle = TAU * i as f32 / self.line_count as f32;
            body.add_child(radiating_element(
                self.line_type,
                Vec3::ZERO,
                self.rim(angle),
                self.color,
                self.line_radius,
                self.only_end,
            ));
        }
        body
    }

    pub fn build(&self) -> ShapeNode {
        // The normal lives on an inner node so a position/rotation override on the outer node
        // composes with it.
        let rotation = self
            .normal
            .map(|n| rotation_between(DISK_AXIS, n))
            .unwrap_or_default();
        let body = self.body().with_transform(Transform::from_rotation(rotation));

        let mut node = ShapeNode::new("disk");
        node.add_child(body);
        node
    }
}

impl Default for DiskParams {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::node::Primitive;
    use crate::shapes::options::OptionValue;

    #[test]
    fn spokes_reach_the_rim() {
        let params = DiskParams {
            radius: 2.0,
            line_count: 8,
            ..DiskParams::DEFAULT
        };
        let node = params.build();
        let body = node.find("disk-body").unwrap();
        assert_eq!(body.children.len(), 8);
        for (a, b) in node
            .world_segments()
            .into_iter()
            .filter(|(a, _)| *a == Vec3::ZERO)
        {
            assert!((a.distance(b) - 2.0).abs() < 1e-5);
        }
    }

    #[test]
    fn fill_is_translucent() {
        let node = DiskParams::DEFAULT.build();
        let translucent = node
            .world_primitives()
            .into_iter()
            .filter(|(_, p)| p.is_translucent())
            .count();
        assert_eq!(translucent, 1);
    }

    #[test]
    fn normal_reorients_the_disk() {
        let options = ShapeOptions::new().with_vector("normal", Vec3::X);
        let node = DiskParams::from_options(&options).build();
        for (world, p) in node.world_primitives() {
            if let Primitive::Mesh(mesh) = p {
                for v in &mesh.vertices {
                    assert!(world.transform_point3(*v).x.abs() < 1e-5);
                }
            }
        }
    }

    #[test]
    fn spokes_can_be_glyphs() {
        let options = ShapeOptions::new()
            .with("lineType", OptionValue::Text("moment".into()))
            .with("lineCount", OptionValue::Number(4.0));
        let node = DiskParams::from_options(&options).build();
        let body = node.find("disk-body").unwrap();
        assert!(body.children.iter().all(|c| c.name == "moment"));
        assert!(body.children.iter().all(|c| c.children.len() == 1));
    }

    #[test]
    fn zero_spokes_is_valid() {
        let options = ShapeOptions::new().with("lineCount", OptionValue::Number(0.0));
        let node = DiskParams::from_options(&options).build();
        assert!(node.find("disk-body").unwrap().children.is_empty());
    }

    #[test]
    fn line_count_is_clamped() {
        let options = ShapeOptions::new()
            .with("lineType", OptionValue::Text("moment".into()))
            .with("lineCount", OptionValue::Number(1e6));
        assert_eq!(DiskParams::from_options(&options).line_count, MAX_LINE_COUNT);
    }
}
