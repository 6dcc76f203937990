//! Plain line shape.
use glam::Vec3;

use crate::geometry::Color;
use crate::shapes::node::{Segment, ShapeNode};
use crate::shapes::options::{FieldKind, FieldSpec, OptionsSchema, ShapeOptions};

pub const LINE_SCHEMA: OptionsSchema = OptionsSchema::new(&[
    FieldSpec::new("start", FieldKind::Vector),
    FieldSpec::new("end", FieldKind::Vector),
    FieldSpec::new("color", FieldKind::Color),
    FieldSpec::new("radius", FieldKind::Number),
]);

/// Parameters for a line drawn as a thin solid cylinder between two points.
#[derive(Clone, Debug, PartialEq)]
pub struct LineParams {
    /// First endpoint.
    pub start: Vec3,
    /// Second endpoint.
    pub end: Vec3,
    /// Stroke color.
    pub color: Color,
    /// Cylinder radius in world units.
    pub radius: f32,
}

impl LineParams {
    pub const DEFAULT: LineParams = LineParams {
        start: Vec3::ZERO,
        end: Vec3::X,
        color: Color::BLACK,
        radius: 0.01,
    };

    pub fn from_options(options: &ShapeOptions) -> Self {
        let d = Self::DEFAULT;
        Self {
            start: options.vector("start", d.start),
            end: options.vector("end", d.end),
            color: options.color("color", d.color),
            radius: options.non_negative("radius", d.radius),
        }
    }

    pub fn build(&self) -> ShapeNode {
        let mut node = ShapeNode::new("line");
        node.push(Segment::new(self.start, self.end, self.color, self.radius));
        node
    }
}

impl Default for LineParams {
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
    fn builds_a_single_segment() {
        let options = ShapeOptions::new()
            .with_vector("start", Vec3::Y)
            .with_vector("end", Vec3::new(0.0, 2.0, 0.0))
            .with("radius", OptionValue::Number(0.05));
        let node = LineParams::from_options(&options).build();
        assert_eq!(node.primitives.len(), 1);
        let Primitive::Segment(seg) = &node.primitives[0] else {
            panic!("expected a segment");
        };
        assert_eq!(seg.start, Vec3::Y);
        assert_eq!(seg.end, Vec3::new(0.0, 2.0, 0.0));
        assert_eq!(seg.radius, 0.05);
    }

    #[test]
    fn empty_options_use_defaults() {
        let params = LineParams::from_options(&ShapeOptions::new());
        assert_eq!(params, LineParams::DEFAULT);
    }
}
