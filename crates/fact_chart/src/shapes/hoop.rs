//! Cylinder of vertical lines.
use std::f32::consts::TAU;

use glam::Vec3;

use crate::geometry::Color;
use crate::shapes::node::{Segment, ShapeNode};
use crate::shapes::options::{FieldKind, FieldSpec, MAX_LINE_COUNT, OptionsSchema, ShapeOptions};

pub const HOOP_SCHEMA: OptionsSchema = OptionsSchema::new(&[
    FieldSpec::new("radius", FieldKind::Number),
    FieldSpec::new("height", FieldKind::Number),
    FieldSpec::new("lineCount", FieldKind::Count),
    FieldSpec::new("color", FieldKind::Color),
    FieldSpec::new("lineRadius", FieldKind::Number),
]);

#[derive(Clone, Debug, PartialEq)]
pub struct HoopParams {
    pub radius: f32,
    pub height: f32,
    pub line_count: usize,
    pub color: Color,
    pub line_radius: f32,
}

impl HoopParams {
    pub const DEFAULT: HoopParams = HoopParams {
        radius: 1.0,
        height: 2.0,
        line_count: 24,
        color: Color::BLACK,
        line_radius: 0.01,
    };

    pub fn from_options(options: &ShapeOptions) -> Self {
        let d = Self::DEFAULT;
        Self {
            radius: options.non_negative("radius", d.radius),
            height: options.non_negative("height", d.height),
            line_count: options.count_at_most("lineCount", d.line_count, MAX_LINE_COUNT),
            color: options.color("color", d.color),
            line_radius: options.non_negative("lineRadius", d.line_radius),
        }
    }

    pub fn build(&self) -> ShapeNode {
        let mut node = ShapeNode::new("hoop");
        let half = self.height / 2.0;
        for i in 0..self.line_count {
            let angle = TAU * i as f32 / self.line_count as f32;
            let (x, z) = (self.radius * angle.cos(), self.radius * angle.sin());
            node.push(Segment::new(
                Vec3::new(x, -half, z),
                Vec3::new(x, half, z),
                self.color,
                self.line_radius,
            ));
        }
        node
    }
}

impl Default for HoopParams {
    fn default() -> Self {
        Self::DEFAULT
    }
}
