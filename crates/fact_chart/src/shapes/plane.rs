//! Translucent planes, optionally filled with parallel lines.
use glam::Vec3;

use crate::geometry::{rotation_between, Color, Transform};
use crate::shapes::node::{Mesh, Polyline, Segment, ShapeNode};
use crate::shapes::options::{FieldKind, FieldSpec, MAX_LINE_COUNT, OptionsSchema, ShapeOptions};

/// Axis a plane faces before any `normal` is applied.
pub const PLANE_AXIS: Vec3 = Vec3::Z;

pub const PLANE_SCHEMA: OptionsSchema = OptionsSchema::new(&[
    FieldSpec::new("size", FieldKind::Number),
    FieldSpec::new("color", FieldKind::Color),
    FieldSpec::new("fillColor", FieldKind::Color),
    FieldSpec::new("opacity", FieldKind::Number),
    FieldSpec::new("normal", FieldKind::Vector),
    FieldSpec::new("lineRadius", FieldKind::Number),
]);

pub const PLANE_OF_PARALLEL_LINES_SCHEMA: OptionsSchema = OptionsSchema::new(&[
    FieldSpec::new("size", FieldKind::Number),
    FieldSpec::new("divisions", FieldKind::Count),
    FieldSpec::new("color", FieldKind::Color),
    FieldSpec::new("fillColor", FieldKind::Color),
    FieldSpec::new("opacity", FieldKind::Number),
    FieldSpec::new("normal", FieldKind::Vector),
    FieldSpec::new("lineRadius", FieldKind::Number),
]);

/// Corners of a `size`-wide square in the XY plane, counter-clockwise.
fn square(size: f32) -> [Vec3; 4] {
    let h = size / 2.0;
    [
        Vec3::new(-h, -h, 0.0),
        Vec3::new(h, -h, 0.0),
        Vec3::new(h, h, 0.0),
        Vec3::new(-h, h, 0.0),
    ]
}

fn oriented(name: &str, body: ShapeNode, normal: Option<Vec3>) -> ShapeNode {
    let rotation = normal
        .map(|n| rotation_between(PLANE_AXIS, n))
        .unwrap_or_default();
    let mut node = ShapeNode::new(name);
    node.add_child(body.with_transform(Transform::from_rotation(rotation)));
    node
}

#[derive(Clone, Debug, PartialEq)]
pub struct PlaneParams {
    pub size: f32,
    /// Border color.
    pub color: Color,
    pub fill_color: Color,
    pub opacity: f32,
    pub normal: Option<Vec3>,
    pub line_radius: f32,
}

impl PlaneParams {
    pub const DEFAULT: PlaneParams = PlaneParams {
        size: 2.0,
        color: Color::BLACK,
        fill_color: Color::from_hex(0x88aacc),
        opacity: 0.2,
        normal: None,
        line_radius: 0.01,
    };

    pub fn from_options(options: &ShapeOptions) -> Self {
        let d = Self::DEFAULT;
        Self {
            size: options.non_negative("size", d.size),
            color: options.color("color", d.color),
            fill_color: options.color("fillColor", d.fill_color),
            opacity: options.number("opacity", d.opacity).clamp(0.0, 1.0),
            normal: options.optional_vector("normal"),
            line_radius: options.non_negative("lineRadius", d.line_radius),
        }
    }

    fn body(&self) -> ShapeNode {
        let corners = square(self.size);
        let mut body = ShapeNode::new("plane-body");
        body.push(Mesh::new(
            corners.to_vec(),
            vec![[0, 1, 2], [0, 2, 3]],
            self.fill_color,
            self.opacity,
        ));
        body.push(Polyline::new(
            corners.to_vec(),
            true,
            self.color,
            self.line_radius,
        ));
        body
    }

    pub fn build(&self) -> ShapeNode {
        oriented("plane", self.body(), self.normal)
    }
}

impl Default for PlaneParams {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct PlaneOfParallelLinesParams {
    pub size: f32,
    /// Number of gaps between lines; `divisions + 1` lines are drawn.
    pub divisions: usize,
    pub color: Color,
    pub fill_color: Color,
    pub opacity: f32,
    pub normal: Option<Vec3>,
    pub line_radius: f32,
}

impl PlaneOfParallelLinesParams {
    pub const DEFAULT: PlaneOfParallelLinesParams = PlaneOfParallelLinesParams {
        size: 2.0,
        divisions: 10,
        color: Color::BLACK,
        fill_color: Color::from_hex(0x88aacc),
        opacity: 0.2,
        normal: None,
        line_radius: 0.01,
    };

    pub fn from_options(options: &ShapeOptions) -> Self {
        let d = Self::DEFAULT;
        Self {
            size: options.non_negative("size", d.size),
            divisions: options.count_at_most("divisions", d.divisions, MAX_LINE_COUNT),
            color: options.color("color", d.color),
            fill_color: options.color("fillColor", d.fill_color),
            opacity: options.number("opacity", d.opacity).clamp(0.0, 1.0),
            normal: options.optional_vector("normal"),
            line_radius: options.non_negative("lineRadius", d.line_radius),
        }
    }

    /// `divisions + 1` lines running along `Y`, evenly spaced across `X`. Zero divisions
    /// leave one line through the center.
    pub fn lines(&self) -> Vec<Segment> {
        let h = self.size / 2.0;
        let n = self.divisions;
        (0..=n)
            .map(|i| {
                let x = if n == 0 {
                    0.0
                } else {
                    -h + self.size * i as f32 / n as f32
                };
                Segment::new(
                    Vec3::new(x, -h, 0.0),
                    Vec3::new(x, h, 0.0),
                    self.color,
                    self.line_radius,
                )
            })
            .collect()
    }

    pub fn build(&self) -> ShapeNode {
        let mut body = PlaneParams {
            size: self.size,
            color: self.color,
            fill_color: self.fill_color,
            opacity: self.opacity,
            normal: None,
            line_radius: self.line_radius,
        }
        .body();
        for line in self.lines() {
            body.push(line);
        }
        oriented("planeOfParallelLines", body, self.normal)
    }
}

impl Default for PlaneOfParallelLinesParams {
    fn default() -> Self {
        Self::DEFAULT
    }
}
