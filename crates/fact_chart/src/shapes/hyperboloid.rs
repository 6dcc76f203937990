//! Hyperboloid of one sheet, drawn as twisted rulings between two ellipses.
//!
//! Ruling `i` joins the top ellipse at `θ₁ = 2πi/n` to the bottom ellipse at `θ₁ + twist`.
//! The ruling loop runs over `i ∈ 0..=n`, so the seam ruling at `θ = 0` is emitted twice.
use std::f32::consts::{FRAC_PI_4, TAU};

use glam::Vec3;

use crate::geometry::Color;
use crate::shapes::node::{Mesh, Polyline, Segment, ShapeNode};
use crate::shapes::options::{FieldKind, FieldSpec, MAX_LINE_COUNT, OptionsSchema, ShapeOptions};

pub const HYPERBOLOID_SCHEMA: OptionsSchema = OptionsSchema::new(&[
    FieldSpec::new("radiusX", FieldKind::Number),
    FieldSpec::new("radiusZ", FieldKind::Number),
    FieldSpec::new("height", FieldKind::Number),
    FieldSpec::new("lineCount", FieldKind::Count),
    FieldSpec::new("twistAngle", FieldKind::Number),
    FieldSpec::new("color", FieldKind::Color),
    FieldSpec::new("fillColor", FieldKind::Color),
    FieldSpec::new("opacity", FieldKind::Number),
    FieldSpec::new("lineRadius", FieldKind::Number),
]);

#[derive(Clone, Debug, PartialEq)]
pub struct HyperboloidParams {
    pub radius_x: f32,
    pub radius_z: f32,
    pub height: f32,
    pub line_count: usize,
    /// Angular offset of the bottom ellipse, in radians. Its sign picks the ruling family.
    pub twist_angle: f32,
    pub color: Color,
    pub fill_color: Color,
    pub opacity: f32,
    pub line_radius: f32,
    pub ring_segments: usize,
}

impl HyperboloidParams {
    pub const DEFAULT: HyperboloidParams = HyperboloidParams {
        radius_x: 1.0,
        radius_z: 1.0,
        height: 2.0,
        line_count: 24,
        twist_angle: FRAC_PI_4,
        color: Color::BLACK,
        fill_color: Color::from_hex(0x88aacc),
        opacity: 0.2,
        line_radius: 0.008,
        ring_segments: 64,
    };

    pub fn from_options(options: &ShapeOptions) -> Self {
        let d = Self::DEFAULT;
        Self {
            radius_x: options.non_negative("radiusX", d.radius_x),
            radius_z: options.non_negative("radiusZ", d.radius_z),
            height: options.non_negative("height", d.height),
            line_count: options.count_at_most("lineCount", d.line_count, MAX_LINE_COUNT),
            twist_angle: options.number("twistAngle", d.twist_angle),
            color: options.color("color", d.color),
            fill_color: options.color("fillColor", d.fill_color),
            opacity: options.number("opacity", d.opacity).clamp(0.0, 1.0),
            line_radius: options.non_negative("lineRadius", d.line_radius),
            ring_segments: d.ring_segments,
        }
    }

    fn step(&self) -> f32 {
        if self.line_count == 0 {
            0.0
        } else {
            TAU / self.line_count as f32
        }
    }

    fn ellipse(&self, angle: f32, y: f32) -> Vec3 {
        Vec3::new(self.radius_x * angle.cos(), y, self.radius_z * angle.sin())
    }

    pub fn top(&self, i: usize) -> Vec3 {
        self.ellipse(self.step() * i as f32, self.height / 2.0)
    }

    pub fn bottom(&self, i: usize) -> Vec3 {
        self.ellipse(self.step() * i as f32 + self.twist_angle, -self.height / 2.0)
    }

    pub fn rulings(&self) -> Vec<Segment> {
        (0..=self.line_count)
            .map(|i| Segment::new(self.top(i), self.bottom(i), self.color, self.line_radius))
            .collect()
    }

    /// Lateral surface with `2(n+1)` vertices and `2n` outward-facing triangles.
    ///
    /// Each angular step emits a top/bottom vertex pair; a negative twist swaps the emission
    /// order, and the triangle indices follow it.
    pub fn lateral_surface(&self) -> Mesh {
        let n = self.line_count;
        let top_first = self.twist_angle < 0.0;
        let top = |i: usize| (2 * i + usize::from(!top_first)) as u32;
        let bottom = |i: usize| (2 * i + usize::from(top_first)) as u32;

        let mut vertices = Vec::with_capacity(2 * (n + 1));
        for i in 0..=n {
            if top_first {
                vertices.push(self.top(i));
                vertices.push(self.bottom(i));
            } else {
                vertices.push(self.bottom(i));
                vertices.push(self.top(i));
            }
        }

        let mut triangles = Vec::with_capacity(2 * n);
        for i in 0..n {
            triangles.push([bottom(i), top(i), bottom(i + 1)]);
            triangles.push([top(i), top(i + 1), bottom(i + 1)]);
        }
        Mesh::new(vertices, triangles, self.fill_color, self.opacity)
    }

    fn ring(&self, y: f32) -> Polyline {
        let n = self.ring_segments.max(3);
        let points = (0..n)
            .map(|i| self.ellipse(TAU * i as f32 / n as f32, y))
            .collect();
        Polyline::new(points, true, self.color, self.line_radius)
    }

    pub fn build(&self) -> ShapeNode {
        let mut node = ShapeNode::new("hyperboloid");
        node.push(self.lateral_surface());
        for ruling in self.rulings() {
            node.push(ruling);
        }
        node.push(self.ring(self.height / 2.0));
        node.push(self.ring(-self.height / 2.0));
        node
    }
}

impl Default for HyperboloidParams {
    fn default() -> Self {
        Self::DEFAULT
    }
}
