//! Sphere of radiating elements with three great-circle rings.
use std::f32::consts::{PI, TAU};

use glam::Vec3;

use crate::geometry::Color;
use crate::shapes::glyph::{radiating_element, LineType};
use crate::shapes::node::{Polyline, ShapeNode};
use crate::shapes::options::{FieldKind, FieldSpec, MAX_LINE_COUNT, OptionsSchema, ShapeOptions};

pub const SPHERE_SCHEMA: OptionsSchema = OptionsSchema::new(&[
    FieldSpec::new("radius", FieldKind::Number),
    FieldSpec::new("lineCount", FieldKind::Count),
    FieldSpec::new("color", FieldKind::Color),
    FieldSpec::new("ringColor", FieldKind::Color),
    FieldSpec::new("lineType", FieldKind::Choice),
    FieldSpec::new("only_end", FieldKind::Flag),
    FieldSpec::new("mirrored", FieldKind::Flag),
    FieldSpec::new("lineRadius", FieldKind::Number),
]);

/// The golden angle in radians.
pub const GOLDEN_ANGLE: f32 = PI * (3.0 - 2.236_068);

/// `count` unit vectors spread over the sphere by the golden-angle spiral.
///
/// Points run from the north pole (`+Y`) to the south pole, with `y` evenly spaced.
pub fn fibonacci_sphere(count: usize) -> Vec<Vec3> {
    match count {
        0 => Vec::new(),
        1 => vec![Vec3::Y],
        n => (0..n)
            .map(|i| {
                let y = 1.0 - 2.0 * i as f32 / (n - 1) as f32;
                let r = (1.0 - y * y).max(0.0).sqrt();
                let theta = GOLDEN_ANGLE * i as f32;
                Vec3::new(theta.cos() * r, y, theta.sin() * r)
            })
            .collect(),
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SphereParams {
    pub radius: f32,
    pub line_count: usize,
    pub color: Color,
    pub ring_color: Color,
    pub line_type: LineType,
    pub only_end: bool,
    /// Also draw an element towards the antipode of every point.
    pub mirrored: bool,
    pub line_radius: f32,
    pub ring_segments: usize,
}

impl SphereParams {
    pub const DEFAULT: SphereParams = SphereParams {
        radius: 1.0,
        line_count: 100,
        color: Color::BLACK,
        ring_color: Color::NEUTRAL,
        line_type: LineType::Line,
        only_end: true,
        mirrored: false,
        line_radius: 0.006,
        ring_segments: 96,
    };

    pub fn from_options(options: &ShapeOptions) -> Self {
        let d = Self::DEFAULT;
        Self {
            radius: options.non_negative("radius", d.radius),
            line_count: options.count_at_most("lineCount", d.line_count, MAX_LINE_COUNT),
            color: options.color("color", d.color),
            ring_color: options.color("ringColor", d.ring_color),
            line_type: LineType::from_options(options, "lineType"),
            only_end: options.flag("only_end", d.only_end),
            mirrored: options.flag("mirrored", d.mirrored),
            line_radius: options.non_negative("lineRadius", d.line_radius),
            ring_segments: d.ring_segments,
        }
    }

    /// End points of the radiating elements, in emission order.
    pub fn endpoints(&self) -> Vec<Vec3> {
        let points = fibonacci_sphere(self.line_count);
        let mut out: Vec<Vec3> = points.iter().map(|p| *p * self.radius).collect();
        if self.mirrored {
            out.extend(points.iter().map(|p| -*p * self.radius));
        }
        out
    }

    fn ring(&self, point: impl Fn(f32) -> Vec3) -> Polyline {
        let n = self.ring_segments.max(3);
        let points = (0..n)
            .map(|i| point(TAU * i as f32 / n as f32) * self.radius)
            .collect();
        Polyline::new(points, true, self.ring_color, self.line_radius)
    }

    pub fn build(&self) -> ShapeNode {
        let mut node = ShapeNode::new("sphere");
        // Equatorial, sagittal, coronal.
        node.push(self.ring(|a| Vec3::new(a.cos(), 0.0, a.sin())));
        node.push(self.ring(|a| Vec3::new(0.0, a.cos(), a.sin())));
        node.push(self.ring(|a| Vec3::new(a.cos(), a.sin(), 0.0)));

        for end in self.endpoints() {
            node.add_child(radiating_element(
                self.line_type,
                Vec3::ZERO,
                end,
                self.color,
                self.line_radius,
                self.only_end,
            ));
        }
        node
    }
}

impl Default for SphereParams {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_lie_on_the_sphere() {
        let params = SphereParams {
            radius: 2.5,
            line_count: 37,
            ..SphereParams::DEFAULT
        };
        let points = params.endpoints();
        assert_eq!(points.len(), 37);
        for p in points {
            assert!((p.length() - 2.5).abs() < 1e-4);
        }
    }

    #[test]
    fn heights_are_evenly_spaced() {
        let r = 1.5;
        let n = 20;
        let params = SphereParams {
            radius: r,
            line_count: n,
            ..SphereParams::DEFAULT
        };
        let mut ys: Vec<f32> = params.endpoints().iter().map(|p| p.y).collect();
        ys.sort_by(f32::total_cmp);
        assert!((ys[0] + r).abs() < 1e-5);
        assert!((ys[n - 1] - r).abs() < 1e-5);
        let step = 2.0 * r / (n - 1) as f32;
        for w in ys.windows(2) {
            assert!((w[1] - w[0] - step).abs() < 1e-4);
        }
    }

    #[test]
    fn small_counts_are_well_defined() {
        assert!(fibonacci_sphere(0).is_empty());
        assert_eq!(fibonacci_sphere(1), vec![Vec3::Y]);
        let two = fibonacci_sphere(2);
        assert!(two[0].abs_diff_eq(Vec3::Y, 1e-6));
        assert!((two[1].y + 1.0).abs() < 1e-6);
    }

    #[test]
    fn mirrored_doubles_the_elements() {
        let params = SphereParams {
            line_count: 10,
            mirrored: true,
            ..SphereParams::DEFAULT
        };
        let node = params.build();
        assert_eq!(node.children.len(), 20);
        assert_eq!(node.primitives.len(), 3);
    }

    #[test]
    fn golden_angle_value() {
        assert!((GOLDEN_ANGLE - PI * (3.0 - 5f32.sqrt())).abs() < 1e-5);
    }
}
