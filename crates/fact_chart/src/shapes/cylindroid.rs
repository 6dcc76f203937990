//! The cylindroid, a ruled surface whose rulings meet the `z` axis.
//!
//! Ruling `i` of `n` sits at angle `θ = 2πi/n` and height `z(θ) = (h/2)·sin 2θ`, running from
//! the axis out to radius `w`. Colors fade from the base color to a darkened variant across the
//! index range.
use std::f32::consts::TAU;

use glam::Vec3;

use crate::geometry::Color;
use crate::shapes::node::{Polyline, Segment, ShapeNode, StrokeStyle};
use crate::shapes::options::{FieldKind, FieldSpec, MAX_LINE_COUNT, OptionsSchema, ShapeOptions};

pub const CYLINDROID_SCHEMA: OptionsSchema = OptionsSchema::new(&[
    FieldSpec::new("width", FieldKind::Number),
    FieldSpec::new("height", FieldKind::Number),
    FieldSpec::new("lineCount", FieldKind::Count),
    FieldSpec::new("color", FieldKind::Color),
    FieldSpec::new("darken", FieldKind::Number),
    FieldSpec::new("lineRadius", FieldKind::Number),
]);

#[derive(Clone, Debug, PartialEq)]
pub struct CylindroidParams {
    pub width: f32,
    pub height: f32,
    pub line_count: usize,
    /// Color of the first ruling.
    pub color: Color,
    /// How far the last ruling is darkened, in `0..=1`.
    pub darken: f32,
    pub line_radius: f32,
    pub curve_segments: usize,
}

impl CylindroidParams {
    pub const DEFAULT: CylindroidParams = CylindroidParams {
        width: 2.0,
        height: 1.0,
        line_count: 24,
        color: Color::from_hex(0x2266aa),
        darken: 0.5,
        line_radius: 0.01,
        curve_segments: 128,
    };

    pub fn from_options(options: &ShapeOptions) -> Self {
        let d = Self::DEFAULT;
        Self {
            width: options.non_negative("width", d.width),
            height: options.number("height", d.height),
            line_count: options.count_at_most("lineCount", d.line_count, MAX_LINE_COUNT),
            color: options.color("color", d.color),
            darken: options.number("darken", d.darken).clamp(0.0, 1.0),
            line_radius: options.non_negative("lineRadius", d.line_radius),
            curve_segments: d.curve_segments,
        }
    }

    pub fn z_at(&self, theta: f32) -> f32 {
        self.height / 2.0 * (2.0 * theta).sin()
    }

    fn boundary_point(&self, theta: f32) -> Vec3 {
        Vec3::new(
            self.width * theta.cos(),
            self.width * theta.sin(),
            self.z_at(theta),
        )
    }

    /// Color of ruling `index`, interpolated in RGB from the base to its darkened variant.
    pub fn ruling_color(&self, index: usize) -> Color {
        let t = if self.line_count > 1 {
            index as f32 / (self.line_count - 1) as f32
        } else {
            0.0
        };
        self.color.lerp(self.color.darken(self.darken), t)
    }

    pub fn rulings(&self) -> Vec<Segment> {
        (0..self.line_count)
            .map(|i| {
                let theta = TAU * i as f32 / self.line_count as f32;
                Segment::new(
                    Vec3::new(0.0, 0.0, self.z_at(theta)),
                    self.boundary_point(theta),
                    self.ruling_color(i),
                    self.line_radius,
                )
            })
            .collect()
    }

    pub fn build(&self) -> ShapeNode {
        let mut node = ShapeNode::new("cylindroid");
        for ruling in self.rulings() {
            node.push(ruling);
        }

        let axis_half = self.height.abs().max(self.line_radius);
        node.push(
            Segment::new(
                Vec3::new(0.0, 0.0, -axis_half),
                Vec3::new(0.0, 0.0, axis_half),
                Color::NEUTRAL,
                self.line_radius,
            )
            .with_style(StrokeStyle::Dashed {
                dash: 0.08,
                gap: 0.05,
            }),
        );

        let n = self.curve_segments.max(8);
        let curve = (0..n)
            .map(|i| self.boundary_point(TAU * i as f32 / n as f32))
            .collect();
        node.push(
            Polyline::new(curve, true, self.color.darken(self.darken), self.line_radius)
                .with_style(StrokeStyle::Dotted { spacing: 0.06 }),
        );
        node
    }
}

impl Default for CylindroidParams {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rulings_start_on_the_axis() {
        let params = CylindroidParams::DEFAULT;
        let rulings = params.rulings();
        assert_eq!(rulings.len(), params.line_count);
        for r in &rulings {
            assert_eq!(r.start.x, 0.0);
            assert_eq!(r.start.y, 0.0);
            assert_eq!(r.start.z, r.end.z);
            let radial = Vec3::new(r.end.x, r.end.y, 0.0).length();
            assert!((radial - params.width).abs() < 1e-5);
        }
    }

    #[test]
    fn heights_follow_double_angle_sine() {
        let params = CylindroidParams {
            line_count: 8,
            ..CylindroidParams::DEFAULT
        };
        let rulings = params.rulings();
        // θ = π/4 gives the peak z = h/2.
        assert!((rulings[1].start.z - params.height / 2.0).abs() < 1e-6);
        assert!(rulings[2].start.z.abs() < 1e-6);
    }

    #[test]
    fn colors_fade_from_base_to_dark() {
        let params = CylindroidParams::DEFAULT;
        assert_eq!(params.ruling_color(0), params.color);
        let last = params.ruling_color(params.line_count - 1);
        assert_eq!(last.to_hex(), params.color.darken(params.darken).to_hex());
    }

    #[test]
    fn includes_dashed_axis_and_dotted_curve() {
        let node = CylindroidParams::DEFAULT.build();
        assert_eq!(node.primitives.len(), CylindroidParams::DEFAULT.line_count + 2);
    }
}
