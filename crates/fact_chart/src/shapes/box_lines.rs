//! Wireframe cube filled with a grid of vertical parallel lines.
use glam::Vec3;

use crate::geometry::Color;
use crate::shapes::node::{Segment, ShapeNode};
use crate::shapes::options::{FieldKind, FieldSpec, MAX_GRID_DIVISIONS, OptionsSchema, ShapeOptions};

pub const BOX_OF_PARALLEL_LINES_SCHEMA: OptionsSchema = OptionsSchema::new(&[
    FieldSpec::new("size", FieldKind::Number),
    FieldSpec::new("divisions", FieldKind::Count),
    FieldSpec::new("color", FieldKind::Color),
    FieldSpec::new("edgeColor", FieldKind::Color),
    FieldSpec::new("lineRadius", FieldKind::Number),
]);

#[derive(Clone, Debug, PartialEq)]
pub struct BoxOfParallelLinesParams {
    pub size: f32,
    pub divisions: usize,
    /// Color of the interior lines.
    pub color: Color,
    pub edge_color: Color,
    pub line_radius: f32,
}

impl BoxOfParallelLinesParams {
    pub const DEFAULT: BoxOfParallelLinesParams = BoxOfParallelLinesParams {
        size: 2.0,
        divisions: 10,
        color: Color::BLACK,
        edge_color: Color::NEUTRAL,
        line_radius: 0.008,
    };

    pub fn from_options(options: &ShapeOptions) -> Self {
        let d = Self::DEFAULT;
        Self {
            size: options.non_negative("size", d.size),
            divisions: options.count_at_most("divisions", d.divisions, MAX_GRID_DIVISIONS),
            color: options.color("color", d.color),
            edge_color: options.color("edgeColor", d.edge_color),
            line_radius: options.non_negative("lineRadius", d.line_radius),
        }
    }

    /// The twelve edges of the cube.
    pub fn edges(&self) -> Vec<Segment> {
        let h = self.size / 2.0;
        let corner = |i: u8| {
            Vec3::new(
                if i & 1 == 0 { -h } else { h },
                if i & 2 == 0 { -h } else { h },
                if i & 4 == 0 { -h } else { h },
            )
        };
        let mut edges = Vec::with_capacity(12);
        for a in 0u8..8 {
            for bit in [1u8, 2, 4] {
                if a & bit == 0 {
                    edges.push(Segment::new(
                        corner(a),
                        corner(a | bit),
                        self.edge_color,
                        self.line_radius,
                    ));
                }
            }
        }
        edges
    }

    /// Vertical lines on the `(divisions+1)²` grid, minus the four cube corners.
    pub fn interior_lines(&self) -> Vec<Segment> {
        let h = self.size / 2.0;
        let n = self.divisions.max(1);
        let at = |k: usize| -h + self.size * k as f32 / n as f32;
        let boundary = |k: usize| k == 0 || k == n;

        let mut lines = Vec::with_capacity((n + 1) * (n + 1));
        for i in 0..=n {
            for j in 0..=n {
                if boundary(i) && boundary(j) {
                    continue;
                }
                let (x, z) = (at(i), at(j));
                lines.push(Segment::new(
                    Vec3::new(x, -h, z),
                    Vec3::new(x, h, z),
                    self.color,
                    self.line_radius,
                ));
            }
        }
        lines
    }

    pub fn build(&self) -> ShapeNode {
        let mut node = ShapeNode::new("boxOfParallelLines");
        for edge in self.edges() {
            node.push(edge);
        }
        for line in self.interior_lines() {
            node.push(line);
        }
        node
    }
}

impl Default for BoxOfParallelLinesParams {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::options::OptionValue;

    #[test]
    fn cube_has_twelve_unit_edges() {
        let params = BoxOfParallelLinesParams {
            size: 1.0,
            ..BoxOfParallelLinesParams::DEFAULT
        };
        let edges = params.edges();
        assert_eq!(edges.len(), 12);
        assert!(edges.iter().all(|e| (e.length() - 1.0).abs() < 1e-6));
    }

    #[test]
    fn corner_positions_are_skipped() {
        let params = BoxOfParallelLinesParams {
            divisions: 3,
            ..BoxOfParallelLinesParams::DEFAULT
        };
        let lines = params.interior_lines();
        assert_eq!(lines.len(), 4 * 4 - 4);
        let h = params.size / 2.0;
        for line in &lines {
            let on_corner = line.start.x.abs() == h && line.start.z.abs() == h;
            assert!(!on_corner);
        }
        assert_eq!(params.build().primitives.len(), 12 + 12);
    }

    #[test]
    fn lines_are_vertical() {
        for line in BoxOfParallelLinesParams::DEFAULT.interior_lines() {
            assert_eq!(line.start.x, line.end.x);
            assert_eq!(line.start.z, line.end.z);
            assert!(line.end.y > line.start.y);
        }
    }

    #[test]
    fn huge_divisions_stay_bounded() {
        let options = ShapeOptions::new().with("divisions", OptionValue::Number(4096.0));
        let params = BoxOfParallelLinesParams::from_options(&options);
        assert_eq!(params.divisions, MAX_GRID_DIVISIONS);
        let n = MAX_GRID_DIVISIONS + 1;
        assert_eq!(params.interior_lines().len(), n * n - 4);
    }
}
