//! Hyperbolic paraboloid (saddle) drawn through its two ruling families.
//!
//! The surface is `z = u·v·0.5` over `[-s/2, s/2]²`. The non-orthogonal variant shears every
//! endpoint with `y += shear·x`.
use glam::{Mat4, Vec3};

use crate::geometry::Color;
use crate::shapes::node::{Mesh, Segment, ShapeNode, StrokeStyle};
use crate::shapes::options::{FieldKind, FieldSpec, MAX_GRID_DIVISIONS, OptionsSchema, ShapeOptions};

pub const HYPERBOLIC_PARABOLOID_SCHEMA: OptionsSchema = OptionsSchema::new(&[
    FieldSpec::new("size", FieldKind::Number),
    FieldSpec::new("divisions", FieldKind::Count),
    FieldSpec::new("isOrthogonal", FieldKind::Flag),
    FieldSpec::new("color", FieldKind::Color),
    FieldSpec::new("secondColor", FieldKind::Color),
    FieldSpec::new("lineRadius", FieldKind::Number),
]);

const CURVATURE: f32 = 0.5;

#[derive(Clone, Debug, PartialEq)]
pub struct HyperbolicParaboloidParams {
    pub size: f32,
    pub divisions: usize,
    pub is_orthogonal: bool,
    /// Shear factor of the non-orthogonal variant.
    pub shear: f32,
    /// Color of the first ruling family.
    pub color: Color,
    /// Color of the second ruling family.
    pub second_color: Color,
    pub line_radius: f32,
}

impl HyperbolicParaboloidParams {
    pub const DEFAULT: HyperbolicParaboloidParams = HyperbolicParaboloidParams {
        size: 2.0,
        divisions: 10,
        is_orthogonal: true,
        shear: 0.5,
        color: Color::BLACK,
        second_color: Color::from_hex(0x555555),
        line_radius: 0.008,
    };

    pub fn from_options(options: &ShapeOptions) -> Self {
        let d = Self::DEFAULT;
        Self {
            size: options.non_negative("size", d.size),
            divisions: options.count_at_most("divisions", d.divisions, MAX_GRID_DIVISIONS),
            is_orthogonal: options.flag("isOrthogonal", d.is_orthogonal),
            shear: d.shear,
            color: options.color("color", d.color),
            second_color: options.color("secondColor", d.second_color),
            line_radius: options.non_negative("lineRadius", d.line_radius),
        }
    }

    /// Shear applied to every endpoint, identity for the orthogonal variant.
    pub fn shear_matrix(&self) -> Mat4 {
        if self.is_orthogonal {
            return Mat4::IDENTITY;
        }
        let mut m = Mat4::IDENTITY;
        m.x_axis.y = self.shear;
        m
    }

    pub fn surface_point(&self, u: f32, v: f32) -> Vec3 {
        self.shear_matrix()
            .transform_point3(Vec3::new(u, v, u * v * CURVATURE))
    }

    fn parameter(&self, i: usize) -> f32 {
        let n = self.divisions.max(1);
        -self.size / 2.0 + self.size * i as f32 / n as f32
    }

    /// First family: constant `u`, running along `v`.
    pub fn first_family(&self) -> Vec<Segment> {
        let h = self.size / 2.0;
        (0..=self.divisions.max(1))
            .map(|i| {
                let u = self.parameter(i);
                Segment::new(
                    self.surface_point(u, -h),
                    self.surface_point(u, h),
                    self.color,
                    self.line_radius,
                )
            })
            .collect()
    }

    /// Second family: constant `v`, running along `u`.
    pub fn second_family(&self) -> Vec<Segment> {
        let h = self.size / 2.0;
        (0..=self.divisions.max(1))
            .map(|i| {
                let v = self.parameter(i);
                Segment::new(
                    self.surface_point(-h, v),
                    self.surface_point(h, v),
                    self.second_color,
                    self.line_radius,
                )
            })
            .collect()
    }

    /// Triangulated surface patch. Not attached by [`build`](Self::build): with the renderer's
    /// two-sided lighting it shades incorrectly across the saddle.
    pub fn surface_mesh(&self) -> Mesh {
        let n = self.divisions.max(1);
        let mut vertices = Vec::with_capacity((n + 1) * (n + 1));
        for j in 0..=n {
            for i in 0..=n {
                vertices.push(self.surface_point(self.parameter(i), self.parameter(j)));
            }
        }

        let stride = n as u32 + 1;
        let mut triangles = Vec::with_capacity(2 * n * n);
        for j in 0..n as u32 {
            for i in 0..n as u32 {
                let a = j * stride + i;
                let b = a + 1;
                let c = a + stride;
                let d = c + 1;
                triangles.push([a, b, d]);
                triangles.push([a, d, c]);
            }
        }
        Mesh::new(vertices, triangles, self.color, 0.2)
    }

    pub fn build(&self) -> ShapeNode {
        let mut node = ShapeNode::new("hyperbolicParaboloid");
        let first = self.first_family();
        let second = self.second_family();
        for s in first.iter().chain(second.iter()) {
            node.push(s.clone());
        }

        let h = self.size / 2.0;
        node.push(
            Segment::new(
                self.surface_point(0.0, 0.0) - Vec3::Z * h,
                self.surface_point(0.0, 0.0) + Vec3::Z * h,
                Color::NEUTRAL,
                self.line_radius,
            )
            .with_style(StrokeStyle::Dashed {
                dash: 0.08,
                gap: 0.05,
            }),
        );

        // Diagonals between the outermost rulings of the first family.
        if let (Some(lo), Some(hi)) = (first.first(), first.last()) {
            let dotted = StrokeStyle::Dotted { spacing: 0.06 };
            for (a, b) in [(lo.start, hi.end), (lo.end, hi.start)] {
                node.push(
                    Segment::new(a, b, Color::NEUTRAL, self.line_radius).with_style(dotted),
                );
            }
        }
        node
    }
}

impl Default for HyperbolicParaboloidParams {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rulings_lie_on_the_saddle() {
        let params = HyperbolicParaboloidParams::DEFAULT;
        for s in params.first_family().iter().chain(&params.second_family()) {
            for t in [0.0, 0.3, 0.7, 1.0] {
                let p = s.start.lerp(s.end, t);
                assert!((p.z - p.x * p.y * 0.5).abs() < 1e-5);
            }
        }
    }

    #[test]
    fn first_family_endpoints_match_the_formula() {
        let params = HyperbolicParaboloidParams {
            size: 2.0,
            divisions: 2,
            ..HyperbolicParaboloidParams::DEFAULT
        };
        let first = params.first_family();
        assert_eq!(first.len(), 3);
        assert!(first[0].start.abs_diff_eq(Vec3::new(-1.0, -1.0, 0.5), 1e-6));
        assert!(first[0].end.abs_diff_eq(Vec3::new(-1.0, 1.0, -0.5), 1e-6));
    }

    #[test]
    fn non_orthogonal_variant_shears_endpoints() {
        let params = HyperbolicParaboloidParams {
            is_orthogonal: false,
            ..HyperbolicParaboloidParams::DEFAULT
        };
        let first = params.first_family();
        let s = &first[0];
        // u = -1, v = -1: y picks up shear·x.
        assert!((s.start.y - (-1.0 + 0.5 * -1.0)).abs() < 1e-6);
        assert!((s.start.x + 1.0).abs() < 1e-6);
    }

    #[test]
    fn build_adds_axis_and_connectors() {
        let params = HyperbolicParaboloidParams::DEFAULT;
        let node = params.build();
        let rulings = 2 * (params.divisions + 1);
        assert_eq!(node.primitives.len(), rulings + 1 + 2);
        assert!(node.primitives.iter().all(|p| !p.is_translucent()));
    }

    #[test]
    fn surface_mesh_is_well_formed() {
        let params = HyperbolicParaboloidParams::DEFAULT;
        let mesh = params.surface_mesh();
        let n = params.divisions;
        assert_eq!(mesh.vertices.len(), (n + 1) * (n + 1));
        assert_eq!(mesh.triangles.len(), 2 * n * n);
        let count = mesh.vertices.len() as u32;
        assert!(mesh.triangles.iter().flatten().all(|&i| i < count));
    }
}
