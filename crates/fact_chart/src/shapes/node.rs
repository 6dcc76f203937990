//! Renderable node trees produced by shape factories.
//!
//! A [`ShapeNode`] is a group with a local [`Transform`], a list of [`Primitive`]s expressed in
//! the node's local space, and child nodes. Nodes are owned by the scene that requested them and
//! are rebuilt on every repopulation.
use glam::{Mat4, Vec3};

use crate::geometry::{Color, Transform};

/// How a stroke is broken up along its length, in world units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum StrokeStyle {
    Solid,
    Dashed { dash: f32, gap: f32 },
    Dotted { spacing: f32 },
}

impl StrokeStyle {
    /// Whether the stroke is drawn at arc length `s` from its start.
    pub fn is_visible_at(&self, s: f32) -> bool {
        match *self {
            StrokeStyle::Solid => true,
            StrokeStyle::Dashed { dash, gap } => {
                let period = dash + gap;
                if period <= 0.0 {
                    return true;
                }
                s.rem_euclid(period) < dash
            }
            StrokeStyle::Dotted { spacing } => {
                if spacing <= 0.0 {
                    return true;
                }
                // A dot occupies a fifth of the spacing.
                s.rem_euclid(spacing) < spacing * 0.2
            }
        }
    }
}

/// A thick straight segment (a thin cylinder of the given radius).
#[derive(Clone, Debug, PartialEq)]
pub struct Segment {
    pub start: Vec3,
    pub end: Vec3,
    pub color: Color,
    pub radius: f32,
    pub style: StrokeStyle,
}

impl Segment {
    pub fn new(start: Vec3, end: Vec3, color: Color, radius: f32) -> Self {
        Self {
            start,
            end,
            color,
            radius,
            style: StrokeStyle::Solid,
        }
    }

    pub fn with_style(mut self, style: StrokeStyle) -> Self {
        self.style = style;
        self
    }

    pub fn length(&self) -> f32 {
        self.start.distance(self.end)
    }
}

/// A connected sequence of thick segments, optionally closed into a loop.
#[derive(Clone, Debug, PartialEq)]
pub struct Polyline {
    pub points: Vec<Vec3>,
    pub closed: bool,
    pub color: Color,
    pub radius: f32,
    pub style: StrokeStyle,
}

impl Polyline {
    pub fn new(points: Vec<Vec3>, closed: bool, color: Color, radius: f32) -> Self {
        Self {
            points,
            closed,
            color,
            radius,
            style: StrokeStyle::Solid,
        }
    }

    pub fn with_style(mut self, style: StrokeStyle) -> Self {
        self.style = style;
        self
    }

    /// Iterates the consecutive point pairs, including the closing pair when `closed`.
    pub fn edges(&self) -> impl Iterator<Item = (Vec3, Vec3)> + '_ {
        let n = self.points.len();
        let count = match (n, self.closed) {
            (0 | 1, _) => 0,
            (_, true) => n,
            (_, false) => n - 1,
        };
        (0..count).map(move |i| (self.points[i], self.points[(i + 1) % n]))
    }
}

/// An indexed triangle mesh with a flat color and opacity.
#[derive(Clone, Debug, PartialEq)]
pub struct Mesh {
    pub vertices: Vec<Vec3>,
    pub triangles: Vec<[u32; 3]>,
    pub color: Color,
    pub opacity: f32,
}

impl Mesh {
    pub fn new(vertices: Vec<Vec3>, triangles: Vec<[u32; 3]>, color: Color, opacity: f32) -> Self {
        Self {
            vertices,
            triangles,
            color,
            opacity: opacity.clamp(0.0, 1.0),
        }
    }

    pub fn is_translucent(&self) -> bool {
        self.opacity < 1.0
    }

    /// Face normal of triangle `index`, following its winding order.
    pub fn face_normal(&self, index: usize) -> Option<Vec3> {
        let [a, b, c] = *self.triangles.get(index)?;
        let a = *self.vertices.get(a as usize)?;
        let b = *self.vertices.get(b as usize)?;
        let c = *self.vertices.get(c as usize)?;
        Some((b - a).cross(c - a).normalize_or_zero())
    }
}

/// Drawable content of a node.
#[derive(Clone, Debug, PartialEq)]
pub enum Primitive {
    Segment(Segment),
    Polyline(Polyline),
    Mesh(Mesh),
}

impl Primitive {
    pub fn is_translucent(&self) -> bool {
        matches!(self, Primitive::Mesh(mesh) if mesh.is_translucent())
    }
}

impl From<Segment> for Primitive {
    fn from(value: Segment) -> Self {
        Primitive::Segment(value)
    }
}

impl From<Polyline> for Primitive {
    fn from(value: Polyline) -> Self {
        Primitive::Polyline(value)
    }
}

impl From<Mesh> for Primitive {
    fn from(value: Mesh) -> Self {
        Primitive::Mesh(value)
    }
}

/// A named group of primitives and child groups.
#[derive(Clone, Debug, PartialEq)]
pub struct ShapeNode {
    pub name: String,
    pub transform: Transform,
    pub primitives: Vec<Primitive>,
    pub children: Vec<ShapeNode>,
}

impl ShapeNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            transform: Transform::IDENTITY,
            primitives: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn push(&mut self, primitive: impl Into<Primitive>) -> &mut Self {
        self.primitives.push(primitive.into());
        self
    }

    pub fn add_child(&mut self, child: ShapeNode) -> &mut Self {
        self.children.push(child);
        self
    }

    /// Total number of primitives in this node and all descendants.
    pub fn primitive_count(&self) -> usize {
        self.primitives.len()
            + self
                .children
                .iter()
                .map(ShapeNode::primitive_count)
                .sum::<usize>()
    }

    /// Visits every primitive with its accumulated world matrix, parents first.
    pub fn visit<'a>(&'a self, parent: Mat4, f: &mut dyn FnMut(Mat4, &'a Primitive)) {
        let world = parent * self.transform.to_mat4();
        for primitive in &self.primitives {
            f(world, primitive);
        }
        for child in &self.children {
            child.visit(world, f);
        }
    }

    /// Collects every primitive with its world matrix relative to this node's parent.
    pub fn world_primitives(&self) -> Vec<(Mat4, &Primitive)> {
        let mut out = Vec::new();
        self.visit(Mat4::IDENTITY, &mut |world, primitive| {
            out.push((world, primitive))
        });
        out
    }

    /// World-space segments (from segments and polyline edges) of this node tree.
    pub fn world_segments(&self) -> Vec<(Vec3, Vec3)> {
        let mut out = Vec::new();
        self.visit(Mat4::IDENTITY, &mut |world, primitive| match primitive {
            Primitive::Segment(s) => {
                out.push((world.transform_point3(s.start), world.transform_point3(s.end)))
            }
            Primitive::Polyline(p) => out.extend(
                p.edges()
                    .map(|(a, b)| (world.transform_point3(a), world.transform_point3(b))),
            ),
            Primitive::Mesh(_) => {}
        });
        out
    }

    /// Finds the first descendant (or self) with the given name.
    pub fn find(&self, name: &str) -> Option<&ShapeNode> {
        if self.name == name {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(name))
    }
}

#[cfg(test)]
mod tests {
    use glam::Quat;

    use super::*;

    #[test]
    fn stroke_patterns() {
        let dashed = StrokeStyle::Dashed {
            dash: 0.1,
            gap: 0.1,
        };
        assert!(dashed.is_visible_at(0.05));
        assert!(!dashed.is_visible_at(0.15));
        assert!(dashed.is_visible_at(0.25));

        let dotted = StrokeStyle::Dotted { spacing: 1.0 };
        assert!(dotted.is_visible_at(0.1));
        assert!(!dotted.is_visible_at(0.5));
        assert!(StrokeStyle::Solid.is_visible_at(123.0));
    }

    #[test]
    fn polyline_edges_respect_closed_flag() {
        let pts = vec![Vec3::ZERO, Vec3::X, Vec3::Y];
        let open = Polyline::new(pts.clone(), false, Color::BLACK, 0.01);
        let closed = Polyline::new(pts, true, Color::BLACK, 0.01);
        assert_eq!(open.edges().count(), 2);
        assert_eq!(closed.edges().count(), 3);
        assert_eq!(closed.edges().last(), Some((Vec3::Y, Vec3::ZERO)));
        let single = Polyline::new(vec![Vec3::ZERO], true, Color::BLACK, 0.01);
        assert_eq!(single.edges().count(), 0);
    }

    #[test]
    fn world_segments_accumulate_transforms() {
        let mut child = ShapeNode::new("child").with_transform(Transform::from_rotation(
            Quat::from_rotation_z(std::f32::consts::FRAC_PI_2),
        ));
        child.push(Segment::new(Vec3::ZERO, Vec3::X, Color::BLACK, 0.01));
        let mut root =
            ShapeNode::new("root").with_transform(Transform::from_translation(Vec3::Z));
        root.add_child(child);

        let segs = root.world_segments();
        assert_eq!(segs.len(), 1);
        assert!(segs[0].0.abs_diff_eq(Vec3::Z, 1e-5));
        assert!(segs[0].1.abs_diff_eq(Vec3::new(0.0, 1.0, 1.0), 1e-5));
        assert_eq!(root.primitive_count(), 1);
        assert!(root.find("child").is_some());
    }

    #[test]
    fn mesh_face_normal_follows_winding() {
        let mesh = Mesh::new(
            vec![Vec3::ZERO, Vec3::X, Vec3::Y],
            vec![[0, 1, 2], [0, 2, 1]],
            Color::WHITE,
            0.5,
        );
        assert_eq!(mesh.face_normal(0), Some(Vec3::Z));
        assert_eq!(mesh.face_normal(1), Some(-Vec3::Z));
        assert_eq!(mesh.face_normal(2), None);
        assert!(mesh.is_translucent());
    }
}
