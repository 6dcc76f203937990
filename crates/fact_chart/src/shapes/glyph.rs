//! Translation (vector) and moment (torque) glyphs.
//!
//! Both glyphs are a bold shaft between `start` and `end` with a symbol at the far end and,
//! unless `only_end` is set, a mirrored symbol at the near end. Symbols are modelled around a
//! canonical axis and turned onto the shaft direction with [`rotation_between`].
use std::f32::consts::{PI, TAU};

use glam::{Quat, Vec3};

use crate::geometry::{rotation_between, Color, Transform};
use crate::shapes::node::{Mesh, Polyline, Segment, ShapeNode};
use crate::shapes::options::{FieldKind, FieldSpec, OptionsSchema, ShapeOptions};

/// Canonical axis of arrowhead cones (apex towards `+Y`).
pub const CONE_AXIS: Vec3 = Vec3::Y;

/// Canonical axis of the moment symbol (arc in the XY plane, turning about `+Z`).
pub const MOMENT_AXIS: Vec3 = Vec3::Z;

const CONE_SEGMENTS: u32 = 16;
const ARC_SEGMENTS: usize = 32;

pub const TRANSLATION_SCHEMA: OptionsSchema = OptionsSchema::new(&[
    FieldSpec::new("start", FieldKind::Vector),
    FieldSpec::new("end", FieldKind::Vector),
    FieldSpec::new("only_end", FieldKind::Flag),
    FieldSpec::new("radius", FieldKind::Number),
    FieldSpec::new("headLength", FieldKind::Number),
    FieldSpec::new("headRadius", FieldKind::Number),
]);

pub const MOMENT_SCHEMA: OptionsSchema = OptionsSchema::new(&[
    FieldSpec::new("start", FieldKind::Vector),
    FieldSpec::new("end", FieldKind::Vector),
    FieldSpec::new("only_end", FieldKind::Flag),
    FieldSpec::new("color", FieldKind::Color),
    FieldSpec::new("radius", FieldKind::Number),
    FieldSpec::new("symbolRadius", FieldKind::Number),
    FieldSpec::new("arcAngle", FieldKind::Number),
    FieldSpec::new("headLength", FieldKind::Number),
    FieldSpec::new("headRadius", FieldKind::Number),
]);

/// What a radiating line of a disk or sphere is drawn as.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LineType {
    #[default]
    Line,
    Translation,
    Moment,
}

impl LineType {
    /// Parses `line`, `translation`/`vector`, `moment`/`torque` (case-insensitive).
    pub fn parse(text: &str) -> Option<Self> {
        match text.to_ascii_lowercase().as_str() {
            "line" | "plain" => Some(LineType::Line),
            "translation" | "vector" | "arrow" => Some(LineType::Translation),
            "moment" | "torque" | "rotation" => Some(LineType::Moment),
            _ => None,
        }
    }

    pub(crate) fn from_options(options: &ShapeOptions, key: &str) -> Self {
        options
            .text(key)
            .and_then(LineType::parse)
            .unwrap_or_default()
    }
}

/// Builds one radiating element from `start` to `end`.
///
/// Glyph heads shrink with short shafts so they never exceed a third of the length.
pub(crate) fn radiating_element(
    line_type: LineType,
    start: Vec3,
    end: Vec3,
    color: Color,
    radius: f32,
    only_end: bool,
) -> ShapeNode {
    let length = start.distance(end);
    match line_type {
        LineType::Line => {
            let mut node = ShapeNode::new("line");
            node.push(Segment::new(start, end, color, radius));
            node
        }
        LineType::Translation => {
            let d = TranslationParams::DEFAULT;
            TranslationParams {
                start,
                end,
                only_end,
                radius: radius.max(d.radius * 0.5),
                ..d
            }
            .build()
        }
        LineType::Moment => {
            let d = MomentParams::DEFAULT;
            let scale = head_scale(length, d.symbol_radius * 2.0);
            MomentParams {
                start,
                end,
                only_end,
                color,
                radius: radius.max(d.radius * 0.5),
                symbol_radius: d.symbol_radius * scale,
                head_length: d.head_length * scale,
                head_radius: d.head_radius * scale,
                ..d
            }
            .build()
        }
    }
}

fn head_scale(length: f32, head: f32) -> f32 {
    if head <= 0.0 {
        return 1.0;
    }
    (length / (3.0 * head)).min(1.0)
}

/// A cone with its apex at the origin and its base `height` below it along `-Y`.
pub fn cone_mesh(radius: f32, height: f32, color: Color) -> Mesh {
    let mut vertices = Vec::with_capacity(CONE_SEGMENTS as usize + 2);
    vertices.push(Vec3::ZERO);
    vertices.push(Vec3::new(0.0, -height, 0.0));
    for i in 0..CONE_SEGMENTS {
        let a = TAU * i as f32 / CONE_SEGMENTS as f32;
        vertices.push(Vec3::new(radius * a.cos(), -height, radius * a.sin()));
    }

    let mut triangles = Vec::with_capacity(2 * CONE_SEGMENTS as usize);
    for i in 0..CONE_SEGMENTS {
        let a = 2 + i;
        let b = 2 + (i + 1) % CONE_SEGMENTS;
        triangles.push([0, b, a]);
        triangles.push([1, a, b]);
    }
    Mesh::new(vertices, triangles, color, 1.0)
}

/// A cone node whose apex sits at `tip`, pointing along `direction`.
fn arrowhead(tip: Vec3, direction: Vec3, radius: f32, length: f32, color: Color) -> ShapeNode {
    let mut node = ShapeNode::new("arrowhead").with_transform(
        Transform::from_translation(tip).with_rotation(rotation_between(CONE_AXIS, direction)),
    );
    node.push(cone_mesh(radius, length, color));
    node
}

/// Parameters for a translation glyph (double- or single-headed arrow).
#[derive(Clone, Debug, PartialEq)]
pub struct TranslationParams {
    pub start: Vec3,
    pub end: Vec3,
    /// Only draw the arrowhead at `end`.
    pub only_end: bool,
    /// Shaft radius.
    pub radius: f32,
    pub head_length: f32,
    pub head_radius: f32,
}

impl TranslationParams {
    /// Translation glyphs are always drawn in this color.
    pub const COLOR: Color = Color::NEUTRAL;

    pub const DEFAULT: TranslationParams = TranslationParams {
        start: Vec3::ZERO,
        end: Vec3::Y,
        only_end: false,
        radius: 0.02,
        head_length: 0.15,
        head_radius: 0.06,
    };

    pub fn from_options(options: &ShapeOptions) -> Self {
        let d = Self::DEFAULT;
        Self {
            start: options.vector("start", d.start),
            end: options.vector("end", d.end),
            only_end: options.flag("only_end", d.only_end),
            radius: options.non_negative("radius", d.radius),
            head_length: options.non_negative("headLength", d.head_length),
            head_radius: options.non_negative("headRadius", d.head_radius),
        }
    }

    /// Heads are scaled down on short shafts so each stays within a third of the length.
    pub fn build(&self) -> ShapeNode {
        let color = Self::COLOR;
        let mut node = ShapeNode::new("translation");
        let dir = (self.end - self.start).normalize_or_zero();
        let scale = head_scale(self.start.distance(self.end), self.head_length);
        let head_length = self.head_length * scale;
        let head_radius = self.head_radius * scale;

        let shaft_start = if self.only_end {
            self.start
        } else {
            self.start + dir * head_length
        };
        let shaft_end = self.end - dir * head_length;
        node.push(Segment::new(shaft_start, shaft_end, color, self.radius));

        node.add_child(arrowhead(self.end, dir, head_radius, head_length, color));
        if !self.only_end {
            node.add_child(arrowhead(self.start, -dir, head_radius, head_length, color));
        }
        node
    }
}

impl Default for TranslationParams {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Parameters for a moment glyph: a shaft with a curled double-headed arc symbol.
#[derive(Clone, Debug, PartialEq)]
pub struct MomentParams {
    pub start: Vec3,
    pub end: Vec3,
    /// Only draw the symbol at `end`.
    pub only_end: bool,
    pub color: Color,
    /// Shaft radius; the arc tube uses 60% of it.
    pub radius: f32,
    /// Radius of the torus arc.
    pub symbol_radius: f32,
    /// Swept angle of the arc in radians.
    pub arc_angle: f32,
    pub head_length: f32,
    pub head_radius: f32,
}

impl MomentParams {
    pub const DEFAULT: MomentParams = MomentParams {
        start: Vec3::ZERO,
        end: Vec3::Y,
        only_end: false,
        color: Color::NEUTRAL,
        radius: 0.02,
        symbol_radius: 0.15,
        arc_angle: 1.5 * PI,
        head_length: 0.08,
        head_radius: 0.04,
    };

    pub fn from_options(options: &ShapeOptions) -> Self {
        let d = Self::DEFAULT;
        Self {
            start: options.vector("start", d.start),
            end: options.vector("end", d.end),
            only_end: options.flag("only_end", d.only_end),
            color: options.color("color", d.color),
            radius: options.non_negative("radius", d.radius),
            symbol_radius: options.non_negative("symbolRadius", d.symbol_radius),
            arc_angle: options.number("arcAngle", d.arc_angle).clamp(0.0, TAU),
            head_length: options.non_negative("headLength", d.head_length),
            head_radius: options.non_negative("headRadius", d.head_radius),
        }
    }

    /// The symbol in its canonical frame: an arc about [`MOMENT_AXIS`] with a cone at each end.
    pub fn symbol(&self) -> ShapeNode {
        let r = self.symbol_radius;
        let points: Vec<Vec3> = (0..=ARC_SEGMENTS)
            .map(|k| {
                let a = self.arc_angle * k as f32 / ARC_SEGMENTS as f32;
                Vec3::new(r * a.cos(), r * a.sin(), 0.0)
            })
            .collect();

        let mut node = ShapeNode::new("moment-symbol");
        node.push(Polyline::new(points, false, self.color, self.radius * 0.6));

        let tangent = |a: f32| Vec3::new(-a.sin(), a.cos(), 0.0);
        let on_arc = |a: f32| Vec3::new(r * a.cos(), r * a.sin(), 0.0);

        let end_dir = tangent(self.arc_angle);
        node.add_child(arrowhead(
            on_arc(self.arc_angle) + end_dir * self.head_length,
            end_dir,
            self.head_radius,
            self.head_length,
            self.color,
        ));
        let start_dir = -tangent(0.0);
        node.add_child(arrowhead(
            on_arc(0.0) + start_dir * self.head_length,
            start_dir,
            self.head_radius,
            self.head_length,
            self.color,
        ));
        node
    }

    pub fn build(&self) -> ShapeNode {
        let mut node = ShapeNode::new("moment");
        node.push(Segment::new(self.start, self.end, self.color, self.radius));

        let dir = (self.end - self.start).normalize_or_zero();
        let far = self.symbol().with_transform(
            Transform::from_translation(self.end).with_rotation(symbol_rotation(dir)),
        );
        node.add_child(far);
        if !self.only_end {
            let near = self.symbol().with_transform(
                Transform::from_translation(self.start).with_rotation(symbol_rotation(-dir)),
            );
            node.add_child(near);
        }
        node
    }
}

impl Default for MomentParams {
    fn default() -> Self {
        Self::DEFAULT
    }
}

fn symbol_rotation(dir: Vec3) -> Quat {
    rotation_between(MOMENT_AXIS, dir)
}
