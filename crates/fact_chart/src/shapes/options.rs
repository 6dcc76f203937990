//! Shape options: schema-driven conversion of raw JSON option maps.
//!
//! Each shape declares an [`OptionsSchema`] naming its fields and their [`FieldKind`]. Raw
//! options are converted once, at the top level only, into [`OptionValue`]s:
//! - declared fields are converted by their declared kind, so an RGB triple declared as a
//!   color never turns into a vector;
//! - undeclared fields keep the plain convention that an array of exactly three numbers is a
//!   vector.
//!
//! Accessors never fail. A missing or malformed field yields the caller's default and a
//! `debug!` trace.
use std::collections::BTreeMap;

use glam::Vec3;
use serde_json::{Map, Value};
use tracing::debug;

use crate::geometry::Color;

/// Upper bound for count-like options (line counts, divisions).
pub const MAX_COUNT: usize = 4096;

/// Upper bound for `divisions` on shapes whose line count grows with its square.
pub const MAX_GRID_DIVISIONS: usize = 256;

/// Upper bound for `lineCount` and linear `divisions`. Each line may carry a glyph.
pub const MAX_LINE_COUNT: usize = 512;

/// Declared type of an option field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldKind {
    Vector,
    Number,
    Count,
    Color,
    Flag,
    Choice,
}

/// Name and kind of one declared option field.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
}

impl FieldSpec {
    pub const fn new(name: &'static str, kind: FieldKind) -> Self {
        Self { name, kind }
    }
}

/// The declared option fields of a shape type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OptionsSchema {
    pub fields: &'static [FieldSpec],
}

impl OptionsSchema {
    pub const EMPTY: OptionsSchema = OptionsSchema { fields: &[] };

    pub const fn new(fields: &'static [FieldSpec]) -> Self {
        Self { fields }
    }

    pub fn kind_of(&self, name: &str) -> Option<FieldKind> {
        self.fields.iter().find(|f| f.name == name).map(|f| f.kind)
    }

    pub fn vector_fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.fields
            .iter()
            .filter(|f| f.kind == FieldKind::Vector)
            .map(|f| f.name)
    }
}

/// A converted option value.
#[derive(Clone, Debug, PartialEq)]
pub enum OptionValue {
    Number(f32),
    Flag(bool),
    Text(String),
    Vector(Vec3),
    Color(Color),
    /// A value that did not match its declared kind, or an undeclared composite value.
    Raw(Value),
}

impl OptionValue {
    /// Short name of the variant, useful for diagnostics.
    pub fn type_name(&self) -> &'static str {
        match self {
            OptionValue::Number(_) => "number",
            OptionValue::Flag(_) => "flag",
            OptionValue::Text(_) => "text",
            OptionValue::Vector(_) => "vector",
            OptionValue::Color(_) => "color",
            OptionValue::Raw(_) => "raw",
        }
    }
}

/// Converted options handed to a shape factory.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ShapeOptions {
    values: BTreeMap<String, OptionValue>,
}

impl ShapeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Converts a raw option map according to `schema`.
    pub fn convert(schema: &OptionsSchema, raw: &Map<String, Value>) -> Self {
        let values = raw
            .iter()
            .map(|(key, value)| {
                let converted = match schema.kind_of(key) {
                    Some(kind) => convert_declared(kind, value),
                    None => convert_undeclared(value),
                };
                (key.clone(), converted)
            })
            .collect();
        Self { values }
    }

    pub fn insert(&mut self, key: impl Into<String>, value: OptionValue) -> &mut Self {
        self.values.insert(key.into(), value);
        self
    }

    /// Builder form of [`ShapeOptions::insert`].
    pub fn with(mut self, key: impl Into<String>, value: OptionValue) -> Self {
        self.insert(key, value);
        self
    }

    /// Inserts a vector from anything convertible to a `mint` vector.
    pub fn with_vector(self, key: impl Into<String>, v: impl Into<mint::Vector3<f32>>) -> Self {
        self.with(key, OptionValue::Vector(Vec3::from(v.into())))
    }

    pub fn get(&self, key: &str) -> Option<&OptionValue> {
        self.values.get(key)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &OptionValue)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn number(&self, key: &str, default: f32) -> f32 {
        match self.values.get(key) {
            Some(OptionValue::Number(n)) if n.is_finite() => *n,
            other => fallback(key, other, default),
        }
    }

    /// A non-negative number, or `default` if negative or missing.
    pub fn non_negative(&self, key: &str, default: f32) -> f32 {
        let v = self.number(key, default);
        if v < 0.0 {
            fallback(key, self.values.get(key), default)
        } else {
            v
        }
    }

    /// A count rounded to the nearest integer and capped at [`MAX_COUNT`].
    pub fn count(&self, key: &str, default: usize) -> usize {
        match self.values.get(key) {
            Some(OptionValue::Number(n)) if n.is_finite() && *n >= 0.0 => {
                (n.round() as usize).min(MAX_COUNT)
            }
            other => fallback(key, other, default.min(MAX_COUNT)),
        }
    }

    /// [`ShapeOptions::count`] clamped to `limit`.
    pub fn count_at_most(&self, key: &str, default: usize, limit: usize) -> usize {
        let n = self.count(key, default);
        if n > limit {
            debug!(key, requested = n, limit, "clamping count option");
            return limit;
        }
        n
    }

    pub fn vector(&self, key: &str, default: Vec3) -> Vec3 {
        match self.values.get(key) {
            Some(OptionValue::Vector(v)) if v.is_finite() => *v,
            other => fallback(key, other, default),
        }
    }

    /// A vector that may be absent; malformed values count as absent.
    pub fn optional_vector(&self, key: &str) -> Option<Vec3> {
        match self.values.get(key) {
            Some(OptionValue::Vector(v)) if v.is_finite() => Some(*v),
            None => None,
            Some(other) => {
                debug!(option = key, found = other.type_name(), "ignoring malformed option");
                None
            }
        }
    }

    pub fn color(&self, key: &str, default: Color) -> Color {
        match self.values.get(key) {
            Some(OptionValue::Color(c)) => *c,
            other => fallback(key, other, default),
        }
    }

    pub fn flag(&self, key: &str, default: bool) -> bool {
        match self.values.get(key) {
            Some(OptionValue::Flag(b)) => *b,
            other => fallback(key, other, default),
        }
    }

    pub fn text(&self, key: &str) -> Option<&str> {
        match self.values.get(key) {
            Some(OptionValue::Text(s)) => Some(s.as_str()),
            _ => None,
        }
    }
}

fn fallback<T>(key: &str, found: Option<&OptionValue>, default: T) -> T {
    if let Some(value) = found {
        debug!(
            option = key,
            found = value.type_name(),
            "malformed option; using default"
        );
    }
    default
}

fn number_of(value: &Value) -> Option<f32> {
    value.as_f64().map(|v| v as f32)
}

fn triple(value: &Value) -> Option<[f32; 3]> {
    let items = value.as_array()?;
    if items.len() != 3 {
        return None;
    }
    Some([
        number_of(&items[0])?,
        number_of(&items[1])?,
        number_of(&items[2])?,
    ])
}

pub(crate) fn vector_of(value: &Value) -> Option<Vec3> {
    if let Some([x, y, z]) = triple(value) {
        return Some(Vec3::new(x, y, z));
    }
    let obj = value.as_object()?;
    Some(Vec3::new(
        number_of(obj.get("x")?)?,
        number_of(obj.get("y")?)?,
        number_of(obj.get("z")?)?,
    ))
}

fn color_of(value: &Value) -> Option<Color> {
    match value {
        Value::Number(n) => {
            let hex = n.as_u64()?;
            u32::try_from(hex)
                .ok()
                .filter(|h| *h <= 0xffffff)
                .map(Color::from_hex)
        }
        Value::String(s) => Color::parse(s),
        Value::Array(_) => triple(value).and_then(Color::from_components),
        _ => None,
    }
}

fn convert_declared(kind: FieldKind, value: &Value) -> OptionValue {
    let converted = match kind {
        FieldKind::Vector => vector_of(value).map(OptionValue::Vector),
        FieldKind::Number | FieldKind::Count => number_of(value).map(OptionValue::Number),
        FieldKind::Color => color_of(value).map(OptionValue::Color),
        FieldKind::Flag => value.as_bool().map(OptionValue::Flag),
        FieldKind::Choice => value.as_str().map(|s| OptionValue::Text(s.to_owned())),
    };
    converted.unwrap_or_else(|| OptionValue::Raw(value.clone()))
}

fn convert_undeclared(value: &Value) -> OptionValue {
    if let Some([x, y, z]) = triple(value) {
        return OptionValue::Vector(Vec3::new(x, y, z));
    }
    match value {
        Value::Number(_) => number_of(value)
            .map(OptionValue::Number)
            .unwrap_or_else(|| OptionValue::Raw(value.clone())),
        Value::Bool(b) => OptionValue::Flag(*b),
        Value::String(s) => OptionValue::Text(s.clone()),
        _ => OptionValue::Raw(value.clone()),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    const SCHEMA: OptionsSchema = OptionsSchema::new(&[
        FieldSpec::new("start", FieldKind::Vector),
        FieldSpec::new("radius", FieldKind::Number),
        FieldSpec::new("lineCount", FieldKind::Count),
        FieldSpec::new("color", FieldKind::Color),
        FieldSpec::new("only_end", FieldKind::Flag),
        FieldSpec::new("lineType", FieldKind::Choice),
    ]);

    fn convert(value: Value) -> ShapeOptions {
        let Value::Object(map) = value else {
            panic!("expected object");
        };
        ShapeOptions::convert(&SCHEMA, &map)
    }

    #[test]
    fn declared_fields_follow_their_kind() {
        let opts = convert(json!({
            "start": [1, 2, 3],
            "radius": 0.5,
            "lineCount": 12,
            "color": [1, 0, 0],
            "only_end": true,
            "lineType": "moment",
        }));
        assert_eq!(opts.vector("start", Vec3::ZERO), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(opts.number("radius", 1.0), 0.5);
        assert_eq!(opts.count("lineCount", 3), 12);
        assert_eq!(opts.get("color"), Some(&OptionValue::Color(Color::new(1.0, 0.0, 0.0))));
        assert!(opts.flag("only_end", false));
        assert_eq!(opts.text("lineType"), Some("moment"));
    }

    #[test]
    fn undeclared_triples_become_vectors_only_at_top_level() {
        let opts = convert(json!({
            "axis": [0, 1, 0],
            "nested": { "inner": [1, 2, 3] },
            "pair": [1, 2],
            "mixed": [1, "a", 2],
        }));
        assert_eq!(opts.get("axis"), Some(&OptionValue::Vector(Vec3::Y)));
        assert!(matches!(opts.get("nested"), Some(OptionValue::Raw(_))));
        assert!(matches!(opts.get("pair"), Some(OptionValue::Raw(_))));
        assert!(matches!(opts.get("mixed"), Some(OptionValue::Raw(_))));
    }

    #[test]
    fn colors_accept_several_encodings() {
        for (raw, hex) in [
            (json!(0xff8800), 0xff8800),
            (json!("#00ff00"), 0x00ff00),
            (json!("0x0000ff"), 0x0000ff),
            (json!("white"), 0xffffff),
            (json!([255, 0, 0]), 0xff0000),
        ] {
            let opts = convert(json!({ "color": raw }));
            assert_eq!(opts.color("color", Color::BLACK).to_hex(), hex);
        }
    }

    #[test]
    fn malformed_values_fall_back_to_defaults() {
        let opts = convert(json!({
            "start": "origin",
            "radius": "big",
            "lineCount": -4,
            "color": { "r": 1 },
            "only_end": "yes",
        }));
        assert_eq!(opts.vector("start", Vec3::X), Vec3::X);
        assert_eq!(opts.number("radius", 2.0), 2.0);
        assert_eq!(opts.count("lineCount", 7), 7);
        assert_eq!(opts.color("color", Color::WHITE), Color::WHITE);
        assert!(!opts.flag("only_end", false));
        assert_eq!(opts.optional_vector("start"), None);
        assert_eq!(opts.number("missing", 9.0), 9.0);
    }

    #[test]
    fn counts_are_capped() {
        let opts = convert(json!({ "lineCount": 1e9 }));
        assert_eq!(opts.count("lineCount", 1), MAX_COUNT);
        assert_eq!(opts.count_at_most("lineCount", 1, 64), 64);
        assert_eq!(opts.count_at_most("missing", 9, 64), 9);
    }

    #[test]
    fn vectors_accept_xyz_objects() {
        let opts = convert(json!({ "start": { "x": 1, "y": 0, "z": -1 } }));
        assert_eq!(opts.vector("start", Vec3::ZERO), Vec3::new(1.0, 0.0, -1.0));
    }
}
