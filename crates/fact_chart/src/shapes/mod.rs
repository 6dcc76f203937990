//! Parametric shape primitives.
//!
//! Every built-in shape has a parameter struct with a `DEFAULT` constant, an options schema,
//! and a `build()` method producing a [`ShapeNode`]. [`ShapeKind`] is the closed set of built-in
//! shapes; [`ShapeRegistry`] maps type names to factories and accepts custom registrations.
pub mod box_lines;
pub mod cylindroid;
pub mod disk;
pub mod glyph;
pub mod hoop;
pub mod hyperboloid;
pub mod line;
pub mod node;
pub mod options;
pub mod paraboloid;
pub mod plane;
pub mod registry;
pub mod sphere;

pub use box_lines::BoxOfParallelLinesParams;
pub use cylindroid::CylindroidParams;
pub use disk::DiskParams;
pub use glyph::{LineType, MomentParams, TranslationParams};
pub use hoop::HoopParams;
pub use hyperboloid::HyperboloidParams;
pub use line::LineParams;
pub use node::{Mesh, Polyline, Primitive, Segment, ShapeNode, StrokeStyle};
pub use options::{FieldKind, FieldSpec, OptionValue, OptionsSchema, ShapeOptions};
pub use paraboloid::HyperbolicParaboloidParams;
pub use plane::{PlaneOfParallelLinesParams, PlaneParams};
pub use registry::{FnFactory, ShapeFactory, ShapeRegistry};
pub use sphere::{fibonacci_sphere, SphereParams};

/// The built-in shape types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    Line,
    Disk,
    Plane,
    PlaneOfParallelLines,
    BoxOfParallelLines,
    Hoop,
    Sphere,
    Cylindroid,
    HyperbolicParaboloid,
    Hyperboloid,
    Translation,
    Moment,
}

impl ShapeKind {
    pub const ALL: [ShapeKind; 12] = [
        ShapeKind::Line,
        ShapeKind::Disk,
        ShapeKind::Plane,
        ShapeKind::PlaneOfParallelLines,
        ShapeKind::BoxOfParallelLines,
        ShapeKind::Hoop,
        ShapeKind::Sphere,
        ShapeKind::Cylindroid,
        ShapeKind::HyperbolicParaboloid,
        ShapeKind::Hyperboloid,
        ShapeKind::Translation,
        ShapeKind::Moment,
    ];

    /// Canonical type name used in chart data.
    pub fn name(self) -> &'static str {
        match self {
            ShapeKind::Line => "line",
            ShapeKind::Disk => "disk",
            ShapeKind::Plane => "plane",
            ShapeKind::PlaneOfParallelLines => "planeOfParallelLines",
            ShapeKind::BoxOfParallelLines => "boxOfParallelLines",
            ShapeKind::Hoop => "hoop",
            ShapeKind::Sphere => "sphere",
            ShapeKind::Cylindroid => "cylindroid",
            ShapeKind::HyperbolicParaboloid => "hyperbolicParaboloid",
            ShapeKind::Hyperboloid => "hyperboloid",
            ShapeKind::Translation => "translation",
            ShapeKind::Moment => "moment",
        }
    }

    /// Generator-style alias accepted for older data files.
    pub fn legacy_name(self) -> &'static str {
        match self {
            ShapeKind::Line => "createLine",
            ShapeKind::Disk => "createDisk",
            ShapeKind::Plane => "createPlane",
            ShapeKind::PlaneOfParallelLines => "createPlaneOfParallelLines",
            ShapeKind::BoxOfParallelLines => "createBoxOfParallelLines",
            ShapeKind::Hoop => "createHoop",
            ShapeKind::Sphere => "createSphere",
            ShapeKind::Cylindroid => "createCylindroid",
            ShapeKind::HyperbolicParaboloid => "createHyperbolicParaboloid",
            ShapeKind::Hyperboloid => "createHyperboloid",
            ShapeKind::Translation => "createTranslation",
            ShapeKind::Moment => "createMoment",
        }
    }

    /// Looks a kind up by canonical or legacy name.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|k| k.name() == name || k.legacy_name() == name)
    }

    pub fn schema(self) -> OptionsSchema {
        match self {
            ShapeKind::Line => line::LINE_SCHEMA,
            ShapeKind::Disk => disk::DISK_SCHEMA,
            ShapeKind::Plane => plane::PLANE_SCHEMA,
            ShapeKind::PlaneOfParallelLines => plane::PLANE_OF_PARALLEL_LINES_SCHEMA,
            ShapeKind::BoxOfParallelLines => box_lines::BOX_OF_PARALLEL_LINES_SCHEMA,
            ShapeKind::Hoop => hoop::HOOP_SCHEMA,
            ShapeKind::Sphere => sphere::SPHERE_SCHEMA,
            ShapeKind::Cylindroid => cylindroid::CYLINDROID_SCHEMA,
            ShapeKind::HyperbolicParaboloid => paraboloid::HYPERBOLIC_PARABOLOID_SCHEMA,
            ShapeKind::Hyperboloid => hyperboloid::HYPERBOLOID_SCHEMA,
            ShapeKind::Translation => glyph::TRANSLATION_SCHEMA,
            ShapeKind::Moment => glyph::MOMENT_SCHEMA,
        }
    }

    pub fn build(self, options: &ShapeOptions) -> ShapeNode {
        match self {
            ShapeKind::Line => LineParams::from_options(options).build(),
            ShapeKind::Disk => DiskParams::from_options(options).build(),
            ShapeKind::Plane => PlaneParams::from_options(options).build(),
            ShapeKind::PlaneOfParallelLines => {
                PlaneOfParallelLinesParams::from_options(options).build()
            }
            ShapeKind::BoxOfParallelLines => {
                BoxOfParallelLinesParams::from_options(options).build()
            }
            ShapeKind::Hoop => HoopParams::from_options(options).build(),
            ShapeKind::Sphere => SphereParams::from_options(options).build(),
            ShapeKind::Cylindroid => CylindroidParams::from_options(options).build(),
            ShapeKind::HyperbolicParaboloid => {
                HyperbolicParaboloidParams::from_options(options).build()
            }
            ShapeKind::Hyperboloid => HyperboloidParams::from_options(options).build(),
            ShapeKind::Translation => TranslationParams::from_options(options).build(),
            ShapeKind::Moment => MomentParams::from_options(options).build(),
        }
    }
}

impl ShapeFactory for ShapeKind {
    fn schema(&self) -> OptionsSchema {
        ShapeKind::schema(*self)
    }

    fn create(&self, options: &ShapeOptions) -> ShapeNode {
        self.build(options)
    }
}
