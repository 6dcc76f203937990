#![forbid(unsafe_code)]
//! fact_chart: Freedom and constraint topology charts for flexure mechanisms.
//!
//! Modules:
//! - shapes: parametric primitives (lines, arrows, disks, planes, ruled surfaces) and the shape registry
//! - chart: the 50-slot pyramid layout, chart data loading, and grid cells
//! - scene: scenes, lights, and assembly of element lists into scenes
//! - render: software rasterizer, camera, orbit controls, and thumbnail compositing
//! - viewer: headless dual-canvas viewer with a restartable render loop
//! - events: progress and diagnostics sinks
//!
//! For examples, see the `fact_chart_examples` crate.
pub mod chart;
pub mod error;
pub mod events;
pub mod geometry;
pub mod render;
pub mod scene;
pub mod shapes;
pub mod viewer;

/// Convenient re-exports for common types. Import with `use fact_chart::prelude::*;`.
pub mod prelude {
    pub use crate::chart::{
        build_chart_cells, generate_chart_template, slot_id, CellContent, ChartCell, ChartData,
        ChartEntry, ChartSlot, Element, GridCell, Region, Space,
    };
    pub use crate::error::{Error, Result};
    pub use crate::events::{ChartEvent, EventSink, FnSink, MultiSink, VecSink};
    pub use crate::geometry::{euler_xyz, rotation_between, Color, Transform};
    pub use crate::render::{
        OrbitControls, PerspectiveCamera, Renderer, Thumbnail, ThumbnailCache,
        ThumbnailCompositor, ThumbnailConfig, Viewport,
    };
    pub use crate::scene::{Light, PopulateSummary, Scene, SceneAssembler};
    pub use crate::shapes::{
        FnFactory, LineType, ShapeFactory, ShapeKind, ShapeNode, ShapeOptions, ShapeRegistry,
    };
    pub use crate::viewer::{LoopHandle, ModalViewer, RenderLoop, ViewerConfig, ViewerFrame};
}
