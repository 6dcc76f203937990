//! Headless model of the interactive dual viewer.
//!
//! The viewer owns two scenes and two renderers that share one camera, driven by
//! [`OrbitControls`]. A presentation layer calls [`ModalViewer::show`] when an entry is
//! opened, [`ModalViewer::frame`] once per display refresh, and [`ModalViewer::hide`] when the
//! viewer is closed. Frames are only produced while the render loop runs.
use glam::Vec3;
use image::RgbaImage;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::chart::data::ChartEntry;
use crate::error::{Error, Result};
use crate::events::EventSink;
use crate::geometry::Color;
use crate::render::{OrbitControls, PerspectiveCamera, Renderer, Viewport};
use crate::scene::{PopulateSummary, Scene, SceneAssembler};

/// Configuration for [`ModalViewer`].
#[non_exhaustive]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Size of each of the two canvases.
    pub width: u32,
    pub height: u32,
    pub background: Color,
    pub fov_y_degrees: f32,
    pub camera_position: Vec3,
    pub camera_target: Vec3,
    pub near: f32,
    pub far: f32,
    pub enable_damping: bool,
    pub damping_factor: f32,
    pub min_distance: f32,
    pub max_distance: f32,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            width: 512,
            height: 512,
            background: Color::from_hex(0xddeeff),
            fov_y_degrees: 50.0,
            camera_position: Vec3::new(0.0, 1.5, 5.0),
            camera_target: Vec3::ZERO,
            near: 0.1,
            far: 100.0,
            enable_damping: true,
            damping_factor: OrbitControls::DEFAULT_DAMPING_FACTOR,
            min_distance: 0.5,
            max_distance: 50.0,
        }
    }
}

impl ViewerConfig {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    pub fn with_damping(mut self, enable: bool) -> Self {
        self.enable_damping = enable;
        self
    }

    pub fn camera(&self) -> PerspectiveCamera {
        let aspect = Viewport::full(self.width, self.height).aspect();
        PerspectiveCamera::new(self.fov_y_degrees, aspect, self.near, self.far)
            .with_position(self.camera_position)
            .look_at(self.camera_target)
    }

    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(Error::InvalidConfig(
                "viewer width and height must be > 0".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.damping_factor) {
            return Err(Error::InvalidConfig(
                "damping_factor must be within [0, 1]".into(),
            ));
        }
        if self.min_distance < 0.0 || self.max_distance < self.min_distance {
            return Err(Error::InvalidConfig(
                "zoom limits must satisfy 0 <= min_distance <= max_distance".into(),
            ));
        }
        if !self.camera().is_valid() {
            return Err(Error::InvalidConfig(
                "viewer camera settings cannot project".into(),
            ));
        }
        Ok(())
    }
}

/// Identifies one run of the render loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LoopHandle(u64);

/// Start/stop state of the per-frame loop.
///
/// Every start gets a new generation, so a handle from an earlier run never matches the
/// current one.
#[derive(Clone, Debug, Default)]
pub struct RenderLoop {
    generation: u64,
    running: bool,
}

impl RenderLoop {
    /// Stops any current run and starts a new one.
    pub fn start(&mut self) -> LoopHandle {
        self.stop();
        self.generation += 1;
        self.running = true;
        LoopHandle(self.generation)
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Whether `handle` belongs to the run in progress.
    pub fn is_current(&self, handle: LoopHandle) -> bool {
        self.running && handle.0 == self.generation
    }
}

/// The two canvases of one rendered frame.
#[derive(Debug)]
pub struct ViewerFrame<'a> {
    pub handle: LoopHandle,
    pub freedom: &'a RgbaImage,
    pub constraint: &'a RgbaImage,
}

pub struct ModalViewer {
    config: ViewerConfig,
    assembler: SceneAssembler,
    freedom: Scene,
    constraint: Scene,
    freedom_renderer: Renderer,
    constraint_renderer: Renderer,
    camera: PerspectiveCamera,
    controls: OrbitControls,
    render_loop: RenderLoop,
    entry_id: Option<String>,
}

impl ModalViewer {
    /// One-time construction of scenes, renderers, camera and controls. The viewer starts
    /// hidden.
    pub fn init(config: ViewerConfig, assembler: SceneAssembler) -> Result<Self> {
        config.validate()?;
        let camera = config.camera();
        let mut controls = OrbitControls::new(&camera)
            .with_distance_limits(config.min_distance, config.max_distance);
        if config.enable_damping {
            controls = controls.with_damping(config.damping_factor);
        }
        Ok(Self {
            freedom: Scene::new(Some(config.background)),
            constraint: Scene::new(Some(config.background)),
            freedom_renderer: Renderer::new(config.width, config.height)?,
            constraint_renderer: Renderer::new(config.width, config.height)?,
            camera,
            controls,
            render_loop: RenderLoop::default(),
            entry_id: None,
            assembler,
            config,
        })
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    /// Repopulates both scenes from `entry` and (re)starts the render loop.
    pub fn show(
        &mut self,
        entry: &ChartEntry,
        sink: &mut dyn EventSink,
    ) -> (LoopHandle, [PopulateSummary; 2]) {
        let freedom = self
            .assembler
            .populate(&mut self.freedom, &entry.freedom_space.elements, sink);
        let constraint = self.assembler.populate(
            &mut self.constraint,
            &entry.constraint_space.elements,
            sink,
        );
        self.entry_id = Some(entry.id.clone());
        let handle = self.render_loop.start();
        debug!(id = %entry.id, ?handle, "viewer shown");
        (handle, [freedom, constraint])
    }

    /// Stops the render loop. Scenes keep their contents until the next `show`.
    pub fn hide(&mut self) {
        if self.render_loop.is_running() {
            debug!(id = self.entry_id.as_deref().unwrap_or("?"), "viewer hidden");
        }
        self.render_loop.stop();
    }

    pub fn is_visible(&self) -> bool {
        self.render_loop.is_running()
    }

    /// Id of the entry shown last.
    pub fn entry_id(&self) -> Option<&str> {
        self.entry_id.as_deref()
    }

    /// Input target for the shared camera.
    pub fn controls_mut(&mut self) -> &mut OrbitControls {
        &mut self.controls
    }

    pub fn camera(&self) -> &PerspectiveCamera {
        &self.camera
    }

    /// Advances the controls and renders both canvases. Returns `None` while hidden.
    pub fn frame(&mut self) -> Result<Option<ViewerFrame<'_>>> {
        if !self.render_loop.is_running() {
            return Ok(None);
        }
        self.controls.update(&mut self.camera);
        self.freedom_renderer.render(&self.freedom, &self.camera)?;
        self.constraint_renderer
            .render(&self.constraint, &self.camera)?;
        Ok(Some(ViewerFrame {
            handle: LoopHandle(self.render_loop.generation),
            freedom: self.freedom_renderer.image(),
            constraint: self.constraint_renderer.image(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::chart::data::{Element, Space};

    fn viewer() -> ModalViewer {
        ModalViewer::init(ViewerConfig::new(48, 48), SceneAssembler::default()).unwrap()
    }

    fn entry() -> ChartEntry {
        ChartEntry::new(
            1,
            1,
            Space::new(vec![Element::new("line")
                .with_option("start", json!([-1, 0, 0]))
                .with_option("end", json!([1, 0, 0]))]),
            Space::new(vec![Element::new("hoop"), Element::new("doesNotExist")]),
        )
    }

    #[test]
    fn hidden_viewer_produces_no_frames() {
        let mut v = viewer();
        assert!(!v.is_visible());
        assert!(v.frame().unwrap().is_none());
    }

    #[test]
    fn show_renders_both_canvases_until_hidden() {
        let mut v = viewer();
        let (handle, [freedom, constraint]) = v.show(&entry(), &mut ());
        assert_eq!(freedom.added, 1);
        assert_eq!(constraint.added, 1);
        assert_eq!(constraint.skipped, 1);

        let frame = v.frame().unwrap().unwrap();
        assert_eq!(frame.handle, handle);
        assert_eq!(frame.freedom.dimensions(), (48, 48));
        assert_eq!(frame.constraint.get_pixel(0, 0).0, [0xdd, 0xee, 0xff, 255]);

        v.hide();
        assert!(v.frame().unwrap().is_none());
        assert_eq!(v.entry_id(), Some("1-DOF-1"));
    }

    #[test]
    fn show_again_restarts_the_loop() {
        let mut v = viewer();
        let (first, _) = v.show(&entry(), &mut ());
        let (second, _) = v.show(&entry(), &mut ());
        assert_ne!(first, second);
        assert!(v.render_loop.is_current(second));
        assert!(!v.render_loop.is_current(first));
    }

    #[test]
    fn render_loop_stop_then_start() {
        let mut lp = RenderLoop::default();
        let a = lp.start();
        lp.stop();
        assert!(!lp.is_current(a));
        let b = lp.start();
        assert!(lp.is_current(b) && lp.is_running());
    }

    #[test]
    fn controls_move_the_shared_camera() {
        let mut v = ModalViewer::init(
            ViewerConfig::new(16, 16).with_damping(false),
            SceneAssembler::default(),
        )
        .unwrap();
        v.show(&entry(), &mut ());
        let before = v.camera().position;
        v.controls_mut().rotate(0.5, 0.0);
        v.frame().unwrap();
        assert!(v.camera().position.distance(before) > 0.1);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mut config = ViewerConfig::default();
        config.damping_factor = 2.0;
        assert!(matches!(
            ModalViewer::init(config, SceneAssembler::default()),
            Err(Error::InvalidConfig(_))
        ));
    }
}
