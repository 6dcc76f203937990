//! Side-by-side freedom/constraint thumbnails for chart entries.
//!
//! One [`ThumbnailCompositor`] owns two reusable scenes, one camera and one renderer with a
//! double-width surface. Each entry is drawn into the left (freedom) and right (constraint)
//! halves, then encoded as PNG. Entries are processed strictly one after another since the
//! renderer's viewport is shared state.
use std::collections::HashMap;
use std::io::Cursor;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use glam::Vec3;
use image::{ImageFormat, RgbaImage};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::chart::data::ChartEntry;
use crate::error::{Error, Result};
use crate::events::{ChartEvent, EventSink};
use crate::geometry::Color;
use crate::render::camera::PerspectiveCamera;
use crate::render::raster::Viewport;
use crate::render::rasterizer::Renderer;
use crate::scene::{Scene, SceneAssembler};

/// Configuration for thumbnail batches.
#[non_exhaustive]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThumbnailConfig {
    /// Width of one half in pixels; the image is twice as wide.
    pub width: u32,
    pub height: u32,
    /// Clear color of the shared surface.
    pub background: Color,
    pub fov_y_degrees: f32,
    pub camera_position: Vec3,
    pub camera_target: Vec3,
    pub near: f32,
    pub far: f32,
    /// Yield to the scheduler after this many entries; 0 never yields.
    pub yield_every: usize,
}

impl Default for ThumbnailConfig {
    fn default() -> Self {
        Self {
            width: 128,
            height: 128,
            background: Color::WHITE,
            fov_y_degrees: 50.0,
            camera_position: Vec3::new(0.0, 1.0, 4.0),
            camera_target: Vec3::ZERO,
            near: 0.1,
            far: 100.0,
            yield_every: 8,
        }
    }
}

impl ThumbnailConfig {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    pub fn with_background(mut self, background: Color) -> Self {
        self.background = background;
        self
    }

    pub fn with_camera(mut self, position: Vec3, target: Vec3) -> Self {
        self.camera_position = position;
        self.camera_target = target;
        self
    }

    pub fn with_yield_every(mut self, yield_every: usize) -> Self {
        self.yield_every = yield_every;
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
                "thumbnail width and height must be > 0".into(),
            ));
        }
        if self.width.checked_mul(2).is_none() {
            return Err(Error::InvalidConfig("thumbnail width too large".into()));
        }
        if !self.camera().is_valid() {
            return Err(Error::InvalidConfig(
                "thumbnail camera settings cannot project".into(),
            ));
        }
        Ok(())
    }
}

/// A composited thumbnail and its PNG encoding.
#[derive(Clone, Debug)]
pub struct Thumbnail {
    pub entry_id: String,
    pub image: RgbaImage,
    pub png: Vec<u8>,
}

impl Thumbnail {
    /// `data:image/png;base64,...` form of the PNG bytes.
    pub fn data_url(&self) -> String {
        format!("data:image/png;base64,{}", STANDARD.encode(&self.png))
    }
}

/// Session cache of thumbnails keyed by entry id.
#[derive(Clone, Debug, Default)]
pub struct ThumbnailCache {
    thumbnails: HashMap<String, Thumbnail>,
}

impl ThumbnailCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, thumbnail: Thumbnail) {
        self.thumbnails
            .insert(thumbnail.entry_id.clone(), thumbnail);
    }

    pub fn get(&self, id: &str) -> Option<&Thumbnail> {
        self.thumbnails.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.thumbnails.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.thumbnails.len()
    }

    pub fn is_empty(&self) -> bool {
        self.thumbnails.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Thumbnail)> {
        self.thumbnails.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Renders chart entries into cached thumbnails.
pub struct ThumbnailCompositor {
    config: ThumbnailConfig,
    assembler: SceneAssembler,
    freedom: Scene,
    constraint: Scene,
    camera: PerspectiveCamera,
    renderer: Renderer,
}

impl ThumbnailCompositor {
    /// Builds the reusable scenes, camera and renderer.
    ///
    /// Fails with [`Error::InvalidConfig`] or [`Error::RenderContext`] when no surface can be
    /// created for `config`.
    pub fn new(config: ThumbnailConfig, assembler: SceneAssembler) -> Result<Self> {
        config.validate()?;
        let mut renderer = Renderer::new(config.width * 2, config.height)?;
        renderer.set_clear_color(config.background, 1.0);
        Ok(Self {
            camera: config.camera(),
            freedom: Scene::new(None),
            constraint: Scene::new(None),
            renderer,
            assembler,
            config,
        })
    }

    pub fn config(&self) -> &ThumbnailConfig {
        &self.config
    }

    /// Renders one entry. Unknown element types are skipped and reported to `sink`.
    pub fn render_entry(
        &mut self,
        entry: &ChartEntry,
        sink: &mut dyn EventSink,
    ) -> Result<Thumbnail> {
        let (w, h) = (self.config.width, self.config.height);
        self.assembler
            .populate(&mut self.freedom, &entry.freedom_space.elements, sink);
        self.assembler
            .populate(&mut self.constraint, &entry.constraint_space.elements, sink);

        self.renderer.clear();
        self.renderer.set_viewport(Viewport::new(0, 0, w, h))?;
        self.renderer.render(&self.freedom, &self.camera)?;
        self.renderer.set_viewport(Viewport::new(w, 0, w, h))?;
        self.renderer.render(&self.constraint, &self.camera)?;

        let image = self.renderer.image().clone();
        let mut png = Vec::new();
        image.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;
        Ok(Thumbnail {
            entry_id: entry.id.clone(),
            image,
            png,
        })
    }

    /// Renders every entry in order into a fresh cache.
    ///
    /// A failing entry is logged, reported to `sink` and left out of the cache; the batch
    /// always runs to completion.
    pub fn generate(&mut self, entries: &[ChartEntry], sink: &mut dyn EventSink) -> ThumbnailCache {
        let mut cache = ThumbnailCache::new();
        self.generate_into(entries, &mut cache, sink);
        cache
    }

    /// Like [`generate`](Self::generate), adding to an existing cache.
    pub fn generate_into(
        &mut self,
        entries: &[ChartEntry],
        cache: &mut ThumbnailCache,
        sink: &mut dyn EventSink,
    ) {
        info!(entries = entries.len(), "generating thumbnails");
        sink.send(ChartEvent::BatchStarted {
            entry_count: entries.len(),
        });

        let (mut rendered, mut failed) = (0usize, 0usize);
        for (index, entry) in entries.iter().enumerate() {
            match self.render_entry(entry, sink) {
                Ok(thumbnail) => {
                    cache.insert(thumbnail);
                    rendered += 1;
                    sink.send(ChartEvent::EntryRendered {
                        index,
                        id: entry.id.clone(),
                    });
                }
                Err(err) => {
                    warn!(id = %entry.id, "thumbnail failed: {err}");
                    failed += 1;
                    sink.send(ChartEvent::EntryFailed {
                        id: entry.id.clone(),
                        message: err.to_string(),
                    });
                }
            }

            let processed = index + 1;
            if self.config.yield_every > 0
                && processed % self.config.yield_every == 0
                && processed < entries.len()
            {
                sink.send(ChartEvent::BatchYielded { processed });
                std::thread::yield_now();
            }
        }

        info!(rendered, failed, "thumbnails done");
        sink.send(ChartEvent::BatchFinished { rendered, failed });
    }
}
