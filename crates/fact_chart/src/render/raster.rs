//! Color and depth targets for the software renderer.
use image::{Rgba, RgbaImage};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::geometry::Color;

/// A pixel rectangle with its origin at the top-left corner of the surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Viewport {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// The whole of a `width`×`height` surface.
    pub const fn full(width: u32, height: u32) -> Self {
        Self::new(0, 0, width, height)
    }

    pub fn aspect(&self) -> f32 {
        if self.height == 0 {
            1.0
        } else {
            self.width as f32 / self.height as f32
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Whether the rectangle lies within a `width`×`height` surface.
    pub fn fits(&self, width: u32, height: u32) -> bool {
        self.x.checked_add(self.width).is_some_and(|r| r <= width)
            && self.y.checked_add(self.height).is_some_and(|b| b <= height)
    }

    pub fn overlaps(&self, other: &Viewport) -> bool {
        self.x < other.x + other.width
            && other.x < self.x + self.width
            && self.y < other.y + other.height
            && other.y < self.y + self.height
    }
}

/// An RGBA color buffer paired with a depth buffer.
///
/// Depth values are normalized device depths mapped to `[0, 1]`; smaller is closer.
#[derive(Clone, Debug)]
pub struct RasterSurface {
    color: RgbaImage,
    depth: Vec<f32>,
}

impl RasterSurface {
    pub fn new(width: u32, height: u32) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::RenderContext(format!(
                "surface size must be non-zero, got {width}x{height}"
            )));
        }
        let len = (width as usize)
            .checked_mul(height as usize)
            .ok_or_else(|| Error::RenderContext("surface too large".to_string()))?;
        Ok(Self {
            color: RgbaImage::new(width, height),
            depth: vec![f32::INFINITY; len],
        })
    }

    pub fn width(&self) -> u32 {
        self.color.width()
    }

    pub fn height(&self) -> u32 {
        self.color.height()
    }

    /// Fills `viewport` with `color` and resets its depth.
    pub fn clear(&mut self, viewport: Viewport, color: Color, alpha: f32) {
        let px = Rgba(color.to_rgba8(alpha));
        let width = self.width();
        for y in viewport.y..(viewport.y + viewport.height).min(self.height()) {
            for x in viewport.x..(viewport.x + viewport.width).min(width) {
                self.color.put_pixel(x, y, px);
                self.depth[(y * width + x) as usize] = f32::INFINITY;
            }
        }
    }

    pub fn depth_at(&self, x: u32, y: u32) -> Option<f32> {
        if x >= self.width() || y >= self.height() {
            return None;
        }
        Some(self.depth[(y * self.width() + x) as usize])
    }

    /// Depth-tests and blends one fragment. Returns whether it was drawn.
    pub fn shade(
        &mut self,
        x: u32,
        y: u32,
        depth: f32,
        color: Color,
        alpha: f32,
        write_depth: bool,
    ) -> bool {
        if x >= self.width() || y >= self.height() || !(0.0..=1.0).contains(&depth) {
            return false;
        }
        let idx = (y * self.width() + x) as usize;
        if depth >= self.depth[idx] {
            return false;
        }
        if write_depth {
            self.depth[idx] = depth;
        }

        let a = alpha.clamp(0.0, 1.0);
        let src = color.to_rgba8(1.0);
        let dst = self.color.get_pixel_mut(x, y);
        if a >= 1.0 {
            *dst = Rgba([src[0], src[1], src[2], 255]);
            return true;
        }
        let blend = |s: u8, d: u8| (s as f32 * a + d as f32 * (1.0 - a)).round() as u8;
        let out_alpha = a + dst[3] as f32 / 255.0 * (1.0 - a);
        *dst = Rgba([
            blend(src[0], dst[0]),
            blend(src[1], dst[1]),
            blend(src[2], dst[2]),
            (out_alpha * 255.0).round().clamp(0.0, 255.0) as u8,
        ]);
        true
    }

    pub fn image(&self) -> &RgbaImage {
        &self.color
    }

    pub fn into_image(self) -> RgbaImage {
        self.color
    }
}
