//! CPU rasterizer for scenes of segments, polylines and triangle meshes.
//!
//! Drawing happens in two passes over the current viewport: opaque primitives first with
//! depth writes, then translucent meshes back to front with depth testing only. Strokes are
//! unlit; meshes are lit two-sided by the scene's ambient and directional lights.
use glam::{Mat4, Vec3, Vec4};
use image::RgbaImage;
use tracing::trace;

use crate::error::{Error, Result};
use crate::geometry::Color;
use crate::render::camera::PerspectiveCamera;
use crate::render::raster::{RasterSurface, Viewport};
use crate::scene::{Light, Scene};
use crate::shapes::{Mesh, Primitive, StrokeStyle};

/// Strokes thinner than this (in pixels) are widened so they stay visible.
const MIN_STROKE_RADIUS_PX: f32 = 0.6;

/// Screen-space step between stroke stamps, in pixels.
const STROKE_STEP_PX: f32 = 0.5;

/// Per-frame view data shared by every primitive.
struct Frame {
    view: Mat4,
    view_proj: Mat4,
    viewport: Viewport,
    focal_px: f32,
    near: f32,
    ambient: Color,
    directional: Vec<(Vec3, Color)>,
}

impl Frame {
    fn new(camera: &PerspectiveCamera, viewport: Viewport, lights: &[Light]) -> Self {
        let mut ambient = Color::BLACK;
        let mut directional = Vec::new();
        for light in lights {
            match *light {
                Light::Ambient { color, intensity } => {
                    ambient = add(ambient, color.scale(intensity));
                }
                Light::Directional {
                    color,
                    intensity,
                    position,
                } => {
                    if let Some(dir) = position.try_normalize() {
                        directional.push((dir, color.scale(intensity)));
                    }
                }
            }
        }
        Self {
            view: camera.view(),
            view_proj: camera.view_projection(),
            viewport,
            focal_px: camera.focal_length_px(viewport.height as f32),
            near: camera.near,
            ambient,
            directional,
        }
    }

    /// Pixel position and depth in `[0, 1]` of a clip-space point.
    fn to_screen(&self, clip: Vec4) -> (f32, f32, f32) {
        let ndc = clip.truncate() / clip.w;
        let vp = self.viewport;
        let x = vp.x as f32 + (ndc.x * 0.5 + 0.5) * vp.width as f32;
        let y = vp.y as f32 + (0.5 - ndc.y * 0.5) * vp.height as f32;
        (x, y, ndc.z * 0.5 + 0.5)
    }

    /// Distance in front of the camera of a world point.
    fn view_depth(&self, p: Vec3) -> f32 {
        -self.view.transform_point3(p).z
    }

    fn shade_face(&self, normal: Vec3, base: Color) -> Color {
        let mut light = self.ambient;
        for (dir, color) in &self.directional {
            light = add(light, color.scale(normal.dot(*dir).abs()));
        }
        Color::new(base.r * light.r, base.g * light.g, base.b * light.b)
    }
}

fn add(a: Color, b: Color) -> Color {
    Color::new(a.r + b.r, a.g + b.g, a.b + b.b)
}

/// A translucent mesh waiting for the second pass.
struct Deferred<'a> {
    world: Mat4,
    mesh: &'a Mesh,
    depth: f32,
}

/// Software renderer with a reusable surface and a mutable viewport.
pub struct Renderer {
    surface: RasterSurface,
    viewport: Viewport,
    clear_color: Color,
    clear_alpha: f32,
}

impl Renderer {
    /// Creates a renderer with a `width`×`height` surface and a full-surface viewport.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        Ok(Self {
            surface: RasterSurface::new(width, height)?,
            viewport: Viewport::full(width, height),
            clear_color: Color::WHITE,
            clear_alpha: 1.0,
        })
    }

    pub fn width(&self) -> u32 {
        self.surface.width()
    }

    pub fn height(&self) -> u32 {
        self.surface.height()
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn set_clear_color(&mut self, color: Color, alpha: f32) {
        self.clear_color = color;
        self.clear_alpha = alpha.clamp(0.0, 1.0);
    }

    /// Restricts subsequent clears of the viewport and renders to `viewport`.
    pub fn set_viewport(&mut self, viewport: Viewport) -> Result<()> {
        if viewport.is_empty() || !viewport.fits(self.width(), self.height()) {
            return Err(Error::RenderContext(format!(
                "viewport {viewport:?} does not fit a {}x{} surface",
                self.width(),
                self.height()
            )));
        }
        self.viewport = viewport;
        Ok(())
    }

    /// Clears the whole surface to the clear color.
    pub fn clear(&mut self) {
        let full = Viewport::full(self.width(), self.height());
        self.surface.clear(full, self.clear_color, self.clear_alpha);
    }

    /// Draws `scene` into the current viewport. Nothing outside the viewport is touched.
    pub fn render(&mut self, scene: &Scene, camera: &PerspectiveCamera) -> Result<()> {
        if !camera.is_valid() {
            return Err(Error::RenderContext(format!(
                "camera cannot project: {camera:?}"
            )));
        }
        let viewport = self.viewport;
        if let Some(background) = scene.background {
            self.surface.clear(viewport, background, 1.0);
        } else {
            self.surface
                .clear(viewport, self.clear_color, self.clear_alpha);
        }

        let frame = Frame::new(camera, viewport, scene.lights());
        let mut deferred = Vec::new();
        let mut drawn = 0usize;
        for node in scene.nodes() {
            node.visit(Mat4::IDENTITY, &mut |world, primitive| {
                drawn += 1;
                match primitive {
                    Primitive::Segment(s) => self.stroke(
                        &frame,
                        world.transform_point3(s.start),
                        world.transform_point3(s.end),
                        0.0,
                        s.color,
                        s.radius,
                        s.style,
                    ),
                    Primitive::Polyline(line) => {
                        let mut arc = 0.0;
                        for (a, b) in line.edges() {
                            let (a, b) = (world.transform_point3(a), world.transform_point3(b));
                            self.stroke(&frame, a, b, arc, line.color, line.radius, line.style);
                            arc += a.distance(b);
                        }
                    }
                    Primitive::Mesh(mesh) if mesh.is_translucent() => {
                        let depth = centroid(mesh)
                            .map(|c| frame.view_depth(world.transform_point3(c)))
                            .unwrap_or(0.0);
                        deferred.push(Deferred { world, mesh, depth });
                    }
                    Primitive::Mesh(mesh) => self.fill(&frame, world, mesh, false),
                }
            });
        }

        deferred.sort_by(|a, b| b.depth.total_cmp(&a.depth));
        for item in &deferred {
            self.fill(&frame, item.world, item.mesh, true);
        }
        trace!(primitives = drawn, translucent = deferred.len(), ?viewport, "rendered scene");
        Ok(())
    }

    /// Draws a thick segment as a run of depth-tested discs.
    #[allow(clippy::too_many_arguments)]
    fn stroke(
        &mut self,
        frame: &Frame,
        a: Vec3,
        b: Vec3,
        arc_offset: f32,
        color: Color,
        radius: f32,
        style: StrokeStyle,
    ) {
        let Some((a, b, t0, t1)) = clip_near(frame, a, b) else {
            return;
        };
        let length = a.distance(b);
        let ca = frame.view_proj * a.extend(1.0);
        let cb = frame.view_proj * b.extend(1.0);
        let (ax, ay, az) = frame.to_screen(ca);
        let (bx, by, bz) = frame.to_screen(cb);
        let span = ((bx - ax).powi(2) + (by - ay).powi(2)).sqrt();
        let steps = (span / STROKE_STEP_PX).ceil().max(1.0) as usize;
        let seg_length = length / (t1 - t0).max(f32::EPSILON);

        for k in 0..=steps {
            let t = k as f32 / steps as f32;
            // Perspective-correct parameter along the world segment.
            let tw = (t / cb.w) / ((1.0 - t) / ca.w + t / cb.w);
            let arc = arc_offset + seg_length * (t0 + (t1 - t0) * tw);
            if !style.is_visible_at(arc) {
                continue;
            }
            let x = ax + (bx - ax) * t;
            let y = ay + (by - ay) * t;
            let z = az + (bz - az) * t;
            let w = ca.w + (cb.w - ca.w) * tw;
            let r = (radius * frame.focal_px / w.max(frame.near)).max(MIN_STROKE_RADIUS_PX);
            self.stamp(frame.viewport, x, y, z, r, color);
        }
    }

    fn stamp(&mut self, vp: Viewport, cx: f32, cy: f32, depth: f32, r: f32, color: Color) {
        let x0 = (cx - r).floor().max(vp.x as f32) as u32;
        let y0 = (cy - r).floor().max(vp.y as f32) as u32;
        let x1 = (cx + r).ceil().min((vp.x + vp.width) as f32);
        let y1 = (cy + r).ceil().min((vp.y + vp.height) as f32);
        if x1 <= x0 as f32 || y1 <= y0 as f32 {
            return;
        }
        let (x1, y1) = (x1 as u32, y1 as u32);
        let r2 = r * r;
        for y in y0..y1 {
            for x in x0..x1 {
                let dx = x as f32 + 0.5 - cx;
                let dy = y as f32 + 0.5 - cy;
                if dx * dx + dy * dy <= r2 {
                    self.surface.shade(x, y, depth, color, 1.0, true);
                }
            }
        }
    }

    /// Rasterizes every triangle of `mesh`; triangles crossing the near plane are dropped.
    fn fill(&mut self, frame: &Frame, world: Mat4, mesh: &Mesh, translucent: bool) {
        let world_vertices: Vec<Vec3> = mesh
            .vertices
            .iter()
            .map(|v| world.transform_point3(*v))
            .collect();
        let clip: Vec<Vec4> = world_vertices
            .iter()
            .map(|v| frame.view_proj * v.extend(1.0))
            .collect();
        let alpha = if translucent { mesh.opacity } else { 1.0 };

        for tri in &mesh.triangles {
            let idx = tri.map(|i| i as usize);
            if idx.iter().any(|&i| i >= clip.len() || clip[i].w < frame.near) {
                continue;
            }
            let [p0, p1, p2] = idx.map(|i| world_vertices[i]);
            let Some(normal) = (p1 - p0).cross(p2 - p0).try_normalize() else {
                continue;
            };
            let color = frame.shade_face(normal, mesh.color);
            let s = idx.map(|i| frame.to_screen(clip[i]));
            self.triangle(frame.viewport, s, color, alpha, !translucent);
        }
    }

    fn triangle(
        &mut self,
        vp: Viewport,
        s: [(f32, f32, f32); 3],
        color: Color,
        alpha: f32,
        write_depth: bool,
    ) {
        let edge = |a: (f32, f32, f32), b: (f32, f32, f32), x: f32, y: f32| {
            (b.0 - a.0) * (y - a.1) - (b.1 - a.1) * (x - a.0)
        };
        let area = edge(s[0], s[1], s[2].0, s[2].1);
        if area.abs() < f32::EPSILON {
            return;
        }

        let min_x = s.iter().map(|p| p.0).fold(f32::INFINITY, f32::min);
        let max_x = s.iter().map(|p| p.0).fold(f32::NEG_INFINITY, f32::max);
        let min_y = s.iter().map(|p| p.1).fold(f32::INFINITY, f32::min);
        let max_y = s.iter().map(|p| p.1).fold(f32::NEG_INFINITY, f32::max);
        let x0 = min_x.floor().max(vp.x as f32);
        let y0 = min_y.floor().max(vp.y as f32);
        let x1 = max_x.ceil().min((vp.x + vp.width) as f32);
        let y1 = max_y.ceil().min((vp.y + vp.height) as f32);
        if x1 <= x0 || y1 <= y0 {
            return;
        }

        for y in y0 as u32..y1 as u32 {
            for x in x0 as u32..x1 as u32 {
                let (px, py) = (x as f32 + 0.5, y as f32 + 0.5);
                let w0 = edge(s[1], s[2], px, py) / area;
                let w1 = edge(s[2], s[0], px, py) / area;
                let w2 = edge(s[0], s[1], px, py) / area;
                if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
                    continue;
                }
                let depth = w0 * s[0].2 + w1 * s[1].2 + w2 * s[2].2;
                self.surface.shade(x, y, depth, color, alpha, write_depth);
            }
        }
    }

    pub fn surface(&self) -> &RasterSurface {
        &self.surface
    }

    pub fn image(&self) -> &RgbaImage {
        self.surface.image()
    }
}

fn centroid(mesh: &Mesh) -> Option<Vec3> {
    if mesh.vertices.is_empty() {
        return None;
    }
    Some(mesh.vertices.iter().copied().sum::<Vec3>() / mesh.vertices.len() as f32)
}

/// Clips a world segment against the near plane.
///
/// Returns the visible part and its parameter range on the original segment.
fn clip_near(frame: &Frame, a: Vec3, b: Vec3) -> Option<(Vec3, Vec3, f32, f32)> {
    let da = frame.view_depth(a) - frame.near;
    let db = frame.view_depth(b) - frame.near;
    match (da >= 0.0, db >= 0.0) {
        (true, true) => Some((a, b, 0.0, 1.0)),
        (false, false) => None,
        (true, false) => {
            let t = da / (da - db);
            Some((a, a.lerp(b, t), 0.0, t))
        }
        (false, true) => {
            let t = da / (da - db);
            Some((a.lerp(b, t), b, t, 1.0))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shapes::{Segment, ShapeNode};

    fn camera() -> PerspectiveCamera {
        PerspectiveCamera::default()
            .with_position(Vec3::new(0.0, 0.0, 4.0))
            .look_at(Vec3::ZERO)
    }

    fn count_dark(image: &RgbaImage, x_range: std::ops::Range<u32>) -> usize {
        image
            .enumerate_pixels()
            .filter(|(x, _, p)| x_range.contains(x) && p.0[0] < 128)
            .count()
    }

    fn line_scene(radius: f32) -> Scene {
        let mut node = ShapeNode::new("line");
        node.push(Segment::new(
            Vec3::new(-1.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Color::BLACK,
            radius,
        ));
        let mut scene = Scene::new(None);
        scene.add(node);
        scene
    }

    #[test]
    fn zero_sized_renderer_fails() {
        assert!(matches!(Renderer::new(0, 0), Err(Error::RenderContext(_))));
    }

    #[test]
    fn viewport_outside_surface_is_rejected() {
        let mut renderer = Renderer::new(64, 32).unwrap();
        assert!(renderer.set_viewport(Viewport::new(32, 0, 64, 32)).is_err());
        assert!(renderer.set_viewport(Viewport::new(32, 0, 32, 32)).is_ok());
    }

    #[test]
    fn line_is_drawn_through_the_center() {
        let mut renderer = Renderer::new(64, 64).unwrap();
        renderer.clear();
        renderer.render(&line_scene(0.02), &camera()).unwrap();
        let center = renderer.image().get_pixel(32, 32).0;
        assert_eq!(&center[..3], &[0, 0, 0]);
        let corner = renderer.image().get_pixel(2, 2).0;
        assert_eq!(corner, [255, 255, 255, 255]);
    }

    #[test]
    fn rendering_respects_the_viewport() {
        let mut renderer = Renderer::new(128, 64).unwrap();
        renderer.clear();
        renderer.set_viewport(Viewport::new(64, 0, 64, 64)).unwrap();
        renderer.render(&line_scene(0.02), &camera()).unwrap();
        assert_eq!(count_dark(renderer.image(), 0..64), 0);
        assert!(count_dark(renderer.image(), 64..128) > 0);
    }

    #[test]
    fn dashed_strokes_leave_gaps() {
        let mut solid = Renderer::new(64, 64).unwrap();
        solid.clear();
        solid.render(&line_scene(0.02), &camera()).unwrap();

        let mut scene = Scene::new(None);
        let mut node = ShapeNode::new("dashed");
        node.push(
            Segment::new(
                Vec3::new(-1.0, 0.0, 0.0),
                Vec3::new(1.0, 0.0, 0.0),
                Color::BLACK,
                0.02,
            )
            .with_style(StrokeStyle::Dashed {
                dash: 0.1,
                gap: 0.1,
            }),
        );
        scene.add(node);
        let mut dashed = Renderer::new(64, 64).unwrap();
        dashed.clear();
        dashed.render(&scene, &camera()).unwrap();

        let solid_px = count_dark(solid.image(), 0..64);
        let dashed_px = count_dark(dashed.image(), 0..64);
        assert!(dashed_px > 0 && dashed_px < solid_px);
    }

    #[test]
    fn opaque_mesh_hides_strokes_behind_it() {
        let mut scene = line_scene(0.02);
        let mut wall = ShapeNode::new("wall");
        wall.push(Mesh::new(
            vec![
                Vec3::new(-2.0, -2.0, 1.0),
                Vec3::new(2.0, -2.0, 1.0),
                Vec3::new(2.0, 2.0, 1.0),
                Vec3::new(-2.0, 2.0, 1.0),
            ],
            vec![[0, 1, 2], [0, 2, 3]],
            Color::WHITE,
            1.0,
        ));
        scene.add(wall);
        let mut renderer = Renderer::new(64, 64).unwrap();
        renderer.set_clear_color(Color::from_hex(0x808080), 1.0);
        renderer.clear();
        renderer.render(&scene, &camera()).unwrap();
        assert_eq!(count_dark(renderer.image(), 0..64), 0);
    }

    #[test]
    fn scene_background_fills_the_viewport() {
        let mut renderer = Renderer::new(8, 8).unwrap();
        let scene = Scene::new(Some(Color::from_hex(0xddeeff)));
        renderer.render(&scene, &camera()).unwrap();
        assert_eq!(renderer.image().get_pixel(4, 4).0, [0xdd, 0xee, 0xff, 255]);
    }

    #[test]
    fn segments_behind_the_camera_are_clipped() {
        let mut scene = Scene::new(None);
        let mut node = ShapeNode::new("through");
        node.push(Segment::new(
            Vec3::new(0.0, 0.0, -1.0),
            Vec3::new(0.0, 0.0, 10.0),
            Color::BLACK,
            0.02,
        ));
        scene.add(node);
        let mut renderer = Renderer::new(32, 32).unwrap();
        renderer.clear();
        assert!(renderer.render(&scene, &camera()).is_ok());
    }
}
