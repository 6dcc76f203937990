//! Software rendering: camera, raster targets, rasterizer, orbit controls and thumbnails.
pub mod camera;
pub mod orbit;
pub mod raster;
pub mod rasterizer;
pub mod thumbnail;

pub use camera::PerspectiveCamera;
pub use orbit::{OrbitControls, Spherical};
pub use raster::{RasterSurface, Viewport};
pub use rasterizer::Renderer;
pub use thumbnail::{Thumbnail, ThumbnailCache, ThumbnailCompositor, ThumbnailConfig};
