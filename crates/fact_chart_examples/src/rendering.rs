use std::path::{Path, PathBuf};

use anyhow::Context;
use fact_chart::prelude::{CellContent, ChartCell, ChartData, ThumbnailCache};
use image::{Rgba, RgbaImage};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Installs a `fmt` subscriber honoring `RUST_LOG`, defaulting to `info`.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Loads the bundled chart data, or the file given as the first CLI argument.
pub fn load_chart_data() -> anyhow::Result<ChartData> {
    let path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| Path::new(env!("CARGO_MANIFEST_DIR")).join("assets/fact-data.json"));
    let data = ChartData::load(&path)
        .with_context(|| format!("loading chart data from {}", path.display()))?;
    info!(
        entries = data.len(),
        rejected = data.rejected().len(),
        dropped_elements = data.dropped_elements().len(),
        "chart data loaded"
    );
    Ok(data)
}

pub fn write_png(image: &RgbaImage, path: impl AsRef<Path>) -> anyhow::Result<()> {
    let path = path.as_ref();
    image
        .save(path)
        .with_context(|| format!("writing {}", path.display()))?;
    info!("wrote {}", path.display());
    Ok(())
}

/// Colors used by [`compose_chart_sheet`].
#[derive(Clone, Copy, Debug)]
pub struct SheetStyle {
    pub background: [u8; 3],
    pub placeholder: [u8; 3],
    pub parallel_placeholder: [u8; 3],
    pub border: [u8; 3],
    pub gap: u32,
}

impl Default for SheetStyle {
    fn default() -> Self {
        Self {
            background: [245, 245, 245],
            placeholder: [210, 210, 210],
            parallel_placeholder: [200, 214, 230],
            border: [120, 120, 120],
            gap: 4,
        }
    }
}

fn rgba([r, g, b]: [u8; 3]) -> Rgba<u8> {
    Rgba([r, g, b, 255])
}

fn fill_rect(target: &mut RgbaImage, x0: u32, y0: u32, w: u32, h: u32, color: Rgba<u8>) {
    for y in y0..(y0 + h).min(target.height()) {
        for x in x0..(x0 + w).min(target.width()) {
            target.put_pixel(x, y, color);
        }
    }
}

fn blit(target: &mut RgbaImage, source: &RgbaImage, x0: u32, y0: u32) {
    for (x, y, px) in source.enumerate_pixels() {
        let (tx, ty) = (x0 + x, y0 + y);
        if tx < target.width() && ty < target.height() {
            target.put_pixel(tx, ty, *px);
        }
    }
}

/// Lays `images` out left to right in rows of `columns`. Every tile gets the size of the
/// largest image.
pub fn compose_grid(images: &[RgbaImage], columns: u32, gap: u32, background: [u8; 3]) -> RgbaImage {
    let columns = columns.max(1);
    let tile_w = images.iter().map(|i| i.width()).max().unwrap_or(1);
    let tile_h = images.iter().map(|i| i.height()).max().unwrap_or(1);
    let rows = (images.len() as u32).div_ceil(columns).max(1);
    let mut sheet = RgbaImage::from_pixel(
        columns * (tile_w + gap) + gap,
        rows * (tile_h + gap) + gap,
        rgba(background),
    );
    for (i, image) in images.iter().enumerate() {
        let (col, row) = (i as u32 % columns, i as u32 / columns);
        blit(&mut sheet, image, gap + col * (tile_w + gap), gap + row * (tile_h + gap));
    }
    sheet
}

/// Renders the chart as a sheet: populated cells show their thumbnail, empty cells a filled
/// placeholder tile. Cell positions follow [`ChartCell::grid`].
pub fn compose_chart_sheet(
    cells: &[ChartCell],
    thumbnails: &ThumbnailCache,
    cell_size: (u32, u32),
    style: &SheetStyle,
) -> RgbaImage {
    let (cw, ch) = cell_size;
    let gap = style.gap;
    let min_col = cells.iter().map(|c| c.grid.column).min().unwrap_or(0);
    let max_col = cells.iter().map(|c| c.grid.column).max().unwrap_or(0);
    let min_row = cells.iter().map(|c| c.grid.row).min().unwrap_or(0);
    let max_row = cells.iter().map(|c| c.grid.row).max().unwrap_or(0);
    let columns = max_col - min_col + 1;
    let rows = max_row - min_row + 1;

    let mut sheet = RgbaImage::from_pixel(
        columns * (cw + gap) + gap,
        rows * (ch + gap) + gap,
        rgba(style.background),
    );
    for cell in cells {
        let x = gap + (cell.grid.column - min_col) * (cw + gap);
        let y = gap + (cell.grid.row - min_row) * (ch + gap);
        fill_rect(&mut sheet, x, y, cw, ch, rgba(style.border));
        let thumbnail = match &cell.content {
            CellContent::Populated { entry_id, .. } => thumbnails.get(entry_id),
            CellContent::Placeholder { .. } => None,
        };
        match thumbnail {
            Some(t) => {
                let scaled = image::imageops::resize(
                    &t.image,
                    cw.saturating_sub(2).max(1),
                    ch.saturating_sub(2).max(1),
                    image::imageops::FilterType::Triangle,
                );
                blit(&mut sheet, &scaled, x + 1, y + 1);
            }
            None => {
                let fill = if cell.is_parallel {
                    style.parallel_placeholder
                } else {
                    style.placeholder
                };
                fill_rect(
                    &mut sheet,
                    x + 1,
                    y + 1,
                    cw.saturating_sub(2),
                    ch.saturating_sub(2),
                    rgba(fill),
                );
            }
        }
    }
    sheet
}
