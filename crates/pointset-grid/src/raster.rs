//! Grayscale raster export for two-dimensional histograms
//!
//! Each cell of the window becomes a square block of pixels whose intensity
//! is the cell's mark relative to the largest mark. Unmarked cells stay
//! black. Columns follow the first axis left to right and rows follow the
//! second axis bottom to top.

use crate::grid::Cell;
use crate::histogram::Histogram;
use plotters::coord::Shift;
use plotters::prelude::*;
use pointset_core::{BinCount, Error, Result};
use std::path::Path;
use tracing::debug;

/// An RGB pixel buffer, row-major from the top-left corner
#[derive(Debug, Clone, PartialEq)]
pub struct RasterImage {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl RasterImage {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// The `[r, g, b]` value at column `x`, row `y`
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = 3 * (y as usize * self.width as usize + x as usize);
        Some([self.pixels[i], self.pixels[i + 1], self.pixels[i + 2]])
    }

    pub fn as_rgb(&self) -> &[u8] {
        &self.pixels
    }
}

struct Layout {
    min: [i64; 2],
    max: [i64; 2],
    pixels_per_cell: u32,
    width: u32,
    height: u32,
}

impl Layout {
    fn new<T: BinCount>(hist: &Histogram<T>, pixels_per_cell: u32) -> Result<Self> {
        if hist.dim() != 2 {
            return Err(Error::dimension_mismatch(2, hist.dim()));
        }
        if pixels_per_cell == 0 {
            return Err(Error::InvalidParameter(
                "pixels per cell must be positive".to_string(),
            ));
        }

        let lo = hist.cell(hist.window().start());
        let hi = hist.cell(hist.window().end());
        let min = [lo[0], lo[1]];
        let max = [hi[0], hi[1]];

        let side = |axis: usize| -> Result<u32> {
            let cells = u32::try_from(max[axis] - min[axis] + 1)
                .map_err(|_| Error::InvalidParameter("raster too large".to_string()))?;
            cells
                .checked_mul(pixels_per_cell)
                .ok_or_else(|| Error::InvalidParameter("raster too large".to_string()))
        };

        Ok(Self {
            min,
            max,
            pixels_per_cell,
            width: side(0)?,
            height: side(1)?,
        })
    }

    /// Inclusive pixel corners of a cell, `None` outside the window
    fn pixel_box(&self, cell: &Cell) -> Option<[(i32, i32); 2]> {
        let (i, j) = (cell[0], cell[1]);
        if i < self.min[0] || i > self.max[0] || j < self.min[1] || j > self.max[1] {
            return None;
        }
        let ppc = self.pixels_per_cell as i64;
        let x0 = (i - self.min[0]) * ppc;
        let y0 = (self.max[1] - j) * ppc;
        Some([
            (x0 as i32, y0 as i32),
            ((x0 + ppc - 1) as i32, (y0 + ppc - 1) as i32),
        ])
    }
}

fn render_err<E: std::fmt::Debug>(err: E) -> Error {
    Error::Render(format!("{err:?}"))
}

fn draw_cells<DB, T>(
    root: DrawingArea<DB, Shift>,
    hist: &Histogram<T>,
    layout: &Layout,
) -> Result<()>
where
    DB: DrawingBackend,
    T: BinCount,
{
    root.fill(&BLACK).map_err(render_err)?;

    let max = hist
        .iter()
        .map(|(_, m)| m.as_f64())
        .fold(f64::NEG_INFINITY, f64::max);

    if max > 0.0 {
        for (cell, mark) in hist.iter() {
            let Some(corners) = layout.pixel_box(cell) else {
                continue;
            };
            let intensity = (mark.as_f64() / max).clamp(0.0, 1.0);
            let level = (intensity * 255.0).round() as u8;
            root.draw(&Rectangle::new(corners, RGBColor(level, level, level).filled()))
                .map_err(render_err)?;
        }
    }

    root.present().map_err(render_err)?;
    Ok(())
}

/// Render a two-dimensional histogram into an in-memory RGB image
pub fn render_histogram<T: BinCount>(
    hist: &Histogram<T>,
    pixels_per_cell: u32,
) -> Result<RasterImage> {
    let layout = Layout::new(hist, pixels_per_cell)?;
    let mut pixels = vec![0u8; layout.width as usize * layout.height as usize * 3];
    {
        let backend = BitMapBackend::with_buffer(&mut pixels, (layout.width, layout.height));
        draw_cells(backend.into_drawing_area(), hist, &layout)?;
    }
    debug!(width = layout.width, height = layout.height, "rendered histogram");
    Ok(RasterImage {
        width: layout.width,
        height: layout.height,
        pixels,
    })
}

/// Render a two-dimensional histogram and write it as an image file
///
/// The format follows the path's extension.
pub fn save_histogram_image<T: BinCount, P: AsRef<Path>>(
    hist: &Histogram<T>,
    pixels_per_cell: u32,
    path: P,
) -> Result<()> {
    let layout = Layout::new(hist, pixels_per_cell)?;
    let backend = BitMapBackend::new(path.as_ref(), (layout.width, layout.height));
    draw_cells(backend.into_drawing_area(), hist, &layout)
}
