//! Animated GIF output for a simulation history.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, Frame, Rgba, RgbaImage};

use crate::config::{COLOR_RAMP, FRAME_DELAY_MS};
use crate::error::{QgolError, Result};
use crate::simulation::{History, ProbabilityGrid};

/// Map a probability onto the fixed [0, 1] color ramp
pub fn probability_color(p: f64) -> Rgba<u8> {
    let scaled = p.clamp(0.0, 1.0) * (COLOR_RAMP.len() - 1) as f64;
    let lower = (scaled.floor() as usize).min(COLOR_RAMP.len() - 2);
    let t = scaled - lower as f64;
    let (a, b) = (COLOR_RAMP[lower], COLOR_RAMP[lower + 1]);
    let channel = |i: usize| (a[i] as f64 + (b[i] as f64 - a[i] as f64) * t).round() as u8;
    Rgba([channel(0), channel(1), channel(2), 255])
}

/// One pixel per cell: width = columns, height = rows
pub fn grid_frame(grid: &ProbabilityGrid) -> RgbaImage {
    RgbaImage::from_fn(grid.cols() as u32, grid.rows() as u32, |x, y| {
        probability_color(grid.get((y as usize, x as usize)))
    })
}

/// Write one looping frame per generation, 500 ms apart.
pub fn export_gif(history: &History, path: &Path) -> Result<()> {
    let file = File::create(path).map_err(|e| QgolError::io(path, e))?;
    let mut encoder = GifEncoder::new(BufWriter::new(file));
    encoder.set_repeat(Repeat::Infinite)?;

    for grid in history {
        let delay = Delay::from_numer_denom_ms(FRAME_DELAY_MS, 1);
        encoder.encode_frame(Frame::from_parts(grid_frame(grid), 0, 0, delay))?;
    }

    log::info!("Rendered {} frames to {}", history.len(), path.display());
    Ok(())
}
