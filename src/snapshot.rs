//! Renders a single frame to PNG, for serving or saving a still of the dial.

use crate::canvas::PixelCanvas;
use crate::error::Result;
use crate::render::ClockFace;
use image::{ImageOutputFormat, RgbaImage};
use std::io::Cursor;
use tracing::debug;

/// Draws `face` at `minute_of_day` and returns the PNG-encoded image.
pub fn render_png(face: &ClockFace, width: u32, height: u32, minute_of_day: f64) -> Result<Vec<u8>> {
    let mut image = RgbaImage::new(width, height);
    {
        let background = face.config().background_color;
        let mut canvas = PixelCanvas::new(&mut image, width as usize, height as usize, background);
        face.draw(&mut canvas, minute_of_day);
    }

    let mut bytes = Vec::new();
    image.write_to(&mut Cursor::new(&mut bytes), ImageOutputFormat::Png)?;
    debug!(width, height, size = bytes.len(), "encoded snapshot");
    Ok(bytes)
}
