// SPDX-License-Identifier: MIT OR Apache-2.0
//! Rasterising parts into frames and encoding them as an animated GIF.

use crate::animation::Animation;
use crate::part::Part;
use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, Frame, Rgba, RgbaImage};
use std::io::Write;
use std::num::NonZeroU32;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur while exporting
#[derive(Debug, Error)]
pub enum ExportError {
    /// The animation has no parts
    #[error("Nothing to export: the animation has no parts")]
    NothingToExport,

    /// Encoding failed
    #[error("Failed to encode image: {0}")]
    Image(#[from] image::ImageError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for export operations
pub type Result<T> = std::result::Result<T, ExportError>;

/// One rendered frame and how long it is shown
#[derive(Debug, Clone)]
pub struct ExportFrame {
    /// Canvas-sized pixels
    pub image: RgbaImage,
    /// Display time in hundredths of a second
    pub delay_centis: u16,
}

/// Convert a duration in ticks to GIF centiseconds.
///
/// GIF stores delays as 16-bit centiseconds, so anything past
/// `u16::MAX` (about 11 minutes) is clamped to it.
pub fn frame_delay_centis(length: NonZeroU32, ticks_per_second: NonZeroU32) -> u16 {
    let seconds = f64::from(length.get()) / f64::from(ticks_per_second.get());
    let centis = (seconds * 100.0).round().min(f64::from(u16::MAX));
    // Non-negative and clamped above, so the cast is exact.
    centis as u16
}

/// Draw a single part onto a transparent canvas.
///
/// Mirroring flips the sprite horizontally and inverts the stored X offset.
/// The sprite is then scaled, shifted by half its offset-adjusted size and
/// centred on the canvas. Sampling is nearest-neighbour.
pub fn render_part(part: &Part, width: u32, height: u32) -> RgbaImage {
    let mut canvas = RgbaImage::from_pixel(width, height, Rgba([0, 0, 0, 0]));
    let Some(sprite) = part.sprite.image() else {
        return canvas;
    };

    let (sprite_width, sprite_height) = sprite.dimensions();
    let (w, h) = (f64::from(sprite_width), f64::from(sprite_height));
    let scale = part.scale;
    let diff_x = f64::from(if part.reverse { -part.diff_x } else { part.diff_x });
    let diff_y = f64::from(part.diff_y);
    let center_x = f64::from(width / 2);
    let center_y = f64::from(height / 2);

    for (x, y, pixel) in canvas.enumerate_pixels_mut() {
        let local_x = (f64::from(x) + 0.5 - center_x) / scale + (w - diff_x) / 2.0;
        let local_y = (f64::from(y) + 0.5 - center_y) / scale + (h - diff_y) / 2.0;
        let source_x = if part.reverse { w - local_x } else { local_x };

        if source_x < 0.0 || source_x >= w || local_y < 0.0 || local_y >= h {
            continue;
        }
        // Both coordinates were bounds-checked above.
        *pixel = *sprite.get_pixel(source_x as u32, local_y as u32);
    }

    canvas
}

/// Render every part in order with its display time
pub fn frames(animation: &Animation, ticks_per_second: NonZeroU32) -> Result<Vec<ExportFrame>> {
    if !animation.can_export() {
        return Err(ExportError::NothingToExport);
    }

    Ok(animation
        .parts
        .iter()
        .map(|part| ExportFrame {
            image: render_part(part, animation.width, animation.height),
            delay_centis: frame_delay_centis(part.length, ticks_per_second),
        })
        .collect())
}

/// Encode the animation as a looping GIF into `writer`
pub fn encode_gif<W: Write>(
    animation: &Animation,
    ticks_per_second: NonZeroU32,
    writer: W,
) -> Result<()> {
    let frames = frames(animation, ticks_per_second)?;

    let mut encoder = GifEncoder::new(writer);
    encoder.set_repeat(Repeat::Infinite)?;
    for frame in frames {
        let delay = Delay::from_numer_denom_ms(u32::from(frame.delay_centis) * 10, 1);
        encoder.encode_frame(Frame::from_parts(frame.image, 0, 0, delay))?;
    }

    Ok(())
}

/// Encode the animation and write it to `path`.
///
/// Encoding happens in memory, so a failure leaves no partial file behind.
pub fn write_gif(animation: &Animation, ticks_per_second: NonZeroU32, path: &Path) -> Result<()> {
    let mut bytes = Vec::new();
    encode_gif(animation, ticks_per_second, &mut bytes)?;
    std::fs::write(path, bytes)?;

    tracing::info!("Exported {} frames to {:?}", animation.parts.len(), path);
    Ok(())
}
