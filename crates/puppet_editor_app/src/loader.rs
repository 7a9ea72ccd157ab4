// SPDX-License-Identifier: MIT OR Apache-2.0
//! Reading sprite images from disk.

use crate::sheet;
use puppet_editor_timeline::Sprite;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors loading an image file
#[derive(Debug, Error)]
pub enum LoadError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not a decodable image
    #[error("Failed to decode image: {0}")]
    Decode(#[from] image::ImageError),
}

/// Outcome of loading several files: loaded sprites and per-file failures
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Sprites decoded successfully, in request order
    pub sprites: Vec<Sprite>,
    /// Files that failed and why
    pub failures: Vec<(PathBuf, LoadError)>,
}

/// Decode an image file into RGBA pixels
pub fn read_image(path: &Path) -> Result<image::RgbaImage, LoadError> {
    let bytes = std::fs::read(path)?;
    Ok(image::load_from_memory(&bytes)?.to_rgba8())
}

/// Decode one image into a sprite with a fresh identifier
pub fn read_sprite(path: &Path) -> Result<Sprite, LoadError> {
    Ok(Sprite::new(read_image(path)?))
}

/// Decode every file, collecting failures instead of stopping at the first
pub fn read_sprites(paths: &[PathBuf]) -> LoadReport {
    let mut report = LoadReport::default();
    for path in paths {
        match read_sprite(path) {
            Ok(sprite) => report.sprites.push(sprite),
            Err(e) => report.failures.push((path.clone(), e)),
        }
    }
    report
}

/// Decode a sprite sheet and split it into one sprite per opaque region
pub fn read_sprite_sheet(path: &Path) -> Result<Vec<Sprite>, LoadError> {
    let image = read_image(path)?;
    let sprites = sheet::split(&image);
    tracing::debug!("Found {} sprites in {:?}", sprites.len(), path);
    Ok(sprites)
}

/// Summary notice for a batch load
pub fn loaded_message(count: usize) -> Option<String> {
    (count > 0).then(|| format!("{count} sprites are loaded!"))
}
