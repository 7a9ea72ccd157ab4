// SPDX-License-Identifier: MIT OR Apache-2.0
//! egui texture caches for sprite thumbnails and the canvas preview.

use image::RgbaImage;
use puppet_editor_timeline::edit::auto_scale;
use puppet_editor_timeline::export::render_part;
use puppet_editor_timeline::{Part, Sprite, SpriteId};
use std::collections::HashMap;

/// Pixel art is shown without smoothing
const TEXTURE_OPTIONS: egui::TextureOptions = egui::TextureOptions::NEAREST;

/// Convert RGBA pixels into an egui image
pub fn color_image(image: &RgbaImage) -> egui::ColorImage {
    let size = [image.width() as usize, image.height() as usize];
    egui::ColorImage::from_rgba_unmultiplied(size, image.as_raw())
}

/// Display size of a sprite inside a square thumbnail, scaled like auto scale
pub fn fit_size(dimensions: (u32, u32), thumbnail: u32) -> egui::Vec2 {
    let scale = auto_scale(dimensions, (thumbnail, thumbnail)) as f32;
    egui::vec2(dimensions.0 as f32 * scale, dimensions.1 as f32 * scale)
}

/// One texture per sprite, uploaded on first use
#[derive(Default)]
pub struct SpriteTextures {
    textures: HashMap<SpriteId, egui::TextureHandle>,
}

impl SpriteTextures {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Texture for `sprite`; `None` for the empty sprite
    pub fn get(&mut self, ctx: &egui::Context, sprite: &Sprite) -> Option<&egui::TextureHandle> {
        let image = sprite.image()?;
        Some(self.textures.entry(sprite.id().clone()).or_insert_with(|| {
            ctx.load_texture(format!("sprite-{}", sprite.id()), color_image(image), TEXTURE_OPTIONS)
        }))
    }

    /// Free textures of sprites no longer in use
    pub fn retain(&mut self, mut keep: impl FnMut(&SpriteId) -> bool) {
        self.textures.retain(|id, _| keep(id));
    }
}

/// Everything that affects the rendered preview of a part
#[derive(Debug, Clone, PartialEq)]
struct PreviewKey {
    sprite: SpriteId,
    scale: f64,
    diff_x: i32,
    diff_y: i32,
    reverse: bool,
    canvas: (u32, u32),
}

impl PreviewKey {
    fn new(part: &Part, canvas: (u32, u32)) -> Self {
        Self {
            sprite: part.sprite.id().clone(),
            scale: part.scale,
            diff_x: part.diff_x,
            diff_y: part.diff_y,
            reverse: part.reverse,
            canvas,
        }
    }
}

/// Rendered canvas for the current part, re-rendered only when it changes
#[derive(Default)]
pub struct PreviewTexture {
    key: Option<PreviewKey>,
    handle: Option<egui::TextureHandle>,
}

impl PreviewTexture {
    /// Create an empty preview
    pub fn new() -> Self {
        Self::default()
    }

    /// Texture showing `part` on a canvas of the given size
    pub fn get(
        &mut self,
        ctx: &egui::Context,
        part: Option<&Part>,
        canvas: (u32, u32),
    ) -> Option<&egui::TextureHandle> {
        let Some(part) = part.filter(|part| !part.sprite.is_empty()) else {
            self.key = None;
            self.handle = None;
            return None;
        };

        let key = PreviewKey::new(part, canvas);
        if self.key.as_ref() != Some(&key) || self.handle.is_none() {
            let image = color_image(&render_part(part, canvas.0, canvas.1));
            match &mut self.handle {
                Some(handle) => handle.set(image, TEXTURE_OPTIONS),
                None => self.handle = Some(ctx.load_texture("canvas-preview", image, TEXTURE_OPTIONS)),
            }
            self.key = Some(key);
        }
        self.handle.as_ref()
    }
}
