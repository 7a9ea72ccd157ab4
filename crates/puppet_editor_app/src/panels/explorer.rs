// SPDX-License-Identifier: MIT OR Apache-2.0
//! Explorer panel - the pool of loaded sprites.

use crate::textures::{fit_size, SpriteTextures};
use indexmap::IndexMap;
use puppet_editor_timeline::{Sprite, SpriteId};

const CELL_SPACING: f32 = 6.0;
const CELL_COLOR: egui::Color32 = egui::Color32::from_gray(45);
const CELL_HOVER_COLOR: egui::Color32 = egui::Color32::from_gray(65);

/// Sprite pool browser; double-clicking a sprite appends it to the timeline
pub struct ExplorerPanel {
    textures: SpriteTextures,
    thumbnail_size: u32,
}

impl ExplorerPanel {
    /// Create the panel with square thumbnails of the given size
    pub fn new(thumbnail_size: u32) -> Self {
        Self {
            textures: SpriteTextures::new(),
            thumbnail_size,
        }
    }

    /// Render the pool; returns the sprite that was double-clicked
    pub fn ui(&mut self, ui: &mut egui::Ui, sprites: &IndexMap<SpriteId, Sprite>) -> Option<SpriteId> {
        self.textures.retain(|id| sprites.contains_key(id));

        let mut chosen = None;
        ui.label(format!("{} sprites", sprites.len()));
        ui.separator();

        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.spacing_mut().item_spacing = egui::vec2(CELL_SPACING, CELL_SPACING);
                ui.horizontal_wrapped(|ui| {
                    for (id, sprite) in sprites {
                        if self.thumbnail(ui, sprite).double_clicked() {
                            chosen = Some(id.clone());
                        }
                    }
                });
            });

        chosen
    }

    fn thumbnail(&mut self, ui: &mut egui::Ui, sprite: &Sprite) -> egui::Response {
        let side = self.thumbnail_size as f32;
        let (rect, response) = ui.allocate_exact_size(egui::vec2(side, side), egui::Sense::click());

        let fill = if response.hovered() { CELL_HOVER_COLOR } else { CELL_COLOR };
        ui.painter().rect_filled(rect, 2.0, fill);

        match self.textures.get(ui.ctx(), sprite) {
            Some(texture) => {
                let image_rect =
                    egui::Rect::from_center_size(rect.center(), fit_size(sprite.dimensions(), self.thumbnail_size));
                ui.painter().image(
                    texture.id(),
                    image_rect,
                    egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                    egui::Color32::WHITE,
                );
            }
            None => {
                ui.painter().text(
                    rect.center(),
                    egui::Align2::CENTER_CENTER,
                    "Empty",
                    egui::FontId::proportional(13.0),
                    egui::Color32::GRAY,
                );
            }
        }

        let (width, height) = sprite.dimensions();
        response.on_hover_text(if sprite.is_empty() {
            "Empty sprite".to_string()
        } else {
            format!("{width}x{height}")
        })
    }
}
