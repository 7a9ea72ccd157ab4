// SPDX-License-Identifier: MIT OR Apache-2.0
//! Player panel - canvas preview, animation info, part properties and
//! transport controls.

use crate::textures::PreviewTexture;
use puppet_editor_timeline::{Part, PlaybackController, PlayerControls};

const CHECKER_SIZE: f32 = 8.0;
const CHECKER_LIGHT: egui::Color32 = egui::Color32::from_gray(200);
const CHECKER_DARK: egui::Color32 = egui::Color32::from_gray(160);
/// Space kept below the canvas for info, properties and controls
const CONTROLS_HEIGHT: f32 = 230.0;

/// A property link clicked in the player
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerAction {
    /// Edit the scale
    Scale,
    /// Edit the horizontal offset
    DiffX,
    /// Edit the vertical offset
    DiffY,
    /// Flip the mirror flag
    ToggleReverse,
    /// Edit the length
    Length,
    /// Fit the sprite to the canvas
    AutoScale,
    /// Reset the part, after confirmation
    Reset,
    /// Delete the part, after confirmation
    Delete,
    /// Edit the canvas size
    CanvasSize,
}

impl PlayerAction {
    /// Whether the action only makes sense for parts showing a real sprite
    pub fn needs_sprite(&self) -> bool {
        matches!(
            self,
            Self::Scale | Self::DiffX | Self::DiffY | Self::ToggleReverse | Self::AutoScale
        )
    }
}

/// Link text for each property of a part, in display order
pub fn property_links(part: &Part) -> [(PlayerAction, String); 8] {
    [
        (PlayerAction::Scale, format!("Scale : {}", part.scale)),
        (PlayerAction::DiffX, format!("DiffX : {}", part.diff_x)),
        (PlayerAction::DiffY, format!("DiffY : {}", part.diff_y)),
        (PlayerAction::ToggleReverse, format!("Reverse : {}", part.reverse)),
        (PlayerAction::Length, format!("Len : {}", part.length)),
        (PlayerAction::AutoScale, "Auto scale".to_string()),
        (PlayerAction::Reset, "Reset".to_string()),
        (PlayerAction::Delete, "Delete".to_string()),
    ]
}

/// Canvas size, tick rate and total length
pub fn info_lines(playback: &PlaybackController) -> [String; 3] {
    let animation = playback.animation();
    let tps = playback.ticks_per_second().get();
    let max_tick = playback.max_tick();
    [
        format!("Size : {}x{}", animation.width, animation.height),
        format!("TPS : {tps}"),
        format!(
            "Len : {} ticks ({:.2} sec)",
            max_tick,
            f64::from(max_tick) / f64::from(tps)
        ),
    ]
}

/// Zoom that fits the canvas into `available`; whole numbers when enlarging
fn canvas_zoom(canvas: (u32, u32), available: egui::Vec2) -> f32 {
    if canvas.0 == 0 || canvas.1 == 0 {
        return 1.0;
    }
    let zoom = (available.x / canvas.0 as f32).min(available.y / canvas.1 as f32);
    if zoom >= 1.0 {
        zoom.floor()
    } else {
        zoom.max(0.0)
    }
}

/// The player panel
pub struct PlayerPanel {
    controls: PlayerControls,
    preview: PreviewTexture,
}

impl PlayerPanel {
    /// Create the panel
    pub fn new() -> Self {
        Self {
            controls: PlayerControls::new(),
            preview: PreviewTexture::new(),
        }
    }

    /// Keyboard shortcuts for the transport
    pub fn handle_keyboard(&self, ctx: &egui::Context, playback: &mut PlaybackController) {
        self.controls.handle_keyboard(ctx, playback);
    }

    /// Render the panel; returns the property link that was clicked
    pub fn ui(&mut self, ui: &mut egui::Ui, playback: &mut PlaybackController) -> Option<PlayerAction> {
        self.canvas(ui, playback);
        ui.separator();

        let mut action = None;
        ui.columns(2, |columns| {
            let [info, properties] = columns else {
                return;
            };

            let [size, tps, length] = info_lines(playback);
            if info.link(size).on_hover_text("Change the animation size").clicked() {
                action = Some(PlayerAction::CanvasSize);
            }
            info.label(tps);
            info.label(length);

            if let Some(part) = playback.current() {
                let has_sprite = !part.sprite.is_empty();
                for (link_action, text) in property_links(part) {
                    let enabled = has_sprite || !link_action.needs_sprite();
                    if properties.add_enabled(enabled, egui::Link::new(text)).clicked() {
                        action = Some(link_action);
                    }
                }
            } else {
                properties.weak("No part selected");
            }
        });

        ui.separator();
        self.controls.ui(ui, playback);
        action
    }

    /// Checkerboard canvas with the current part drawn on top
    fn canvas(&mut self, ui: &mut egui::Ui, playback: &PlaybackController) {
        let animation = playback.animation();
        let canvas = (animation.width, animation.height);
        let available = egui::vec2(
            ui.available_width(),
            (ui.available_height() - CONTROLS_HEIGHT).max(CHECKER_SIZE),
        );
        let zoom = canvas_zoom(canvas, available);
        let size = egui::vec2(canvas.0 as f32 * zoom, canvas.1 as f32 * zoom);

        ui.vertical_centered(|ui| {
            let (rect, _) = ui.allocate_exact_size(size, egui::Sense::hover());
            paint_checkerboard(ui.painter(), rect);

            if let Some(texture) = self.preview.get(ui.ctx(), playback.current(), canvas) {
                ui.painter().image(
                    texture.id(),
                    rect,
                    egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
                    egui::Color32::WHITE,
                );
            }
        });
    }
}

impl Default for PlayerPanel {
    fn default() -> Self {
        Self::new()
    }
}

fn paint_checkerboard(painter: &egui::Painter, rect: egui::Rect) {
    painter.rect_filled(rect, 0.0, CHECKER_LIGHT);
    let columns = (rect.width() / CHECKER_SIZE).ceil() as usize;
    let rows = (rect.height() / CHECKER_SIZE).ceil() as usize;
    for row in 0..rows {
        for column in (row % 2..columns).step_by(2) {
            let min = rect.min + egui::vec2(column as f32 * CHECKER_SIZE, row as f32 * CHECKER_SIZE);
            let square = egui::Rect::from_min_size(min, egui::vec2(CHECKER_SIZE, CHECKER_SIZE));
            painter.rect_filled(square.intersect(rect), 0.0, CHECKER_DARK);
        }
    }
}
