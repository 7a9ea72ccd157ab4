// SPDX-License-Identifier: MIT OR Apache-2.0
//! Player controls: transport buttons, scrubber bar and keyboard shortcuts.
//!
//! Everything here is drawn from [`PlaybackController`] state and turns input
//! into controller calls; no playback state lives in the widgets.

use crate::playback::{PlaybackController, PlaybackState};
use egui::{Color32, Pos2, Rect, Sense, Stroke, Vec2};

const BAR_HEIGHT: f32 = 30.0;
const PROGRESS_WIDTH: f32 = 2.0;
const MARK_WIDTH: f32 = 2.0;

const BAR_COLOR: Color32 = Color32::from_gray(210);
const MARK_COLOR: Color32 = Color32::from_gray(170);
const CURRENT_PART_COLOR: Color32 = Color32::from_gray(170);
const PROGRESS_COLOR: Color32 = Color32::BLACK;

/// Map a horizontal position on the bar to a fraction of its width
fn x_to_fraction(rect: Rect, x: f32) -> f64 {
    if rect.width() <= 0.0 {
        return 0.0;
    }
    f64::from(((x - rect.min.x) / rect.width()).clamp(0.0, 1.0))
}

/// Map a fraction of the bar's width to a horizontal position
fn fraction_to_x(rect: Rect, fraction: f64) -> f32 {
    rect.min.x + fraction.clamp(0.0, 1.0) as f32 * rect.width()
}

/// Map a tick to a horizontal position on the bar
fn tick_to_x(rect: Rect, tick: u32, max_tick: u32) -> f32 {
    if max_tick == 0 {
        return rect.min.x;
    }
    fraction_to_x(rect, f64::from(tick) / f64::from(max_tick))
}

/// Player controls shown under the canvas preview
#[derive(Debug, Clone)]
pub struct PlayerControls {
    /// Height of the scrubber bar in points
    pub bar_height: f32,
    /// Draw part boundary marks on the bar
    pub show_marks: bool,
}

impl PlayerControls {
    /// Create controls with default layout
    pub fn new() -> Self {
        Self {
            bar_height: BAR_HEIGHT,
            show_marks: true,
        }
    }

    /// Render position text, the scrubber and the transport buttons
    pub fn ui(&mut self, ui: &mut egui::Ui, playback: &mut PlaybackController) {
        self.render_position(ui, playback);
        self.render_scrubber(ui, playback);
        ui.add_space(4.0);
        self.render_transport(ui, playback);
    }

    /// Part, tick and seconds readout
    fn render_position(&self, ui: &mut egui::Ui, playback: &PlaybackController) {
        let tps = f64::from(playback.ticks_per_second().get());
        let part = playback.current_part().map_or(0, |p| p + 1);
        ui.monospace(format!(
            "Part: {} / {}\nTick: {} / {}\nSec: {:.2} / {:.2}",
            part,
            playback.animation().parts.len(),
            playback.current_tick(),
            playback.max_tick(),
            f64::from(playback.current_tick()) / tps,
            f64::from(playback.max_tick()) / tps,
        ));
    }

    /// Transport buttons: `<<` `<` Play/Stop `>` `>>`
    pub fn render_transport(&self, ui: &mut egui::Ui, playback: &mut PlaybackController) {
        let state = playback.state();
        let navigable = state == PlaybackState::Paused;

        ui.horizontal(|ui| {
            if ui
                .add_enabled(navigable, egui::Button::new("<<"))
                .on_hover_text("Previous part")
                .clicked()
            {
                playback.step_part_backward();
            }
            if ui
                .add_enabled(navigable, egui::Button::new("<"))
                .on_hover_text("Previous tick")
                .clicked()
            {
                playback.step_tick_backward();
            }
            if ui
                .add_enabled(state != PlaybackState::Empty, egui::Button::new(state.toggle_label()))
                .on_hover_text("Play/Stop (Space)")
                .clicked()
            {
                playback.toggle_play();
            }
            if ui
                .add_enabled(navigable, egui::Button::new(">"))
                .on_hover_text("Next tick")
                .clicked()
            {
                playback.step_tick_forward();
            }
            if ui
                .add_enabled(navigable, egui::Button::new(">>"))
                .on_hover_text("Next part")
                .clicked()
            {
                playback.step_part_forward();
            }
        });
    }

    /// Scrubber bar; clicking seeks to the clicked fraction
    pub fn render_scrubber(&self, ui: &mut egui::Ui, playback: &mut PlaybackController) {
        let (rect, response) = ui.allocate_exact_size(
            Vec2::new(ui.available_width(), self.bar_height),
            Sense::click(),
        );
        let painter = ui.painter_at(rect);
        painter.rect_filled(rect, 0.0, BAR_COLOR);

        let max_tick = playback.max_tick();
        if max_tick == 0 {
            return;
        }

        let index = playback.index();
        for (i, &start) in index.indexes().iter().enumerate() {
            let x = tick_to_x(rect, start, max_tick);
            if playback.current_part() == Some(i) {
                let end = index.start_of(i + 1).unwrap_or(max_tick);
                let end_x = tick_to_x(rect, end, max_tick).ceil();
                painter.rect_filled(
                    Rect::from_min_max(Pos2::new(x, rect.min.y), Pos2::new(end_x, rect.max.y)),
                    0.0,
                    CURRENT_PART_COLOR,
                );
            }
            if self.show_marks {
                painter.line_segment(
                    [Pos2::new(x, rect.min.y), Pos2::new(x, rect.max.y)],
                    Stroke::new(MARK_WIDTH, MARK_COLOR),
                );
            }
        }

        let progress_x = fraction_to_x(rect, playback.progress());
        painter.line_segment(
            [Pos2::new(progress_x, rect.min.y), Pos2::new(progress_x, rect.max.y)],
            Stroke::new(PROGRESS_WIDTH, PROGRESS_COLOR),
        );

        let response = response.on_hover_cursor(egui::CursorIcon::PointingHand);
        if response.clicked() {
            if let Some(pos) = response.interact_pointer_pos() {
                playback.seek_by_fraction(x_to_fraction(rect, pos.x));
            }
        }
    }

    /// Space toggles playback; arrow keys move one tick while paused.
    /// Home and End pause and jump to the first or last tick.
    pub fn handle_keyboard(&self, ctx: &egui::Context, playback: &mut PlaybackController) {
        if playback.state() == PlaybackState::Empty || ctx.wants_keyboard_input() {
            return;
        }

        let (space, left, right, home, end) = ctx.input(|i| {
            (
                i.key_pressed(egui::Key::Space),
                i.key_pressed(egui::Key::ArrowLeft),
                i.key_pressed(egui::Key::ArrowRight),
                i.key_pressed(egui::Key::Home),
                i.key_pressed(egui::Key::End),
            )
        });

        if home {
            playback.seek(0);
        }
        if end {
            playback.seek(u32::MAX);
        }

        if space {
            playback.toggle_play();
        }
        if left {
            playback.nudge_tick_backward();
        }
        if right {
            playback.nudge_tick_forward();
        }
    }
}

impl Default for PlayerControls {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar() -> Rect {
        Rect::from_min_size(Pos2::new(10.0, 0.0), Vec2::new(200.0, BAR_HEIGHT))
    }

    #[test]
    fn test_x_to_fraction() {
        assert_eq!(x_to_fraction(bar(), 10.0), 0.0);
        assert_eq!(x_to_fraction(bar(), 110.0), 0.5);
        assert_eq!(x_to_fraction(bar(), 500.0), 1.0);
        assert_eq!(x_to_fraction(bar(), -20.0), 0.0);
    }

    #[test]
    fn test_tick_to_x() {
        assert_eq!(tick_to_x(bar(), 0, 35), 10.0);
        assert_eq!(tick_to_x(bar(), 35, 35), 210.0);
        assert_eq!(tick_to_x(bar(), 5, 0), 10.0);
    }

    #[test]
    fn test_fraction_to_x() {
        assert_eq!(fraction_to_x(bar(), 0.25), 60.0);
        assert_eq!(fraction_to_x(bar(), 2.0), 210.0);
    }
}
