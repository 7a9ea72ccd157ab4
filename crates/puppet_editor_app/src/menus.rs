// SPDX-License-Identifier: MIT OR Apache-2.0
//! Menu definitions for the side menu panel.

/// Width of the side menu panel
pub const MENU_WIDTH: f32 = 150.0;

/// An action offered by the side menu
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MenuAction {
    /// Start a new animation
    NewAnimation,
    /// Import a project
    Import,
    /// Export the project as JSON and sprite sheet
    Export,
    /// Export the animation as GIF
    ExportGif,
    /// Load individual image files as sprites
    LoadFiles,
    /// Load a sprite sheet and split it into sprites
    LoadSpriteSheet,
}

impl MenuAction {
    /// Every action, in menu order
    pub const ALL: [MenuAction; 6] = [
        Self::NewAnimation,
        Self::Import,
        Self::Export,
        Self::ExportGif,
        Self::LoadFiles,
        Self::LoadSpriteSheet,
    ];

    /// Button label
    pub fn label(&self) -> &'static str {
        match self {
            Self::NewAnimation => "New animation",
            Self::Import => "Import",
            Self::Export => "Export",
            Self::ExportGif => "Export GIF",
            Self::LoadFiles => "Load files",
            Self::LoadSpriteSheet => "Load sprite sheet",
        }
    }

    /// Whether the action needs a started project
    pub fn needs_project(&self) -> bool {
        !matches!(self, Self::NewAnimation | Self::Import)
    }
}

/// Draw the menu buttons; returns the clicked action
pub fn menu_ui(ui: &mut egui::Ui, enabled: impl Fn(MenuAction) -> bool) -> Option<MenuAction> {
    let mut clicked = None;
    ui.vertical_centered_justified(|ui| {
        ui.add_space(8.0);
        for action in MenuAction::ALL {
            if ui.add_enabled(enabled(action), egui::Button::new(action.label())).clicked() {
                clicked = Some(action);
            }
            ui.add_space(4.0);
        }
    });
    clicked
}
