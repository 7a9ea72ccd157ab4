// SPDX-License-Identifier: MIT OR Apache-2.0
//! Modal entry and question dialogs.
//!
//! A dialog knows what it was opened for ([`DialogPurpose`]) and reports the
//! user's answer; the editor state decides what to do with it. Cancelling
//! never produces a notice.

use std::path::PathBuf;

/// What a dialog was opened for
#[derive(Debug, Clone, PartialEq)]
pub enum DialogPurpose {
    /// Name of a new animation
    NewAnimation,
    /// Path of a project JSON file to import
    Import,
    /// Directory to export the project into
    Export,
    /// Overwrite existing project files in a directory
    ConfirmExport(PathBuf),
    /// Path of the GIF to write
    ExportGif,
    /// Image files to load, separated by `;`
    LoadFiles,
    /// Sprite sheet image to split
    LoadSpriteSheet,
    /// Scale of the current part
    Scale,
    /// Horizontal offset of the current part
    DiffX,
    /// Vertical offset of the current part
    DiffY,
    /// Length of the current part in ticks
    Length,
    /// Canvas size as `WIDTHxHEIGHT`
    CanvasSize,
    /// Reset the current part
    ConfirmReset,
    /// Delete the current part
    ConfirmDelete,
}

impl DialogPurpose {
    /// Window title
    pub fn title(&self) -> &'static str {
        match self {
            Self::NewAnimation => "New animation",
            Self::Import => "Import",
            Self::Export | Self::ConfirmExport(_) => "Export",
            Self::ExportGif => "Export GIF",
            Self::LoadFiles => "Load files",
            Self::LoadSpriteSheet => "Load sprite sheet",
            Self::Scale => "Scale",
            Self::DiffX => "DiffX",
            Self::DiffY => "DiffY",
            Self::Length => "Len",
            Self::CanvasSize => "Animation size",
            Self::ConfirmReset => "Reset",
            Self::ConfirmDelete => "Delete",
        }
    }

    /// Text shown above the input or as the question
    pub fn prompt(&self) -> String {
        match self {
            Self::NewAnimation => "Name of the animation:".to_string(),
            Self::Import => "Project file (.json):".to_string(),
            Self::Export => "Export directory:".to_string(),
            Self::ConfirmExport(dir) => {
                format!("Files already exist in {}. Overwrite them?", dir.display())
            }
            Self::ExportGif => "GIF file:".to_string(),
            Self::LoadFiles => "Image files, separated by ';':".to_string(),
            Self::LoadSpriteSheet => "Sprite sheet image:".to_string(),
            Self::Scale => "Scale:".to_string(),
            Self::DiffX => "Horizontal offset:".to_string(),
            Self::DiffY => "Vertical offset:".to_string(),
            Self::Length => "Length in ticks:".to_string(),
            Self::CanvasSize => "Size (WIDTHxHEIGHT):".to_string(),
            Self::ConfirmReset => "Reset this part?".to_string(),
            Self::ConfirmDelete => "Delete this part?".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum DialogKind {
    Entry { input: String },
    Question,
}

/// The user's answer
#[derive(Debug, Clone, PartialEq)]
pub enum DialogAnswer {
    /// Closed without accepting
    Cancel,
    /// Accepted; carries the entered text, empty for questions
    Accept(String),
}

/// An open dialog
#[derive(Debug, Clone)]
pub struct Dialog {
    purpose: DialogPurpose,
    kind: DialogKind,
}

impl Dialog {
    /// Dialog asking for a line of text
    pub fn entry(purpose: DialogPurpose, initial: impl Into<String>) -> Self {
        Self {
            purpose,
            kind: DialogKind::Entry { input: initial.into() },
        }
    }

    /// Yes/No question
    pub fn question(purpose: DialogPurpose) -> Self {
        Self {
            purpose,
            kind: DialogKind::Question,
        }
    }

    /// What the dialog was opened for
    pub fn purpose(&self) -> &DialogPurpose {
        &self.purpose
    }

    /// Current text of an entry dialog
    pub fn input(&self) -> Option<&str> {
        match &self.kind {
            DialogKind::Entry { input } => Some(input),
            DialogKind::Question => None,
        }
    }

    /// Answer as if the user pressed the accept button
    pub fn accept(&self) -> DialogAnswer {
        DialogAnswer::Accept(self.input().unwrap_or_default().to_string())
    }

    /// Draw the dialog; returns the answer once the user decides
    pub fn show(&mut self, ctx: &egui::Context) -> Option<DialogAnswer> {
        let mut answer = None;
        let prompt = self.purpose.prompt();

        egui::Window::new(self.purpose.title())
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(prompt);

                let (accept_text, cancel_text) = match &mut self.kind {
                    DialogKind::Entry { input } => {
                        let response =
                            ui.add(egui::TextEdit::singleline(input).desired_width(300.0));
                        response.request_focus();
                        if response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                            answer = Some(DialogAnswer::Accept(input.clone()));
                        }
                        ("OK", "Cancel")
                    }
                    DialogKind::Question => ("Yes", "No"),
                };

                ui.add_space(10.0);
                ui.horizontal(|ui| {
                    if ui.button(cancel_text).clicked() {
                        answer = Some(DialogAnswer::Cancel);
                    }
                    if ui.button(accept_text).clicked() {
                        answer = Some(self.accept());
                    }
                });
            });

        if answer.is_none() && ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            answer = Some(DialogAnswer::Cancel);
        }
        answer
    }
}

/// Split a `;`-separated list of paths, dropping blanks
pub fn split_paths(input: &str) -> Vec<PathBuf> {
    input
        .split(';')
        .map(str::trim)
        .filter(|path| !path.is_empty())
        .map(PathBuf::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_accept_carries_input() {
        let dialog = Dialog::entry(DialogPurpose::NewAnimation, "animation");
        assert_eq!(dialog.input(), Some("animation"));
        assert_eq!(dialog.accept(), DialogAnswer::Accept("animation".to_string()));
    }

    #[test]
    fn test_question_accept_is_empty() {
        let dialog = Dialog::question(DialogPurpose::ConfirmDelete);
        assert_eq!(dialog.input(), None);
        assert_eq!(dialog.accept(), DialogAnswer::Accept(String::new()));
        assert_eq!(dialog.purpose().title(), "Delete");
    }

    #[test]
    fn test_confirm_export_prompt_names_directory() {
        let purpose = DialogPurpose::ConfirmExport(PathBuf::from("out"));
        assert!(purpose.prompt().contains("out"));
        assert_eq!(purpose.title(), "Export");
    }

    #[test]
    fn test_split_paths() {
        assert_eq!(
            split_paths(" a.png ; ;b.png;"),
            vec![PathBuf::from("a.png"), PathBuf::from("b.png")]
        );
        assert!(split_paths("  ").is_empty());
    }
}
