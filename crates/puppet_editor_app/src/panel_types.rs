// SPDX-License-Identifier: MIT OR Apache-2.0
//! Shared panel type definitions.

/// Panel types that can be docked in the editor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PanelType {
    /// Loaded sprites
    Explorer,
    /// Canvas preview and playback controls
    Player,
    /// Log output
    Log,
}

impl PanelType {
    /// Get the display name for this panel type
    pub fn name(&self) -> &'static str {
        match self {
            Self::Explorer => "Explorer",
            Self::Player => "Player",
            Self::Log => "Log",
        }
    }

    /// Get the icon for this panel type
    pub fn icon(&self) -> &'static str {
        match self {
            Self::Explorer => "\u{1f4c1}", // folder
            Self::Player => "\u{1f3ac}",   // film
            Self::Log => "\u{1f4bb}",      // terminal
        }
    }
}
