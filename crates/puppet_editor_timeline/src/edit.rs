// SPDX-License-Identifier: MIT OR Apache-2.0
//! Property edits and their validation.
//!
//! Text entered in dialogs is parsed here into validated values before any
//! state is touched. A returned [`EditError`] means nothing was applied.

use crate::animation::MAX_ANIMATION_SIZE;
use std::num::NonZeroU32;
use thiserror::Error;

/// Validation failures at the edit boundary
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EditError {
    /// Text did not parse as a number
    #[error("'{0}' is not a valid number")]
    InvalidNumber(String),

    /// Scale must be strictly positive and finite
    #[error("Scale must be greater than 0")]
    NonPositiveScale,

    /// Length must be strictly positive
    #[error("Length must be greater than 0")]
    NonPositiveLength,

    /// Canvas size must be `WIDTHxHEIGHT` with dimensions in
    /// `1..=MAX_ANIMATION_SIZE`
    #[error("Invalid size!")]
    InvalidSize,

    /// The total duration would not fit in a tick counter
    #[error("Animation would be longer than {} ticks", u32::MAX)]
    TooLong,

    /// Part index out of range
    #[error("There is no part {0}")]
    NoSuchPart(usize),

    /// Project names are restricted to ASCII letters and digits
    #[error("Name must consist of alphanumeric characters only")]
    InvalidName,

    /// Edits are rejected while playing
    #[error("Stop playback before editing")]
    Playing,

    /// No part is selected
    #[error("There is no part to edit")]
    NoCurrentPart,
}

/// Result type for edit operations
pub type Result<T> = std::result::Result<T, EditError>;

/// A property edit applied to the current part
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PartEdit {
    /// Set the uniform scale
    Scale(f64),
    /// Set the horizontal offset
    DiffX(i32),
    /// Set the vertical offset
    DiffY(i32),
    /// Flip the mirror flag
    ToggleReverse,
    /// Set the duration in ticks
    Length(NonZeroU32),
    /// Fit the sprite to the canvas
    AutoScale,
    /// Restore default properties and duration
    Reset,
}

impl PartEdit {
    /// Whether this edit changes the part's duration
    pub fn is_structural(&self) -> bool {
        self.new_length(NonZeroU32::MIN).is_some()
    }

    /// Duration the part will have after this edit, if it changes.
    ///
    /// `ticks_per_second` is the length a reset restores.
    pub fn new_length(&self, ticks_per_second: NonZeroU32) -> Option<NonZeroU32> {
        match self {
            PartEdit::Length(length) => Some(*length),
            PartEdit::Reset => Some(ticks_per_second),
            _ => None,
        }
    }

    /// Check values that the type alone cannot guarantee
    pub fn validate(&self) -> Result<()> {
        match self {
            PartEdit::Scale(scale) => check_scale(*scale).map(|_| ()),
            _ => Ok(()),
        }
    }

    /// Display label used in menus and notices
    pub fn label(&self) -> &'static str {
        match self {
            PartEdit::Scale(_) => "Scale",
            PartEdit::DiffX(_) => "DiffX",
            PartEdit::DiffY(_) => "DiffY",
            PartEdit::ToggleReverse => "Reverse",
            PartEdit::Length(_) => "Len",
            PartEdit::AutoScale => "Auto scale",
            PartEdit::Reset => "Reset",
        }
    }
}

fn check_scale(scale: f64) -> Result<f64> {
    if scale.is_finite() && scale > 0.0 {
        Ok(scale)
    } else {
        Err(EditError::NonPositiveScale)
    }
}

/// Parse a positive scale factor
pub fn parse_scale(input: &str) -> Result<f64> {
    let input = input.trim();
    let scale: f64 = input
        .parse()
        .map_err(|_| EditError::InvalidNumber(input.to_string()))?;
    check_scale(scale)
}

/// Parse a signed pixel offset
pub fn parse_offset(input: &str) -> Result<i32> {
    let input = input.trim();
    input
        .parse()
        .map_err(|_| EditError::InvalidNumber(input.to_string()))
}

/// Parse a positive duration in ticks
pub fn parse_length(input: &str) -> Result<NonZeroU32> {
    let input = input.trim();
    let length: i64 = input
        .parse()
        .map_err(|_| EditError::InvalidNumber(input.to_string()))?;
    u32::try_from(length)
        .ok()
        .and_then(NonZeroU32::new)
        .ok_or(EditError::NonPositiveLength)
}

/// Parse a canvas size written as `WIDTHxHEIGHT`
pub fn parse_size(input: &str) -> Result<(u32, u32)> {
    let (width, height) = input.trim().split_once('x').ok_or(EditError::InvalidSize)?;
    let width: u32 = width.trim().parse().map_err(|_| EditError::InvalidSize)?;
    let height: u32 = height.trim().parse().map_err(|_| EditError::InvalidSize)?;
    check_size(width, height)
}

/// Check canvas dimensions against `1..=MAX_ANIMATION_SIZE`
pub fn check_size(width: u32, height: u32) -> Result<(u32, u32)> {
    let valid = 1..=MAX_ANIMATION_SIZE;
    if valid.contains(&width) && valid.contains(&height) {
        Ok((width, height))
    } else {
        Err(EditError::InvalidSize)
    }
}

/// Sum part lengths, failing when the total overflows the tick counter
pub fn total_length(lengths: impl IntoIterator<Item = u32>) -> Result<u32> {
    lengths
        .into_iter()
        .try_fold(0u32, |total, length| total.checked_add(length))
        .ok_or(EditError::TooLong)
}

/// Check a project name: non-empty, ASCII letters and digits only
pub fn validate_name(name: &str) -> Result<()> {
    if !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric()) {
        Ok(())
    } else {
        Err(EditError::InvalidName)
    }
}

/// Scale that fits a sprite to the canvas.
///
/// A sprite smaller than the canvas in both dimensions grows by the whole
/// ratio of the canvas to its larger side; one that overflows the canvas
/// shrinks by the exact ratio. Anything else keeps scale 1.
pub fn auto_scale(sprite: (u32, u32), canvas: (u32, u32)) -> f64 {
    let (width, height) = sprite;
    let (canvas_width, canvas_height) = canvas;
    if width == 0 || height == 0 {
        return 1.0;
    }

    let mut scale = 1.0;
    if width < canvas_width && height < canvas_height {
        scale = if width > height {
            f64::from(canvas_width / width)
        } else {
            f64::from(canvas_height / height)
        };
    }
    if width > canvas_width || height > canvas_height {
        scale = if width > height {
            f64::from(canvas_width) / f64::from(width)
        } else {
            f64::from(canvas_height) / f64::from(height)
        };
    }
    scale
}
