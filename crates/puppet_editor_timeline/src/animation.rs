// SPDX-License-Identifier: MIT OR Apache-2.0
//! The animation document: ordered parts on a fixed-size canvas.

use crate::edit::{self, EditError};
use crate::part::Part;

/// Default canvas width and height in pixels
pub const DEFAULT_ANIMATION_SIZE: u32 = 100;

/// Largest canvas width or height; one frame is at most 64 MiB of RGBA
pub const MAX_ANIMATION_SIZE: u32 = 4096;

/// Ordered parts plus canvas size
#[derive(Debug, Clone)]
pub struct Animation {
    /// Parts in playback order
    pub parts: Vec<Part>,
    /// Canvas width in pixels
    pub width: u32,
    /// Canvas height in pixels
    pub height: u32,
}

impl Animation {
    /// Create an empty animation with the given canvas size
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            parts: Vec::new(),
            width,
            height,
        }
    }

    /// Builder: set parts
    pub fn with_parts(mut self, parts: Vec<Part>) -> Self {
        self.parts = parts;
        self
    }

    /// Export requires at least one part
    pub fn can_export(&self) -> bool {
        !self.parts.is_empty()
    }

    /// Set the canvas size; dimensions must be in `1..=MAX_ANIMATION_SIZE`
    pub fn set_size(&mut self, width: u32, height: u32) -> bool {
        if edit::check_size(width, height).is_err() {
            return false;
        }
        self.width = width;
        self.height = height;
        true
    }

    /// Sum of all part lengths in ticks
    pub fn total_ticks(&self) -> Result<u32, EditError> {
        edit::total_length(self.parts.iter().map(Part::len))
    }

    /// Check canvas size and total duration
    pub fn validate(&self) -> Result<u32, EditError> {
        edit::check_size(self.width, self.height)?;
        self.total_ticks()
    }
}

impl Default for Animation {
    fn default() -> Self {
        Self::new(DEFAULT_ANIMATION_SIZE, DEFAULT_ANIMATION_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sprite::Sprite;
    use std::num::NonZeroU32;

    #[test]
    fn test_default_animation() {
        let animation = Animation::default();
        assert_eq!((animation.width, animation.height), (100, 100));
        assert!(!animation.can_export());
        assert_eq!(animation.total_ticks(), Ok(0));
    }

    #[test]
    fn test_set_size_rejects_zero() {
        let mut animation = Animation::default();
        assert!(!animation.set_size(0, 10));
        assert!(!animation.set_size(10, 0));
        assert!(!animation.set_size(MAX_ANIMATION_SIZE + 1, 10));
        assert_eq!((animation.width, animation.height), (100, 100));
        assert!(animation.set_size(320, 240));
        assert_eq!((animation.width, animation.height), (320, 240));
    }

    #[test]
    fn test_total_ticks() {
        let animation = Animation::default().with_parts(vec![
            Part::new(Sprite::empty(), NonZeroU32::new(10).unwrap()),
            Part::new(Sprite::empty(), NonZeroU32::new(5).unwrap()),
        ]);
        assert!(animation.can_export());
        assert_eq!(animation.total_ticks(), Ok(15));
    }

    #[test]
    fn test_validate_rejects_overflowing_duration() {
        let animation = Animation::default().with_parts(vec![
            Part::new(Sprite::empty(), NonZeroU32::MAX),
            Part::new(Sprite::empty(), NonZeroU32::new(2).unwrap()),
        ]);
        assert_eq!(animation.validate(), Err(EditError::TooLong));
        assert_eq!(Animation::new(0, 10).validate(), Err(EditError::InvalidSize));
        assert_eq!(Animation::default().validate(), Ok(0));
    }
}
