// SPDX-License-Identifier: MIT OR Apache-2.0
//! A single timed placement of a sprite.

use crate::sprite::Sprite;
use std::num::NonZeroU32;

/// Default ticks per second, also the length given to freshly appended parts
pub const DEFAULT_TICKS_PER_SECOND: NonZeroU32 = match NonZeroU32::new(60) {
    Some(tps) => tps,
    None => unreachable!(),
};

/// One timed placement of a sprite on the timeline
#[derive(Debug, Clone)]
pub struct Part {
    /// Sprite drawn while this part is active
    pub sprite: Sprite,
    /// Uniform scale factor, always positive
    pub scale: f64,
    /// Horizontal offset in sprite pixels
    pub diff_x: i32,
    /// Vertical offset in sprite pixels
    pub diff_y: i32,
    /// Mirror horizontally
    pub reverse: bool,
    /// Duration in ticks
    pub length: NonZeroU32,
}

impl Part {
    /// Create a part with default transform and the given duration
    pub fn new(sprite: Sprite, length: NonZeroU32) -> Self {
        Self {
            sprite,
            scale: 1.0,
            diff_x: 0,
            diff_y: 0,
            reverse: false,
            length,
        }
    }

    /// Duration in ticks
    pub fn len(&self) -> u32 {
        self.length.get()
    }

    /// Restore scale, offsets and mirroring to defaults and set the duration
    pub fn reset(&mut self, length: NonZeroU32) {
        self.scale = 1.0;
        self.diff_x = 0;
        self.diff_y = 0;
        self.reverse = false;
        self.length = length;
    }

    /// Builder: set scale
    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    /// Builder: set offsets
    pub fn with_offset(mut self, diff_x: i32, diff_y: i32) -> Self {
        self.diff_x = diff_x;
        self.diff_y = diff_y;
        self
    }

    /// Builder: set mirroring
    pub fn with_reverse(mut self, reverse: bool) -> Self {
        self.reverse = reverse;
        self
    }
}
