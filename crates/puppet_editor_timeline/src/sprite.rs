// SPDX-License-Identifier: MIT OR Apache-2.0
//! Sprite images shared between the sprite pool and timeline parts.

use image::RgbaImage;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// Unique identifier for a sprite.
///
/// Stored as a string so identifiers read back from a project file are kept
/// verbatim, whatever generated them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpriteId(String);

impl SpriteId {
    /// Create a new random sprite ID
    pub fn new() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl Default for SpriteId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<String> for SpriteId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for SpriteId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl fmt::Display for SpriteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An immutable image with an identity.
///
/// The empty sprite has no payload and renders as fully transparent. Clones
/// share the pixel data.
#[derive(Debug, Clone)]
pub struct Sprite {
    id: SpriteId,
    image: Option<Arc<RgbaImage>>,
}

impl Sprite {
    /// Wrap a decoded image under a fresh identifier
    pub fn new(image: RgbaImage) -> Self {
        Self::with_id(SpriteId::new(), image)
    }

    /// Wrap a decoded image under a known identifier
    pub fn with_id(id: impl Into<SpriteId>, image: RgbaImage) -> Self {
        Self {
            id: id.into(),
            image: Some(Arc::new(image)),
        }
    }

    /// The transparent placeholder sprite
    pub fn empty() -> Self {
        Self {
            id: SpriteId::new(),
            image: None,
        }
    }

    /// Sprite identifier
    pub fn id(&self) -> &SpriteId {
        &self.id
    }

    /// Whether this is the placeholder sprite
    pub fn is_empty(&self) -> bool {
        self.image.is_none()
    }

    /// Pixel data, `None` for the empty sprite
    pub fn image(&self) -> Option<&RgbaImage> {
        self.image.as_deref()
    }

    /// Width and height in pixels, `(0, 0)` for the empty sprite
    pub fn dimensions(&self) -> (u32, u32) {
        self.image.as_ref().map_or((0, 0), |image| image.dimensions())
    }
}

impl Default for Sprite {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_empty_sprite() {
        let sprite = Sprite::empty();
        assert!(sprite.is_empty());
        assert!(sprite.image().is_none());
        assert_eq!(sprite.dimensions(), (0, 0));
    }

    #[test]
    fn test_ids_are_unique() {
        let a = Sprite::new(RgbaImage::new(1, 1));
        let b = Sprite::new(RgbaImage::new(1, 1));
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_clone_shares_payload() {
        let sprite = Sprite::with_id("abc", RgbaImage::from_pixel(3, 2, Rgba([1, 2, 3, 4])));
        let copy = sprite.clone();
        assert!(std::ptr::eq(sprite.image().unwrap(), copy.image().unwrap()));
        assert_eq!(copy.id().to_string(), "abc");
        assert_eq!(copy.dimensions(), (3, 2));
    }
}
