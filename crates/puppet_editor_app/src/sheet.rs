// SPDX-License-Identifier: MIT OR Apache-2.0
//! Sprite sheets: packing sprites into one image, finding sprites in a
//! loaded sheet and cutting them back out.

use image::{imageops, Rgba, RgbaImage};
use indexmap::IndexMap;
use puppet_editor_timeline::{Sprite, SpriteId};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use thiserror::Error;

/// Transparent gap between packed sprites
const PADDING: u32 = 1;

/// Errors building or slicing a sheet
#[derive(Debug, Error)]
pub enum SheetError {
    /// Nothing to pack
    #[error("No sprites to pack")]
    Empty,

    /// A rectangle reaches outside the sheet image
    #[error("Sprite {id} at {rect:?} lies outside the {width}x{height} sheet")]
    OutOfBounds {
        /// Sprite the rectangle belongs to
        id: SpriteId,
        /// The offending rectangle
        rect: SheetRect,
        /// Sheet width
        width: u32,
        /// Sheet height
        height: u32,
    },
}

/// Placement of one sprite in a sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetRect {
    /// Left edge
    pub x: u32,
    /// Top edge
    pub y: u32,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl SheetRect {
    /// Create a rectangle
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// Exclusive right edge
    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    /// Exclusive bottom edge
    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }

    /// Whether the rectangle is non-empty and fits an image of the given size
    pub fn fits(&self, width: u32, height: u32) -> bool {
        self.width > 0
            && self.height > 0
            && self.x.checked_add(self.width).is_some_and(|r| r <= width)
            && self.y.checked_add(self.height).is_some_and(|b| b <= height)
    }
}

/// A packed sheet and where each sprite went
#[derive(Debug, Clone)]
pub struct PackedSheet {
    /// Sheet pixels
    pub image: RgbaImage,
    /// Placement per sprite, in first-seen order
    pub rects: IndexMap<SpriteId, SheetRect>,
}

/// Pack distinct non-empty sprites into one image.
///
/// Shelf packing: sprites are placed tallest first in rows no wider than
/// the square root of the total area, or the widest sprite if that is
/// larger. Repeated identifiers and empty sprites are skipped.
pub fn pack(sprites: &[Sprite]) -> Result<PackedSheet, SheetError> {
    let mut distinct: IndexMap<SpriteId, &RgbaImage> = IndexMap::new();
    for sprite in sprites {
        if let Some(image) = sprite.image() {
            distinct.entry(sprite.id().clone()).or_insert(image);
        }
    }
    if distinct.is_empty() {
        return Err(SheetError::Empty);
    }

    let area: u64 = distinct
        .values()
        .map(|image| u64::from(image.width() + PADDING) * u64::from(image.height() + PADDING))
        .sum();
    let widest = distinct.values().map(|image| image.width()).max().unwrap_or(0);
    // The square root of a u64 area always fits in u32.
    let row_limit = ((area as f64).sqrt().ceil() as u32).max(widest);

    let mut order: Vec<usize> = (0..distinct.len()).collect();
    order.sort_by_key(|&i| std::cmp::Reverse(distinct[i].height()));

    let mut placed = vec![SheetRect::new(0, 0, 0, 0); distinct.len()];
    let (mut x, mut y, mut row_height) = (0u32, 0u32, 0u32);
    let (mut sheet_width, mut sheet_height) = (0u32, 0u32);
    for i in order {
        let (width, height) = distinct[i].dimensions();
        if x > 0 && x + width > row_limit {
            y += row_height + PADDING;
            x = 0;
            row_height = 0;
        }
        let rect = SheetRect::new(x, y, width, height);
        x += width + PADDING;
        row_height = row_height.max(height);
        sheet_width = sheet_width.max(rect.right());
        sheet_height = sheet_height.max(rect.bottom());
        placed[i] = rect;
    }

    let mut image = RgbaImage::from_pixel(sheet_width, sheet_height, Rgba([0, 0, 0, 0]));
    let mut rects = IndexMap::with_capacity(distinct.len());
    for ((id, sprite), rect) in distinct.into_iter().zip(placed) {
        imageops::replace(&mut image, sprite, i64::from(rect.x), i64::from(rect.y));
        rects.insert(id, rect);
    }

    tracing::debug!("Packed {} sprites into {}x{}", rects.len(), sheet_width, sheet_height);
    Ok(PackedSheet { image, rects })
}

/// Find sprites in a sheet as bounding boxes of 8-connected opaque regions.
///
/// Results are ordered top to bottom, then left to right.
pub fn detect(image: &RgbaImage) -> Vec<SheetRect> {
    let (width, height) = image.dimensions();
    let opaque = |x: u32, y: u32| image.get_pixel(x, y)[3] > 0;
    let mut visited = vec![false; width as usize * height as usize];
    let offset = |x: u32, y: u32| y as usize * width as usize + x as usize;
    let mut rects = Vec::new();
    let mut queue = VecDeque::new();

    for start_y in 0..height {
        for start_x in 0..width {
            if visited[offset(start_x, start_y)] || !opaque(start_x, start_y) {
                continue;
            }

            let (mut min_x, mut min_y, mut max_x, mut max_y) = (start_x, start_y, start_x, start_y);
            visited[offset(start_x, start_y)] = true;
            queue.push_back((start_x, start_y));

            while let Some((x, y)) = queue.pop_front() {
                min_x = min_x.min(x);
                min_y = min_y.min(y);
                max_x = max_x.max(x);
                max_y = max_y.max(y);

                for ny in y.saturating_sub(1)..=(y + 1).min(height - 1) {
                    for nx in x.saturating_sub(1)..=(x + 1).min(width - 1) {
                        let i = offset(nx, ny);
                        if !visited[i] && opaque(nx, ny) {
                            visited[i] = true;
                            queue.push_back((nx, ny));
                        }
                    }
                }
            }

            rects.push(SheetRect::new(min_x, min_y, max_x - min_x + 1, max_y - min_y + 1));
        }
    }

    rects.sort_by_key(|rect| (rect.y, rect.x));
    rects
}

/// Cut sprites out of a sheet, keeping the given identifiers
pub fn slice<'a>(
    image: &RgbaImage,
    rects: impl IntoIterator<Item = (&'a SpriteId, &'a SheetRect)>,
) -> Result<Vec<Sprite>, SheetError> {
    let (width, height) = image.dimensions();
    rects
        .into_iter()
        .map(|(id, rect)| {
            if !rect.fits(width, height) {
                return Err(SheetError::OutOfBounds {
                    id: id.clone(),
                    rect: *rect,
                    width,
                    height,
                });
            }
            let cropped = imageops::crop_imm(image, rect.x, rect.y, rect.width, rect.height).to_image();
            Ok(Sprite::with_id(id.clone(), cropped))
        })
        .collect()
}

/// Detect sprites in a sheet and cut them out under fresh identifiers
pub fn split(image: &RgbaImage) -> Vec<Sprite> {
    detect(image)
        .into_iter()
        .map(|rect| {
            Sprite::new(imageops::crop_imm(image, rect.x, rect.y, rect.width, rect.height).to_image())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn overlaps(a: &SheetRect, b: &SheetRect) -> bool {
        a.x < b.right() && b.x < a.right() && a.y < b.bottom() && b.y < a.bottom()
    }

    fn solid(width: u32, height: u32, value: u8) -> Sprite {
        Sprite::new(RgbaImage::from_pixel(width, height, Rgba([value, value, value, 255])))
    }

    #[test]
    fn test_pack_places_without_overlap() {
        let sprites = vec![solid(4, 2, 10), solid(3, 5, 20), solid(2, 2, 30), solid(6, 1, 40)];
        let sheet = pack(&sprites).unwrap();
        assert_eq!(sheet.rects.len(), 4);

        let rects: Vec<SheetRect> = sheet.rects.values().copied().collect();
        for (i, a) in rects.iter().enumerate() {
            assert!(a.fits(sheet.image.width(), sheet.image.height()));
            for b in &rects[i + 1..] {
                assert!(!overlaps(a, b), "{a:?} overlaps {b:?}");
            }
        }
    }

    #[test]
    fn test_pack_keeps_first_seen_order_and_skips_duplicates() {
        let a = solid(2, 2, 1);
        let b = solid(3, 3, 2);
        let sheet = pack(&[a.clone(), Sprite::empty(), b.clone(), a.clone()]).unwrap();
        let ids: Vec<&SpriteId> = sheet.rects.keys().collect();
        assert_eq!(ids, vec![a.id(), b.id()]);
    }

    #[test]
    fn test_pack_then_slice_preserves_pixels() {
        let mut image = RgbaImage::new(3, 2);
        image.put_pixel(0, 0, Rgba([255, 0, 0, 255]));
        image.put_pixel(2, 1, Rgba([0, 0, 255, 128]));
        let sprites = vec![Sprite::new(image), solid(5, 4, 99)];

        let sheet = pack(&sprites).unwrap();
        let sliced = slice(&sheet.image, &sheet.rects).unwrap();

        assert_eq!(sliced.len(), 2);
        for (original, restored) in sprites.iter().zip(&sliced) {
            assert_eq!(original.id(), restored.id());
            assert_eq!(original.image(), restored.image());
        }
    }

    #[test]
    fn test_pack_nothing() {
        assert!(matches!(pack(&[]), Err(SheetError::Empty)));
        assert!(matches!(pack(&[Sprite::empty()]), Err(SheetError::Empty)));
    }

    #[test]
    fn test_detect_separate_blobs() {
        let mut image = RgbaImage::new(10, 6);
        for (x, y) in [(1, 1), (2, 1), (1, 2), (7, 0), (8, 4), (7, 4)] {
            image.put_pixel(x, y, Rgba([9, 9, 9, 255]));
        }

        let rects = detect(&image);
        assert_eq!(
            rects,
            vec![
                SheetRect::new(7, 0, 1, 1),
                SheetRect::new(1, 1, 2, 2),
                SheetRect::new(7, 4, 2, 1),
            ]
        );
    }

    #[test]
    fn test_detect_joins_diagonals() {
        let mut image = RgbaImage::new(4, 4);
        image.put_pixel(0, 0, Rgba([1, 1, 1, 255]));
        image.put_pixel(1, 1, Rgba([1, 1, 1, 255]));
        image.put_pixel(2, 2, Rgba([1, 1, 1, 255]));
        assert_eq!(detect(&image), vec![SheetRect::new(0, 0, 3, 3)]);
    }

    #[test]
    fn test_detect_transparent_sheet() {
        assert!(detect(&RgbaImage::new(5, 5)).is_empty());
        assert!(split(&RgbaImage::new(5, 5)).is_empty());
    }

    #[test]
    fn test_split_cuts_detected_sprites() {
        let mut image = RgbaImage::new(6, 3);
        image.put_pixel(0, 0, Rgba([1, 2, 3, 255]));
        image.put_pixel(4, 1, Rgba([4, 5, 6, 255]));
        image.put_pixel(5, 2, Rgba([4, 5, 6, 255]));

        let sprites = split(&image);
        assert_eq!(sprites.len(), 2);
        assert_eq!(sprites[0].dimensions(), (1, 1));
        assert_eq!(sprites[1].dimensions(), (2, 2));
    }

    #[test]
    fn test_slice_out_of_bounds() {
        let image = RgbaImage::new(4, 4);
        let id = SpriteId::from("far");
        let rect = SheetRect::new(2, 2, 5, 1);
        let result = slice(&image, [(&id, &rect)]);
        assert!(matches!(result, Err(SheetError::OutOfBounds { .. })));
    }
}
