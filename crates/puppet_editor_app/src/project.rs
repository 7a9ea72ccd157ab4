// SPDX-License-Identifier: MIT OR Apache-2.0
//! Project files.
//!
//! A project is a pretty-printed JSON document `<name>.json` next to a packed
//! sprite sheet `<name>.png`. The JSON stores the parts with references to
//! sprite identifiers and the rectangle of every sprite in the sheet.

use crate::loader::{self, LoadError};
use crate::sheet::{self, PackedSheet, SheetError, SheetRect};
use indexmap::IndexMap;
use puppet_editor_timeline::edit::{self, EditError};
use puppet_editor_timeline::{Animation, Part, PartEdit, Sprite, SpriteId};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use std::num::NonZeroU32;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors reading or writing a project
#[derive(Debug, Error)]
pub enum ProjectError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed JSON
    #[error("Invalid project file: {0}")]
    Json(#[from] serde_json::Error),

    /// Sheet image could not be read
    #[error("Failed to read sprite sheet: {0}")]
    Load(#[from] LoadError),

    /// Sheet image could not be written
    #[error("Failed to write sprite sheet: {0}")]
    Image(#[from] image::ImageError),

    /// Packing or slicing failed
    #[error(transparent)]
    Sheet(#[from] SheetError),

    /// A value failed validation
    #[error(transparent)]
    Invalid(#[from] EditError),

    /// A part refers to a sprite missing from the sheet map
    #[error("Sprite {0} is not in the sprite sheet")]
    MissingSprite(SpriteId),

    /// A non-empty sprite reference without an identifier
    #[error("Part {0} refers to a sprite without an id")]
    MissingSpriteId(usize),

    /// Nothing to export
    #[error("The animation has no parts")]
    NothingToExport,
}

/// Result type for project operations
pub type Result<T> = std::result::Result<T, ProjectError>;

/// Top-level project document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectFile {
    /// Project name, also the base name of both files
    pub name: String,
    /// The animation
    pub animation: AnimationFile,
    /// Sheet rectangle per sprite identifier
    #[serde(rename = "spriteSheet", default)]
    pub sprite_sheet: IndexMap<SpriteId, SheetRect>,
}

/// Stored animation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationFile {
    /// Parts in playback order
    pub parts: Vec<PartFile>,
    /// Canvas width
    pub width: u32,
    /// Canvas height
    pub height: u32,
}

/// Stored part
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartFile {
    /// Sprite reference
    pub sprite: SpriteRef,
    /// Uniform scale
    pub scale: f64,
    /// Horizontal offset
    pub diff_x: i32,
    /// Vertical offset
    pub diff_y: i32,
    /// Mirror flag
    pub reverse: bool,
    /// Duration in ticks
    pub length: i64,
}

/// Reference to a sprite by identifier
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpriteRef {
    /// Whether the part shows the empty sprite
    #[serde(rename = "isEmpty", deserialize_with = "bool_or_string")]
    pub is_empty: bool,
    /// Identifier, present iff not empty
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<SpriteId>,
}

/// Older files wrote `isEmpty` as the string `"true"` or `"false"`
fn bool_or_string<'de, D>(deserializer: D) -> std::result::Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Text(String),
    }

    match Flag::deserialize(deserializer)? {
        Flag::Bool(value) => Ok(value),
        Flag::Text(text) => text
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("invalid isEmpty value '{text}'"))),
    }
}

impl PartFile {
    fn from_part(part: &Part) -> Self {
        let sprite = if part.sprite.is_empty() {
            SpriteRef { is_empty: true, id: None }
        } else {
            SpriteRef {
                is_empty: false,
                id: Some(part.sprite.id().clone()),
            }
        };
        Self {
            sprite,
            scale: part.scale,
            diff_x: part.diff_x,
            diff_y: part.diff_y,
            reverse: part.reverse,
            length: i64::from(part.len()),
        }
    }
}

/// An imported project ready to be loaded into the editor
#[derive(Debug, Clone)]
pub struct ImportedProject {
    /// Project name
    pub name: String,
    /// Animation with sprites re-attached
    pub animation: Animation,
    /// Every sprite cut from the sheet, in sheet map order
    pub sprites: Vec<Sprite>,
}

/// Where an export was written
#[derive(Debug, Clone)]
pub struct ExportSummary {
    /// JSON document path
    pub json_path: PathBuf,
    /// Sheet image path, if any sprite was packed
    pub sheet_path: Option<PathBuf>,
    /// Number of packed sprites
    pub sprite_count: usize,
}

/// JSON and sheet paths for a project
pub fn project_paths(dir: &Path, name: &str) -> (PathBuf, PathBuf) {
    (dir.join(format!("{name}.json")), dir.join(format!("{name}.png")))
}

/// Files an export to `dir` would overwrite
pub fn existing_outputs(dir: &Path, name: &str) -> Vec<PathBuf> {
    let (json, png) = project_paths(dir, name);
    [png, json].into_iter().filter(|path| path.exists()).collect()
}

/// Build the document and packed sheet for an animation
pub fn build(name: &str, animation: &Animation) -> Result<(ProjectFile, Option<PackedSheet>)> {
    edit::validate_name(name)?;
    if !animation.can_export() {
        return Err(ProjectError::NothingToExport);
    }

    let sprites: Vec<Sprite> = animation
        .parts
        .iter()
        .filter(|part| !part.sprite.is_empty())
        .map(|part| part.sprite.clone())
        .collect();
    let packed = if sprites.is_empty() {
        None
    } else {
        Some(sheet::pack(&sprites)?)
    };

    let file = ProjectFile {
        name: name.to_string(),
        animation: AnimationFile {
            parts: animation.parts.iter().map(PartFile::from_part).collect(),
            width: animation.width,
            height: animation.height,
        },
        sprite_sheet: packed.as_ref().map(|sheet| sheet.rects.clone()).unwrap_or_default(),
    };
    Ok((file, packed))
}

/// Write `<name>.png` and then `<name>.json` into `dir`
pub fn export_project(dir: &Path, name: &str, animation: &Animation) -> Result<ExportSummary> {
    let (file, packed) = build(name, animation)?;
    let (json_path, png_path) = project_paths(dir, name);

    let sprite_count = packed.as_ref().map_or(0, |sheet| sheet.rects.len());
    let sheet_path = match packed {
        Some(sheet) => {
            sheet.image.save_with_format(&png_path, image::ImageFormat::Png)?;
            Some(png_path)
        }
        None => None,
    };

    let json = serde_json::to_string_pretty(&file)?;
    std::fs::write(&json_path, json)?;

    tracing::info!("Exported project '{}' to {:?}", name, dir);
    Ok(ExportSummary {
        json_path,
        sheet_path,
        sprite_count,
    })
}

/// Parse a project document and check its values
pub fn parse(json: &str) -> Result<ProjectFile> {
    let file: ProjectFile = serde_json::from_str(json)?;
    edit::validate_name(&file.name)?;
    edit::check_size(file.animation.width, file.animation.height)?;
    Ok(file)
}

/// Read a project document and its sprite sheet
pub fn import_project(json_path: &Path) -> Result<ImportedProject> {
    let json = std::fs::read_to_string(json_path)?;
    let file = parse(&json)?;

    let needs_sheet = file.animation.parts.iter().any(|part| !part.sprite.is_empty);
    let sprites = if needs_sheet {
        let dir = json_path.parent().unwrap_or_else(|| Path::new("."));
        let (_, png_path) = project_paths(dir, &file.name);
        let image = loader::read_image(&png_path)?;
        sheet::slice(&image, &file.sprite_sheet)?
    } else {
        Vec::new()
    };

    let animation = assemble(&file, &sprites)?;
    tracing::info!(
        "Imported project '{}' with {} parts and {} sprites",
        file.name,
        animation.parts.len(),
        sprites.len()
    );
    Ok(ImportedProject {
        name: file.name,
        animation,
        sprites,
    })
}

/// Rebuild the animation, re-attaching sprites by identifier
fn assemble(file: &ProjectFile, sprites: &[Sprite]) -> Result<Animation> {
    let by_id: HashMap<&SpriteId, &Sprite> = sprites.iter().map(|s| (s.id(), s)).collect();

    let parts = file
        .animation
        .parts
        .iter()
        .enumerate()
        .map(|(i, stored)| {
            let sprite = if stored.sprite.is_empty {
                Sprite::empty()
            } else {
                let id = stored.sprite.id.as_ref().ok_or(ProjectError::MissingSpriteId(i))?;
                by_id
                    .get(id)
                    .map(|sprite| (*sprite).clone())
                    .ok_or_else(|| ProjectError::MissingSprite(id.clone()))?
            };

            PartEdit::Scale(stored.scale).validate()?;
            let length = u32::try_from(stored.length)
                .ok()
                .and_then(NonZeroU32::new)
                .ok_or(EditError::NonPositiveLength)?;

            Ok(Part::new(sprite, length)
                .with_scale(stored.scale)
                .with_offset(stored.diff_x, stored.diff_y)
                .with_reverse(stored.reverse))
        })
        .collect::<Result<Vec<_>>>()?;

    let animation = Animation::new(file.animation.width, file.animation.height).with_parts(parts);
    animation.validate()?;
    Ok(animation)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn temp_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("puppet_project_{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn ticks(n: u32) -> NonZeroU32 {
        NonZeroU32::new(n).unwrap()
    }

    fn sprite(width: u32, height: u32, value: u8) -> Sprite {
        let mut image = RgbaImage::from_pixel(width, height, Rgba([value, 0, 0, 255]));
        image.put_pixel(0, 0, Rgba([0, value, 0, 100]));
        Sprite::new(image)
    }

    fn sample() -> Animation {
        let walk = sprite(4, 3, 200);
        let jump = sprite(2, 5, 90);
        Animation::new(64, 48).with_parts(vec![
            Part::new(walk.clone(), ticks(30)).with_scale(2.5).with_offset(-3, 4),
            Part::new(Sprite::empty(), ticks(12)),
            Part::new(jump, ticks(60)).with_reverse(true),
            Part::new(walk, ticks(7)),
        ])
    }

    #[test]
    fn test_round_trip() {
        let dir = temp_dir();
        let original = sample();

        let summary = export_project(&dir, "walk", &original).unwrap();
        assert_eq!(summary.sprite_count, 2);
        assert!(summary.sheet_path.is_some());

        let imported = import_project(&summary.json_path).unwrap();
        assert_eq!(imported.name, "walk");
        assert_eq!(imported.sprites.len(), 2);
        let animation = imported.animation;
        assert_eq!((animation.width, animation.height), (64, 48));
        assert_eq!(animation.parts.len(), original.parts.len());

        for (a, b) in original.parts.iter().zip(&animation.parts) {
            assert_eq!(a.scale, b.scale);
            assert_eq!((a.diff_x, a.diff_y), (b.diff_x, b.diff_y));
            assert_eq!(a.reverse, b.reverse);
            assert_eq!(a.length, b.length);
            assert_eq!(a.sprite.is_empty(), b.sprite.is_empty());
            if !a.sprite.is_empty() {
                assert_eq!(a.sprite.id(), b.sprite.id());
                assert_eq!(a.sprite.image(), b.sprite.image());
            }
        }
        // Shared sprites stay shared after import
        assert!(std::ptr::eq(
            animation.parts[0].sprite.image().unwrap(),
            animation.parts[3].sprite.image().unwrap()
        ));

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_json_shape() {
        let (file, _) = build("walk", &sample()).unwrap();
        let value = serde_json::to_value(&file).unwrap();

        assert_eq!(value["name"], "walk");
        assert_eq!(value["animation"]["width"], 64);
        let part = &value["animation"]["parts"][0];
        assert_eq!(part["diffX"], -3);
        assert_eq!(part["diffY"], 4);
        assert_eq!(part["length"], 30);
        assert_eq!(part["sprite"]["isEmpty"], false);
        assert!(part["sprite"]["id"].is_string());

        let empty = &value["animation"]["parts"][1]["sprite"];
        assert_eq!(empty["isEmpty"], true);
        assert!(empty.get("id").is_none());

        let id = part["sprite"]["id"].as_str().unwrap();
        let rect = &value["spriteSheet"][id];
        assert_eq!(rect["width"], 4);
        assert_eq!(rect["height"], 3);
    }

    #[test]
    fn test_only_empty_parts_skip_sheet() {
        let dir = temp_dir();
        let animation = Animation::default().with_parts(vec![Part::new(Sprite::empty(), ticks(5))]);

        let summary = export_project(&dir, "blank", &animation).unwrap();
        assert!(summary.sheet_path.is_none());
        assert!(!dir.join("blank.png").exists());

        let imported = import_project(&summary.json_path).unwrap();
        assert_eq!(imported.animation.parts.len(), 1);
        assert!(imported.sprites.is_empty());
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_string_is_empty_accepted() {
        let json = r#"{
            "name": "legacy",
            "animation": {
                "parts": [{"sprite": {"isEmpty": "true"}, "scale": 1.0,
                           "diffX": 0, "diffY": 0, "reverse": false, "length": 60}],
                "width": 100, "height": 100
            },
            "spriteSheet": {}
        }"#;
        let file = parse(json).unwrap();
        assert!(file.animation.parts[0].sprite.is_empty);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let template = |name: &str, length: i64, scale: f64| {
            format!(
                r#"{{"name": "{name}", "animation": {{"parts": [{{"sprite": {{"isEmpty": true}},
                "scale": {scale}, "diffX": 0, "diffY": 0, "reverse": false, "length": {length}}}],
                "width": 10, "height": 10}}, "spriteSheet": {{}}}}"#
            )
        };

        assert!(matches!(
            parse(&template("bad name", 1, 1.0)),
            Err(ProjectError::Invalid(EditError::InvalidName))
        ));

        let file = parse(&template("ok", 0, 1.0)).unwrap();
        assert!(matches!(
            assemble(&file, &[]),
            Err(ProjectError::Invalid(EditError::NonPositiveLength))
        ));

        let file = parse(&template("ok", 5, -2.0)).unwrap();
        assert!(matches!(
            assemble(&file, &[]),
            Err(ProjectError::Invalid(EditError::NonPositiveScale))
        ));
    }

    #[test]
    fn test_oversized_canvas_rejected() {
        let json = r#"{"name": "huge", "animation": {"parts": [], "width": 100000, "height": 100000},
            "spriteSheet": {}}"#;
        assert!(matches!(parse(json), Err(ProjectError::Invalid(EditError::InvalidSize))));
    }

    #[test]
    fn test_overflowing_duration_rejected_on_import() {
        let dir = temp_dir();
        let part = r#"{"sprite": {"isEmpty": true}, "scale": 1.0, "diffX": 0, "diffY": 0,
            "reverse": false, "length": 4294967295}"#;
        let json = format!(
            r#"{{"name": "long", "animation": {{"parts": [{part}, {part}], "width": 10, "height": 10}},
            "spriteSheet": {{}}}}"#
        );
        let path = dir.join("long.json");
        std::fs::write(&path, json).unwrap();

        assert!(matches!(
            import_project(&path),
            Err(ProjectError::Invalid(EditError::TooLong))
        ));
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_missing_sprite() {
        let (mut file, _) = build("walk", &sample()).unwrap();
        file.sprite_sheet.clear();
        assert!(matches!(assemble(&file, &[]), Err(ProjectError::MissingSprite(_))));
    }

    #[test]
    fn test_missing_sheet_file() {
        let dir = temp_dir();
        let summary = export_project(&dir, "walk", &sample()).unwrap();
        std::fs::remove_file(dir.join("walk.png")).unwrap();

        assert!(matches!(
            import_project(&summary.json_path),
            Err(ProjectError::Load(LoadError::Io(_)))
        ));
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_existing_outputs() {
        let dir = temp_dir();
        assert!(existing_outputs(&dir, "walk").is_empty());
        export_project(&dir, "walk", &sample()).unwrap();
        assert_eq!(existing_outputs(&dir, "walk").len(), 2);
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_export_rejects_empty_animation() {
        assert!(matches!(
            build("walk", &Animation::default()),
            Err(ProjectError::NothingToExport)
        ));
    }
}
