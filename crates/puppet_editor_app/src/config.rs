// SPDX-License-Identifier: MIT OR Apache-2.0
//! Editor configuration.
//!
//! Settings live in a RON file in the working directory. A missing file
//! means defaults; a broken one is reported and defaults are used.

use puppet_editor_timeline::{DEFAULT_ANIMATION_SIZE, DEFAULT_TICKS_PER_SECOND, MAX_ANIMATION_SIZE};
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Current config format version
pub const CONFIG_FORMAT_VERSION: u32 = 1;

/// Config file name
pub const CONFIG_FILE_NAME: &str = "puppet_editor.ron";

/// Errors reading or writing the config file
#[derive(Debug, Error)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not valid RON for this schema
    #[error("Failed to parse config: {0}")]
    Parse(#[from] ron::error::SpannedError),

    /// Serialization failed
    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] ron::Error),

    /// Written by a newer editor
    #[error("Config version {found} is newer than supported version {supported}")]
    UnsupportedVersion {
        /// Version in the file
        found: u32,
        /// Highest version understood here
        supported: u32,
    },

    /// A value is out of range
    #[error("Invalid config value: {0}")]
    Invalid(&'static str),
}

/// Window geometry
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowConfig {
    /// Initial inner width
    pub width: u32,
    /// Initial inner height
    pub height: u32,
    /// Minimum inner width
    pub min_width: u32,
    /// Minimum inner height
    pub min_height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            min_width: 640,
            min_height: 480,
        }
    }
}

/// Editor settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditorConfig {
    /// Config format version
    pub version: u32,
    /// Playback rate, also the length of new parts
    pub ticks_per_second: u32,
    /// Canvas width and height for new animations
    pub default_canvas_size: u32,
    /// How long notices stay on screen
    pub notice_seconds: f32,
    /// Explorer thumbnail edge in points
    #[serde(default = "default_thumbnail_size")]
    pub thumbnail_size: u32,
    /// Window geometry
    #[serde(default)]
    pub window: WindowConfig,
}

fn default_thumbnail_size() -> u32 {
    100
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_FORMAT_VERSION,
            ticks_per_second: DEFAULT_TICKS_PER_SECOND.get(),
            default_canvas_size: DEFAULT_ANIMATION_SIZE,
            notice_seconds: 5.0,
            thumbnail_size: default_thumbnail_size(),
            window: WindowConfig::default(),
        }
    }
}

impl EditorConfig {
    /// Load settings from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: EditorConfig = ron::from_str(&content)?;

        if config.version > CONFIG_FORMAT_VERSION {
            return Err(ConfigError::UnsupportedVersion {
                found: config.version,
                supported: CONFIG_FORMAT_VERSION,
            });
        }
        config.validate()?;

        Ok(config)
    }

    /// Load settings, falling back to defaults when the file is missing or broken.
    ///
    /// A missing file is created with the defaults so it can be edited.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            let config = Self::default();
            match config.save(path) {
                Ok(()) => tracing::info!("Wrote default config to {:?}", path),
                Err(e) => tracing::warn!("Could not write default config {:?}: {}", path, e),
            }
            return config;
        }
        match Self::load(path) {
            Ok(config) => {
                tracing::info!("Loaded config from {:?}", path);
                config
            }
            Err(e) => {
                tracing::warn!("Ignoring config {:?}: {}", path, e);
                Self::default()
            }
        }
    }

    /// Save settings to a file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let pretty = ron::ser::PrettyConfig::default()
            .struct_names(true)
            .enumerate_arrays(false);
        let content = ron::ser::to_string_pretty(self, pretty)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.ticks_per_second == 0 {
            return Err(ConfigError::Invalid("ticks_per_second must be positive"));
        }
        if !(1..=MAX_ANIMATION_SIZE).contains(&self.default_canvas_size) {
            return Err(ConfigError::Invalid("default_canvas_size must be between 1 and 4096"));
        }
        if !(self.notice_seconds.is_finite() && self.notice_seconds > 0.0) {
            return Err(ConfigError::Invalid("notice_seconds must be positive"));
        }
        Ok(())
    }

    /// Playback rate as a validated value
    pub fn ticks_per_second(&self) -> NonZeroU32 {
        NonZeroU32::new(self.ticks_per_second).unwrap_or(DEFAULT_TICKS_PER_SECOND)
    }

    /// Duration of one simulation step
    pub fn tick_duration(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.ticks_per_second().get()))
    }

    /// Notice lifetime
    pub fn notice_lifetime(&self) -> Duration {
        Duration::from_secs_f32(self.notice_seconds.max(0.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_file() -> PathBuf {
        std::env::temp_dir().join(format!("puppet_config_{}.ron", uuid::Uuid::new_v4()))
    }

    #[test]
    fn test_default_config() {
        let config = EditorConfig::default();
        assert_eq!(config.version, CONFIG_FORMAT_VERSION);
        assert_eq!(config.ticks_per_second().get(), 60);
        assert_eq!(config.default_canvas_size, 100);
        assert_eq!(config.notice_lifetime(), Duration::from_secs(5));
        assert_eq!(config.window.min_width, 640);
    }

    #[test]
    fn test_serialization() {
        let mut config = EditorConfig::default();
        config.ticks_per_second = 30;
        let ron_str = ron::ser::to_string_pretty(&config, ron::ser::PrettyConfig::default()).unwrap();
        let loaded: EditorConfig = ron::from_str(&ron_str).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_save_and_load() {
        let path = temp_file();
        let mut config = EditorConfig::default();
        config.notice_seconds = 2.5;
        config.save(&path).unwrap();

        let loaded = EditorConfig::load(&path).unwrap();
        assert_eq!(loaded.notice_seconds, 2.5);
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_rejects_newer_version() {
        let path = temp_file();
        let config = EditorConfig {
            version: CONFIG_FORMAT_VERSION + 1,
            ..EditorConfig::default()
        };
        config.save(&path).unwrap();

        assert!(matches!(
            EditorConfig::load(&path),
            Err(ConfigError::UnsupportedVersion { .. })
        ));
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_broken_file_falls_back() {
        let path = temp_file();
        std::fs::write(&path, "not ron at all (").unwrap();
        assert_eq!(EditorConfig::load_or_default(&path), EditorConfig::default());

        std::fs::write(&path, "(version: 1, ticks_per_second: 0, default_canvas_size: 100, notice_seconds: 5.0)").unwrap();
        assert!(matches!(EditorConfig::load(&path), Err(ConfigError::Invalid(_))));

        std::fs::write(&path, "(version: 1, ticks_per_second: 60, default_canvas_size: 100000, notice_seconds: 5.0)").unwrap();
        assert!(matches!(EditorConfig::load(&path), Err(ConfigError::Invalid(_))));
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let path = temp_file();
        assert_eq!(EditorConfig::load_or_default(&path), EditorConfig::default());
        assert_eq!(EditorConfig::load(&path).unwrap(), EditorConfig::default());
        std::fs::remove_file(&path).unwrap();
    }
}
