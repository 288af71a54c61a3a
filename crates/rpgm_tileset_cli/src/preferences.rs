//! Persistent export preferences
//!
//! Stored as TOML in the platform config directory:
//! - Windows: %APPDATA%/rpgm_tileset/config/
//! - Linux: ~/.config/rpgm_tileset/
//! - macOS: ~/Library/Application Support/rpgm_tileset/

use directories::ProjectDirs;
use rpgm_tileset_export::{ExportSettings, HexColor, IntermediateFormat};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

const FILE_NAME: &str = "preferences.toml";

#[derive(Debug, Error)]
pub enum PreferencesError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to serialize preferences: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Settings remembered between runs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    /// Version for future migrations
    pub version: u32,
    pub tile_width: Option<u32>,
    pub tile_height: Option<u32>,
    pub intermediate_format: IntermediateFormat,
    pub use_transparent_color: bool,
    pub transparent_color: Option<HexColor>,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            version: 1,
            tile_width: None,
            tile_height: None,
            intermediate_format: IntermediateFormat::TileMap,
            use_transparent_color: false,
            transparent_color: None,
        }
    }
}

impl Preferences {
    /// Location of the preferences file, if the platform has a config dir
    pub fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "rpgm_tileset").map(|dirs| dirs.config_dir().join(FILE_NAME))
    }

    /// Load from a file; a missing or unreadable file yields defaults
    pub fn load_from(path: &Path) -> Self {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(_) => return Self::default(),
        };
        match toml::from_str(&content) {
            Ok(preferences) => preferences,
            Err(e) => {
                tracing::warn!("Ignoring unreadable preferences {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Write to a file, creating its directory
    pub fn save_to(&self, path: &Path) -> Result<(), PreferencesError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Transparent colour to use when none is given explicitly
    pub fn default_transparent_color(&self) -> Option<HexColor> {
        self.transparent_color.filter(|_| self.use_transparent_color)
    }

    /// Remember the choices of an export
    pub fn remember(&mut self, settings: &ExportSettings) {
        self.tile_width = Some(settings.tile_width);
        self.tile_height = Some(settings.tile_height);
        self.intermediate_format = settings.intermediate;
        self.use_transparent_color = settings.transparent_color.is_some();
        if settings.transparent_color.is_some() {
            self.transparent_color = settings.transparent_color;
        }
    }
}
