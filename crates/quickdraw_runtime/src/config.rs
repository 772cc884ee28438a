//! Runtime configuration, deserialized from a TOML file
//!
//! Every field has a default, so an empty file (or no file at all) gives a
//! playable setup: a 320x240 viewport, player speed 1.5 px/frame and enemy
//! speed 1 px/frame.

use crate::MapId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while loading the configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Top-level runtime configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuntimeConfig {
    #[serde(default)]
    pub viewport: ViewportConfig,
    #[serde(default)]
    pub player: PlayerConfig,
    #[serde(default)]
    pub enemy: EnemyConfig,
    #[serde(default)]
    pub maps: MapCatalog,
}

impl RuntimeConfig {
    /// Parse a configuration from a TOML string
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load a configuration file
    ///
    /// Relative map paths are resolved against the file's directory.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config = Self::from_toml_str(&content)?;
        config.maps.base_dir = path.parent().map(Path::to_path_buf);
        Ok(config)
    }
}

/// Size of the visible area in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportConfig {
    #[serde(default = "default_viewport_width")]
    pub width: u32,
    #[serde(default = "default_viewport_height")]
    pub height: u32,
}

fn default_viewport_width() -> u32 {
    320
}

fn default_viewport_height() -> u32 {
    240
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            width: default_viewport_width(),
            height: default_viewport_height(),
        }
    }
}

impl ViewportConfig {
    pub fn size(&self) -> [f32; 2] {
        [self.width as f32, self.height as f32]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerConfig {
    /// Pixels per frame on each pressed axis
    #[serde(default = "default_player_speed")]
    pub speed: f32,
    /// Where the player starts on the first map
    #[serde(default = "default_spawn")]
    pub spawn: [f32; 2],
}

fn default_player_speed() -> f32 {
    1.5
}

fn default_spawn() -> [f32; 2] {
    [125.0, 125.0]
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            speed: default_player_speed(),
            spawn: default_spawn(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnemyConfig {
    /// Pixels per frame on each axis while following the player
    #[serde(default = "default_enemy_speed")]
    pub speed: f32,
}

fn default_enemy_speed() -> f32 {
    1.0
}

impl Default for EnemyConfig {
    fn default() -> Self {
        Self {
            speed: default_enemy_speed(),
        }
    }
}

/// Known maps and where their files live
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MapCatalog {
    /// Map loaded when the session starts
    #[serde(default)]
    pub start: Option<MapId>,
    #[serde(default)]
    pub paths: BTreeMap<MapId, PathBuf>,
    /// Directory relative paths are resolved against
    #[serde(skip)]
    pub base_dir: Option<PathBuf>,
}

impl MapCatalog {
    /// Get the file for a map, resolved against the config directory
    pub fn path_for(&self, id: &MapId) -> Option<PathBuf> {
        let path = self.paths.get(id)?;
        match &self.base_dir {
            Some(base) if path.is_relative() => Some(base.join(path)),
            _ => Some(path.clone()),
        }
    }
}
