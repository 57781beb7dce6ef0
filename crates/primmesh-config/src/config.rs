//! Configuration structs with defaults and RON persistence.

use std::path::{Path, PathBuf};

use primmesh_asset::DEFAULT_MAX_PART_BYTES;
use primmesh_types::LevelOfDetail;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// File name used inside a config directory.
pub const CONFIG_FILE: &str = "config.ron";

/// Top-level mesher configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MesherConfig {
    /// Level-of-detail selection.
    pub lod: LodConfig,
    /// Mesh asset decoding.
    pub asset: AssetConfig,
    /// Texture coordinate generation.
    pub texture: TextureConfig,
    /// Debug/development settings.
    pub debug: DebugConfig,
}

/// Level-of-detail configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LodConfig {
    /// Level used when the caller does not pick one.
    pub default_level: LevelOfDetail,
    /// Distance-to-radius ratios at which detail drops to High, Medium and
    /// Low. Must be positive and strictly increasing.
    pub thresholds: [f32; 3],
}

/// Mesh asset decoding configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AssetConfig {
    /// Ceiling in bytes for one decompressed part.
    pub max_part_bytes: usize,
    /// Decode the convex hull part alongside the geometry.
    pub decode_convex: bool,
    /// Physics requests try `physics_mesh`/`physics_shape` before render LODs.
    pub prefer_physics_parts: bool,
}

/// Texture configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct TextureConfig {
    /// Apply per-face repeat/offset/rotation and planar mapping.
    pub apply_transforms: bool,
}

/// Debug/development configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DebugConfig {
    /// Log level override (e.g., "debug", "info", "warn").
    pub log_level: String,
}

// --- Default implementations ---

impl Default for LodConfig {
    fn default() -> Self {
        Self {
            default_level: LevelOfDetail::High,
            thresholds: [8.0, 24.0, 64.0],
        }
    }
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            max_part_bytes: DEFAULT_MAX_PART_BYTES,
            decode_convex: true,
            prefer_physics_parts: true,
        }
    }
}

impl Default for TextureConfig {
    fn default() -> Self {
        Self {
            apply_transforms: true,
        }
    }
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

// --- Load / Save / Reload ---

impl MesherConfig {
    /// The per-user config directory, when the platform has one.
    pub fn default_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("primmesh"))
    }

    /// Load config from the given directory, or create a default config file.
    pub fn load_or_create(config_dir: &Path) -> Result<Self, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE);

        if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
            let config: MesherConfig = ron::from_str(&contents).map_err(ConfigError::ParseError)?;
            log::info!("Loaded config from {}", config_path.display());
            Ok(config)
        } else {
            let config = MesherConfig::default();
            config.save(config_dir)?;
            log::info!("Created default config at {}", config_path.display());
            Ok(config)
        }
    }

    /// Save config to the given directory as `config.ron`.
    pub fn save(&self, config_dir: &Path) -> Result<(), ConfigError> {
        std::fs::create_dir_all(config_dir).map_err(ConfigError::WriteError)?;

        let config_path = config_dir.join(CONFIG_FILE);
        let pretty = ron::ser::PrettyConfig::new()
            .depth_limit(3)
            .separate_tuple_members(true)
            .enumerate_arrays(false);

        let serialized =
            ron::ser::to_string_pretty(self, pretty).map_err(ConfigError::SerializeError)?;

        std::fs::write(&config_path, serialized).map_err(ConfigError::WriteError)?;
        Ok(())
    }

    /// Re-reads the file: `Some(new_config)` if it differs, `None` otherwise.
    pub fn reload(&self, config_dir: &Path) -> Result<Option<Self>, ConfigError> {
        let config_path = config_dir.join(CONFIG_FILE);
        let contents = std::fs::read_to_string(&config_path).map_err(ConfigError::ReadError)?;
        let new_config: MesherConfig = ron::from_str(&contents).map_err(ConfigError::ParseError)?;

        if &new_config != self {
            log::info!("Config reloaded with changes");
            Ok(Some(new_config))
        } else {
            Ok(None)
        }
    }
}
