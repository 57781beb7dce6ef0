//! Mesher settings persisted as `config.ron`.
//!
//! Every section defaults field by field, so older or partial files keep
//! loading as new settings are added.

mod config;
mod error;

pub use config::{AssetConfig, CONFIG_FILE, DebugConfig, LodConfig, MesherConfig, TextureConfig};
pub use error::ConfigError;
