//! Loader configuration — optional ~/.sprite-anim/config.yaml.

use serde::{Deserialize, Serialize};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::dsl::DuplicateKeyPolicy;

/// Settings applied when loading `.anim` assets.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AnimConfig {
    /// Base directory for texture paths. Defaults to the directory of the
    /// `.anim` file being loaded.
    #[serde(default)]
    pub asset_root: Option<PathBuf>,
    /// Handling of two `VALUE` paths that produce the same key.
    #[serde(default)]
    pub duplicate_keys: DuplicateKeyPolicy,
    /// Build every playback state right after loading instead of on first use.
    #[serde(default)]
    pub preload: bool,
    /// Cadence for states with no `FRAMES_PER_UPDATE` in scope.
    #[serde(default = "default_frames_per_update")]
    pub default_frames_per_update: u32,
}

fn default_frames_per_update() -> u32 {
    1
}

impl Default for AnimConfig {
    fn default() -> Self {
        Self {
            asset_root: None,
            duplicate_keys: DuplicateKeyPolicy::default(),
            preload: false,
            default_frames_per_update: default_frames_per_update(),
        }
    }
}

/// Failure reading an explicit config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] io::Error),
    #[error("malformed config: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Get the config file path.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".sprite-anim").join("config.yaml"))
}

/// Load configuration from ~/.sprite-anim/config.yaml.
/// Returns None if the file doesn't exist or can't be parsed.
pub fn load_config() -> Option<AnimConfig> {
    let path = config_path()?;
    load_config_from(&path).ok()
}

/// Load configuration from an explicit path.
pub fn load_config_from(path: &Path) -> Result<AnimConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config: AnimConfig = serde_yaml::from_str(&content)?;
    if config.default_frames_per_update == 0 {
        return Err(ConfigError::Invalid(
            "default_frames_per_update must be positive".into(),
        ));
    }
    Ok(config)
}
