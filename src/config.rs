use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::ConfigError;
use crate::loader::LoaderOptions;

const CONFIG_DIR_NAME: &str = "sd-quickview";
const CONFIG_FILE_NAME: &str = "config.toml";

/// Cache location relative to the working directory
pub const DEFAULT_CACHE_DIR: &str = ".sd-quickview/cache";

/// Icon size of the browser grid
pub const DEFAULT_THUMBNAIL_EDGE: u32 = 100;

/// Engine settings, usually read from `config.toml`
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    /// Directory holding the thumbnail database
    pub cache_dir: PathBuf,
    /// Longer edge of generated thumbnails, in pixels
    pub thumbnail_edge: u32,
    /// Concurrent thumbnail workers. 0 picks twice the available parallelism.
    pub workers: usize,
    /// Per-file timeout in seconds. 0 disables it.
    pub unit_timeout_secs: u64,
    /// Follow symbolic links while scanning
    pub follow_links: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            cache_dir: PathBuf::from(DEFAULT_CACHE_DIR),
            thumbnail_edge: DEFAULT_THUMBNAIL_EDGE,
            workers: 0,
            unit_timeout_secs: 30,
            follow_links: false,
        }
    }
}

impl EngineConfig {
    /// Load from an explicit file, else from the user config directory if a
    /// file exists there, else defaults.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        match Self::default_path() {
            Some(path) if path.exists() => Self::from_file(&path),
            _ => Ok(Self::default()),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("Loading config from {}", path.display());
        Self::from_toml(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// `<config dir>/sd-quickview/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    pub fn loader_options(&self) -> LoaderOptions {
        let defaults = LoaderOptions::default();
        LoaderOptions {
            workers: if self.workers == 0 { defaults.workers } else { self.workers },
            unit_timeout: (self.unit_timeout_secs > 0).then(|| Duration::from_secs(self.unit_timeout_secs)),
        }
    }
}
