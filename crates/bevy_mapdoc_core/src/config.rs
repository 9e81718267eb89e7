//! Map loader configuration.
//!
//! Every field has a default, so a JSON file only needs the values it changes:
//!
//! ```json
//! {
//!     "loader_name": "mygame",
//!     "screen_width": 1280,
//!     "screen_height": 720,
//!     "excluded_directories": [".svn", ".git"]
//! }
//! ```

use std::path::{Path, PathBuf};

use bevy::math::UVec2;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid loader configuration: {0}")]
    Json(#[from] serde_json::Error),
}

/// Settings for [`MapLoader`](crate::loaders::MapLoader).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MapLoaderConfig {
    /// Name compared against a map's `loader` attribute by `is_loadable`.
    pub loader_name: String,
    /// Render surface width, used for cameras without a viewport.
    pub screen_width: u32,
    /// Render surface height, used for cameras without a viewport.
    pub screen_height: u32,
    /// Progress notification step in percent.
    pub percent_done_interval: u32,
    /// Extension (without dot) of object documents found by directory imports.
    pub object_extension: String,
    /// Directory names never entered by directory imports.
    pub excluded_directories: Vec<String>,
}

impl Default for MapLoaderConfig {
    fn default() -> Self {
        Self {
            loader_name: "mapdoc_default".to_string(),
            screen_width: 1024,
            screen_height: 768,
            percent_done_interval: 10,
            object_extension: "xml".to_string(),
            excluded_directories: vec![".svn".to_string()],
        }
    }
}

impl MapLoaderConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    pub fn screen_size(&self) -> UVec2 {
        UVec2::new(self.screen_width, self.screen_height)
    }

    pub(crate) fn is_excluded(&self, directory_name: &str) -> bool {
        self.excluded_directories
            .iter()
            .any(|excluded| excluded == directory_name)
    }
}
