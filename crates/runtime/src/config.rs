use std::path::{Path, PathBuf};

use scene::{ViewState, DEFAULT_STYLE};
use serde::{Deserialize, Serialize};

pub const DEFAULT_TILES_URL: &str = "http://localhost:8080/tiles";
pub const DEFAULT_REPORT_URL: &str = "http://localhost:8080/api/report";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Host configuration. Every field is optional in the JSON file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ViewerConfig {
    /// Substituted for `{tiles}` in catalog tile templates.
    pub tiles_base_url: String,
    pub report_endpoint: String,
    pub initial_view: ViewState,
    pub base_style: String,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            tiles_base_url: DEFAULT_TILES_URL.to_string(),
            report_endpoint: DEFAULT_REPORT_URL.to_string(),
            initial_view: ViewState::default(),
            base_style: DEFAULT_STYLE.to_string(),
        }
    }
}

impl ViewerConfig {
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw)
    }
}
