use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use chatroom_core::CoreConfig;
use serde::{Deserialize, Serialize};

/// CLI configuration that can be loaded from a JSON file
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CliConfig {
    /// Directory holding the persisted stores
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,

    /// Settle time for interactive search, in milliseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_debounce_ms: Option<u64>,
}

impl CliConfig {
    /// Load config from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_json(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to deserialize config")
    }

    /// Resolve the core configuration. Priority for the data directory:
    /// explicit override, then the config file, then the platform data dir.
    pub fn core_config(&self, data_dir_override: Option<PathBuf>) -> CoreConfig {
        let data_dir = data_dir_override
            .or_else(|| self.data_dir.clone())
            .unwrap_or_else(default_data_dir);

        let config = CoreConfig::new(data_dir);
        match self.search_debounce_ms {
            Some(ms) => config.with_search_debounce(Duration::from_millis(ms)),
            None => config,
        }
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("chatroom"))
        .unwrap_or_else(|| CoreConfig::default().data_dir)
}
