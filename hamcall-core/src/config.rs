use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::Context;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HamcallConfig {
    /// Directory API root, without the trailing call sign segment
    #[serde(default = "default_directory_url")]
    pub directory_url: String,

    /// Client identifier appended to every directory request
    #[serde(default = "default_client_id")]
    pub client_id: String,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Where the key-value store file lives
    #[serde(default = "default_data_dir")]
    pub data_dir: String,

    #[serde(default = "default_log_dir")]
    pub log_dir: String,

    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Days to keep rolled log files
    #[serde(default = "default_log_retention_days")]
    pub log_retention_days: u64,
}

fn default_directory_url() -> String {
    "https://api.hamdb.org/v1".to_string()
}

fn default_client_id() -> String {
    "hamCallLookupChromeExtension".to_string()
}

fn default_user_agent() -> String {
    format!("hamcall/{}", env!("CARGO_PKG_VERSION"))
}

fn default_data_dir() -> String {
    "data".to_string()
}

fn default_log_dir() -> String {
    "logs".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_retention_days() -> u64 {
    3
}

impl Default for HamcallConfig {
    fn default() -> Self {
        Self {
            directory_url: default_directory_url(),
            client_id: default_client_id(),
            user_agent: default_user_agent(),
            data_dir: default_data_dir(),
            log_dir: default_log_dir(),
            log_level: default_log_level(),
            log_retention_days: default_log_retention_days(),
        }
    }
}

impl HamcallConfig {
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        Self::from_toml(&content).with_context(|| format!("Failed to parse config file {:?}", path))
    }

    pub fn from_toml(content: &str) -> anyhow::Result<Self> {
        let config: HamcallConfig = toml::from_str(content)?;
        Ok(config)
    }

    /// Path of the JSON key-value store inside `data_dir`.
    pub fn storage_path(&self) -> PathBuf {
        Path::new(&self.data_dir).join("storage.json")
    }
}

pub static CONFIG: OnceLock<HamcallConfig> = OnceLock::new();

/// Load the config file into [`CONFIG`].
///
/// A missing file is not an error, the defaults are used instead.
/// Returns `true` when the file was found.
pub fn read_config(path: impl AsRef<Path>) -> anyhow::Result<bool> {
    let path = path.as_ref();
    let (config, found) = if path.exists() {
        (HamcallConfig::from_file(path)?, true)
    } else {
        (HamcallConfig::default(), false)
    };

    CONFIG
        .set(config)
        .map_err(|_| anyhow::anyhow!("Configuration already loaded"))?;

    Ok(found)
}
