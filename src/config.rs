use anyhow::{Context, Result};
use directories::BaseDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

pub const DEFAULT_CATALOG_URL: &str =
    "https://raw.githubusercontent.com/stuffbymax/game-dependencies-db/main/games.json";
const DEFAULT_TIMEOUT_SECS: u64 = 15;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_catalog_url")]
    pub catalog_url: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            catalog_url: default_catalog_url(),
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl AppConfig {
    /// Reads `config.json` from the data dir. The file is optional and never
    /// written back, so an unreadable one falls back to defaults and the
    /// problem is returned for the caller to report.
    pub fn load() -> (Self, Option<String>) {
        match base_data_dir() {
            Ok(dir) => Self::load_or_default(&dir.join("config.json")),
            Err(_) => (Self::default(), None),
        }
    }

    pub fn load_or_default(path: &Path) -> (Self, Option<String>) {
        match Self::load_from(path) {
            Ok(config) => (config, None),
            Err(err) => (
                Self::default(),
                Some(format!("Ignoring {}: {err:#}", path.display())),
            ),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(path).context("read app config")?;
        let config: AppConfig = serde_json::from_str(&raw).context("parse app config")?;
        Ok(config)
    }
}

pub fn log_path() -> Option<PathBuf> {
    let dir = base_data_dir().ok()?;
    fs::create_dir_all(&dir).ok()?;
    Some(dir.join("dependo.log"))
}

fn default_catalog_url() -> String {
    DEFAULT_CATALOG_URL.to_string()
}

fn default_user_agent() -> String {
    format!("Dependo/{}", env!("CARGO_PKG_VERSION"))
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn base_data_dir() -> Result<PathBuf> {
    let base = BaseDirs::new().context("resolve home dir")?;
    Ok(base.data_local_dir().join("dependo"))
}
