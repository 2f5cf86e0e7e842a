//! Application configuration.
//!
//! Settings are read from `<config_dir>/campuslend/config.toml` and then from
//! `CAMPUSLEND_*` environment variables, which take precedence.

use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Directory name used under the platform config and data directories.
pub const APP_DIR: &str = "campuslend";

/// Prefix for environment overrides, e.g. `CAMPUSLEND_LOG_LEVEL=debug`.
pub const ENV_PREFIX: &str = "CAMPUSLEND";

const DEFAULT_CONFIG: &str = r#"# campuslend configuration

# Directory holding persisted marketplace state and logs.
# data_dir = "/home/me/.local/share/campuslend"

# Default tracing filter; RUST_LOG overrides it.
log_level = "info"
"#;

/// Runtime configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    /// Root for the key-value store and log files.
    pub data_dir: PathBuf,
    /// Default tracing filter directive.
    pub log_level: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(APP_DIR),
            log_level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Load from the default config file plus environment overrides.
    pub fn load() -> Result<Self> {
        Self::load_from(config_path())
    }

    /// Load from `path` plus environment overrides. A missing file is not an error.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let defaults = AppConfig::default();
        let settings = config::Config::builder()
            .set_default("data_dir", defaults.data_dir.to_string_lossy().into_owned())?
            .set_default("log_level", defaults.log_level)?
            .add_source(config::File::from(path).required(false))
            .add_source(config::Environment::with_prefix(ENV_PREFIX))
            .build()
            .with_context(|| format!("failed to read configuration from {}", path.display()))?;

        settings
            .try_deserialize()
            .context("failed to deserialize configuration")
    }

    /// Directory holding one file per storage key.
    pub fn storage_dir(&self) -> PathBuf {
        self.data_dir.join("store")
    }

    /// Directory receiving log files.
    pub fn log_dir(&self) -> PathBuf {
        self.data_dir.join("logs")
    }
}

/// Default location of the config file.
pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
        .join("config.toml")
}

/// Write the commented default config file if none exists yet.
pub fn ensure_default_config() -> Result<PathBuf> {
    ensure_default_config_at(config_path())
}

/// Write the commented default config to `path` if it does not exist.
pub fn ensure_default_config_at(path: impl Into<PathBuf>) -> Result<PathBuf> {
    let path = path.into();
    if path.exists() {
        return Ok(path);
    }
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    fs::write(&path, DEFAULT_CONFIG)
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(path)
}
