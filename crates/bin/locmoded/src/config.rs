//! Configuration loading: TOML file with environment variable overrides.
//!
//! Looks for `locmode.toml` (or the file passed with `--config`). Every field
//! has a sensible default so the file is optional. Environment variables take
//! precedence over file values.

use std::path::{Path, PathBuf};

use locmode_domain::compiler::Variant;
use serde::Deserialize;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Host directories.
    pub paths: PathsConfig,
    /// Generated package settings.
    pub output: OutputConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Raw add-on options JSON, only ever taken from `OPTIONS`.
    #[serde(skip)]
    pub addon_options: Option<String>,
}

/// Where Home Assistant and the add-on keep their files.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Home Assistant configuration directory (holds `configuration.yaml`).
    pub config_dir: PathBuf,
    /// Add-on data directory (holds `ui_config.json`).
    pub data_dir: PathBuf,
}

/// Package generation settings.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Branding of rule ids, aliases and the default package path.
    pub variant: Variant,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

impl Config {
    /// Load configuration from `path` (if present) then apply
    /// environment-variable overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if an
    /// override or the resulting configuration is invalid.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::from_file(path)?;
        config.apply_env_overrides(|name| std::env::var(name).ok())?;
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_env_overrides(
        &mut self,
        var: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(val) = var("LOCMODE_CONFIG_DIR") {
            self.paths.config_dir = PathBuf::from(val);
        }
        if let Some(val) = var("DATA_DIR") {
            self.paths.data_dir = PathBuf::from(val);
        }
        if let Some(val) = var("LOCMODE_VARIANT") {
            self.output.variant = val
                .parse()
                .map_err(|err| ConfigError::Validation(format!("LOCMODE_VARIANT: {err}")))?;
        }
        if let Some(val) = var("OPTIONS") {
            self.addon_options = Some(val);
        }
        if let Some(val) = var("LOCMODE_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = var("RUST_LOG") {
            self.logging.filter = val;
        }
        Ok(())
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.paths.config_dir.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "paths.config_dir must not be empty".to_string(),
            ));
        }
        if self.paths.data_dir.as_os_str().is_empty() {
            return Err(ConfigError::Validation(
                "paths.data_dir must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            config_dir: PathBuf::from("/config"),
            data_dir: PathBuf::from("/data"),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "locmoded=info,locmode_app=info,locmode_adapter_ha_package=info".to_string(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}
