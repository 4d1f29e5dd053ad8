//! Configuration file support for tokensnap.
//!
//! Settings are read from `~/.config/tokensnap/config.toml`. If no config file
//! exists, defaults are used automatically.

pub mod types;

pub use types::{ExportSection, OutputSection};

use crate::export::{
    ExportConfig, ExportSettings, FileSaveConfig,
    file::expand_tilde,
    types::{MAX_FONT_SIZE_PX, MIN_FONT_SIZE_PX},
};
use anyhow::{Context, Result};
use log::{debug, info};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Longest accepted capture timeout.
const MAX_CAPTURE_TIMEOUT_MS: u64 = 600_000;

/// Main configuration structure containing all user settings.
///
/// # Example TOML
/// ```toml
/// [export]
/// font_size = 28
/// layout = "tight"
/// include_label = true
/// label = "gpt2"
/// capture_timeout_ms = 10000
///
/// [output]
/// save_directory = "~/Documents/tokens"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Config {
    /// Export defaults (typography, layout, label)
    #[serde(default)]
    pub export: ExportSection,

    /// Output locations
    #[serde(default)]
    pub output: OutputSection,
}

impl Config {
    /// Validates and clamps configuration values to acceptable ranges,
    /// logging a warning for each correction.
    ///
    /// Validated ranges:
    /// - `export.font_size`: 8 - 48
    /// - `export.capture_timeout_ms`: 0 - 600000
    fn validate_and_clamp(&mut self) {
        if !(MIN_FONT_SIZE_PX..=MAX_FONT_SIZE_PX).contains(&self.export.font_size) {
            log::warn!(
                "Invalid font_size {}, clamping to {}-{} range",
                self.export.font_size,
                MIN_FONT_SIZE_PX,
                MAX_FONT_SIZE_PX
            );
            self.export.font_size = self
                .export
                .font_size
                .clamp(MIN_FONT_SIZE_PX, MAX_FONT_SIZE_PX);
        }

        if self.export.capture_timeout_ms > MAX_CAPTURE_TIMEOUT_MS {
            log::warn!(
                "Invalid capture_timeout_ms {}, clamping to {}",
                self.export.capture_timeout_ms,
                MAX_CAPTURE_TIMEOUT_MS
            );
            self.export.capture_timeout_ms = MAX_CAPTURE_TIMEOUT_MS;
        }

        if self.export.include_label && self.export.label.trim().is_empty() {
            log::warn!("include_label is set but label is empty, disabling the label");
            self.export.include_label = false;
        }
    }

    /// Returns the path to the configuration file.
    ///
    /// # Errors
    /// Returns an error if the config directory cannot be determined (e.g., HOME not set).
    pub fn get_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not find config directory")?
            .join("tokensnap");

        Ok(config_dir.join("config.toml"))
    }

    /// Loads the configuration file, or returns defaults if there is none.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;

        if !config_path.exists() {
            info!("Config file not found, using defaults");
            debug!("Expected config at: {}", config_path.display());
            return Ok(Self::default());
        }

        Self::load_from(&config_path)
    }

    /// Loads a configuration file from an explicit path. The file must exist.
    pub fn load_from(config_path: &Path) -> Result<Self> {
        let config_str = fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config from {}", config_path.display()))?;

        let mut config = Self::parse(&config_str)
            .with_context(|| format!("Failed to parse config from {}", config_path.display()))?;

        info!("Loaded config from {}", config_path.display());
        debug!("Config: {:?}", config);
        config.validate_and_clamp();

        Ok(config)
    }

    fn parse(config_str: &str) -> Result<Self> {
        Ok(toml::from_str(config_str)?)
    }

    /// Saves the configuration to `path`, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let config_str = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(path, config_str)
            .with_context(|| format!("Failed to write config to {}", path.display()))?;

        info!("Saved config to {}", path.display());
        Ok(())
    }

    /// JSON schema of the configuration file.
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Config)
    }

    /// Export options for one invocation, before command-line overrides.
    pub fn export_config(&self) -> ExportConfig {
        let config = ExportConfig::new(self.export.font_size).with_layout(self.export.layout);
        if self.export.include_label {
            config.with_label(self.export.label.clone())
        } else {
            config
        }
    }

    pub fn export_settings(&self) -> ExportSettings {
        let capture_timeout = match self.export.capture_timeout_ms {
            0 => None,
            ms => Some(Duration::from_millis(ms)),
        };
        let save_config = match &self.output.save_directory {
            Some(directory) => FileSaveConfig::in_directory(expand_tilde(directory)),
            None => FileSaveConfig::default(),
        };
        ExportSettings {
            capture_timeout,
            save_config,
        }
    }
}
