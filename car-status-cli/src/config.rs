//! Configuration loading and parsing

use anyhow::{Context, Result};
use car_status_decoder::types::MAX_STANDARD_ID;
use car_status_decoder::{CaptureFormat, CarStatus, DecoderConfig};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Main application configuration (loaded from config.toml)
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub input: InputConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub filtering: FilteringConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct InputConfig {
    #[serde(default)]
    pub files: Vec<PathBuf>,
    /// Capture layout; guessed from each file's extension when absent
    pub format: Option<CaptureFormat>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
    /// Field names to report; empty means every field
    #[serde(default)]
    pub track: Vec<String>,
    #[serde(default = "default_true")]
    pub include_stats: bool,
}

fn default_true() -> bool {
    true
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            track: Vec::new(),
            include_stats: true,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Txt,
    Json,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct FilteringConfig {
    pub message_ids: Option<Vec<u16>>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Log every field update at debug level
    #[serde(default)]
    pub field_updates: bool,
}

/// Problems with an otherwise well-formed configuration
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("No capture files given (use --capture or [input] files)")]
    NoInput,

    #[error("Unknown field name in track list: {0}")]
    UnknownField(String),

    #[error("Message ID 0x{0:X} is outside the 11-bit range")]
    InvalidMessageId(u16),
}

impl AppConfig {
    /// Check the parts of the config the TOML schema cannot express
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.input.files.is_empty() {
            return Err(ConfigError::NoInput);
        }

        let known = CarStatus::field_names();
        if let Some(name) = self
            .output
            .track
            .iter()
            .find(|n| !known.iter().any(|k| *k == n.as_str()))
        {
            return Err(ConfigError::UnknownField(name.clone()));
        }

        if let Some(ids) = &self.filtering.message_ids {
            if let Some(&id) = ids.iter().find(|&&id| id > MAX_STANDARD_ID) {
                return Err(ConfigError::InvalidMessageId(id));
            }
        }

        Ok(())
    }

    /// Library-side settings for the dispatcher
    pub fn decoder_config(&self) -> DecoderConfig {
        let mut config = DecoderConfig::new().with_update_logging(self.logging.field_updates);
        if let Some(ids) = &self.filtering.message_ids {
            config = config.with_message_filter(ids.clone());
        }
        config
    }
}

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<AppConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: AppConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    Ok(config)
}
