//! Codec configuration.
//!
//! Configuration is loaded in the following order (later overrides earlier):
//! 1. Default values
//! 2. YAML config file (if specified via GOSSIP_CODEC_CONFIG)
//! 3. Environment variables

use crate::{DEFAULT_COMPRESSION_LEVEL, MAX_RECORD_SIZE};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Tunables for the envelope codec.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// zlib compression level, 0 (store) to 9 (best).
    pub compression_level: u32,
    /// Largest decompressed record accepted by decode, in bytes.
    pub max_record_size: usize,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            compression_level: DEFAULT_COMPRESSION_LEVEL,
            max_record_size: MAX_RECORD_SIZE,
        }
    }
}

impl CodecConfig {
    /// Loads configuration from file, then applies environment variable overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(path) = std::env::var("GOSSIP_CODEC_CONFIG") {
            config = Self::from_file(&path)?;
        }

        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::IoError(path.to_path_buf(), e))?;
        let config: CodecConfig = serde_yaml::from_str(&content)
            .map_err(|e| ConfigError::ParseError(path.to_path_buf(), e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from environment variables only.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.apply_env_overrides();
        config
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(level) = lookup("GOSSIP_COMPRESSION_LEVEL") {
            match level.parse() {
                Ok(n) => self.compression_level = n,
                Err(_) => tracing::warn!(value = %level, "Ignoring invalid GOSSIP_COMPRESSION_LEVEL"),
            }
        }

        if let Some(size) = lookup("GOSSIP_MAX_RECORD_SIZE") {
            match size.parse() {
                Ok(n) => self.max_record_size = n,
                Err(_) => tracing::warn!(value = %size, "Ignoring invalid GOSSIP_MAX_RECORD_SIZE"),
            }
        }
    }

    /// Checks that every setting is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.compression_level > 9 {
            return Err(ConfigError::ValidationError(format!(
                "compression_level must be between 0 and 9, got {}",
                self.compression_level
            )));
        }
        if self.max_record_size == 0 {
            return Err(ConfigError::ValidationError(
                "max_record_size must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Saves configuration to a YAML file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        let content = serde_yaml::to_string(self)
            .map_err(|e| ConfigError::ParseError(path.to_path_buf(), e.to_string()))?;
        std::fs::write(path, content).map_err(|e| ConfigError::IoError(path.to_path_buf(), e))?;
        Ok(())
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file '{}': {}", .0.display(), .1)]
    IoError(PathBuf, #[source] std::io::Error),

    #[error("failed to parse config file '{}': {}", .0.display(), .1)]
    ParseError(PathBuf, String),

    #[error("configuration validation failed: {0}")]
    ValidationError(String),
}
