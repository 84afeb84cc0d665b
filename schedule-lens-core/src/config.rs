//! Configuration for schedule-lens
//!
//! Loaded from a TOML file. Every section and field has a default, so an
//! empty file is a valid configuration.

use crate::extract::ExtractorConfig;
use crate::parser::MspdiParser;
use crate::pipeline::Pipeline;
use crate::upload::UploadPolicy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write config file {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Upload form settings
    pub upload: UploadPolicy,

    /// Milestone markers
    pub extract: ExtractorConfig,

    /// Web server settings
    pub server: ServerConfig,
}

/// Web server configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to listen on
    pub bind: String,

    /// Largest accepted request body. This is a hosting limit; the
    /// pipeline itself accepts any size.
    pub max_upload_bytes: usize,

    /// Sessions kept in memory before the oldest is dropped
    pub max_sessions: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8501".to_string(),
            max_upload_bytes: 50 * 1024 * 1024,
            max_sessions: 1024,
        }
    }
}

impl Config {
    /// Load configuration from file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = self.to_toml()?;
        std::fs::write(path, content).map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Pipeline using the MSPDI parser and this configuration
    pub fn pipeline(&self) -> Pipeline {
        Pipeline::new(Arc::new(MspdiParser::new()))
            .with_extractor(&self.extract)
            .with_policy(UploadPolicy::new(self.upload.extension.clone()))
    }
}
