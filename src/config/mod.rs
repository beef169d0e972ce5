//! Key names and file location used by the version store.
//!
//! Every field can be set from a `propver.toml` file and then overridden
//! individually by the caller. Missing fields take the documented defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

mod defaults;

pub use defaults::DEFAULT_PROPERTIES_FILE;
use defaults::*;

/// Configuration file looked up in the working directory by the CLI.
pub const CONFIG_FILE_NAME: &str = "propver.toml";

/// Errors that may occur while loading the TOML configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("Failed to read {path}: {source}")]
    Read {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },
    /// Failed to parse the configuration file.
    #[error("Invalid config at {path}: {source}")]
    ParseToml {
        /// TOML file path.
        path: PathBuf,
        /// TOML parse error.
        source: toml::de::Error,
    },
}

/// Properties file location and the key name for each version field.
///
/// Config keys: `properties`, `major_key`, `minor_key`, `patch_key`,
/// `pre_release_key`, `pre_release_prefix_key`, `build_meta_key`,
/// `build_meta_prefix_key`, `separator_key`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SemverConfig {
    /// Properties file holding the version.
    #[serde(default = "default_properties")]
    pub properties: PathBuf,
    #[serde(default = "default_major_key")]
    pub major_key: String,
    #[serde(default = "default_minor_key")]
    pub minor_key: String,
    #[serde(default = "default_patch_key")]
    pub patch_key: String,
    #[serde(default = "default_pre_release_key")]
    pub pre_release_key: String,
    #[serde(default = "default_pre_release_prefix_key")]
    pub pre_release_prefix_key: String,
    #[serde(default = "default_build_meta_key")]
    pub build_meta_key: String,
    #[serde(default = "default_build_meta_prefix_key")]
    pub build_meta_prefix_key: String,
    #[serde(default = "default_separator_key")]
    pub separator_key: String,
}

impl Default for SemverConfig {
    fn default() -> Self {
        Self {
            properties: default_properties(),
            major_key: default_major_key(),
            minor_key: default_minor_key(),
            patch_key: default_patch_key(),
            pre_release_key: default_pre_release_key(),
            pre_release_prefix_key: default_pre_release_prefix_key(),
            build_meta_key: default_build_meta_key(),
            build_meta_prefix_key: default_build_meta_prefix_key(),
            separator_key: default_separator_key(),
        }
    }
}

impl SemverConfig {
    /// Default keys pointing at a specific properties file.
    pub fn with_properties(path: impl Into<PathBuf>) -> Self {
        Self {
            properties: path.into(),
            ..Self::default()
        }
    }

    /// Parse configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Load configuration from a TOML file.
    ///
    /// A relative `properties` path is resolved against the directory that
    /// holds the configuration file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_toml_str(&text).map_err(|source| ConfigError::ParseToml {
            path: path.to_path_buf(),
            source,
        })?;
        if config.properties.is_relative() {
            if let Some(parent) = path.parent() {
                config.properties = parent.join(&config.properties);
            }
        }
        Ok(config)
    }

    /// Load configuration from `path` when it exists, defaults otherwise.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }
}
