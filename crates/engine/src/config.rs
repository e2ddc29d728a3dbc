//! Harness configuration via `rulechain.toml`
//!
//! Every field has a default, so an empty file (or no file at all) is a
//! valid configuration. `HarnessConfig::load()` reads the file named by the
//! `RULECHAIN_CONFIG` environment variable when it is set.

use serde::{Deserialize, Serialize};
use std::io;
use std::path::Path;
use thiserror::Error;
use tracing::Level;

/// Conventional config file name
pub const CONFIG_FILE_NAME: &str = "rulechain.toml";

/// Environment variable pointing at a config file
pub const CONFIG_ENV_VAR: &str = "RULECHAIN_CONFIG";

/// Errors raised while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read or written
    #[error("failed to access config file '{path}': {source}")]
    Io {
        /// Path of the config file
        path: String,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// The config file is not valid TOML for this schema
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// The config could not be rendered as TOML
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// `log_level` is not a known level
    #[error("invalid log level '{0}': expected trace, debug, info, warn or error")]
    InvalidLevel(String),
}

/// Harness settings loaded from `rulechain.toml`.
///
/// # Example
///
/// ```toml
/// log_level = "debug"
/// abort_on_suite_failure = true
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HarnessConfig {
    /// Max level for [`init_logging`](crate::init_logging).
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Panic from suite teardown instead of returning the failures.
    #[serde(default)]
    pub abort_on_suite_failure: bool,
    /// Record panics from test bodies as failures instead of resuming them.
    #[serde(default = "default_capture_panics")]
    pub capture_panics: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_capture_panics() -> bool {
    true
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            abort_on_suite_failure: false,
            capture_panics: default_capture_panics(),
        }
    }
}

impl HarnessConfig {
    /// Parse `log_level` into a tracing level.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidLevel`] for anything but the five level names.
    pub fn level(&self) -> Result<Level, ConfigError> {
        match self.log_level.to_ascii_lowercase().as_str() {
            "trace" => Ok(Level::TRACE),
            "debug" => Ok(Level::DEBUG),
            "info" => Ok(Level::INFO),
            "warn" => Ok(Level::WARN),
            "error" => Ok(Level::ERROR),
            _ => Err(ConfigError::InvalidLevel(self.log_level.clone())),
        }
    }

    /// Returns the default config file content with comments.
    pub fn default_toml() -> &'static str {
        r#"# rulechain harness configuration
#
# Max log level: trace, debug, info (default), warn or error
log_level = "info"

# Panic from suite teardown when any suite hook failed (default: false).
# When false, the failures are returned as an error.
abort_on_suite_failure = false

# Record panics in test bodies as failures (default: true).
# When false, the panic propagates to the test runner unchanged.
capture_panics = true
"#
    }

    /// Parse and validate config from TOML text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not valid TOML or names an unknown level.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: HarnessConfig = toml::from_str(content)?;
        config.level()?;
        Ok(config)
    }

    /// Read and parse config from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Load from `$RULECHAIN_CONFIG`, or defaults when it is unset.
    ///
    /// # Errors
    ///
    /// Returns an error if the variable names an unreadable or invalid file.
    pub fn load() -> Result<Self, ConfigError> {
        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) => Self::from_file(Path::new(&path)),
            None => Ok(Self::default()),
        }
    }

    /// Write the default config file if it does not already exist.
    pub fn write_default_if_missing(path: &Path) -> Result<(), ConfigError> {
        if !path.exists() {
            std::fs::write(path, Self::default_toml()).map_err(|source| ConfigError::Io {
                path: path.display().to_string(),
                source,
            })?;
        }
        Ok(())
    }

    /// Serialize this config to TOML and write it to the given path.
    pub fn write_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })
    }
}
