//! Application configuration
//!
//! Loaded from an optional TOML file, then overridden from the environment:
//!
//! ```toml
//! output_dir = "reports"
//! log_filter = "readiness=debug"
//!
//! [sink]
//! format = "csv"
//! path = "responses.csv"
//! ```

use readiness_sink::SinkFormat;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Directory generated reports are written to
pub const ENV_OUTPUT_DIR: &str = "READINESS_OUTPUT_DIR";
/// Sink destination file
pub const ENV_SINK_PATH: &str = "READINESS_SINK_PATH";
/// Sink format, `csv` or `jsonl`
pub const ENV_SINK_FORMAT: &str = "READINESS_SINK_FORMAT";
/// Log filter directive
pub const ENV_LOG: &str = "READINESS_LOG";

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("failed to read config {path}: {source}")]
    Io {
        /// File that was read
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// Config file is not valid TOML for [`AppConfig`]
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Environment override has an unusable value
    #[error("invalid value for {var}: {message}")]
    InvalidEnv {
        /// Variable name
        var: &'static str,
        /// What was wrong
        message: String,
    },
}

/// Where finished records go
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SinkConfig {
    /// Row format
    pub format: SinkFormat,
    /// Destination file
    pub path: PathBuf,
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self {
            format: SinkFormat::Csv,
            path: PathBuf::from("responses.csv"),
        }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    /// Directory generated reports are written to
    pub output_dir: PathBuf,
    /// `tracing` filter used when `RUST_LOG` is unset
    pub log_filter: Option<String>,
    /// Persistence settings
    pub sink: SinkConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("reports"),
            log_filter: None,
            sink: SinkConfig::default(),
        }
    }
}

impl AppConfig {
    /// Parse from TOML text
    ///
    /// # Errors
    /// Returns [`ConfigError::Parse`] for malformed TOML or unknown keys.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Load from `path`. A missing file yields the defaults unless `required`.
    ///
    /// # Errors
    /// Returns [`ConfigError`] when the file cannot be read or parsed.
    pub fn load(path: &Path, required: bool) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(text) => Self::from_toml(&text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound && !required => Ok(Self::default()),
            Err(source) => Err(ConfigError::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Apply overrides from the process environment
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidEnv`] for an unknown sink format.
    pub fn with_env(self) -> Result<Self, ConfigError> {
        self.with_overrides(|var| std::env::var(var).ok())
    }

    /// Apply overrides from `lookup`; empty values are ignored
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidEnv`] for an unknown sink format.
    pub fn with_overrides(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

        if let Some(dir) = get(ENV_OUTPUT_DIR) {
            self.output_dir = PathBuf::from(dir);
        }
        if let Some(path) = get(ENV_SINK_PATH) {
            self.sink.path = PathBuf::from(path);
        }
        if let Some(format) = get(ENV_SINK_FORMAT) {
            self.sink.format = format.parse().map_err(|e: readiness_sink::UnknownFormat| {
                ConfigError::InvalidEnv {
                    var: ENV_SINK_FORMAT,
                    message: e.to_string(),
                }
            })?;
        }
        if let Some(filter) = get(ENV_LOG) {
            self.log_filter = Some(filter);
        }
        Ok(self)
    }

    /// Filter directive to use when `RUST_LOG` is unset
    #[must_use]
    pub fn log_filter(&self) -> &str {
        self.log_filter.as_deref().unwrap_or("info")
    }
}
