//! Core configuration.
//!
//! # Responsibility
//! - Describe host-tunable settings for the core (currently logging).
//! - Parse them from JSON with per-field defaults and validate them.
//!
//! # Invariants
//! - A `CoreConfig` that passed `validate` can be handed to `init_logging`
//!   without further checks.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

const DEFAULT_MAX_LOG_FILE_BYTES: u64 = 10 * 1024 * 1024;
const DEFAULT_MAX_LOG_FILES: usize = 5;

/// Top-level core settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    pub logging: LoggingConfig,
}

/// Logging backend settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `trace|debug|info|warn|error`, case-insensitive (`warning` accepted).
    pub level: String,
    /// Absolute directory for rolling log files; `None` logs to stderr.
    pub log_dir: Option<PathBuf>,
    pub max_file_bytes: u64,
    pub max_files: usize,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level().to_string(),
            log_dir: None,
            max_file_bytes: DEFAULT_MAX_LOG_FILE_BYTES,
            max_files: DEFAULT_MAX_LOG_FILES,
        }
    }
}

impl CoreConfig {
    /// Parses and validates a JSON config document.
    ///
    /// Missing fields take their defaults.
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(raw).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.logging.validate()
    }
}

impl LoggingConfig {
    /// Logs to stderr at `level`.
    pub fn stderr(level: impl Into<String>) -> Self {
        Self {
            level: level.into(),
            ..Self::default()
        }
    }

    /// Logs to rolling files under `log_dir` at `level`.
    pub fn file(level: impl Into<String>, log_dir: impl Into<PathBuf>) -> Self {
        Self {
            level: level.into(),
            log_dir: Some(log_dir.into()),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        normalize_level(&self.level)?;
        if let Some(dir) = &self.log_dir {
            if dir.as_os_str().is_empty() || !dir.is_absolute() {
                return Err(ConfigError::RelativeLogDir(dir.clone()));
            }
        }
        if self.max_file_bytes == 0 || self.max_files == 0 {
            return Err(ConfigError::EmptyRotation);
        }
        Ok(())
    }

    /// Canonical level string for the logger backend.
    pub fn normalized_level(&self) -> Result<&'static str, ConfigError> {
        normalize_level(&self.level)
    }
}

/// Returns the default log level for the current build mode.
///
/// - `debug` builds -> `debug`
/// - `release` builds -> `info`
pub fn default_log_level() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    }
}

fn normalize_level(level: &str) -> Result<&'static str, ConfigError> {
    match level.trim().to_ascii_lowercase().as_str() {
        "trace" => Ok("trace"),
        "debug" => Ok("debug"),
        "info" => Ok("info"),
        "warn" | "warning" => Ok("warn"),
        "error" => Ok("error"),
        other => Err(ConfigError::UnsupportedLevel(other.to_string())),
    }
}

/// Configuration parse/validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Parse(String),
    UnsupportedLevel(String),
    RelativeLogDir(PathBuf),
    EmptyRotation,
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(message) => write!(f, "invalid config document: {message}"),
            Self::UnsupportedLevel(value) => write!(
                f,
                "unsupported log level `{value}`; expected trace|debug|info|warn|error"
            ),
            Self::RelativeLogDir(path) => {
                write!(f, "log_dir must be an absolute path, got `{}`", path.display())
            }
            Self::EmptyRotation => write!(f, "max_file_bytes and max_files must be non-zero"),
        }
    }
}

impl Error for ConfigError {}
