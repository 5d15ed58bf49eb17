//! Core logging bootstrap.
//!
//! # Responsibility
//! - Install the `flexi_logger` backend behind the `log` facade once per process.
//! - Emit metadata-only events (identities, capability names, indices).
//!
//! # Invariants
//! - Initialization is idempotent for an identical configuration.
//! - Re-initialization with a different level or destination is rejected.
//! - Initialization never panics.

use crate::config::{ConfigError, LoggingConfig};
use flexi_logger::{Cleanup, Criterion, FileSpec, Logger, LoggerHandle, Naming, WriteMode};
use log::info;
use once_cell::sync::OnceCell;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

const LOG_FILE_BASENAME: &str = "captarget";

static LOGGING_STATE: OnceCell<LoggingState> = OnceCell::new();

struct LoggingState {
    level: &'static str,
    log_dir: Option<PathBuf>,
    _handle: LoggerHandle,
}

/// Logging bootstrap errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoggingError {
    InvalidConfig(ConfigError),
    CreateDir { path: PathBuf, message: String },
    Backend(String),
    Conflict { active: String, requested: String },
}

impl Display for LoggingError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidConfig(err) => write!(f, "invalid logging config: {err}"),
            Self::CreateDir { path, message } => write!(
                f,
                "failed to create log directory `{}`: {message}",
                path.display()
            ),
            Self::Backend(message) => write!(f, "failed to start logger: {message}"),
            Self::Conflict { active, requested } => write!(
                f,
                "logging already initialized as `{active}`; refusing to switch to `{requested}`"
            ),
        }
    }
}

impl Error for LoggingError {}

/// Initializes core logging from `config`.
///
/// # Errors
/// - `InvalidConfig` when `config` fails validation.
/// - `CreateDir`/`Backend` when the backend cannot start.
/// - `Conflict` when logging is already active with different settings.
pub fn init_logging(config: &LoggingConfig) -> Result<(), LoggingError> {
    config.validate().map_err(LoggingError::InvalidConfig)?;
    let level = config
        .normalized_level()
        .map_err(LoggingError::InvalidConfig)?;
    let log_dir = config.log_dir.clone();

    let state = LOGGING_STATE.get_or_try_init(|| start_backend(config, level))?;
    if state.level != level || state.log_dir != log_dir {
        return Err(LoggingError::Conflict {
            active: describe(state.level, state.log_dir.as_ref()),
            requested: describe(level, log_dir.as_ref()),
        });
    }
    Ok(())
}

/// Returns `(level, log_dir)` of the active logger, or `None` before init.
pub fn logging_status() -> Option<(&'static str, Option<PathBuf>)> {
    LOGGING_STATE
        .get()
        .map(|state| (state.level, state.log_dir.clone()))
}

fn start_backend(
    config: &LoggingConfig,
    level: &'static str,
) -> Result<LoggingState, LoggingError> {
    let mut logger =
        Logger::try_with_str(level).map_err(|err| LoggingError::Backend(err.to_string()))?;

    logger = match &config.log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir).map_err(|err| LoggingError::CreateDir {
                path: dir.clone(),
                message: err.to_string(),
            })?;
            logger
                .log_to_file(
                    FileSpec::default()
                        .directory(dir.as_path())
                        .basename(LOG_FILE_BASENAME),
                )
                .rotate(
                    Criterion::Size(config.max_file_bytes),
                    Naming::Numbers,
                    Cleanup::KeepLogFiles(config.max_files),
                )
                .append()
                .format_for_files(flexi_logger::detailed_format)
        }
        None => logger.log_to_stderr(),
    };

    let handle = logger
        .write_mode(WriteMode::BufferAndFlush)
        .start()
        .map_err(|err| LoggingError::Backend(err.to_string()))?;

    info!(
        "event=core_init module=logging status=ok level={} destination={} version={}",
        level,
        destination(config.log_dir.as_ref()),
        env!("CARGO_PKG_VERSION")
    );

    Ok(LoggingState {
        level,
        log_dir: config.log_dir.clone(),
        _handle: handle,
    })
}

fn destination(log_dir: Option<&PathBuf>) -> String {
    match log_dir {
        Some(dir) => dir.display().to_string(),
        None => "stderr".to_string(),
    }
}

fn describe(level: &str, log_dir: Option<&PathBuf>) -> String {
    format!("{level}@{}", destination(log_dir))
}
