//! The capability every logging backend implements.
//!
//! ## Lifecycle
//!
//! ```text
//! Uninitialized ──initialize──▶ Ready ──shutdown──▶ Uninitialized
//!       ▲             │
//!       └── failure ──┘   (nothing half-built is kept)
//! ```
//!
//! Each backend owns its state; there is no hidden process-wide logger.
//! `initialize` on a Ready backend is a no-op that succeeds, and `shutdown`
//! on an Uninitialized backend succeeds too.

use std::fs;
use std::path::PathBuf;

use tracing::debug;

use crate::directory::get_logging_directory;
use crate::env::Environment;
use crate::error::{LoggingError, LoggingResult, RetCode};
use crate::naming::log_file_path;

/// Logical name the single Ready handle is registered under.
pub const ROOT_LOGGER_NAME: &str = "root";

/// Outcome of a successful `initialize`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InitStatus {
    /// The backend went from Uninitialized to Ready
    Initialized,

    /// The backend was already Ready; nothing was done
    AlreadyInitialized,

    /// Ready, but on built-in defaults because the config file was unusable
    Defaulted { code: RetCode, reason: String },
}

impl InitStatus {
    /// Boundary status code; non-fatal config problems keep their own code.
    pub fn code(&self) -> RetCode {
        match self {
            InitStatus::Initialized | InitStatus::AlreadyInitialized => RetCode::Ok,
            InitStatus::Defaulted { code, .. } => *code,
        }
    }

    pub(crate) fn defaulted(err: &LoggingError) -> Self {
        InitStatus::Defaulted {
            code: err.code(),
            reason: err.to_string(),
        }
    }
}

impl From<&LoggingError> for InitStatus {
    fn from(err: &LoggingError) -> Self {
        InitStatus::defaulted(err)
    }
}

/// A pluggable logging engine.
///
/// Severities and levels are raw integers on the `UNSET=0 .. FATAL=50` scale;
/// see [`crate::severity::Level::from_severity`] for the mapping.
pub trait LoggingBackend: Send + Sync {
    /// Short backend identifier used in diagnostics.
    fn name(&self) -> &'static str;

    /// Bring the backend to Ready.
    ///
    /// `config_file` and `name_prefix` are ignored when `None` or empty.
    fn initialize(
        &self,
        config_file: Option<&str>,
        name_prefix: Option<&str>,
    ) -> LoggingResult<InitStatus>;

    /// Release the handle and return to Uninitialized.
    fn shutdown(&self) -> LoggingResult<()>;

    /// Emit `msg`; dropped silently when not Ready or below threshold.
    fn log(&self, severity: i32, logger_name: Option<&str>, msg: &str);

    /// Set the threshold of `logger_name` (root when `None` or empty).
    fn set_logger_level(&self, logger_name: Option<&str>, level: i32) -> LoggingResult<()>;

    fn is_initialized(&self) -> bool;
}

/// `Some` only for a non-empty value.
pub fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Resolve and create the log directory, then synthesize a fresh file path in it.
pub fn prepare_log_file(
    env: &dyn Environment,
    name_prefix: Option<&str>,
) -> LoggingResult<PathBuf> {
    let directory = get_logging_directory(env)?;

    fs::create_dir_all(&directory).map_err(|source| LoggingError::CreateDirectory {
        path: directory.clone(),
        source,
    })?;

    let path = log_file_path(env, &directory, name_prefix)?;
    debug!(path = %path.display(), "Synthesized log file name");
    Ok(path)
}
