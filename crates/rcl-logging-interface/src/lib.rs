//! Logging backend interface for the robot client library.
//!
//! ## Overview
//!
//! This crate defines the contract every logging backend implements and the
//! pieces they all share:
//!
//! - **Status codes** ([`RetCode`]) and the internal error type ([`LoggingError`])
//! - **Severities** ([`Severity`]) and the "round up" mapping onto engine
//!   levels ([`Level`]), plus per-logger thresholds ([`LevelMap`])
//! - **Environment access** ([`Environment`]) so resolution and naming can be
//!   tested against a fake process
//! - **Log directory resolution** ([`get_logging_directory`])
//! - **Log file naming** ([`log_file_path`])
//!
//! ## Quick Start
//!
//! ```ignore
//! use rcl_logging_interface::{LoggingBackend, ProcessEnv, Severity};
//! use rcl_logging_file::FileBackend;
//!
//! let backend = FileBackend::new(ProcessEnv);
//! backend.initialize(None, Some("my_node"))?;
//! backend.set_logger_level(None, Severity::Info.as_raw())?;
//! backend.log(Severity::Warn.as_raw(), None, "battery low");
//! backend.shutdown()?;
//! ```

pub mod backend;
pub mod directory;
pub mod env;
pub mod error;
pub mod levels;
pub mod naming;
pub mod severity;

// Re-exports
pub use backend::{non_empty, prepare_log_file, InitStatus, LoggingBackend, ROOT_LOGGER_NAME};
pub use directory::{get_logging_directory, logging_directory, LOG_DIR_VAR, ROS_HOME_VAR};
pub use env::{
    bool_var, non_empty_var, parse_bool, parse_size, size_var, EnvError, Environment, FakeEnv,
    ProcessEnv, HOME_VAR,
};
pub use error::{LoggingError, LoggingResult, RetCode};
pub use levels::LevelMap;
pub use naming::{
    log_file_name, log_file_path, log_file_stem, millis_since_epoch, validate_name_prefix,
    MAX_LOG_PATH_LEN,
};
pub use severity::{Level, Severity};
