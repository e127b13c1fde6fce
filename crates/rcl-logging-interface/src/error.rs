//! Error types and status codes shared by all logging backends

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Status codes reported at the application boundary.
///
/// The numeric values are stable and shared with every backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum RetCode {
    Ok = 0,
    Warn = 1,
    Error = 2,
    InvalidArgument = 11,
    ConfigFileDoesntExist = 21,
    ConfigFileInvalid = 22,
}

impl RetCode {
    /// Numeric value of the code.
    pub fn as_raw(self) -> i32 {
        self as i32
    }

    /// Status code of a backend operation that carries no status of its own.
    pub fn of<T>(result: &LoggingResult<T>) -> RetCode {
        match result {
            Ok(_) => RetCode::Ok,
            Err(e) => e.code(),
        }
    }
}

impl fmt::Display for RetCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RetCode::Ok => "OK",
            RetCode::Warn => "WARN",
            RetCode::Error => "ERROR",
            RetCode::InvalidArgument => "INVALID_ARGUMENT",
            RetCode::ConfigFileDoesntExist => "CONFIG_FILE_DOESNT_EXIST",
            RetCode::ConfigFileInvalid => "CONFIG_FILE_INVALID",
        };
        write!(f, "{} ({})", name, self.as_raw())
    }
}

/// Main error type for logging backend operations
#[derive(Error, Debug)]
pub enum LoggingError {
    /// A caller-supplied argument violates the contract
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The environment variable exists but could not be read
    #[error("failed to get env var '{name}': {reason}")]
    EnvRead { name: String, reason: String },

    /// The environment variable holds a value outside the accepted vocabulary
    #[error("unrecognized value for '{name}': '{value}'. {expected}")]
    EnvValue {
        name: String,
        value: String,
        expected: String,
    },

    /// Neither HOME nor USERPROFILE yielded a home directory
    #[error("failed to get the home directory")]
    HomeDirectory,

    /// The working directory needed to anchor a relative log path is unavailable
    #[error("failed to get the current directory: {0}")]
    CurrentDir(#[source] std::io::Error),

    /// Recursive creation of the log directory failed
    #[error("failed to create log directory: {}", path.display())]
    CreateDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The system clock is before the Unix epoch or otherwise unusable
    #[error("failed to get the system time: {0}")]
    Clock(String),

    /// The executable name could not be determined
    #[error("failed to get the executable name")]
    ExecutableName,

    /// The synthesized log file name could not be built
    #[error("failed to create log file name string: {0}")]
    FileName(String),

    /// The log sink could not be opened
    #[error("failed to open log file {}: {source}", path.display())]
    OpenSink {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The backend has no notion of an external configuration file
    #[error("{backend} logging backend doesn't currently support external configuration")]
    ConfigUnsupported { backend: &'static str },

    /// A configuration file was supplied but does not exist
    #[error("config file does not exist: {}", .0.display())]
    ConfigFileDoesntExist(PathBuf),

    /// A configuration file was supplied but the backend could not understand it
    #[error("config file {} is invalid: {reason}", path.display())]
    ConfigFileInvalid { path: PathBuf, reason: String },

    /// General I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl LoggingError {
    /// Boundary status code for this error.
    pub fn code(&self) -> RetCode {
        match self {
            LoggingError::InvalidArgument(_) => RetCode::InvalidArgument,
            LoggingError::ConfigFileDoesntExist(_) => RetCode::ConfigFileDoesntExist,
            LoggingError::ConfigFileInvalid { .. } => RetCode::ConfigFileInvalid,
            _ => RetCode::Error,
        }
    }
}

/// Result type alias using LoggingError
pub type LoggingResult<T> = Result<T, LoggingError>;
