//! Log file naming: `<directory>/<stem>_<pid>_<millis>.log`.
//!
//! The stem is the caller's name prefix when one is given, otherwise the
//! executable's base name. Pid and millisecond timestamp keep concurrent and
//! successive processes from sharing a file.

use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use crate::env::Environment;
use crate::error::{LoggingError, LoggingResult};

/// Longest log file path the backends will open, in bytes.
pub const MAX_LOG_PATH_LEN: usize = 4096;

/// Reject name prefixes that would escape the log directory.
///
/// Runs before any I/O so callers get `INVALID_ARGUMENT` rather than a file
/// somewhere unexpected.
pub fn validate_name_prefix(name_prefix: Option<&str>) -> LoggingResult<()> {
    let Some(prefix) = name_prefix else {
        return Ok(());
    };
    if prefix.contains(&['/', '\\', '\0'][..]) {
        return Err(LoggingError::InvalidArgument(format!(
            "name prefix must not contain path separators or NUL: {:?}",
            prefix
        )));
    }
    Ok(())
}

/// The non-empty name prefix, else the executable name.
pub fn log_file_stem(env: &dyn Environment, name_prefix: Option<&str>) -> LoggingResult<String> {
    match name_prefix {
        Some(prefix) if !prefix.is_empty() => Ok(prefix.to_string()),
        _ => env
            .executable_name()
            .filter(|name| !name.is_empty())
            .ok_or(LoggingError::ExecutableName),
    }
}

/// Wall-clock milliseconds since the Unix epoch.
pub fn millis_since_epoch(env: &dyn Environment) -> LoggingResult<i64> {
    let elapsed = env
        .now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| LoggingError::Clock(e.to_string()))?;
    i64::try_from(elapsed.as_millis()).map_err(|e| LoggingError::Clock(e.to_string()))
}

/// `<stem>_<pid>_<millis>.log`
pub fn log_file_name(stem: &str, pid: u32, millis: i64) -> String {
    format!("{}_{}_{}.log", stem, pid, millis)
}

/// Build the full path of a fresh log file inside `directory`.
pub fn log_file_path(
    env: &dyn Environment,
    directory: &Path,
    name_prefix: Option<&str>,
) -> LoggingResult<PathBuf> {
    let millis = millis_since_epoch(env)?;
    let stem = log_file_stem(env, name_prefix)?;
    let path = directory.join(log_file_name(&stem, env.pid(), millis));

    if path.as_os_str().len() >= MAX_LOG_PATH_LEN {
        return Err(LoggingError::FileName(format!(
            "path exceeds {} bytes",
            MAX_LOG_PATH_LEN
        )));
    }
    Ok(path)
}
