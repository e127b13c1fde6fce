//! Environment variables read by the file backend, with their defaults.

/// `1`/`true`/`TRUE` restores the sink's default flushing (no periodic or
/// error-triggered flush).
pub const OLD_FLUSHING_BEHAVIOR_VAR: &str = "RCL_LOGGING_FILE_EXPERIMENTAL_OLD_FLUSHING_BEHAVIOR";

/// Enables the size/count-bounded rotating sink.
pub const ROTATE_FILES_VAR: &str = "RCL_LOGGING_FILE_ROTATE_FILES";

/// Byte size at which the active file is rotated.
pub const ROTATING_FILE_SIZE_BYTES_VAR: &str = "RCL_LOGGING_FILE_ROTATING_FILE_SIZE_BYTES";

/// Number of rotated backups kept next to the active file.
pub const MAX_NUM_FILES_VAR: &str = "RCL_LOGGING_FILE_MAX_NUM_FILES";

pub const DEFAULT_ROTATING_FILE_SIZE_BYTES: u64 = 100 * 1024 * 1024;
pub const DEFAULT_ROTATING_MAX_NUM_FILES: u64 = 5;

/// Period of the background flush unless the old behavior is requested.
pub const FLUSH_INTERVAL_SECS: u64 = 5;
