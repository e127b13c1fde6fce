//! File logging backend.
//!
//! Writes every accepted message, verbatim and newline terminated, to a
//! per-process file in the resolved log directory:
//!
//! ```text
//! $ROS_LOG_DIR/                    (or $ROS_HOME/log, or ~/.ros/log)
//! ├── talker_4242_1700000000000.log
//! ├── talker_4242_1700000000000.1.log   (rotation enabled)
//! └── listener_4243_1700000000517.log
//! ```
//!
//! ## Environment
//!
//! | Variable | Effect |
//! |----------|--------|
//! | `RCL_LOGGING_FILE_ROTATE_FILES` | enable size-bounded rotation |
//! | `RCL_LOGGING_FILE_ROTATING_FILE_SIZE_BYTES` | rotation threshold (default 100 MiB) |
//! | `RCL_LOGGING_FILE_MAX_NUM_FILES` | backups kept (default 5) |
//! | `RCL_LOGGING_FILE_EXPERIMENTAL_OLD_FLUSHING_BEHAVIOR` | disable periodic / on-error flushing |
//!
//! There is a single root logger; external configuration files are not
//! supported.

pub mod backend;
pub mod flush;
pub mod keys;
pub mod sink;

// Re-exports
pub use backend::FileBackend;
pub use sink::{BasicFileSink, RotatingFileSink, Sink};
