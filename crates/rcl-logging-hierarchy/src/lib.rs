//! Hierarchical named-logger backend.
//!
//! Loggers are addressed by dotted names (`robot.arm.gripper`) and inherit
//! the threshold of their nearest configured ancestor, ending at the root.
//! All loggers share a single file appender and pattern layout.
//!
//! ## Configuration
//!
//! An optional TOML file (see [`config`]) sets the root threshold, output
//! file, append mode, layout and per-logger thresholds. Problems with the
//! file are not fatal:
//!
//! | Situation | Result |
//! |-----------|--------|
//! | no file given | defaults, `OK` |
//! | file missing | defaults, `CONFIG_FILE_DOESNT_EXIST` |
//! | file unparsable or invalid | defaults, `CONFIG_FILE_INVALID` |

pub mod appender;
pub mod backend;
pub mod config;
pub mod layout;

// Re-exports
pub use backend::HierarchyBackend;
pub use config::{HierarchyConfig, DEFAULT_ROOT_LEVEL};
pub use layout::{PatternError, PatternLayout, DEFAULT_PATTERN};
