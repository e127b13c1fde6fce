//! Log directory resolution.
//!
//! ```text
//! ROS_LOG_DIR (non-empty)      → $ROS_LOG_DIR
//! else ROS_HOME (non-empty)    → $ROS_HOME/log
//! else                         → ~/.ros/log
//!     → leading `~` replaced by the home directory
//!     → relative result anchored at the working directory
//! ```

use std::path::{Component, Path, PathBuf};

use tracing::debug;

use crate::env::{non_empty_var, Environment, ProcessEnv};
use crate::error::{LoggingError, LoggingResult};

/// Overrides the whole log directory.
pub const LOG_DIR_VAR: &str = "ROS_LOG_DIR";

/// Overrides the home for ROS data; logs go to its `log` subdirectory.
pub const ROS_HOME_VAR: &str = "ROS_HOME";

const DEFAULT_ROS_HOME: &str = ".ros";
const LOG_SUBDIR: &str = "log";

/// Resolve the directory log files should be written to.
///
/// Resolution is pure with respect to `env`: calling it twice under the same
/// environment yields the same path. Empty variables are treated as unset.
pub fn get_logging_directory(env: &dyn Environment) -> LoggingResult<PathBuf> {
    let directory = match non_empty_var(env, LOG_DIR_VAR)? {
        Some(dir) => PathBuf::from(dir),
        None => {
            let ros_home = non_empty_var(env, ROS_HOME_VAR)?
                .map(PathBuf::from)
                .unwrap_or_else(|| Path::new("~").join(DEFAULT_ROS_HOME));
            ros_home.join(LOG_SUBDIR)
        }
    };

    let directory = expand_home(env, directory)?;
    let directory = if directory.is_absolute() {
        directory
    } else {
        env.current_dir()
            .map_err(LoggingError::CurrentDir)?
            .join(directory)
    };

    debug!(directory = %directory.display(), "Resolved logging directory");
    Ok(directory)
}

/// [`get_logging_directory`] against the real process environment.
pub fn logging_directory() -> LoggingResult<PathBuf> {
    get_logging_directory(&ProcessEnv)
}

/// Replace a leading `~` component with the home directory.
fn expand_home(env: &dyn Environment, path: PathBuf) -> LoggingResult<PathBuf> {
    let mut components = path.components();
    match components.next() {
        Some(Component::Normal(first)) if first == "~" => {
            let home = env.home_dir().ok_or(LoggingError::HomeDirectory)?;
            let rest = components.as_path();
            if rest.as_os_str().is_empty() {
                Ok(home)
            } else {
                Ok(home.join(rest))
            }
        }
        _ => Ok(path),
    }
}
