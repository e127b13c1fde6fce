//! Tracing backend: filter by logger name, then hand off to `tracing`.
//!
//! Accepted messages become events with target [`EVENT_TARGET`] and a
//! `logger` field. `tracing` has no FATAL level, so FATAL messages are
//! emitted at ERROR with `fatal = true`.

use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tracing::debug;

use rcl_logging_interface::backend::non_empty;
use rcl_logging_interface::{
    validate_name_prefix, InitStatus, Level, LevelMap, LoggingBackend, LoggingError, LoggingResult,
    ROOT_LOGGER_NAME,
};

const BACKEND_NAME: &str = "tracing";

/// Target of every forwarded event.
pub const EVENT_TARGET: &str = "rcl";

/// Root threshold after initialization.
pub const DEFAULT_ROOT_LEVEL: Level = Level::Info;

/// Backend that forwards to whatever `tracing` subscriber is installed.
///
/// It never touches the filesystem; the name prefix is validated and then
/// ignored.
#[derive(Default)]
pub struct TracingBackend {
    state: Mutex<Option<Arc<RwLock<LevelMap>>>>,
}

impl TracingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Effective threshold of `logger_name` while Ready.
    pub fn effective_level(&self, logger_name: Option<&str>) -> Option<Level> {
        self.levels()
            .map(|levels| levels.read().effective(logger_name))
    }

    fn levels(&self) -> Option<Arc<RwLock<LevelMap>>> {
        self.state.lock().clone()
    }
}

fn emit(level: Level, logger: &str, msg: &str) {
    match level {
        Level::Debug => tracing::debug!(target: EVENT_TARGET, logger, "{}", msg),
        Level::Info => tracing::info!(target: EVENT_TARGET, logger, "{}", msg),
        Level::Warn => tracing::warn!(target: EVENT_TARGET, logger, "{}", msg),
        Level::Error => tracing::error!(target: EVENT_TARGET, logger, "{}", msg),
        Level::Fatal => tracing::error!(target: EVENT_TARGET, logger, fatal = true, "{}", msg),
    }
}

impl LoggingBackend for TracingBackend {
    fn name(&self) -> &'static str {
        BACKEND_NAME
    }

    fn initialize(
        &self,
        config_file: Option<&str>,
        name_prefix: Option<&str>,
    ) -> LoggingResult<InitStatus> {
        let mut state = self.state.lock();
        if state.is_some() {
            return Ok(InitStatus::AlreadyInitialized);
        }
        validate_name_prefix(name_prefix)?;
        if non_empty(config_file).is_some() {
            return Err(LoggingError::ConfigUnsupported {
                backend: BACKEND_NAME,
            });
        }

        *state = Some(Arc::new(RwLock::new(LevelMap::new(DEFAULT_ROOT_LEVEL))));
        debug!(root = %DEFAULT_ROOT_LEVEL, "Tracing logging initialized");
        Ok(InitStatus::Initialized)
    }

    fn shutdown(&self) -> LoggingResult<()> {
        if self.state.lock().take().is_some() {
            debug!("Tracing logging shut down");
        }
        Ok(())
    }

    fn log(&self, severity: i32, logger_name: Option<&str>, msg: &str) {
        let Some(levels) = self.levels() else {
            return;
        };
        let level = Level::from_severity(severity);
        if !levels.read().enabled(logger_name, level) {
            return;
        }
        emit(level, non_empty(logger_name).unwrap_or(ROOT_LOGGER_NAME), msg);
    }

    fn set_logger_level(&self, logger_name: Option<&str>, level: i32) -> LoggingResult<()> {
        if let Some(levels) = self.levels() {
            levels.write().set(logger_name, Level::from_severity(level));
        }
        Ok(())
    }

    fn is_initialized(&self) -> bool {
        self.state.lock().is_some()
    }
}
