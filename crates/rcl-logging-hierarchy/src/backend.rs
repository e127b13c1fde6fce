//! Hierarchy backend: named loggers sharing one appender.
//!
//! Initialization never fails because of the configuration file itself. A
//! missing or unreadable file drops back to the built-in defaults (root at
//! DEBUG, `%m%n`, synthesized file name) and reports why through
//! [`InitStatus::Defaulted`].

use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tracing::{debug, info, warn};

use rcl_logging_interface::backend::{non_empty, prepare_log_file};
use rcl_logging_interface::{
    validate_name_prefix, Environment, InitStatus, Level, LevelMap, LoggingBackend, LoggingError,
    LoggingResult, ProcessEnv, ROOT_LOGGER_NAME,
};

use crate::appender::FileAppender;
use crate::config::HierarchyConfig;
use crate::layout::PatternLayout;

const BACKEND_NAME: &str = "hierarchy";

struct Engine {
    levels: RwLock<LevelMap>,
    layout: PatternLayout,
    appender: FileAppender,
}

impl Engine {
    fn log(&self, level: Level, logger_name: Option<&str>, msg: &str) {
        if !self.levels.read().enabled(logger_name, level) {
            return;
        }
        let logger = non_empty(logger_name).unwrap_or(ROOT_LOGGER_NAME);
        let event = self.layout.format(level, logger, msg);
        let _ = self.appender.append(&event);
    }
}

/// Backend with per-name thresholds inherited along dotted logger names.
pub struct HierarchyBackend<E: Environment = ProcessEnv> {
    env: E,
    state: Mutex<Option<Arc<Engine>>>,
}

impl Default for HierarchyBackend<ProcessEnv> {
    fn default() -> Self {
        Self::new(ProcessEnv)
    }
}

impl<E: Environment> HierarchyBackend<E> {
    pub fn new(env: E) -> Self {
        Self {
            env,
            state: Mutex::new(None),
        }
    }

    pub fn env(&self) -> &E {
        &self.env
    }

    /// Path the appender writes to while Ready.
    pub fn log_file_path(&self) -> Option<PathBuf> {
        self.engine().map(|engine| engine.appender.path().to_path_buf())
    }

    /// Effective threshold of `logger_name` while Ready.
    pub fn effective_level(&self, logger_name: Option<&str>) -> Option<Level> {
        self.engine()
            .map(|engine| engine.levels.read().effective(logger_name))
    }

    fn engine(&self) -> Option<Arc<Engine>> {
        self.state.lock().clone()
    }

    /// Load the configuration, degrading to defaults on a config problem.
    fn load_config(&self, config_file: Option<&str>) -> (HierarchyConfig, InitStatus) {
        let Some(config_file) = non_empty(config_file) else {
            return (HierarchyConfig::default(), InitStatus::Initialized);
        };

        match HierarchyConfig::load(Path::new(config_file)) {
            Ok(config) => {
                debug!(path = config_file, "Loaded logging configuration");
                (config, InitStatus::Initialized)
            }
            Err(e) => {
                warn!(error = %e, "Falling back to default logging configuration");
                (HierarchyConfig::default(), InitStatus::from(&e))
            }
        }
    }

    fn build(&self, config: HierarchyConfig, name_prefix: Option<&str>) -> LoggingResult<Engine> {
        let path = match config.file {
            Some(path) => path,
            None => prepare_log_file(&self.env, name_prefix)?,
        };
        let appender = FileAppender::open(&path, config.append)
            .map_err(|source| LoggingError::OpenSink { path, source })?;

        let mut levels = LevelMap::new(config.root_level);
        for (name, level) in &config.loggers {
            levels.set(Some(name), *level);
        }

        Ok(Engine {
            levels: RwLock::new(levels),
            layout: config.layout,
            appender,
        })
    }
}

impl<E: Environment> LoggingBackend for HierarchyBackend<E> {
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

        let (config, status) = self.load_config(config_file);
        let engine = self.build(config, non_empty(name_prefix))?;
        info!(
            path = %engine.appender.path().display(),
            loggers = engine.levels.read().len(),
            "Hierarchy logging initialized"
        );
        *state = Some(Arc::new(engine));
        Ok(status)
    }

    fn shutdown(&self) -> LoggingResult<()> {
        let engine = self.state.lock().take();
        if let Some(engine) = engine {
            engine.appender.flush()?;
            debug!("Hierarchy logging configuration reset");
        }
        Ok(())
    }

    fn log(&self, severity: i32, logger_name: Option<&str>, msg: &str) {
        if let Some(engine) = self.engine() {
            engine.log(Level::from_severity(severity), logger_name, msg);
        }
    }

    fn set_logger_level(&self, logger_name: Option<&str>, level: i32) -> LoggingResult<()> {
        if let Some(engine) = self.engine() {
            engine
                .levels
                .write()
                .set(logger_name, Level::from_severity(level));
        }
        Ok(())
    }

    fn is_initialized(&self) -> bool {
        self.state.lock().is_some()
    }
}

impl<E: Environment> Drop for HierarchyBackend<E> {
    fn drop(&mut self) {
        let _ = self.shutdown();
    }
}
