//! File backend: one root logger writing message-only lines to a file sink.
//!
//! ## Initialization
//!
//! ```text
//! initialize(config?, prefix?)
//!     → already Ready? return AlreadyInitialized
//!     → config file given? ERROR (not supported)
//!     → old flushing flag
//!     → log directory → create it → <stem>_<pid>_<millis>.log
//!     → rotating or basic sink
//!     → register "root" (+ periodic / on-error flushing)
//! ```
//!
//! Nothing is stored until the last step succeeds, so any failure leaves the
//! backend Uninitialized and ready for a retry.

use std::path::PathBuf;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tracing::{debug, info};

use rcl_logging_interface::backend::{non_empty, prepare_log_file};
use rcl_logging_interface::env::{bool_var, size_var};
use rcl_logging_interface::{
    validate_name_prefix, Environment, InitStatus, Level, LoggingBackend, LoggingError,
    LoggingResult, ProcessEnv, ROOT_LOGGER_NAME,
};

use crate::flush::PeriodicFlusher;
use crate::keys::{
    DEFAULT_ROTATING_FILE_SIZE_BYTES, DEFAULT_ROTATING_MAX_NUM_FILES, FLUSH_INTERVAL_SECS,
    MAX_NUM_FILES_VAR, OLD_FLUSHING_BEHAVIOR_VAR, ROTATE_FILES_VAR, ROTATING_FILE_SIZE_BYTES_VAR,
};
use crate::sink::{BasicFileSink, RotatingFileSink, Sink};

const BACKEND_NAME: &str = "file";

/// The registered root logger.
struct RootLogger {
    name: &'static str,
    sink: Arc<dyn Sink>,
    level: AtomicU8,
    /// Lines at or above this level are flushed immediately
    flush_on: Option<Level>,
}

impl RootLogger {
    fn log(&self, level: Level, msg: &str) {
        if !level.passes(Level::from_u8(self.level.load(Ordering::Relaxed))) {
            return;
        }
        // Logging never reports failure to the caller.
        let _ = self.sink.write_line(msg);
        if self.flush_on.is_some_and(|threshold| level.passes(threshold)) {
            let _ = self.sink.flush();
        }
    }
}

struct Ready {
    logger: Arc<RootLogger>,
    flusher: Option<PeriodicFlusher>,
}

/// Logging backend writing to `<log dir>/<stem>_<pid>_<millis>.log`.
///
/// The logger name passed to `log` and `set_logger_level` is accepted but
/// ignored: there is only the root logger.
pub struct FileBackend<E: Environment = ProcessEnv> {
    env: E,
    state: Mutex<Option<Ready>>,
    flush_interval: Duration,
}

impl Default for FileBackend<ProcessEnv> {
    fn default() -> Self {
        Self::new(ProcessEnv)
    }
}

impl<E: Environment> FileBackend<E> {
    pub fn new(env: E) -> Self {
        Self {
            env,
            state: Mutex::new(None),
            flush_interval: Duration::from_secs(FLUSH_INTERVAL_SECS),
        }
    }

    /// Override the periodic flush period.
    pub fn with_flush_interval(mut self, interval: Duration) -> Self {
        self.flush_interval = interval;
        self
    }

    pub fn env(&self) -> &E {
        &self.env
    }

    /// Path of the active log file while Ready.
    pub fn log_file_path(&self) -> Option<PathBuf> {
        self.state
            .lock()
            .as_ref()
            .map(|ready| ready.logger.sink.path().to_path_buf())
    }

    /// Flush the active sink, if any.
    pub fn flush(&self) -> LoggingResult<()> {
        if let Some(logger) = self.logger() {
            logger.sink.flush()?;
        }
        Ok(())
    }

    fn logger(&self) -> Option<Arc<RootLogger>> {
        self.state.lock().as_ref().map(|ready| ready.logger.clone())
    }

    fn open_sink(&self, path: PathBuf) -> LoggingResult<Arc<dyn Sink>> {
        let open_err = |source| LoggingError::OpenSink {
            path: path.clone(),
            source,
        };

        if bool_var(&self.env, ROTATE_FILES_VAR)? {
            let max_size = size_var(
                &self.env,
                ROTATING_FILE_SIZE_BYTES_VAR,
                DEFAULT_ROTATING_FILE_SIZE_BYTES,
            )?;
            if max_size == 0 {
                return Err(LoggingError::EnvValue {
                    name: ROTATING_FILE_SIZE_BYTES_VAR.to_string(),
                    value: max_size.to_string(),
                    expected: "Rotating file size must be greater than zero.".to_string(),
                });
            }
            let max_files = size_var(&self.env, MAX_NUM_FILES_VAR, DEFAULT_ROTATING_MAX_NUM_FILES)?;

            debug!(max_size, max_files, "Opening rotating log sink");
            let sink = RotatingFileSink::new(&path, max_size, max_files).map_err(open_err)?;
            Ok(Arc::new(sink))
        } else {
            let sink = BasicFileSink::new(&path).map_err(open_err)?;
            Ok(Arc::new(sink))
        }
    }

    fn build(&self, name_prefix: Option<&str>) -> LoggingResult<Ready> {
        let old_flushing = bool_var(&self.env, OLD_FLUSHING_BEHAVIOR_VAR)?;
        let path = prepare_log_file(&self.env, name_prefix)?;
        let sink = self.open_sink(path)?;

        let (flush_on, flusher) = if old_flushing {
            (None, None)
        } else {
            let flusher = PeriodicFlusher::spawn(sink.clone(), self.flush_interval)?;
            (Some(Level::Error), Some(flusher))
        };

        let logger = RootLogger {
            name: ROOT_LOGGER_NAME,
            sink,
            level: AtomicU8::new(Level::Info.to_u8()),
            flush_on,
        };

        Ok(Ready {
            logger: Arc::new(logger),
            flusher,
        })
    }
}

impl<E: Environment> LoggingBackend for FileBackend<E> {
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

        let ready = self.build(non_empty(name_prefix))?;
        info!(
            logger = ready.logger.name,
            path = %ready.logger.sink.path().display(),
            "File logging initialized"
        );
        *state = Some(ready);
        Ok(InitStatus::Initialized)
    }

    fn shutdown(&self) -> LoggingResult<()> {
        let ready = self.state.lock().take();
        if let Some(mut ready) = ready {
            if let Some(flusher) = ready.flusher.as_mut() {
                flusher.stop();
            }
            ready.logger.sink.flush()?;
            debug!(logger = ready.logger.name, "File logging shut down");
        }
        Ok(())
    }

    fn log(&self, severity: i32, _logger_name: Option<&str>, msg: &str) {
        if let Some(logger) = self.logger() {
            logger.log(Level::from_severity(severity), msg);
        }
    }

    fn set_logger_level(&self, _logger_name: Option<&str>, level: i32) -> LoggingResult<()> {
        if let Some(logger) = self.logger() {
            logger
                .level
                .store(Level::from_severity(level).to_u8(), Ordering::Relaxed);
        }
        Ok(())
    }

    fn is_initialized(&self) -> bool {
        self.state.lock().is_some()
    }
}

impl<E: Environment> Drop for FileBackend<E> {
    fn drop(&mut self) {
        let _ = self.shutdown();
    }
}
