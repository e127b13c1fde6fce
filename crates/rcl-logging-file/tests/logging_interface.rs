//! End-to-end tests of the file backend through the `LoggingBackend` trait
//!
//! Every test gets its own temporary log directory and a fake environment,
//! so they run in parallel without touching the real process environment.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, UNIX_EPOCH};

use rcl_logging_file::keys::{
    MAX_NUM_FILES_VAR, OLD_FLUSHING_BEHAVIOR_VAR, ROTATE_FILES_VAR, ROTATING_FILE_SIZE_BYTES_VAR,
};
use rcl_logging_file::FileBackend;
use rcl_logging_interface::{
    FakeEnv, InitStatus, LoggingBackend, LoggingError, RetCode, Severity, HOME_VAR, LOG_DIR_VAR,
};
use tempfile::TempDir;

// ============================================================================
// Helpers
// ============================================================================

struct LoggingTest {
    temp: TempDir,
    backend: FileBackend<FakeEnv>,
}

impl LoggingTest {
    fn new() -> Self {
        let temp = TempDir::new().unwrap();
        let env = FakeEnv::new().with_var(LOG_DIR_VAR, temp.path().to_string_lossy());
        Self {
            temp,
            backend: FileBackend::new(env),
        }
    }

    fn env(&self) -> &FakeEnv {
        self.backend.env()
    }

    fn log_dir(&self) -> &Path {
        self.temp.path()
    }

    /// Files in the log directory starting with `<stem>_<pid>_`.
    fn find_logs(&self, stem: &str) -> Vec<PathBuf> {
        let prefix = format!("{}_{}_", stem, 4242);
        let mut found: Vec<PathBuf> = fs::read_dir(self.log_dir())
            .unwrap()
            .map(|entry| entry.unwrap().path())
            .filter(|path| {
                path.file_name()
                    .map(|n| n.to_string_lossy().starts_with(&prefix))
                    .unwrap_or(false)
            })
            .collect();
        found.sort();
        found
    }

    fn find_single_log(&self, stem: &str) -> PathBuf {
        let found = self.find_logs(stem);
        assert_eq!(found.len(), 1, "expected exactly one log for {}: {:?}", stem, found);
        found.into_iter().next().unwrap()
    }
}

/// Log every severity at every threshold and return what should reach the file.
fn log_full_matrix(backend: &dyn LoggingBackend) -> String {
    let mut expected = String::new();
    for level in Severity::ALL {
        backend.set_logger_level(None, level.as_raw()).unwrap();

        for severity in Severity::ALL {
            let msg = format!(
                "Message of severity {} at level {}",
                severity.as_raw(),
                level.as_raw()
            );
            backend.log(severity.as_raw(), None, &msg);

            if severity >= level || (severity == Severity::Unset && level == Severity::Debug) {
                // UNSET rounds up to DEBUG, so it is visible at the DEBUG threshold.
                expected.push_str(&msg);
                expected.push('\n');
            }
        }
    }
    expected
}

// ============================================================================
// Lifecycle
// ============================================================================

#[test]
fn test_full_cycle() {
    let t = LoggingTest::new();

    assert_eq!(
        t.backend.initialize(None, None).unwrap(),
        InitStatus::Initialized
    );
    // Make sure we can call initialize more than once
    assert_eq!(
        t.backend.initialize(None, None).unwrap(),
        InitStatus::AlreadyInitialized
    );

    let expected = log_full_matrix(&t.backend);
    t.backend.shutdown().unwrap();

    let log_file = t.find_single_log("fake_exe");
    assert_eq!(fs::read_to_string(&log_file).unwrap(), expected);
}

#[test]
fn test_double_initialize_creates_one_file() {
    let t = LoggingTest::new();

    let first = t.backend.initialize(None, None).unwrap();
    thread::sleep(Duration::from_millis(5));
    let second = t.backend.initialize(None, None).unwrap();

    assert_eq!(first.code(), RetCode::Ok);
    assert_eq!(second.code(), RetCode::Ok);
    assert_eq!(t.find_logs("fake_exe").len(), 1);
    t.backend.shutdown().unwrap();
}

#[test]
fn test_shutdown_is_idempotent_and_allows_reinit() {
    let t = LoggingTest::new();

    assert!(t.backend.shutdown().is_ok());
    t.env().set_time(Some(UNIX_EPOCH + Duration::from_millis(1_000)));
    t.backend.initialize(None, None).unwrap();
    t.backend.shutdown().unwrap();
    assert!(t.backend.shutdown().is_ok());
    assert!(!t.backend.is_initialized());

    t.env().set_time(Some(UNIX_EPOCH + Duration::from_millis(2_000)));
    t.backend.initialize(None, None).unwrap();
    assert!(t.backend.is_initialized());
    t.backend.shutdown().unwrap();

    assert_eq!(t.find_logs("fake_exe").len(), 2);
}

#[test]
fn test_log_after_shutdown_is_dropped() {
    let t = LoggingTest::new();
    t.backend.initialize(None, None).unwrap();
    t.backend.log(Severity::Fatal.as_raw(), None, "kept");
    t.backend.shutdown().unwrap();

    t.backend.log(Severity::Fatal.as_raw(), None, "dropped");

    let log_file = t.find_single_log("fake_exe");
    assert_eq!(fs::read_to_string(log_file).unwrap(), "kept\n");
}

#[test]
fn test_five_messages_at_info_threshold() {
    let t = LoggingTest::new();
    t.backend.initialize(None, None).unwrap();
    t.backend
        .set_logger_level(None, Severity::Info.as_raw())
        .unwrap();

    for severity in [10, 20, 30, 40, 50] {
        t.backend.log(severity, Some("ignored.name"), &format!("severity {}", severity));
    }
    t.backend.shutdown().unwrap();

    let log_file = t.find_single_log("fake_exe");
    assert_eq!(
        fs::read_to_string(log_file).unwrap(),
        "severity 20\nseverity 30\nseverity 40\nseverity 50\n"
    );
}

#[test]
fn test_intermediate_severities_round_up() {
    let t = LoggingTest::new();
    t.backend.initialize(None, None).unwrap();
    t.backend.set_logger_level(None, 25).unwrap(); // → WARN

    t.backend.log(21, None, "rounds up to warn");
    t.backend.log(20, None, "info stays hidden");
    t.backend.log(99, None, "beyond fatal");
    t.backend.shutdown().unwrap();

    let log_file = t.find_single_log("fake_exe");
    assert_eq!(
        fs::read_to_string(log_file).unwrap(),
        "rounds up to warn\nbeyond fatal\n"
    );
}

// ============================================================================
// File naming
// ============================================================================

#[test]
fn test_log_file_name_prefix() {
    let t = LoggingTest::new();

    // executable name by default
    t.backend.initialize(None, None).unwrap();
    t.backend.shutdown().unwrap();
    t.find_single_log("fake_exe");

    // falls back to executable name if empty
    t.env().set_time(Some(UNIX_EPOCH + Duration::from_millis(5_000)));
    t.backend.initialize(None, Some("")).unwrap();
    t.backend.shutdown().unwrap();
    assert_eq!(t.find_logs("fake_exe").len(), 2);

    // specified by user application
    t.backend.initialize(None, Some("logger")).unwrap();
    t.backend.shutdown().unwrap();
    let log_file = t.find_single_log("logger");
    assert_eq!(
        log_file.file_name().unwrap().to_string_lossy(),
        "logger_4242_5000.log"
    );
}

// ============================================================================
// Failure handling
// ============================================================================

#[test]
fn test_init_failure_without_home() {
    let env = FakeEnv::new();
    let backend = FileBackend::new(env);

    let err = backend.initialize(None, None).unwrap_err();
    assert!(matches!(err, LoggingError::HomeDirectory));
    assert_eq!(err.code(), RetCode::Error);
    assert!(!backend.is_initialized());
}

#[test]
fn test_init_failure_when_directories_are_obstructed() {
    let temp = TempDir::new().unwrap();
    let fake_home = temp.path().join("fake_home_dir");
    fs::create_dir_all(&fake_home).unwrap();
    let backend = FileBackend::new(FakeEnv::new().with_var(HOME_VAR, fake_home.to_string_lossy()));

    // ...fail to create .ros dir
    let ros_dir = fake_home.join(".ros");
    fs::write(&ros_dir, "").unwrap();
    let err = backend.initialize(None, None).unwrap_err();
    assert!(matches!(err, LoggingError::CreateDirectory { .. }));
    assert!(!backend.is_initialized());
    fs::remove_file(&ros_dir).unwrap();

    // ...fail to create .ros/log dir
    fs::create_dir_all(&ros_dir).unwrap();
    let ros_log_dir = ros_dir.join("log");
    fs::write(&ros_log_dir, "").unwrap();
    let err = backend.initialize(None, None).unwrap_err();
    assert_eq!(err.code(), RetCode::Error);
    assert!(!backend.is_initialized());
    fs::remove_file(&ros_log_dir).unwrap();

    // Retry succeeds once the obstruction is gone
    assert_eq!(
        backend.initialize(None, None).unwrap(),
        InitStatus::Initialized
    );
    assert!(ros_log_dir.is_dir());
    backend.shutdown().unwrap();
}

#[test]
fn test_init_failure_without_executable_name() {
    let t = LoggingTest::new();
    t.env().set_executable_name(None);

    let err = t.backend.initialize(None, None).unwrap_err();
    assert!(matches!(err, LoggingError::ExecutableName));
    assert!(!t.backend.is_initialized());

    // A prefix makes the executable name unnecessary
    t.backend.initialize(None, Some("named")).unwrap();
    t.backend.shutdown().unwrap();
}

#[test]
fn test_init_failure_with_broken_clock() {
    let t = LoggingTest::new();
    t.env().set_time(Some(UNIX_EPOCH - Duration::from_secs(10)));

    let err = t.backend.initialize(None, None).unwrap_err();
    assert!(matches!(err, LoggingError::Clock(_)));
    assert!(!t.backend.is_initialized());
    assert!(t.find_logs("fake_exe").is_empty());
}

// ============================================================================
// Flushing behavior
// ============================================================================

#[test]
fn test_init_old_flushing_behavior() {
    let t = LoggingTest::new();
    t.env().set(OLD_FLUSHING_BEHAVIOR_VAR, "1");

    t.backend.initialize(None, None).unwrap();
    let expected = log_full_matrix(&t.backend);
    t.backend.shutdown().unwrap();

    let log_file = t.find_single_log("fake_exe");
    assert_eq!(fs::read_to_string(log_file).unwrap(), expected);
}

#[test]
fn test_init_explicit_new_flush_behavior() {
    let t = LoggingTest::new();
    t.env().set(OLD_FLUSHING_BEHAVIOR_VAR, "0");

    t.backend.initialize(None, None).unwrap();
    let expected = log_full_matrix(&t.backend);
    t.backend.shutdown().unwrap();

    let log_file = t.find_single_log("fake_exe");
    assert_eq!(fs::read_to_string(log_file).unwrap(), expected);
}

#[test]
fn test_init_invalid_flush_setting() {
    let t = LoggingTest::new();
    t.env().set(OLD_FLUSHING_BEHAVIOR_VAR, "invalid");

    let err = t.backend.initialize(None, None).unwrap_err();
    assert_eq!(err.code(), RetCode::Error);
    assert!(err.to_string().contains("unrecognized value"));
    assert!(err.to_string().contains("'invalid'"));
    assert!(!t.backend.is_initialized());
}

#[test]
fn test_error_messages_are_flushed_immediately() {
    let t = LoggingTest::new();
    t.backend.initialize(None, None).unwrap();
    let log_file = t.backend.log_file_path().unwrap();

    t.backend.log(Severity::Error.as_raw(), None, "disk on fire");

    // Still Ready: the line must already be on disk.
    assert_eq!(fs::read_to_string(&log_file).unwrap(), "disk on fire\n");
    t.backend.shutdown().unwrap();
}

#[test]
fn test_periodic_flush() {
    let temp = TempDir::new().unwrap();
    let env = FakeEnv::new().with_var(LOG_DIR_VAR, temp.path().to_string_lossy());
    let backend = FileBackend::new(env).with_flush_interval(Duration::from_millis(20));
    backend.initialize(None, None).unwrap();
    let log_file = backend.log_file_path().unwrap();

    backend.log(Severity::Info.as_raw(), None, "eventually visible");

    let mut contents = String::new();
    for _ in 0..100 {
        contents = fs::read_to_string(&log_file).unwrap();
        if !contents.is_empty() {
            break;
        }
        thread::sleep(Duration::from_millis(10));
    }
    assert_eq!(contents, "eventually visible\n");
    backend.shutdown().unwrap();
}

// ============================================================================
// Rotation
// ============================================================================

#[test]
fn test_rotating_files() {
    let t = LoggingTest::new();
    t.env().set(ROTATE_FILES_VAR, "true");
    t.env().set(ROTATING_FILE_SIZE_BYTES_VAR, "32");
    t.env().set(MAX_NUM_FILES_VAR, "2");

    t.backend.initialize(None, Some("rotating")).unwrap();
    for i in 0..10 {
        t.backend
            .log(Severity::Info.as_raw(), None, &format!("rotating message {:02}", i));
    }
    t.backend.shutdown().unwrap();

    // Active file plus two backups
    let logs = t.find_logs("rotating");
    assert_eq!(logs.len(), 3, "{:?}", logs);
    let active = logs
        .iter()
        .find(|p| p.file_name().unwrap().to_string_lossy().matches('.').count() == 1)
        .unwrap();
    assert_eq!(
        fs::read_to_string(active).unwrap(),
        "rotating message 09\n"
    );
}

#[test]
fn test_rotating_defaults_apply_when_unset() {
    let t = LoggingTest::new();
    t.env().set(ROTATE_FILES_VAR, "TRUE");

    t.backend.initialize(None, None).unwrap();
    t.backend.log(Severity::Warn.as_raw(), None, "small");
    t.backend.shutdown().unwrap();

    assert_eq!(t.find_logs("fake_exe").len(), 1);
}

#[test]
fn test_malformed_rotation_settings() {
    for (var, value) in [
        (ROTATING_FILE_SIZE_BYTES_VAR, "lots"),
        (ROTATING_FILE_SIZE_BYTES_VAR, "-1"),
        (MAX_NUM_FILES_VAR, "five"),
        (MAX_NUM_FILES_VAR, "-3"),
    ] {
        let t = LoggingTest::new();
        t.env().set(ROTATE_FILES_VAR, "1");
        t.env().set(var, value);

        let err = t.backend.initialize(None, None).unwrap_err();
        assert_eq!(err.code(), RetCode::Error);
        assert!(
            err.to_string().contains(value),
            "message should name {}: {}",
            value,
            err
        );
        assert!(!t.backend.is_initialized());
    }
}

#[test]
fn test_invalid_rotate_flag() {
    let t = LoggingTest::new();
    t.env().set(ROTATE_FILES_VAR, "yes");

    let err = t.backend.initialize(None, None).unwrap_err();
    assert!(err.to_string().contains("Valid truthy values"));
    assert!(!t.backend.is_initialized());
}

// ============================================================================
// Concurrency
// ============================================================================

#[test]
fn test_concurrent_initialize_creates_one_logger() {
    let t = LoggingTest::new();
    let backend = Arc::new(t.backend);

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let backend = backend.clone();
            thread::spawn(move || backend.initialize(None, None).unwrap())
        })
        .collect();
    let statuses: Vec<InitStatus> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    let initialized = statuses
        .iter()
        .filter(|s| **s == InitStatus::Initialized)
        .count();
    assert_eq!(initialized, 1);
    backend.shutdown().unwrap();

    let logs: Vec<_> = fs::read_dir(t.temp.path()).unwrap().collect();
    assert_eq!(logs.len(), 1);
}

#[test]
fn test_concurrent_logging() {
    let t = LoggingTest::new();
    t.backend.initialize(None, None).unwrap();
    let backend = Arc::new(t.backend);

    let handles: Vec<_> = (0..4)
        .map(|worker| {
            let backend = backend.clone();
            thread::spawn(move || {
                for i in 0..250 {
                    backend.log(
                        Severity::Warn.as_raw(),
                        None,
                        &format!("worker {} line {}", worker, i),
                    );
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
    let log_file = backend.log_file_path().unwrap();
    backend.shutdown().unwrap();

    let contents = fs::read_to_string(log_file).unwrap();
    assert_eq!(contents.lines().count(), 1000);
    assert!(contents.lines().all(|line| line.starts_with("worker ")));
}
