//! Process environment access.
//!
//! Everything the backends read from the surrounding process (environment
//! variables, home and working directory, executable name, pid, wall clock)
//! goes through [`Environment`]. [`ProcessEnv`] is the real process;
//! [`FakeEnv`] is an in-memory stand-in so tests never touch shared global
//! state.

use std::collections::{HashMap, HashSet};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::SystemTime;

use parking_lot::RwLock;
use thiserror::Error;

use crate::error::{LoggingError, LoggingResult};

/// Variable holding the user's home directory on this platform.
#[cfg(windows)]
pub const HOME_VAR: &str = "USERPROFILE";
#[cfg(not(windows))]
pub const HOME_VAR: &str = "HOME";

const TRUE_STRINGS: &[&str] = &["1", "true", "TRUE"];
const FALSE_STRINGS: &[&str] = &["0", "false", "FALSE", ""];

/// Failure to read a variable that is present.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EnvError {
    #[error("value is not valid unicode")]
    NotUnicode,
}

/// Read access to the process the logger lives in.
pub trait Environment: Send + Sync {
    /// `Ok(None)` when unset; `Err` only when the variable exists but is unreadable.
    fn var(&self, name: &str) -> Result<Option<String>, EnvError>;

    fn current_dir(&self) -> io::Result<PathBuf>;

    /// Base name of the running executable.
    fn executable_name(&self) -> Option<String>;

    fn pid(&self) -> u32;

    fn now(&self) -> SystemTime;

    /// The user's home directory; an empty value counts as missing.
    fn home_dir(&self) -> Option<PathBuf> {
        self.var(HOME_VAR)
            .ok()
            .flatten()
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
    }
}

impl<E: Environment + ?Sized> Environment for Arc<E> {
    fn var(&self, name: &str) -> Result<Option<String>, EnvError> {
        (**self).var(name)
    }

    fn current_dir(&self) -> io::Result<PathBuf> {
        (**self).current_dir()
    }

    fn executable_name(&self) -> Option<String> {
        (**self).executable_name()
    }

    fn pid(&self) -> u32 {
        (**self).pid()
    }

    fn now(&self) -> SystemTime {
        (**self).now()
    }

    fn home_dir(&self) -> Option<PathBuf> {
        (**self).home_dir()
    }
}

/// The real process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl Environment for ProcessEnv {
    fn var(&self, name: &str) -> Result<Option<String>, EnvError> {
        match std::env::var(name) {
            Ok(v) => Ok(Some(v)),
            Err(std::env::VarError::NotPresent) => Ok(None),
            Err(std::env::VarError::NotUnicode(_)) => Err(EnvError::NotUnicode),
        }
    }

    fn current_dir(&self) -> io::Result<PathBuf> {
        std::env::current_dir()
    }

    fn executable_name(&self) -> Option<String> {
        let exe = std::env::current_exe().ok()?;
        let name = exe.file_name()?.to_str()?.to_string();
        #[cfg(windows)]
        let name = name
            .strip_suffix(".exe")
            .map(str::to_string)
            .unwrap_or(name);
        Some(name)
    }

    fn pid(&self) -> u32 {
        std::process::id()
    }

    fn now(&self) -> SystemTime {
        SystemTime::now()
    }
}

/// In-memory environment for tests and embedders.
///
/// Starts empty: no variables, cwd `/`, executable `fake_exe`, pid 4242 and
/// the real wall clock.
#[derive(Debug)]
pub struct FakeEnv {
    vars: RwLock<HashMap<String, String>>,
    unreadable: RwLock<HashSet<String>>,
    cwd: RwLock<Option<PathBuf>>,
    executable: RwLock<Option<String>>,
    pid: u32,
    clock: RwLock<Option<SystemTime>>,
}

impl Default for FakeEnv {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeEnv {
    pub fn new() -> Self {
        Self {
            vars: RwLock::new(HashMap::new()),
            unreadable: RwLock::new(HashSet::new()),
            cwd: RwLock::new(Some(PathBuf::from("/"))),
            executable: RwLock::new(Some("fake_exe".to_string())),
            pid: 4242,
            clock: RwLock::new(None),
        }
    }

    /// Builder form of [`FakeEnv::set`].
    pub fn with_var(self, name: &str, value: impl Into<String>) -> Self {
        self.set(name, value);
        self
    }

    pub fn with_pid(mut self, pid: u32) -> Self {
        self.pid = pid;
        self
    }

    pub fn set(&self, name: &str, value: impl Into<String>) {
        self.unreadable.write().remove(name);
        self.vars.write().insert(name.to_string(), value.into());
    }

    pub fn unset(&self, name: &str) {
        self.unreadable.write().remove(name);
        self.vars.write().remove(name);
    }

    /// Make reads of `name` fail as if the value were not valid unicode.
    pub fn set_unreadable(&self, name: &str) {
        self.unreadable.write().insert(name.to_string());
    }

    pub fn set_home(&self, home: impl Into<String>) {
        self.set(HOME_VAR, home);
    }

    pub fn set_current_dir(&self, cwd: Option<PathBuf>) {
        *self.cwd.write() = cwd;
    }

    pub fn set_executable_name(&self, name: Option<&str>) {
        *self.executable.write() = name.map(str::to_string);
    }

    /// Pin the clock; `None` restores the real wall clock.
    pub fn set_time(&self, time: Option<SystemTime>) {
        *self.clock.write() = time;
    }
}

impl Environment for FakeEnv {
    fn var(&self, name: &str) -> Result<Option<String>, EnvError> {
        if self.unreadable.read().contains(name) {
            return Err(EnvError::NotUnicode);
        }
        Ok(self.vars.read().get(name).cloned())
    }

    fn current_dir(&self) -> io::Result<PathBuf> {
        self.cwd
            .read()
            .clone()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no current directory"))
    }

    fn executable_name(&self) -> Option<String> {
        self.executable.read().clone()
    }

    fn pid(&self) -> u32 {
        self.pid
    }

    fn now(&self) -> SystemTime {
        self.clock.read().unwrap_or_else(SystemTime::now)
    }
}

/// Read `name`, treating an empty value the same as an unset one.
pub fn non_empty_var(env: &dyn Environment, name: &str) -> LoggingResult<Option<String>> {
    match env.var(name) {
        Ok(value) => Ok(value.filter(|v| !v.is_empty())),
        Err(e) => Err(LoggingError::EnvRead {
            name: name.to_string(),
            reason: e.to_string(),
        }),
    }
}

fn join_quoted(list: &[&str]) -> String {
    list.iter()
        .map(|s| format!("'{}'", s))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Interpret a boolean flag value; unset and empty are false.
pub fn parse_bool(name: &str, value: Option<&str>) -> LoggingResult<bool> {
    let value = value.unwrap_or("");
    if FALSE_STRINGS.contains(&value) {
        Ok(false)
    } else if TRUE_STRINGS.contains(&value) {
        Ok(true)
    } else {
        Err(LoggingError::EnvValue {
            name: name.to_string(),
            value: value.to_string(),
            expected: format!(
                "Valid truthy values: {}. Valid falsy values: {}.",
                join_quoted(TRUE_STRINGS),
                join_quoted(FALSE_STRINGS)
            ),
        })
    }
}

/// Interpret a non-negative integer; unset and empty yield `default`.
pub fn parse_size(name: &str, value: Option<&str>, default: u64) -> LoggingResult<u64> {
    let value = match value {
        None | Some("") => return Ok(default),
        Some(v) => v,
    };
    let bad_value = || LoggingError::EnvValue {
        name: name.to_string(),
        value: value.to_string(),
        expected: "Expected a non-negative integer.".to_string(),
    };
    let parsed: i128 = value.trim().parse().map_err(|_| bad_value())?;
    if parsed < 0 {
        return Err(bad_value());
    }
    u64::try_from(parsed).map_err(|_| bad_value())
}

/// Read and interpret a boolean flag from the environment.
pub fn bool_var(env: &dyn Environment, name: &str) -> LoggingResult<bool> {
    let value = non_empty_var(env, name)?;
    parse_bool(name, value.as_deref())
}

/// Read and interpret a size from the environment.
pub fn size_var(env: &dyn Environment, name: &str, default: u64) -> LoggingResult<u64> {
    let value = non_empty_var(env, name)?;
    parse_size(name, value.as_deref(), default)
}
