//! Configuration file for the hierarchy backend.
//!
//! ```toml
//! [root]
//! level = "info"                 # name or integer severity, default "debug"
//! file = "/tmp/app.log"          # default: synthesized name in the log directory
//! append = true                  # default true
//! pattern = "%d [%p] %c: %m%n"   # default "%m%n"
//!
//! [loggers]
//! "robot.arm" = "debug"
//! "robot.leg" = 40
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use rcl_logging_interface::{Level, LoggingError, LoggingResult};

use crate::layout::{PatternLayout, DEFAULT_PATTERN};

/// Root threshold when neither the file nor the caller sets one.
pub const DEFAULT_ROOT_LEVEL: Level = Level::Debug;

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum LevelValue {
    Name(String),
    Severity(i64),
}

impl LevelValue {
    fn resolve(&self) -> Result<Level, String> {
        match self {
            LevelValue::Name(name) => {
                Level::parse(name).ok_or_else(|| format!("unknown level '{}'", name))
            }
            LevelValue::Severity(raw) => {
                let raw = i32::try_from(*raw)
                    .map_err(|_| format!("severity {} is out of range", raw))?;
                Ok(Level::from_severity(raw))
            }
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RootSection {
    level: Option<LevelValue>,
    file: Option<PathBuf>,
    append: Option<bool>,
    pattern: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    #[serde(default)]
    root: RootSection,
    #[serde(default)]
    loggers: BTreeMap<String, LevelValue>,
}

/// Validated configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HierarchyConfig {
    pub root_level: Level,
    /// Explicit output file; `None` means the synthesized per-process name
    pub file: Option<PathBuf>,
    pub append: bool,
    pub layout: PatternLayout,
    /// Per-logger thresholds, sorted by name
    pub loggers: Vec<(String, Level)>,
}

impl Default for HierarchyConfig {
    fn default() -> Self {
        Self {
            root_level: DEFAULT_ROOT_LEVEL,
            file: None,
            append: true,
            layout: PatternLayout::default(),
            loggers: Vec::new(),
        }
    }
}

impl HierarchyConfig {
    /// Read and validate `path`.
    pub fn load(path: &Path) -> LoggingResult<Self> {
        if !path.exists() {
            return Err(LoggingError::ConfigFileDoesntExist(path.to_path_buf()));
        }
        let invalid = |reason: String| LoggingError::ConfigFileInvalid {
            path: path.to_path_buf(),
            reason,
        };

        let text = fs::read_to_string(path).map_err(|e| invalid(e.to_string()))?;
        Self::parse(&text).map_err(invalid)
    }

    /// Parse configuration text; the error is a human-readable reason.
    pub fn parse(text: &str) -> Result<Self, String> {
        let raw: ConfigFile = toml::from_str(text).map_err(|e| e.to_string())?;

        let root_level = match &raw.root.level {
            Some(value) => value.resolve().map_err(|e| format!("[root] level: {}", e))?,
            None => DEFAULT_ROOT_LEVEL,
        };

        if raw.root.file.as_ref().is_some_and(|f| f.as_os_str().is_empty()) {
            return Err("[root] file must not be empty".to_string());
        }

        let pattern = raw.root.pattern.as_deref().unwrap_or(DEFAULT_PATTERN);
        let layout = PatternLayout::parse(pattern).map_err(|e| format!("[root] pattern: {}", e))?;

        let mut loggers = Vec::with_capacity(raw.loggers.len());
        for (name, value) in &raw.loggers {
            if name.is_empty() {
                return Err("[loggers] names must not be empty; use [root]".to_string());
            }
            let level = value
                .resolve()
                .map_err(|e| format!("[loggers] '{}': {}", name, e))?;
            loggers.push((name.clone(), level));
        }

        Ok(Self {
            root_level,
            file: raw.root.file,
            append: raw.root.append.unwrap_or(true),
            layout,
            loggers,
        })
    }
}
