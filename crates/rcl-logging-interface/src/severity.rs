//! Severity scale and the mapping onto engine levels.
//!
//! Applications speak in raw integer severities on a stride-10 scale
//! (`UNSET=0`, `DEBUG=10`, ... `FATAL=50`). Engines only know five levels, so
//! every raw value is rounded *up* to the next defined level:
//!
//! ```text
//!   ..=10 → DEBUG   11..=20 → INFO   21..=30 → WARN
//!   31..=40 → ERROR   41.. → FATAL
//! ```
//!
//! `UNSET` therefore behaves as `DEBUG`: an UNSET message passes the UNSET and
//! DEBUG thresholds and nothing stricter, and an UNSET threshold lets every
//! message through.

use std::fmt;

/// Application-facing severity values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(i32)]
pub enum Severity {
    Unset = 0,
    Debug = 10,
    Info = 20,
    Warn = 30,
    Error = 40,
    Fatal = 50,
}

impl Severity {
    /// Every defined severity, in ascending order.
    pub const ALL: [Severity; 6] = [
        Severity::Unset,
        Severity::Debug,
        Severity::Info,
        Severity::Warn,
        Severity::Error,
        Severity::Fatal,
    ];

    pub fn as_raw(self) -> i32 {
        self as i32
    }
}

/// Engine level after rounding a raw severity up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    Debug,
    Info,
    Warn,
    Error,
    Fatal,
}

impl Level {
    /// Smallest defined level at or above `raw`; anything above FATAL is FATAL.
    pub fn from_severity(raw: i32) -> Self {
        if raw <= Severity::Debug.as_raw() {
            Level::Debug
        } else if raw <= Severity::Info.as_raw() {
            Level::Info
        } else if raw <= Severity::Warn.as_raw() {
            Level::Warn
        } else if raw <= Severity::Error.as_raw() {
            Level::Error
        } else {
            Level::Fatal
        }
    }

    /// Whether a message at `self` passes `threshold`.
    pub fn passes(self, threshold: Level) -> bool {
        self >= threshold
    }

    pub fn severity(self) -> Severity {
        match self {
            Level::Debug => Severity::Debug,
            Level::Info => Severity::Info,
            Level::Warn => Severity::Warn,
            Level::Error => Severity::Error,
            Level::Fatal => Severity::Fatal,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
            Level::Fatal => "FATAL",
        }
    }

    /// Parse a level name (case-insensitive) or a raw integer severity.
    pub fn parse(s: &str) -> Option<Self> {
        let s = s.trim();
        if let Ok(raw) = s.parse::<i32>() {
            return Some(Level::from_severity(raw));
        }
        match s.to_ascii_lowercase().as_str() {
            "unset" | "debug" => Some(Level::Debug),
            "info" => Some(Level::Info),
            "warn" | "warning" => Some(Level::Warn),
            "error" => Some(Level::Error),
            "fatal" => Some(Level::Fatal),
            _ => None,
        }
    }

    /// Compact encoding for storing a level in an atomic.
    pub fn to_u8(self) -> u8 {
        self as u8
    }

    pub fn from_u8(v: u8) -> Self {
        match v {
            0 => Level::Debug,
            1 => Level::Info,
            2 => Level::Warn,
            3 => Level::Error,
            _ => Level::Fatal,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
