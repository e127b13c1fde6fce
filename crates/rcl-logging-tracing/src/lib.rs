//! Logging backend that forwards to the `tracing` ecosystem.
//!
//! Per-logger thresholds are kept here (dotted-name inheritance, root at
//! INFO); whatever passes them is emitted as a `tracing` event, so output,
//! formatting and any further filtering belong to the installed subscriber.
//!
//! ```ignore
//! tracing_subscriber::fmt().init();
//!
//! let backend = TracingBackend::new();
//! backend.initialize(None, None)?;
//! backend.log(Severity::Warn.as_raw(), Some("nav.planner"), "no path found");
//! ```

pub mod backend;

// Re-exports
pub use backend::{TracingBackend, DEFAULT_ROOT_LEVEL, EVENT_TARGET};
