//! Logging utilities for the op bridge.
//!
//! Every crate logs through these macros so events carry a `module` field naming the
//! layer that emitted them (`bridge`, `backend`, `catalog`, ...). The events are
//! plain `tracing` events; installing a subscriber is left to the host glue.

use serde::{Deserialize, Serialize};

/// Logging level for bridge diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    /// Failures surfaced to the host
    Error,
    /// Suspicious but tolerated input
    Warn,
    /// Lifecycle messages
    #[default]
    Info,
    /// Per-call diagnostics
    Debug,
    /// Handle-level tracing
    Trace,
}

impl Level {
    /// Converts into the matching `tracing` level.
    pub fn as_tracing(self) -> tracing::Level {
        match self {
            Level::Error => tracing::Level::ERROR,
            Level::Warn => tracing::Level::WARN,
            Level::Info => tracing::Level::INFO,
            Level::Debug => tracing::Level::DEBUG,
            Level::Trace => tracing::Level::TRACE,
        }
    }
}

/// Macros for logging at specific levels.
#[macro_export]
macro_rules! log_error {
    ($module:expr, $($arg:tt)*) => {
        tracing::event!(tracing::Level::ERROR, module = $module, $($arg)*);
    }
}

#[macro_export]
macro_rules! log_warn {
    ($module:expr, $($arg:tt)*) => {
        tracing::event!(tracing::Level::WARN, module = $module, $($arg)*);
    }
}

#[macro_export]
macro_rules! log_info {
    ($module:expr, $($arg:tt)*) => {
        tracing::event!(tracing::Level::INFO, module = $module, $($arg)*);
    }
}

#[macro_export]
macro_rules! log_debug {
    ($module:expr, $($arg:tt)*) => {
        tracing::event!(tracing::Level::DEBUG, module = $module, $($arg)*);
    }
}

#[macro_export]
macro_rules! log_trace {
    ($module:expr, $($arg:tt)*) => {
        tracing::event!(tracing::Level::TRACE, module = $module, $($arg)*);
    }
}
