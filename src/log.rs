//! Logging capability
//!
//! The store and the persistence layer report events through a [`Logger`]
//! handed to them at construction instead of a process-wide sink.
//! [`TracingLogger`] forwards to `tracing`; [`MemoryLogger`] keeps entries
//! in memory so tests can assert on them.

use std::fmt;

use parking_lot::Mutex;

/// Severity of a log message
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
    Critical,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warning => "WARN",
            LogLevel::Error => "ERROR",
            LogLevel::Critical => "CRITICAL",
        })
    }
}

/// A sink for leveled text messages
pub trait Logger: Send + Sync {
    fn log(&self, level: LogLevel, message: &str);
}

/// Forwards to the `tracing` macros
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn log(&self, level: LogLevel, message: &str) {
        match level {
            LogLevel::Debug => tracing::debug!("{}", message),
            LogLevel::Info => tracing::info!("{}", message),
            LogLevel::Warning => tracing::warn!("{}", message),
            LogLevel::Error => tracing::error!("{}", message),
            LogLevel::Critical => tracing::error!(critical = true, "{}", message),
        }
    }
}

/// Discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullLogger;

impl Logger for NullLogger {
    fn log(&self, _level: LogLevel, _message: &str) {}
}

/// Keeps every entry in memory
#[derive(Debug, Default)]
pub struct MemoryLogger {
    entries: Mutex<Vec<(LogLevel, String)>>,
}

impl MemoryLogger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all entries so far
    pub fn entries(&self) -> Vec<(LogLevel, String)> {
        self.entries.lock().clone()
    }

    /// Number of entries at exactly `level`
    pub fn count(&self, level: LogLevel) -> usize {
        self.entries.lock().iter().filter(|(l, _)| *l == level).count()
    }

    /// True if any entry's message contains `needle`
    pub fn contains(&self, needle: &str) -> bool {
        self.entries.lock().iter().any(|(_, m)| m.contains(needle))
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}

impl Logger for MemoryLogger {
    fn log(&self, level: LogLevel, message: &str) {
        self.entries.lock().push((level, message.to_string()));
    }
}
