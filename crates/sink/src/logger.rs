//! Per-category logger handles
//!
//! The entry points a host logging framework drives: a cheap `Logger`
//! handle per category, created once and cached in the registry.

use std::sync::Arc;

use dashmap::DashMap;

use quill_record::Severity;

use crate::sink::BufferedSink;

/// Lightweight handle for logging into one category.
///
/// Handles are `Clone` (two Arcs) and safe to share across threads. `log`
/// checks [`enabled`](Self::enabled) first, so every record that reaches
/// the sink's accept path is persist-bound.
#[derive(Debug, Clone)]
pub struct Logger {
    sink: Arc<BufferedSink>,
    category: Arc<str>,
}

impl Logger {
    /// The category this handle logs into.
    #[inline]
    pub fn category(&self) -> &str {
        &self.category
    }

    /// Whether a record at `level` would currently be accepted.
    #[inline]
    pub fn enabled(&self, level: Severity) -> bool {
        self.sink.is_enabled(&self.category, level)
    }

    /// Log a message, with an optional error attached.
    ///
    /// Filtered by the current routing table; a disabled level is a no-op.
    pub fn log(
        &self,
        level: Severity,
        message: impl Into<String>,
        error: Option<&(dyn std::error::Error + 'static)>,
    ) {
        if !self.enabled(level) {
            return;
        }
        self.sink.accept(level, &self.category, message, error);
    }

    /// Log at trace level.
    pub fn trace(&self, message: impl Into<String>) {
        self.log(Severity::Trace, message, None);
    }

    /// Log at debug level.
    pub fn debug(&self, message: impl Into<String>) {
        self.log(Severity::Debug, message, None);
    }

    /// Log at info level.
    pub fn info(&self, message: impl Into<String>) {
        self.log(Severity::Info, message, None);
    }

    /// Log at warn level.
    pub fn warn(&self, message: impl Into<String>) {
        self.log(Severity::Warn, message, None);
    }

    /// Log at error level, with an optional error attached.
    pub fn error(
        &self,
        message: impl Into<String>,
        error: Option<&(dyn std::error::Error + 'static)>,
    ) {
        self.log(Severity::Error, message, error);
    }

    /// Log at critical level, with an optional error attached.
    pub fn critical(
        &self,
        message: impl Into<String>,
        error: Option<&(dyn std::error::Error + 'static)>,
    ) {
        self.log(Severity::Critical, message, error);
    }
}

/// Creates and caches one `Logger` per category.
///
/// `logger()` is idempotent: repeated calls for the same category return
/// handles over the same cached entry, with no synchronization beyond the
/// map's own sharding.
pub struct LoggerRegistry {
    sink: Arc<BufferedSink>,
    loggers: DashMap<Arc<str>, Logger>,
}

impl LoggerRegistry {
    /// Create a registry over a sink.
    pub fn new(sink: Arc<BufferedSink>) -> Self {
        Self {
            sink,
            loggers: DashMap::new(),
        }
    }

    /// Get or create the logger for a category.
    pub fn logger(&self, category: &str) -> Logger {
        if let Some(logger) = self.loggers.get(category) {
            return logger.clone();
        }

        let category: Arc<str> = category.into();
        self.loggers
            .entry(Arc::clone(&category))
            .or_insert_with(|| Logger {
                sink: Arc::clone(&self.sink),
                category,
            })
            .clone()
    }

    /// Number of distinct categories seen so far.
    pub fn category_count(&self) -> usize {
        self.loggers.len()
    }

    /// The sink this registry feeds.
    #[inline]
    pub fn sink(&self) -> &Arc<BufferedSink> {
        &self.sink
    }
}

impl std::fmt::Debug for LoggerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoggerRegistry")
            .field("sink", &self.sink.name())
            .field("categories", &self.category_count())
            .finish()
    }
}

#[cfg(test)]
#[path = "logger_test.rs"]
mod logger_test;
