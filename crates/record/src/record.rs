//! Immutable log record

use chrono::{DateTime, Utc};

use crate::Severity;

/// A single accepted log call.
///
/// Created once per accepted call and never mutated. The record is owned by
/// the pending queue until it is drained into a batch, at which point
/// ownership moves to the persistence collaborator call.
#[derive(Debug, Clone, PartialEq)]
pub struct LogRecord {
    /// When the call was accepted
    pub timestamp: DateTime<Utc>,

    /// Severity the call was made at
    pub severity: Severity,

    /// Dotted hierarchical origin of the record (e.g. `app.db.pool`)
    pub category: String,

    /// User identity from the context collaborator, empty when absent
    pub user: String,

    /// Thread or task identity from the context collaborator, empty when absent
    pub task: String,

    /// Message text
    pub message: String,

    /// Pre-formatted error text, `None` when the call carried no error
    pub error: Option<String>,
}

impl LogRecord {
    /// Create a record stamped with the current time.
    ///
    /// Identity fields start empty and the record carries no error text;
    /// use [`with_context`](Self::with_context) and
    /// [`with_error`](Self::with_error) to fill them in.
    pub fn new(
        severity: Severity,
        category: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            severity,
            category: category.into(),
            user: String::new(),
            task: String::new(),
            message: message.into(),
            error: None,
        }
    }

    /// Attach user and thread/task identity.
    pub fn with_context(mut self, user: impl Into<String>, task: impl Into<String>) -> Self {
        self.user = user.into();
        self.task = task.into();
        self
    }

    /// Attach formatted error text from an error value.
    pub fn with_error(mut self, error: &(dyn std::error::Error + 'static)) -> Self {
        self.error = Some(format_error(error));
        self
    }
}

/// Render an error and its source chain as record error text.
///
/// The first line is the error's own display form; each source in the chain
/// follows under a `Caused by:` header.
pub fn format_error(error: &(dyn std::error::Error + 'static)) -> String {
    let mut text = error.to_string();
    let mut source = error.source();
    if source.is_some() {
        text.push_str("\nCaused by:");
    }
    while let Some(cause) = source {
        text.push_str("\n  ");
        text.push_str(&cause.to_string());
        source = cause.source();
    }
    text
}
