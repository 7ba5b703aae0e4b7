//! Capability traits for external collaborators
//!
//! The core is generic over its backend and its identity context. Both are
//! composed in by reference at construction - there is no subclassing, just
//! these two traits.

use async_trait::async_trait;

use quill_record::LogRecord;

use crate::error::SinkError;

/// Persistence backend for drained batches.
///
/// `persist` is never called with an empty batch. Failures are caught at
/// the call site, logged with the count of lost records, and do not
/// propagate - a bad batch never stops the rest of a flush cycle.
#[async_trait]
pub trait PersistenceProvider: Send + Sync {
    /// Store one batch. Ownership of the records transfers to the call.
    async fn persist(&self, batch: Vec<LogRecord>) -> std::result::Result<(), SinkError>;

    /// Validate provider-specific fields of the raw sink section.
    ///
    /// Runs during every configuration reload, after the shared thresholds
    /// validate; rejecting keeps the sink disabled. The default accepts
    /// everything.
    fn validate_config(&self, _section: &toml::Table) -> std::result::Result<(), String> {
        Ok(())
    }
}

/// Read-only identity context attached to each record.
///
/// Absence yields empty strings, never an error.
pub trait ContextProvider: Send + Sync {
    /// Current user identity, empty when unknown.
    fn user(&self) -> String {
        String::new()
    }

    /// Current thread or task identity, empty when unknown.
    fn task(&self) -> String {
        String::new()
    }
}

/// Context that reports nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoContext;

impl ContextProvider for NoContext {}

/// Context that reports the calling thread's name.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadContext;

impl ContextProvider for ThreadContext {
    fn task(&self) -> String {
        std::thread::current().name().unwrap_or_default().to_string()
    }
}
