//! In-memory persistence provider
//!
//! Captures batches instead of writing them anywhere. Used for tests,
//! benchmarks, and validating sink wiring without an external backend.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;

use quill_record::LogRecord;

use crate::error::SinkError;
use crate::provider::PersistenceProvider;

/// Provider that stores every persisted batch in memory.
///
/// Failures can be scripted with [`fail_next`](Self::fail_next) to exercise
/// the engine's per-batch error isolation.
#[derive(Debug, Default)]
pub struct MemoryProvider {
    batches: Mutex<Vec<Vec<LogRecord>>>,
    fail_next: AtomicUsize,
}

impl MemoryProvider {
    /// Create an empty provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// All batches persisted so far, in order.
    pub fn batches(&self) -> Vec<Vec<LogRecord>> {
        self.batches.lock().clone()
    }

    /// Sizes of the persisted batches, in order.
    pub fn batch_sizes(&self) -> Vec<usize> {
        self.batches.lock().iter().map(Vec::len).collect()
    }

    /// Total number of persisted records.
    pub fn record_count(&self) -> usize {
        self.batches.lock().iter().map(Vec::len).sum()
    }

    /// Fail the next `n` persist calls.
    pub fn fail_next(&self, n: usize) {
        self.fail_next.store(n, Ordering::SeqCst);
    }
}

#[async_trait]
impl PersistenceProvider for MemoryProvider {
    async fn persist(&self, batch: Vec<LogRecord>) -> std::result::Result<(), SinkError> {
        let scripted_failure = self
            .fail_next
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if scripted_failure {
            return Err(SinkError::persist("scripted failure"));
        }

        self.batches.lock().push(batch);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quill_record::Severity;

    fn batch(n: usize) -> Vec<LogRecord> {
        (0..n)
            .map(|i| LogRecord::new(Severity::Info, "test", i.to_string()))
            .collect()
    }

    #[tokio::test]
    async fn test_persist_captures_batches() {
        let provider = MemoryProvider::new();
        provider.persist(batch(2)).await.unwrap();
        provider.persist(batch(3)).await.unwrap();

        assert_eq!(provider.batch_sizes(), [2, 3]);
        assert_eq!(provider.record_count(), 5);
    }

    #[tokio::test]
    async fn test_scripted_failures_then_recovery() {
        let provider = MemoryProvider::new();
        provider.fail_next(2);

        assert!(provider.persist(batch(1)).await.is_err());
        assert!(provider.persist(batch(1)).await.is_err());
        assert!(provider.persist(batch(1)).await.is_ok());
        assert_eq!(provider.record_count(), 1);
    }
}
