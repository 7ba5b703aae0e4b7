//! Pending-record queue
//!
//! The unbounded queue between accept call sites and the flush engine.
//! Push is lock-free and never blocks, so a slow or hanging persistence
//! call can never back up into the producers.

use crossbeam::queue::SegQueue;

use crate::LogRecord;

/// Lock-free queue of records awaiting the next flush cycle.
///
/// Supports concurrent push from arbitrarily many producers and
/// concurrent-safe draining by the single active flusher.
#[derive(Debug, Default)]
pub struct RecordQueue {
    inner: SegQueue<LogRecord>,
}

impl RecordQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue a record. Never blocks.
    #[inline]
    pub fn push(&self, record: LogRecord) {
        self.inner.push(record);
    }

    /// Number of pending records.
    ///
    /// Approximate under concurrent use; threshold checks against it are
    /// best-effort.
    #[inline]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Whether the queue is currently empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Pop up to `max` records in FIFO order.
    ///
    /// Pulls whatever is available at the moment of the call; records pushed
    /// concurrently may or may not be included.
    pub fn drain(&self, max: usize) -> Vec<LogRecord> {
        let mut batch = Vec::with_capacity(max.min(self.inner.len()));
        while batch.len() < max {
            match self.inner.pop() {
                Some(record) => batch.push(record),
                None => break,
            }
        }
        batch
    }
}

#[cfg(test)]
#[path = "queue_test.rs"]
mod queue_test;
