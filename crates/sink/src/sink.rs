//! Buffered sink façade
//!
//! The producer-facing surface: accept records, filter by the current
//! routing table, and trigger guarded flushes when the queue crosses the
//! configured threshold.
//!
//! # Hot Path
//!
//! `accept` is synchronous and never blocks on I/O: it pushes onto the
//! lock-free queue, reads the atomic config snapshot, and at most signals
//! the flush worker. All I/O happens on the worker task.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::Notify;
use tokio::task::JoinHandle;

use quill_config::{ConfigManager, ConfigSource, SinkSettings};
use quill_record::{LogRecord, RecordQueue, Severity};

use crate::flush::{FlushEngine, FlushOutcome};
use crate::provider::{ContextProvider, PersistenceProvider};

/// How often the flush worker re-reads the snapshot while no time-based
/// trigger is configured.
const CONFIG_POLL_PERIOD: Duration = Duration::from_millis(200);

/// Metrics for the sink façade
#[derive(Debug, Default)]
pub struct SinkMetrics {
    /// Records accepted onto the queue
    pub records_accepted: AtomicU64,

    /// Threshold crossings that signalled the flush worker
    pub flush_triggers: AtomicU64,
}

impl SinkMetrics {
    /// Get snapshot of all metrics
    pub fn snapshot(&self) -> SinkMetricsSnapshot {
        SinkMetricsSnapshot {
            records_accepted: self.records_accepted.load(Ordering::Relaxed),
            flush_triggers: self.flush_triggers.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time snapshot of sink metrics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SinkMetricsSnapshot {
    pub records_accepted: u64,
    pub flush_triggers: u64,
}

/// Buffered, batching log sink.
///
/// Producers call [`is_enabled`](Self::is_enabled) and
/// [`accept`](Self::accept) concurrently from any number of threads. The
/// sink buffers accepted records and hands them to the persistence
/// collaborator in batches, from a worker task, under a non-blocking flush
/// guard.
///
/// # Example
///
/// ```ignore
/// use std::sync::Arc;
/// use quill_config::{MemorySource, SinkSettings};
/// use quill_sink::{BufferedSink, MemoryProvider, NoContext};
///
/// let source = Arc::new(MemorySource::with_toml(CONFIG)?);
/// let sink = BufferedSink::spawn(
///     SinkSettings::new("quill"),
///     Arc::new(MemoryProvider::new()),
///     Arc::new(NoContext),
///     source,
/// );
///
/// if sink.is_enabled("app.db", Severity::Info) {
///     sink.accept(Severity::Info, "app.db", "connected", None);
/// }
/// ```
pub struct BufferedSink {
    settings: SinkSettings,
    queue: Arc<RecordQueue>,
    engine: FlushEngine,
    config: Arc<ConfigManager>,
    context: Arc<dyn ContextProvider>,
    flush_signal: Notify,
    shutdown: AtomicBool,
    reload_task: Mutex<Option<JoinHandle<()>>>,
    metrics: SinkMetrics,
}

impl BufferedSink {
    /// Create a sink without spawning its background tasks.
    ///
    /// The sink starts disabled; the embedder drives reloads and flushes
    /// itself (useful for tests and custom runtimes). Use
    /// [`spawn`](Self::spawn) for the standard setup.
    pub fn new(
        settings: SinkSettings,
        provider: Arc<dyn PersistenceProvider>,
        context: Arc<dyn ContextProvider>,
        source: Arc<dyn ConfigSource>,
    ) -> Self {
        let queue = Arc::new(RecordQueue::new());

        let hook_provider = Arc::clone(&provider);
        let config = Arc::new(
            ConfigManager::new(settings.clone(), source).with_validator(Box::new(
                move |section| hook_provider.validate_config(section),
            )),
        );

        Self {
            engine: FlushEngine::new(Arc::clone(&queue), provider),
            settings,
            queue,
            config,
            context,
            flush_signal: Notify::new(),
            shutdown: AtomicBool::new(false),
            reload_task: Mutex::new(None),
            metrics: SinkMetrics::default(),
        }
    }

    /// Create a sink and spawn its reload loop and flush worker.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn(
        settings: SinkSettings,
        provider: Arc<dyn PersistenceProvider>,
        context: Arc<dyn ContextProvider>,
        source: Arc<dyn ConfigSource>,
    ) -> Arc<Self> {
        let sink = Arc::new(Self::new(settings, provider, context, source));

        let reload = tokio::spawn(Arc::clone(&sink.config).run());
        *sink.reload_task.lock() = Some(reload);

        tokio::spawn(Arc::clone(&sink).run_flush_worker());

        sink
    }

    /// Whether a record at `level` in `category` would be accepted.
    ///
    /// Producers check this before building a message and calling
    /// [`accept`](Self::accept); `accept` itself does not re-filter.
    pub fn is_enabled(&self, category: &str, level: Severity) -> bool {
        if self.shutdown.load(Ordering::Acquire) {
            return false;
        }
        self.config.current().table.is_enabled(category, level)
    }

    /// Accept a record onto the queue.
    ///
    /// No-op after shutdown. Identity comes from the context collaborator;
    /// the record is enqueued unconditionally (severity filtering is the
    /// caller's `is_enabled` check), and the flush worker is signalled when
    /// the queue reaches the configured threshold. Never blocks on I/O.
    pub fn accept(
        &self,
        level: Severity,
        category: &str,
        message: impl Into<String>,
        error: Option<&(dyn std::error::Error + 'static)>,
    ) {
        if self.shutdown.load(Ordering::Acquire) {
            return;
        }

        let mut record = LogRecord::new(level, category, message)
            .with_context(self.context.user(), self.context.task());
        if let Some(error) = error {
            record = record.with_error(error);
        }

        self.queue.push(record);
        self.metrics.records_accepted.fetch_add(1, Ordering::Relaxed);

        let config = self.config.current();
        if self.queue.len() >= config.thresholds.max_before_flush {
            self.metrics.flush_triggers.fetch_add(1, Ordering::Relaxed);
            self.flush_signal.notify_one();
        }
    }

    /// Run one guarded flush cycle with the current batch size.
    ///
    /// Safe to call concurrently from any number of tasks; callers that
    /// lose the guard race get [`FlushOutcome::Busy`] back immediately.
    pub async fn flush(&self) -> FlushOutcome {
        let max_per_batch = self.config.current().thresholds.max_per_batch;
        self.engine.flush(max_per_batch).await
    }

    /// Begin shutdown: a one-way flag that turns subsequent `accept` calls
    /// into no-ops.
    ///
    /// Does not drain the queue and does not cancel an in-progress flush;
    /// the flush worker exits on its next wake-up.
    pub fn shutdown(&self) {
        if self.shutdown.swap(true, Ordering::AcqRel) {
            return;
        }

        tracing::info!(sink = %self.settings.name(), "sink shutting down");

        if let Some(task) = self.reload_task.lock().take() {
            task.abort();
        }
        self.flush_signal.notify_one();
    }

    /// Whether shutdown has begun.
    #[inline]
    pub fn is_shutdown(&self) -> bool {
        self.shutdown.load(Ordering::Acquire)
    }

    /// The sink's logical name.
    #[inline]
    pub fn name(&self) -> &str {
        self.settings.name()
    }

    /// Number of records currently queued.
    #[inline]
    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    /// The configuration manager (for manual reloads and state checks).
    #[inline]
    pub fn config(&self) -> &ConfigManager {
        &self.config
    }

    /// Get reference to façade metrics
    #[inline]
    pub fn metrics(&self) -> &SinkMetrics {
        &self.metrics
    }

    /// Get reference to flush-engine metrics
    #[inline]
    pub fn flush_metrics(&self) -> &crate::flush::FlushMetrics {
        self.engine.metrics()
    }

    /// Flush worker loop.
    ///
    /// Waits for a threshold signal, or for the configured `max_interval`
    /// to elapse when the current snapshot carries one. The snapshot is
    /// re-read every iteration, so threshold changes apply without a
    /// restart; without a configured interval the loop still wakes
    /// periodically to pick up a reload that introduces one, but only a
    /// signal or a configured interval actually flushes.
    async fn run_flush_worker(self: Arc<Self>) {
        tracing::debug!(sink = %self.settings.name(), "flush worker starting");

        loop {
            let fired = match self.config.current().thresholds.max_interval {
                Some(period) => {
                    // A zero period would spin; clamp to the smallest tick
                    let period = period.max(Duration::from_millis(1));
                    tokio::select! {
                        _ = self.flush_signal.notified() => true,
                        _ = tokio::time::sleep(period) => true,
                    }
                }
                None => {
                    tokio::select! {
                        _ = self.flush_signal.notified() => true,
                        _ = tokio::time::sleep(CONFIG_POLL_PERIOD) => false,
                    }
                }
            };

            if self.shutdown.load(Ordering::Acquire) {
                break;
            }

            if fired {
                self.flush().await;
            }
        }

        tracing::debug!(sink = %self.settings.name(), "flush worker stopping");
    }
}

impl std::fmt::Debug for BufferedSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BufferedSink")
            .field("name", &self.settings.name())
            .field("queued", &self.queue.len())
            .field("active", &self.config.is_active())
            .field("shutdown", &self.is_shutdown())
            .finish()
    }
}

#[cfg(test)]
#[path = "sink_test.rs"]
mod sink_test;
