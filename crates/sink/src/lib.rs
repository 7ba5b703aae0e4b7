//! Quill - Sink
//!
//! The buffered, batching log sink core: producers submit records at
//! arbitrary rates, the sink buffers them in memory, and a guarded flush
//! engine hands fixed-size batches to a pluggable persistence collaborator.
//!
//! # Architecture
//!
//! ```text
//! [Producers]                [BufferedSink]                  [Collaborators]
//!   Logger ──is_enabled──→ RoutingTable (ArcSwap snapshot)
//!   Logger ──accept─────→ RecordQueue ──(threshold)──→ Notify
//!                                            │
//!                              [flush worker / timer / manual]
//!                                            │
//!                                 FlushGuard (try-acquire)
//!                                            │
//!                                 FlushEngine ──batches──→ persist()
//!
//!   ConfigSource ──change──→ ConfigManager ──ArcSwap──→ EffectiveConfig
//! ```
//!
//! # Key Design
//!
//! - **Non-blocking hot path**: `accept` pushes onto a lock-free queue and
//!   reads a lock-free config snapshot; it never waits on I/O or the guard
//! - **At most one flusher**: concurrent flush triggers race for an atomic
//!   try-lock; losers return immediately instead of waiting
//! - **Per-batch failure isolation**: a failed persist call is logged with
//!   its lost-record count and the drain continues
//! - **Degrade, never crash**: configuration failures disable the sink
//!   (records stay queued); persistence failures lose records silently -
//!   the caller's thread is never blocked and never sees an error
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use quill_config::{MemorySource, SinkSettings};
//! use quill_record::Severity;
//! use quill_sink::{BufferedSink, LoggerRegistry, MemoryProvider, NoContext};
//!
//! let source = Arc::new(MemorySource::with_toml(r#"
//! [logging.quill]
//! max_before_flush = 500
//! max_per_batch = 100
//!
//! [logging.quill.levels]
//! default = "information"
//! "#)?);
//!
//! let sink = BufferedSink::spawn(
//!     SinkSettings::new("quill"),
//!     Arc::new(MemoryProvider::new()),
//!     Arc::new(NoContext),
//!     source,
//! );
//!
//! let registry = LoggerRegistry::new(Arc::clone(&sink));
//! let logger = registry.logger("app.db");
//! logger.info("connected");
//! ```

mod error;
mod flush;
mod guard;
mod logger;
mod memory;
mod provider;
mod sink;

pub use error::{Result, SinkError};
pub use flush::{FlushEngine, FlushMetrics, FlushMetricsSnapshot, FlushOutcome, FlushReport};
pub use guard::{FlushGuard, FlushPermit};
pub use logger::{Logger, LoggerRegistry};
pub use memory::MemoryProvider;
pub use provider::{ContextProvider, NoContext, PersistenceProvider, ThreadContext};
pub use sink::{BufferedSink, SinkMetrics, SinkMetricsSnapshot};

// Re-export key types from dependencies for convenience
pub use quill_config::{ConfigManager, ConfigSource, EffectiveConfig, MemorySource, SinkSettings};
pub use quill_record::{LogRecord, RecordQueue, Severity};
pub use quill_routing::RoutingTable;
