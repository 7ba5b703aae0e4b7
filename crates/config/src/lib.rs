//! Quill - Configuration
//!
//! TOML-based sink configuration with hot reload.
//!
//! # Layout
//!
//! All sink configuration lives under a `[logging]` root. Each sink reads
//! its own section, named after the sink's configuration-section identifier,
//! with a nested `levels` severity table. A shared `[logging.levels]` table
//! serves as the fallback when a sink carries no table of its own.
//!
//! ```toml
//! [logging.quill]
//! max_before_flush = 500
//! max_per_batch = 100
//! max_interval_ms = 5000
//!
//! [logging.quill.levels]
//! default = "warning"
//! "app.db" = "trace"
//! ```
//!
//! # Reload Protocol
//!
//! [`ConfigManager`] loads the tree from a [`ConfigSource`], validates it,
//! and atomically publishes an immutable [`EffectiveConfig`] snapshot.
//! Any validation failure publishes the disabled placeholder instead - the
//! sink degrades to "accept nothing" rather than running on unvalidated
//! rules. Each change notification re-runs the whole procedure from scratch.

mod error;
mod manager;
mod settings;
mod snapshot;
mod source;
mod thresholds;

pub use error::{ConfigError, Result};
pub use manager::{ConfigManager, SectionValidator};
pub use settings::{SinkSettings, DEFAULT_SINK_NAME};
pub use snapshot::EffectiveConfig;
pub use source::{
    level_table, sink_section, ConfigSource, MemorySource, LEVELS_KEY, ROOT_SECTION,
};
pub use thresholds::{
    FlushThresholds, DEFAULT_MAX_BEFORE_FLUSH, DEFAULT_MAX_PER_BATCH, MAX_FLUSH_INTERVAL_MS,
    MAX_RECORD_THRESHOLD, MIN_RECORD_THRESHOLD,
};
