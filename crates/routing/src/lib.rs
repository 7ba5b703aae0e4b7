//! Quill - Routing
//!
//! Category → minimum severity routing tables with longest-prefix lookup.
//!
//! # Design
//!
//! Routing decisions are compiled at config load time, not per-record.
//! A `RoutingTable` is an immutable snapshot: entries sorted by descending
//! prefix length, with exactly one empty-prefix ("default") entry that
//! guarantees every lookup resolves. Tables are rebuilt wholesale on each
//! configuration reload and published as part of an atomic snapshot, so the
//! hot path only ever reads.
//!
//! # Example
//!
//! ```
//! use quill_record::Severity;
//! use quill_routing::RoutingTableBuilder;
//!
//! // At config load: compile the table from severity entries
//! let mut builder = RoutingTableBuilder::new();
//! builder.insert("default", "warning");
//! builder.insert("app.db", "trace");
//! let table = builder.build();
//!
//! // Hot path: longest matching prefix wins
//! assert!(table.is_enabled("app.db.pool", Severity::Trace));
//! assert!(!table.is_enabled("app.http", Severity::Trace));
//! assert!(table.is_enabled("app.http", Severity::Warn));
//! ```

mod table;


pub use table::{RoutingEntry, RoutingTable, RoutingTableBuilder};
