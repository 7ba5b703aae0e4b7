//! Quill - Record model
//!
//! The leaf crate of the Quill workspace: severity levels, the immutable
//! `LogRecord` value, and the lock-free queue that holds records between
//! acceptance and the next flush cycle.
//!
//! # Key Design
//!
//! - **Immutable records**: a `LogRecord` is created once per accepted log
//!   call and never mutated; ownership moves from the producer to the queue,
//!   then into a batch handed to the persistence collaborator
//! - **Lock-free queue**: `RecordQueue` wraps `crossbeam`'s unbounded
//!   `SegQueue`, so enqueue never blocks regardless of what the flush path
//!   is doing
//! - **Sentinel severity**: `Severity::Off` sits strictly above `Critical`
//!   and disables every level; it is a filter value, never a record level

mod queue;
mod record;
mod severity;

pub use queue::RecordQueue;
pub use record::{format_error, LogRecord};
pub use severity::{ParseSeverityError, Severity};
