//! Log severity levels
//!
//! Severities are ordered `Trace < Debug < Info < Warn < Error < Critical`.
//! `Off` is a sentinel strictly above `Critical`: a routing entry at `Off`
//! disables every level, including `Critical`.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Ordered log severity.
///
/// Derives `Ord` from declaration order, so threshold checks are plain
/// comparisons. `Off` compares greater than every real severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    /// Very verbose diagnostics
    Trace,
    /// Debugging information
    Debug,
    /// Normal operation
    Info,
    /// Something unexpected but recoverable
    Warn,
    /// An operation failed
    Error,
    /// The application cannot continue
    Critical,
    /// Disabled sentinel - never a record level
    Off,
}

impl Severity {
    /// All real severities, in ascending order. Excludes the `Off` sentinel.
    pub const ALL: [Severity; 6] = [
        Severity::Trace,
        Severity::Debug,
        Severity::Info,
        Severity::Warn,
        Severity::Error,
        Severity::Critical,
    ];

    /// Canonical lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Trace => "trace",
            Severity::Debug => "debug",
            Severity::Info => "info",
            Severity::Warn => "warn",
            Severity::Error => "error",
            Severity::Critical => "critical",
            Severity::Off => "off",
        }
    }

    /// Whether a record at this severity passes a minimum of `min`.
    ///
    /// `Off` on either side fails the check: an `Off` minimum disables all
    /// levels, and `Off` is never a loggable record level.
    #[inline]
    pub fn enabled_at(self, min: Severity) -> bool {
        self != Severity::Off && min != Severity::Off && self >= min
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a severity name cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown severity name '{0}'")]
pub struct ParseSeverityError(String);

impl FromStr for Severity {
    type Err = ParseSeverityError;

    /// Parse a configuration severity name, case-insensitively.
    ///
    /// Accepts the long configuration-schema names (`information`,
    /// `warning`, `none`) alongside the short Rust-style ones.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trace" => Ok(Severity::Trace),
            "debug" => Ok(Severity::Debug),
            "information" | "info" => Ok(Severity::Info),
            "warning" | "warn" => Ok(Severity::Warn),
            "error" => Ok(Severity::Error),
            "critical" => Ok(Severity::Critical),
            "none" | "off" => Ok(Severity::Off),
            other => Err(ParseSeverityError(other.to_string())),
        }
    }
}
