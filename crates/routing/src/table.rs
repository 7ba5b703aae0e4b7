//! Routing table with longest-prefix severity lookup
//!
//! The table is compiled once per configuration load and never mutated.
//! Lookup scans entries in descending prefix length, so the most specific
//! rule for a category always wins.

use std::str::FromStr;

use quill_record::Severity;

/// A single category prefix → minimum severity rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutingEntry {
    prefix: String,
    min: Severity,
}

impl RoutingEntry {
    /// Create an entry. The empty prefix is the default rule.
    pub fn new(prefix: impl Into<String>, min: Severity) -> Self {
        Self {
            prefix: prefix.into(),
            min,
        }
    }

    /// The category prefix this entry matches.
    #[inline]
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Minimum severity for categories matched by this entry.
    #[inline]
    pub fn min(&self) -> Severity {
        self.min
    }

    /// Whether this is the empty-prefix default entry.
    #[inline]
    pub fn is_default(&self) -> bool {
        self.prefix.is_empty()
    }
}

/// Immutable category → minimum severity routing table.
///
/// # Invariants
///
/// - Entries are sorted by descending prefix length (stable, so entries of
///   equal length keep insertion order - first-inserted wins)
/// - Exactly one entry has the empty prefix; it matches every category, so
///   `severity_for` can never fail to resolve
///
/// Construct through [`RoutingTableBuilder`], which enforces both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutingTable {
    entries: Vec<RoutingEntry>,
}

impl RoutingTable {
    /// Table with only a default entry at `min`.
    pub fn with_default(min: Severity) -> Self {
        Self {
            entries: vec![RoutingEntry::new("", min)],
        }
    }

    /// Table that maps every category to `Off` - accepts nothing.
    pub fn disabled() -> Self {
        Self::with_default(Severity::Off)
    }

    /// Effective minimum severity for a category.
    ///
    /// Returns the severity of the first entry (longest prefix first) whose
    /// prefix is a literal prefix of `category`. The empty-prefix entry is
    /// always a candidate, so a result is guaranteed.
    pub fn severity_for(&self, category: &str) -> Severity {
        self.entries
            .iter()
            .find(|entry| category.starts_with(entry.prefix()))
            .map(|entry| entry.min())
            .unwrap_or(Severity::Off)
    }

    /// Whether a record at `level` in `category` passes the table.
    #[inline]
    pub fn is_enabled(&self, category: &str, level: Severity) -> bool {
        level.enabled_at(self.severity_for(category))
    }

    /// The compiled entries, most specific first.
    #[inline]
    pub fn entries(&self) -> &[RoutingEntry] {
        &self.entries
    }

    /// Number of compiled entries (including the default).
    #[inline]
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }
}

impl Default for RoutingTable {
    fn default() -> Self {
        Self::disabled()
    }
}

/// Builder that compiles configuration pairs into a routing table.
#[derive(Debug, Default)]
pub struct RoutingTableBuilder {
    entries: Vec<RoutingEntry>,
}

impl RoutingTableBuilder {
    /// Create an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and add one configuration pair.
    ///
    /// The reserved key `default` (any casing) maps to the empty prefix.
    /// A value that fails to parse as a severity name is skipped with a
    /// logged warning and does not block the rest of the table.
    ///
    /// Returns whether the entry was accepted.
    pub fn insert(&mut self, key: &str, value: &str) -> bool {
        let min = match Severity::from_str(value) {
            Ok(min) => min,
            Err(error) => {
                tracing::warn!(
                    key = %key,
                    value = %value,
                    error = %error,
                    "skipping severity entry with unparsable value"
                );
                return false;
            }
        };

        let prefix = if key.eq_ignore_ascii_case("default") {
            ""
        } else {
            key
        };
        self.entries.push(RoutingEntry::new(prefix, min));
        true
    }

    /// Add an already-parsed entry.
    pub fn insert_entry(&mut self, entry: RoutingEntry) {
        self.entries.push(entry);
    }

    /// Compile the table.
    ///
    /// Sorts entries by descending prefix length (stable sort, so duplicate
    /// prefixes resolve first-inserted-wins) and synthesizes a default entry
    /// at `Off` if configuration supplied none.
    pub fn build(mut self) -> RoutingTable {
        if !self.entries.iter().any(RoutingEntry::is_default) {
            self.entries.push(RoutingEntry::new("", Severity::Off));
        }

        self.entries
            .sort_by(|a, b| b.prefix().len().cmp(&a.prefix().len()));

        RoutingTable {
            entries: self.entries,
        }
    }
}
