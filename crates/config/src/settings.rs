//! Operator-supplied sink settings
//!
//! Static identity of a sink: its logical name, the configuration section it
//! reads, and the severity floor used before the first successful load.
//! Settings are validated once at construction and never hot-reloaded.

use quill_record::Severity;

/// Name used when the operator supplies an empty one.
pub const DEFAULT_SINK_NAME: &str = "quill";

/// Static settings for one sink instance.
///
/// Construction never fails: invalid values fall back to defaults with a
/// logged warning.
#[derive(Debug, Clone)]
pub struct SinkSettings {
    name: String,
    section: String,
    fallback_min: Severity,
}

impl SinkSettings {
    /// Create settings with the given logical sink name.
    ///
    /// The configuration section identifier defaults to the name; an empty
    /// name falls back to [`DEFAULT_SINK_NAME`].
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let name = if name.trim().is_empty() {
            tracing::warn!(
                fallback = DEFAULT_SINK_NAME,
                "empty sink name, using fallback"
            );
            DEFAULT_SINK_NAME.to_string()
        } else {
            name
        };

        Self {
            section: name.clone(),
            name,
            fallback_min: Severity::Off,
        }
    }

    /// Override the configuration section identifier.
    ///
    /// An empty identifier keeps the sink name with a logged warning.
    pub fn with_section(mut self, section: impl Into<String>) -> Self {
        let section = section.into();
        if section.trim().is_empty() {
            tracing::warn!(
                sink = %self.name,
                "empty section identifier, keeping sink name"
            );
        } else {
            self.section = section;
        }
        self
    }

    /// Set the severity floor used before the first successful load.
    ///
    /// Defaults to `Off`: nothing is accepted until a valid configuration
    /// is published.
    pub fn with_fallback_min(mut self, min: Severity) -> Self {
        self.fallback_min = min;
        self
    }

    /// Logical sink name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Configuration section identifier under `[logging]`.
    #[inline]
    pub fn section(&self) -> &str {
        &self.section
    }

    /// Severity floor for the disabled placeholder.
    #[inline]
    pub fn fallback_min(&self) -> Severity {
        self.fallback_min
    }
}

impl Default for SinkSettings {
    fn default() -> Self {
        Self::new(DEFAULT_SINK_NAME)
    }
}
