//! Configuration reload protocol
//!
//! The manager has two states: **Disabled** (initial, and re-entered on any
//! validation failure) and **Active** (a valid snapshot is published). Every
//! change notification re-runs the whole load/validate/publish procedure
//! from scratch and then re-registers for the next notification.

use std::sync::Arc;

use arc_swap::ArcSwap;
use quill_routing::RoutingTableBuilder;

use crate::error::{ConfigError, Result};
use crate::source::{level_table, sink_section, ConfigSource};
use crate::{EffectiveConfig, FlushThresholds, SinkSettings};

/// Provider-supplied hook that validates the raw sink section.
///
/// Runs on every reload after the thresholds validate; rejecting keeps the
/// sink disabled.
pub type SectionValidator =
    Box<dyn Fn(&toml::Table) -> std::result::Result<(), String> + Send + Sync>;

/// Loads, validates, and atomically publishes sink configuration.
///
/// The published [`EffectiveConfig`] is the only shared state between the
/// reload path and the hot path; it is swapped as a unit, so `accept` and
/// `flush` always read a routing table and thresholds from the same
/// generation.
pub struct ConfigManager {
    settings: SinkSettings,
    source: Arc<dyn ConfigSource>,
    validator: Option<SectionValidator>,
    current: ArcSwap<EffectiveConfig>,
}

impl ConfigManager {
    /// Create a manager in the Disabled state.
    ///
    /// Nothing is accepted until [`reload`](Self::reload) succeeds.
    pub fn new(settings: SinkSettings, source: Arc<dyn ConfigSource>) -> Self {
        let placeholder = EffectiveConfig::disabled(settings.fallback_min());
        Self {
            settings,
            source,
            validator: None,
            current: ArcSwap::from_pointee(placeholder),
        }
    }

    /// Attach the provider's section-validation hook.
    pub fn with_validator(mut self, validator: SectionValidator) -> Self {
        self.validator = Some(validator);
        self
    }

    /// Lock-free read of the current snapshot.
    #[inline]
    pub fn current(&self) -> Arc<EffectiveConfig> {
        self.current.load_full()
    }

    /// Whether a valid configuration is currently published.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.current.load().active
    }

    /// The settings this manager was built with.
    #[inline]
    pub fn settings(&self) -> &SinkSettings {
        &self.settings
    }

    /// Re-run the full load/validate/publish procedure.
    ///
    /// On success the new snapshot replaces the old one atomically. On any
    /// failure the disabled placeholder is published instead - the sink
    /// degrades to "accept nothing" rather than running on unvalidated
    /// rules - and the specific reason is logged.
    pub fn reload(&self) {
        match self.build() {
            Ok(config) => {
                tracing::info!(
                    sink = %self.settings.name(),
                    entries = config.table.entry_count(),
                    max_before_flush = config.thresholds.max_before_flush,
                    max_per_batch = config.thresholds.max_per_batch,
                    max_interval = ?config.thresholds.max_interval,
                    "configuration applied"
                );
                self.current.store(Arc::new(config));
            }
            Err(error) => {
                tracing::warn!(
                    sink = %self.settings.name(),
                    error = %error,
                    "configuration rejected, sink disabled"
                );
                self.current
                    .store(Arc::new(EffectiveConfig::disabled(self.settings.fallback_min())));
            }
        }
    }

    /// Reload loop: apply the configuration, then wait for the next change.
    ///
    /// The wait re-registers after every notification, so changes that fire
    /// mid-reload collapse into one further pass - only the latest state is
    /// observed.
    pub async fn run(self: Arc<Self>) {
        loop {
            self.reload();
            self.source.changed().await;
        }
    }

    fn build(&self) -> Result<EffectiveConfig> {
        let tree = self.source.load()?;

        let section = sink_section(&tree, self.settings.section())
            .ok_or_else(|| ConfigError::missing_section(self.settings.section()))?;
        let levels = level_table(&tree, section)
            .ok_or_else(|| ConfigError::missing_levels(self.settings.section()))?;

        let thresholds = FlushThresholds::from_section(section)?;

        if let Some(validator) = &self.validator {
            validator(section).map_err(ConfigError::Provider)?;
        }

        let mut builder = RoutingTableBuilder::new();
        for (key, value) in levels {
            match value.as_str() {
                Some(name) => {
                    builder.insert(key, name);
                }
                None => tracing::warn!(
                    key = %key,
                    "skipping severity entry with non-string value"
                ),
            }
        }

        Ok(EffectiveConfig::new(builder.build(), thresholds))
    }
}

impl std::fmt::Debug for ConfigManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigManager")
            .field("sink", &self.settings.name())
            .field("active", &self.is_active())
            .finish()
    }
}

#[cfg(test)]
#[path = "manager_test.rs"]
mod manager_test;
