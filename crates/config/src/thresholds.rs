//! Flush threshold configuration
//!
//! The three numeric knobs of a sink section: how many records force a
//! flush, how many records go into one persistence batch, and the optional
//! time-based flush period.

use std::time::Duration;

use serde::Deserialize;

use crate::error::{ConfigError, Result};

/// Inclusive lower bound for the record-count thresholds.
pub const MIN_RECORD_THRESHOLD: u64 = 1;

/// Inclusive upper bound for the record-count thresholds.
pub const MAX_RECORD_THRESHOLD: u64 = 10_000;

/// Inclusive upper bound for the time-based flush period, in milliseconds.
pub const MAX_FLUSH_INTERVAL_MS: u64 = 60_000;

/// Default queue length that triggers a flush.
pub const DEFAULT_MAX_BEFORE_FLUSH: usize = 1_000;

/// Default records per persistence batch.
pub const DEFAULT_MAX_PER_BATCH: usize = 100;

/// Raw threshold fields as they appear in a sink section.
///
/// Provider-specific fields and the `levels` subtable share the section;
/// unknown keys are ignored here and validated by the provider hook.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
struct RawThresholds {
    max_before_flush: u64,
    max_per_batch: u64,
    max_interval_ms: Option<u64>,
}

impl Default for RawThresholds {
    fn default() -> Self {
        Self {
            max_before_flush: DEFAULT_MAX_BEFORE_FLUSH as u64,
            max_per_batch: DEFAULT_MAX_PER_BATCH as u64,
            max_interval_ms: None,
        }
    }
}

/// Validated flush thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlushThresholds {
    /// Queue length at or above which a flush is triggered
    pub max_before_flush: usize,

    /// Records handed to the persistence collaborator per batch
    pub max_per_batch: usize,

    /// Time-based flush trigger period, `None` when disabled
    pub max_interval: Option<Duration>,
}

impl FlushThresholds {
    /// Placeholder thresholds for the disabled state.
    ///
    /// The record threshold is unreachable, so `accept` never triggers a
    /// flush while the sink is disabled; queued records stay put until a
    /// valid configuration arrives.
    pub fn disabled() -> Self {
        Self {
            max_before_flush: usize::MAX,
            max_per_batch: DEFAULT_MAX_PER_BATCH,
            max_interval: None,
        }
    }

    /// Parse and validate the threshold fields of a sink section.
    ///
    /// # Errors
    ///
    /// Returns `InvalidSection` when the fields fail to deserialize and
    /// `InvalidThreshold` when a value falls outside its range.
    pub fn from_section(section: &toml::Table) -> Result<Self> {
        let raw: RawThresholds = toml::Value::Table(section.clone())
            .try_into()
            .map_err(|e: toml::de::Error| ConfigError::InvalidSection(e.to_string()))?;
        Self::validate(raw)
    }

    fn validate(raw: RawThresholds) -> Result<Self> {
        check_record_bound("max_before_flush", raw.max_before_flush)?;
        check_record_bound("max_per_batch", raw.max_per_batch)?;

        if let Some(ms) = raw.max_interval_ms {
            if ms > MAX_FLUSH_INTERVAL_MS {
                return Err(ConfigError::invalid_threshold(
                    "max_interval_ms",
                    ms,
                    0,
                    MAX_FLUSH_INTERVAL_MS,
                ));
            }
        }

        Ok(Self {
            max_before_flush: raw.max_before_flush as usize,
            max_per_batch: raw.max_per_batch as usize,
            max_interval: raw.max_interval_ms.map(Duration::from_millis),
        })
    }
}

fn check_record_bound(field: &'static str, value: u64) -> Result<()> {
    if !(MIN_RECORD_THRESHOLD..=MAX_RECORD_THRESHOLD).contains(&value) {
        return Err(ConfigError::invalid_threshold(
            field,
            value,
            MIN_RECORD_THRESHOLD,
            MAX_RECORD_THRESHOLD,
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn section(toml_str: &str) -> toml::Table {
        toml_str.parse().unwrap()
    }

    #[test]
    fn test_empty_section_uses_defaults() {
        let thresholds = FlushThresholds::from_section(&section("")).unwrap();
        assert_eq!(thresholds.max_before_flush, DEFAULT_MAX_BEFORE_FLUSH);
        assert_eq!(thresholds.max_per_batch, DEFAULT_MAX_PER_BATCH);
        assert_eq!(thresholds.max_interval, None);
    }

    #[test]
    fn test_full_section() {
        let thresholds = FlushThresholds::from_section(&section(
            "max_before_flush = 3\nmax_per_batch = 2\nmax_interval_ms = 5000",
        ))
        .unwrap();
        assert_eq!(thresholds.max_before_flush, 3);
        assert_eq!(thresholds.max_per_batch, 2);
        assert_eq!(thresholds.max_interval, Some(Duration::from_millis(5000)));
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let thresholds = FlushThresholds::from_section(&section(
            "max_per_batch = 50\nconnection_string = \"db://somewhere\"",
        ))
        .unwrap();
        assert_eq!(thresholds.max_per_batch, 50);
    }

    #[test]
    fn test_zero_record_threshold_rejected() {
        let err = FlushThresholds::from_section(&section("max_per_batch = 0")).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidThreshold {
                field: "max_per_batch",
                value: 0,
                ..
            }
        ));
    }

    #[test]
    fn test_record_threshold_above_cap_rejected() {
        let err = FlushThresholds::from_section(&section("max_before_flush = 20000")).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidThreshold {
                field: "max_before_flush",
                value: 20_000,
                ..
            }
        ));
    }

    #[test]
    fn test_record_threshold_bounds_inclusive() {
        for value in [1u64, 10_000] {
            let table = section(&format!("max_before_flush = {value}"));
            assert!(FlushThresholds::from_section(&table).is_ok());
        }
    }

    #[test]
    fn test_interval_bounds() {
        assert!(FlushThresholds::from_section(&section("max_interval_ms = 0")).is_ok());
        assert!(FlushThresholds::from_section(&section("max_interval_ms = 60000")).is_ok());

        let err = FlushThresholds::from_section(&section("max_interval_ms = 60001")).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidThreshold {
                field: "max_interval_ms",
                ..
            }
        ));
    }

    #[test]
    fn test_negative_value_is_a_section_error() {
        let err = FlushThresholds::from_section(&section("max_per_batch = -1")).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidSection(_)));
    }

    #[test]
    fn test_disabled_thresholds_never_trigger() {
        let thresholds = FlushThresholds::disabled();
        assert_eq!(thresholds.max_before_flush, usize::MAX);
        assert_eq!(thresholds.max_interval, None);
    }
}
