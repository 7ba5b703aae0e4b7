//! Configuration error types

use thiserror::Error;

/// Result type for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors that keep a sink in the disabled state.
///
/// None of these are fatal: the reload path logs the reason and publishes
/// the disabled placeholder, and a later valid configuration recovers.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration source could not supply a tree
    #[error("failed to read configuration: {0}")]
    Source(String),

    /// Sink-specific section is absent
    #[error("configuration section 'logging.{section}' not found")]
    MissingSection {
        /// The section identifier that was looked up
        section: String,
    },

    /// Neither the sink-specific nor the shared severity table is present
    #[error(
        "no severity table for 'logging.{section}' \
         (checked 'logging.{section}.levels' and 'logging.levels')"
    )]
    MissingLevels {
        /// The section identifier that was looked up
        section: String,
    },

    /// A threshold value is outside its validated range
    #[error("threshold '{field}' is {value}, valid range is {min}..={max}")]
    InvalidThreshold {
        /// Field name in the sink section
        field: &'static str,
        /// The rejected value
        value: u64,
        /// Inclusive lower bound
        min: u64,
        /// Inclusive upper bound
        max: u64,
    },

    /// The threshold fields failed to deserialize
    #[error("invalid sink section: {0}")]
    InvalidSection(String),

    /// The persistence provider rejected its section fields
    #[error("provider rejected configuration: {0}")]
    Provider(String),

    /// Failed to parse TOML text
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] toml::de::Error),
}

impl ConfigError {
    /// Create a MissingSection error
    pub fn missing_section(section: impl Into<String>) -> Self {
        Self::MissingSection {
            section: section.into(),
        }
    }

    /// Create a MissingLevels error
    pub fn missing_levels(section: impl Into<String>) -> Self {
        Self::MissingLevels {
            section: section.into(),
        }
    }

    /// Create an InvalidThreshold error
    pub fn invalid_threshold(field: &'static str, value: u64, min: u64, max: u64) -> Self {
        Self::InvalidThreshold {
            field,
            value,
            min,
            max,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_section_error() {
        let err = ConfigError::missing_section("quill");
        assert!(err.to_string().contains("logging.quill"));
    }

    #[test]
    fn test_missing_levels_error() {
        let err = ConfigError::missing_levels("quill");
        assert!(err.to_string().contains("logging.quill.levels"));
        assert!(err.to_string().contains("logging.levels"));
    }

    #[test]
    fn test_invalid_threshold_error() {
        let err = ConfigError::invalid_threshold("max_per_batch", 20_000, 1, 10_000);
        let text = err.to_string();
        assert!(text.contains("max_per_batch"));
        assert!(text.contains("20000"));
        assert!(text.contains("1..=10000"));
    }

    #[test]
    fn test_provider_error() {
        let err = ConfigError::Provider("missing table name".into());
        assert!(err.to_string().contains("missing table name"));
    }
}
