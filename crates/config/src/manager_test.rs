//! Tests for ConfigManager
//!
//! Tests cover the Disabled/Active state machine, validation failures,
//! the provider hook, and the change-notification reload loop.

use std::sync::Arc;
use std::time::Duration;

use quill_record::Severity;

use crate::{ConfigManager, ConfigSource, MemorySource, SinkSettings};

const VALID: &str = r#"
[logging.quill]
max_before_flush = 3
max_per_batch = 2

[logging.quill.levels]
default = "warning"
"foo.bar" = "trace"
"#;

fn manager_with(toml_str: &str) -> ConfigManager {
    let source = Arc::new(MemorySource::with_toml(toml_str).unwrap());
    ConfigManager::new(SinkSettings::new("quill"), source)
}

// =============================================================================
// State machine
// =============================================================================

#[test]
fn test_starts_disabled() {
    let manager = manager_with(VALID);
    assert!(!manager.is_active());

    let config = manager.current();
    assert!(!config.active);
    assert!(!config.table.is_enabled("foo.bar", Severity::Critical));
    assert_eq!(config.thresholds.max_before_flush, usize::MAX);
}

#[test]
fn test_reload_publishes_valid_config() {
    let manager = manager_with(VALID);
    manager.reload();

    assert!(manager.is_active());
    let config = manager.current();
    assert_eq!(config.thresholds.max_before_flush, 3);
    assert_eq!(config.thresholds.max_per_batch, 2);
    assert!(config.table.is_enabled("foo.bar.baz", Severity::Trace));
    assert!(!config.table.is_enabled("foo.qux", Severity::Trace));
    assert!(config.table.is_enabled("foo.qux", Severity::Warn));
}

#[test]
fn test_missing_section_stays_disabled() {
    let manager = manager_with("[logging.other.levels]\ndefault = \"info\"");
    manager.reload();
    assert!(!manager.is_active());
}

#[test]
fn test_missing_levels_stays_disabled() {
    let manager = manager_with("[logging.quill]\nmax_per_batch = 10");
    manager.reload();
    assert!(!manager.is_active());
}

#[test]
fn test_invalid_threshold_stays_disabled() {
    let manager = manager_with(
        r#"
[logging.quill]
max_per_batch = 0

[logging.quill.levels]
default = "info"
"#,
    );
    manager.reload();
    assert!(!manager.is_active());
}

#[test]
fn test_failed_reload_disables_previously_active_manager() {
    let source = Arc::new(MemorySource::with_toml(VALID).unwrap());
    let manager = ConfigManager::new(SinkSettings::new("quill"), Arc::clone(&source) as Arc<dyn ConfigSource>);

    manager.reload();
    assert!(manager.is_active());

    source
        .set("[logging.quill]\nmax_before_flush = 99999")
        .unwrap();
    manager.reload();
    assert!(!manager.is_active());
    assert_eq!(manager.current().thresholds.max_before_flush, usize::MAX);
}

#[test]
fn test_disabled_placeholder_uses_fallback_minimum() {
    let source = Arc::new(MemorySource::new());
    let manager = ConfigManager::new(
        SinkSettings::new("quill").with_fallback_min(Severity::Error),
        source,
    );

    let config = manager.current();
    assert!(config.table.is_enabled("any", Severity::Error));
    assert!(!config.table.is_enabled("any", Severity::Warn));
}

// =============================================================================
// Severity table sourcing
// =============================================================================

#[test]
fn test_shared_levels_fallback() {
    let manager = manager_with(
        r#"
[logging.levels]
default = "error"

[logging.quill]
max_per_batch = 10
"#,
    );
    manager.reload();

    assert!(manager.is_active());
    let config = manager.current();
    assert_eq!(config.table.severity_for("anything"), Severity::Error);
}

#[test]
fn test_bad_severity_entry_does_not_block_reload() {
    let manager = manager_with(
        r#"
[logging.quill.levels]
default = "warning"
"app.db" = "verbose"
"app.http" = "trace"
"#,
    );
    manager.reload();

    assert!(manager.is_active());
    let config = manager.current();
    // The bad entry fell back to the default rule
    assert_eq!(config.table.severity_for("app.db"), Severity::Warn);
    assert_eq!(config.table.severity_for("app.http"), Severity::Trace);
}

#[test]
fn test_non_string_severity_value_is_skipped() {
    let manager = manager_with(
        r#"
[logging.quill.levels]
default = "info"
"app.db" = 3
"#,
    );
    manager.reload();

    assert!(manager.is_active());
    assert_eq!(manager.current().table.severity_for("app.db"), Severity::Info);
}

#[test]
fn test_missing_default_entry_is_synthesized_disabled() {
    let manager = manager_with(
        r#"
[logging.quill.levels]
"app" = "trace"
"#,
    );
    manager.reload();

    assert!(manager.is_active());
    let config = manager.current();
    assert_eq!(config.table.severity_for("app.db"), Severity::Trace);
    assert_eq!(config.table.severity_for("other"), Severity::Off);
}

// =============================================================================
// Provider hook
// =============================================================================

#[test]
fn test_provider_hook_sees_section_fields() {
    let source = Arc::new(
        MemorySource::with_toml(
            r#"
[logging.quill]
table_name = "audit_log"

[logging.quill.levels]
default = "info"
"#,
        )
        .unwrap(),
    );

    let manager = ConfigManager::new(SinkSettings::new("quill"), source).with_validator(
        Box::new(|section| {
            if section.contains_key("table_name") {
                Ok(())
            } else {
                Err("missing table_name".into())
            }
        }),
    );

    manager.reload();
    assert!(manager.is_active());
}

#[test]
fn test_provider_rejection_stays_disabled() {
    let manager = ConfigManager::new(
        SinkSettings::new("quill"),
        Arc::new(MemorySource::with_toml(VALID).unwrap()),
    )
    .with_validator(Box::new(|_| Err("not good enough".into())));

    manager.reload();
    assert!(!manager.is_active());
}

// =============================================================================
// Atomic snapshot publish
// =============================================================================

#[test]
fn test_old_snapshot_stays_consistent_after_swap() {
    let source = Arc::new(MemorySource::with_toml(VALID).unwrap());
    let manager = ConfigManager::new(SinkSettings::new("quill"), Arc::clone(&source) as Arc<dyn ConfigSource>);
    manager.reload();

    // A reader holding the old generation keeps a consistent pairing
    let before = manager.current();
    source
        .set(
            r#"
[logging.quill]
max_before_flush = 500
max_per_batch = 50

[logging.quill.levels]
default = "error"
"#,
        )
        .unwrap();
    manager.reload();

    assert_eq!(before.thresholds.max_before_flush, 3);
    assert!(before.table.is_enabled("x", Severity::Warn));

    let after = manager.current();
    assert_eq!(after.thresholds.max_before_flush, 500);
    assert!(!after.table.is_enabled("x", Severity::Warn));
}

// =============================================================================
// Reload loop
// =============================================================================

#[tokio::test]
async fn test_run_applies_initial_config_and_reacts_to_changes() {
    let source = Arc::new(MemorySource::with_toml(VALID).unwrap());
    let manager = Arc::new(ConfigManager::new(
        SinkSettings::new("quill"),
        Arc::clone(&source) as Arc<dyn crate::ConfigSource>,
    ));

    let task = tokio::spawn(Arc::clone(&manager).run());

    wait_until(|| manager.is_active()).await;
    assert_eq!(manager.current().thresholds.max_before_flush, 3);

    source
        .set(
            r#"
[logging.quill]
max_before_flush = 7
max_per_batch = 4

[logging.quill.levels]
default = "info"
"#,
        )
        .unwrap();

    wait_until(|| manager.current().thresholds.max_before_flush == 7).await;

    // An invalid update disables the sink again
    source.set("[logging.quill]\nmax_per_batch = 0").unwrap();
    wait_until(|| !manager.is_active()).await;

    task.abort();
}

async fn wait_until(mut condition: impl FnMut() -> bool) {
    for _ in 0..200 {
        if condition() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("condition not reached within timeout");
}
