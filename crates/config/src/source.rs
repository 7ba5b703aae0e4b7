//! Configuration source boundary
//!
//! A [`ConfigSource`] supplies the hierarchical configuration tree and a
//! subscribe-for-next-change primitive. The file-watching mechanism behind
//! a production source stays outside this crate; [`MemorySource`] covers
//! tests and embedders that push configuration programmatically.

use async_trait::async_trait;
use parking_lot::RwLock;
use tokio::sync::Notify;
use toml::{Table, Value};

use crate::error::Result;

/// Root section all sink configuration lives under.
pub const ROOT_SECTION: &str = "logging";

/// Key of the severity table inside a sink section, and of the shared
/// fallback table directly under the root.
pub const LEVELS_KEY: &str = "levels";

/// Supplies the configuration tree and change notifications.
///
/// `changed()` is edge-triggered and one-shot: each call registers for
/// exactly the next change, and the caller must call again after handling
/// it. Notifications are not queued - changes that fire while the caller is
/// busy collapse into a single wake-up, so a change-storm may produce fewer
/// reloads than change events.
#[async_trait]
pub trait ConfigSource: Send + Sync {
    /// Load the current configuration tree.
    fn load(&self) -> Result<Table>;

    /// Wait for the next configuration change.
    async fn changed(&self);
}

/// In-memory configuration source.
///
/// # Example
///
/// ```
/// use quill_config::MemorySource;
///
/// let source = MemorySource::new();
/// source.set("[logging.quill.levels]\ndefault = \"info\"").unwrap();
/// ```
#[derive(Debug, Default)]
pub struct MemorySource {
    tree: RwLock<Table>,
    notify: Notify,
}

impl MemorySource {
    /// Create an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a source pre-loaded from TOML text.
    ///
    /// # Errors
    ///
    /// Returns a parse error for invalid TOML.
    pub fn with_toml(toml_str: &str) -> Result<Self> {
        let source = Self::new();
        *source.tree.write() = toml_str.parse::<Table>()?;
        Ok(source)
    }

    /// Replace the tree and fire the change notification.
    ///
    /// At most one notification is held pending; repeated calls before the
    /// subscriber wakes collapse into one.
    ///
    /// # Errors
    ///
    /// Returns a parse error for invalid TOML; the current tree is kept.
    pub fn set(&self, toml_str: &str) -> Result<()> {
        let tree = toml_str.parse::<Table>()?;
        *self.tree.write() = tree;
        self.notify.notify_one();
        Ok(())
    }
}

#[async_trait]
impl ConfigSource for MemorySource {
    fn load(&self) -> Result<Table> {
        Ok(self.tree.read().clone())
    }

    async fn changed(&self) {
        self.notify.notified().await;
    }
}

/// Navigate to the sink-specific section `logging.<section>`.
pub fn sink_section<'a>(tree: &'a Table, section: &str) -> Option<&'a Table> {
    tree.get(ROOT_SECTION)?
        .as_table()?
        .get(section)?
        .as_table()
}

/// Severity table for a sink: its own `levels` subtable when present,
/// otherwise the shared `logging.levels` table.
pub fn level_table<'a>(tree: &'a Table, sink: &'a Table) -> Option<&'a Table> {
    if let Some(levels) = sink.get(LEVELS_KEY).and_then(Value::as_table) {
        return Some(levels);
    }
    tree.get(ROOT_SECTION)?
        .as_table()?
        .get(LEVELS_KEY)?
        .as_table()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_source_loads_empty_tree() {
        let source = MemorySource::new();
        assert!(source.load().unwrap().is_empty());
    }

    #[test]
    fn test_set_replaces_tree() {
        let source = MemorySource::new();
        source.set("[logging.quill]\nmax_per_batch = 5").unwrap();

        let tree = source.load().unwrap();
        assert!(sink_section(&tree, "quill").is_some());
    }

    #[test]
    fn test_set_rejects_invalid_toml_and_keeps_tree() {
        let source = MemorySource::new();
        source.set("[logging.quill]").unwrap();
        assert!(source.set("not { valid").is_err());
        assert!(sink_section(&source.load().unwrap(), "quill").is_some());
    }

    #[test]
    fn test_sink_section_missing() {
        let tree: Table = "[logging.other]".parse().unwrap();
        assert!(sink_section(&tree, "quill").is_none());
    }

    #[test]
    fn test_level_table_prefers_sink_specific() {
        let tree: Table = r#"
[logging.levels]
default = "error"

[logging.quill.levels]
default = "trace"
"#
        .parse()
        .unwrap();

        let sink = sink_section(&tree, "quill").unwrap();
        let levels = level_table(&tree, sink).unwrap();
        assert_eq!(levels["default"].as_str(), Some("trace"));
    }

    #[test]
    fn test_level_table_falls_back_to_shared() {
        let tree: Table = r#"
[logging.levels]
default = "error"

[logging.quill]
max_per_batch = 10
"#
        .parse()
        .unwrap();

        let sink = sink_section(&tree, "quill").unwrap();
        let levels = level_table(&tree, sink).unwrap();
        assert_eq!(levels["default"].as_str(), Some("error"));
    }

    #[test]
    fn test_level_table_absent() {
        let tree: Table = "[logging.quill]\nmax_per_batch = 10".parse().unwrap();
        let sink = sink_section(&tree, "quill").unwrap();
        assert!(level_table(&tree, sink).is_none());
    }

    #[tokio::test]
    async fn test_changed_wakes_on_set() {
        use std::sync::Arc;

        let source = Arc::new(MemorySource::new());
        let waiter = {
            let source = Arc::clone(&source);
            tokio::spawn(async move { source.changed().await })
        };

        // Give the waiter a chance to register
        tokio::task::yield_now().await;
        source.set("[logging.quill]").unwrap();

        tokio::time::timeout(std::time::Duration::from_secs(1), waiter)
            .await
            .expect("waiter should wake on set")
            .unwrap();
    }
}
