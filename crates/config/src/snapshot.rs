//! Atomically-published configuration snapshot

use quill_record::Severity;
use quill_routing::RoutingTable;

use crate::FlushThresholds;

/// Immutable bundle of routing table and flush thresholds.
///
/// Published wholesale through an atomic swap on every reload - concurrent
/// readers always see a routing table and thresholds from the same
/// generation, never a torn pairing. The previous snapshot is released when
/// the last reader drops its reference.
#[derive(Debug, Clone)]
pub struct EffectiveConfig {
    /// Category → minimum severity routing
    pub table: RoutingTable,

    /// Flush trigger and batch-size knobs
    pub thresholds: FlushThresholds,

    /// False for the placeholder published before the first successful load
    /// and after any failed reload
    pub active: bool,
}

impl EffectiveConfig {
    /// Snapshot from a validated table and thresholds.
    pub fn new(table: RoutingTable, thresholds: FlushThresholds) -> Self {
        Self {
            table,
            thresholds,
            active: true,
        }
    }

    /// Disabled placeholder.
    ///
    /// The routing table carries a single default entry at `fallback_min`
    /// (`Off` keeps the sink fully closed until the first successful load)
    /// and the thresholds never trigger a flush.
    pub fn disabled(fallback_min: Severity) -> Self {
        Self {
            table: RoutingTable::with_default(fallback_min),
            thresholds: FlushThresholds::disabled(),
            active: false,
        }
    }
}
