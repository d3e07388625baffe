//! Clock synchronization measurements.

use serde::{Deserialize, Serialize};

/// Network delay below which a measurement counts as high accuracy.
pub const HIGH_ACCURACY_DELAY_MS: i64 = 100;

/// Qualitative confidence bucket for a clock-sync measurement.
///
/// Drives logging and the fallback-timing log line, never the scheduling
/// arithmetic itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SyncAccuracy {
    /// Round trip completed with network delay under 100ms.
    High,

    /// Round trip completed, but slower.
    Medium,

    /// Round trip failed; the cached offset was substituted.
    Low,
}

/// One fresh estimate of (server time − local time).
///
/// Immutable once produced; every scheduling attempt obtains its own
/// instance and there is no aggregation or decay across attempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClockSync {
    /// Estimated (server − local) at the measurement instant, in ms.
    pub offset_millis: i64,

    /// Estimated one-way network latency of the measurement, in ms.
    pub network_delay_millis: i64,

    /// Confidence bucket for this measurement.
    pub accuracy: SyncAccuracy,

    /// Local timestamp when the estimate was produced, for staleness
    /// reasoning.
    pub measured_at_local_millis: i64,
}

impl ClockSync {
    /// A successful round-trip measurement; accuracy follows the network
    /// delay.
    pub fn measured(offset_millis: i64, network_delay_millis: i64, measured_at: i64) -> Self {
        let accuracy = if network_delay_millis < HIGH_ACCURACY_DELAY_MS {
            SyncAccuracy::High
        } else {
            SyncAccuracy::Medium
        };
        Self {
            offset_millis,
            network_delay_millis,
            accuracy,
            measured_at_local_millis: measured_at,
        }
    }

    /// The fallback value when the round trip failed: the best previously
    /// cached offset, zero network delay, low accuracy.
    pub fn degraded(cached_offset_millis: i64, measured_at: i64) -> Self {
        Self {
            offset_millis: cached_offset_millis,
            network_delay_millis: 0,
            accuracy: SyncAccuracy::Low,
            measured_at_local_millis: measured_at,
        }
    }
}
