//! Round-trip clock offset estimation.

use std::time::Duration;

use chrono::Utc;
use tracing::{debug, warn};

use super::offset::SharedOffset;
use crate::clock::ServerClock;
use crate::types::ClockSync;

/// Bound on the server round trip; exceeding it is the same failure path
/// as a transport error.
pub const DEFAULT_SYNC_TIMEOUT: Duration = Duration::from_secs(5);

fn local_now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Estimates the offset between the local clock and an authoritative
/// server clock.
///
/// Each [`synchronize`](ClockSyncEstimator::synchronize) call is a fresh
/// round-trip measurement under the symmetric-latency assumption; a
/// successful measurement refreshes the shared cached offset that the
/// failure path and [`server_time_estimate`](ClockSyncEstimator::server_time_estimate)
/// fall back to.
pub struct ClockSyncEstimator<C: ServerClock> {
    clock: C,
    offset: SharedOffset,
    timeout: Duration,
}

impl<C: ServerClock> ClockSyncEstimator<C> {
    /// Create an estimator over a server clock, sharing the given offset
    /// cache.
    pub fn new(clock: C, offset: SharedOffset) -> Self {
        Self { clock, offset, timeout: DEFAULT_SYNC_TIMEOUT }
    }

    /// Override the round-trip bound.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Clone of the shared offset cache handle, for wiring up a passive
    /// feed or another estimator.
    pub fn offset_handle(&self) -> SharedOffset {
        self.offset.clone()
    }

    /// Produce a fresh clock-sync estimate. Never fails: transport errors
    /// and timeouts degrade to the cached offset at low accuracy.
    pub async fn synchronize(&mut self) -> ClockSync {
        let t0 = local_now_millis();
        let response = tokio::time::timeout(self.timeout, self.clock.server_time_millis()).await;
        let t1 = local_now_millis();

        match response {
            Ok(Ok(server_millis)) => {
                // Half the round trip approximates the one-way delay.
                let network_delay = ((t1 - t0) / 2).max(0);
                let adjusted_server_time = server_millis + network_delay;
                let offset = adjusted_server_time - t1;

                self.offset.set_millis(offset);

                let sync = ClockSync::measured(offset, network_delay, t1);
                debug!(
                    offset_ms = sync.offset_millis,
                    network_delay_ms = sync.network_delay_millis,
                    accuracy = ?sync.accuracy,
                    "time synchronization complete"
                );
                sync
            }
            Ok(Err(error)) => {
                warn!(%error, "time synchronization failed, using cached offset");
                ClockSync::degraded(self.offset.millis(), t1)
            }
            Err(_) => {
                warn!(
                    timeout_ms = self.timeout.as_millis() as u64,
                    "time synchronization timed out, using cached offset"
                );
                ClockSync::degraded(self.offset.millis(), t1)
            }
        }
    }

    /// Cheap server-time estimate: local now plus the cached offset.
    ///
    /// Used when a full round trip is not warranted; freshness depends on
    /// the last synchronization or passive feed update.
    pub fn server_time_estimate(&self) -> i64 {
        local_now_millis() + self.offset.millis()
    }
}
