//! Process-wide cached clock offset.

use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Cloneable handle to the last known (server − local) offset in
/// milliseconds.
///
/// Shared by the active estimator and the passive feed; last write wins
/// and readers tolerate a stale-by-one value, so a single atomic is all
/// the synchronization needed. Inject a clone wherever a fallback offset
/// is wanted instead of reaching for a global.
#[derive(Debug, Clone, Default)]
pub struct SharedOffset {
    inner: Arc<AtomicI64>,
}

impl SharedOffset {
    /// New handle with a zero offset (local clock trusted until told
    /// otherwise).
    pub fn new() -> Self {
        Self::default()
    }

    /// Last known offset in milliseconds.
    pub fn millis(&self) -> i64 {
        self.inner.load(Ordering::Relaxed)
    }

    /// Replace the cached offset with a fresher measurement.
    pub fn set_millis(&self, offset_millis: i64) {
        self.inner.store(offset_millis, Ordering::Relaxed);
    }

    /// Keep the cache warm from a continuously-pushed offset signal.
    ///
    /// The feed is a pure optimization: it lowers the cost of the
    /// low-accuracy fallback path between active synchronizations, and its
    /// absence changes nothing. The task ends when the sender is dropped
    /// or the token is cancelled.
    pub fn spawn_feed(
        &self,
        mut updates: watch::Receiver<i64>,
        cancel: CancellationToken,
    ) -> JoinHandle<()> {
        let offset = self.clone();
        tokio::spawn(async move {
            // Apply whatever the channel currently holds before waiting.
            let initial = *updates.borrow_and_update();
            offset.set_millis(initial);
            debug!(offset_ms = initial, "offset feed started");

            loop {
                tokio::select! {
                    _ = cancel.cancelled() => {
                        debug!("offset feed cancelled");
                        break;
                    }
                    changed = updates.changed() => {
                        if changed.is_err() {
                            debug!("offset feed sender dropped");
                            break;
                        }
                        let value = *updates.borrow_and_update();
                        offset.set_millis(value);
                        debug!(offset_ms = value, "cached clock offset updated from push signal");
                    }
                }
            }
        })
    }
}
