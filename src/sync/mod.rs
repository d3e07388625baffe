//! Clock synchronization: the active round-trip estimator and the shared
//! cached offset it degrades to.

mod estimator;
mod offset;

pub use estimator::{ClockSyncEstimator, DEFAULT_SYNC_TIMEOUT};
pub use offset::SharedOffset;
