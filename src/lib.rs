//! Clock-synchronized crowd animation scheduling for tokio.
//!
//! Unison drives time-scheduled color animations in lockstep across many
//! independently-clocked devices, the "stadium flash" effect: every device
//! holds its own per-seat color sequence and a shared wall-clock start
//! time, and must begin playback at the same real-world instant despite
//! clock drift and network latency.
//!
//! # Features
//!
//! - **Clock synchronization**: round-trip offset estimation against any
//!   authoritative server clock, with accuracy classification and a
//!   cached-offset fallback
//! - **Scheduling**: wait-then-play with a late grace window, so a device
//!   joining moments after the start still flashes with the crowd while a
//!   stale schedule is rejected
//! - **Cadence**: per-frame processing time is subtracted from the
//!   inter-frame wait, so callback cost never stretches the show
//! - **Delivery**: listener callbacks or a fused event stream, cancel at
//!   any suspension point
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use unison::{ColorFrame, FramePackage, Result, ServerClock, Unison};
//! use futures::StreamExt;
//!
//! struct HttpTimeEndpoint; // whatever transport the deployment uses
//!
//! #[async_trait::async_trait]
//! impl ServerClock for HttpTimeEndpoint {
//!     async fn server_time_millis(&mut self) -> Result<i64> {
//!         // one authoritative timestamp per call
//!         # Ok(0)
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let package = FramePackage::new(
//!         vec![ColorFrame::new(255, 0, 0), ColorFrame::new(0, 0, 255)],
//!         10,
//!         "2025-06-15T20:30:00Z",
//!     )?;
//!
//!     let mut handle = Unison::spawn(HttpTimeEndpoint, package);
//!     while let Some(event) = handle.events.next().await {
//!         println!("{event:?}");
//!     }
//!     Ok(())
//! }
//! ```

// Core types and error handling
mod error;
pub mod types;

#[cfg(test)]
pub(crate) mod test_utils;

// Clock synchronization
pub mod clock;
pub mod sync;

// Scheduling and event delivery
pub mod driver;
pub mod scheduler;
pub mod stream;

// Backend document shapes
pub mod source;

// Core exports
pub use error::{Result, UnisonError};
pub use types::{ClockSync, ColorFrame, FramePackage, SyncAccuracy, parse_start_time};

// Clock exports
pub use clock::ServerClock;
pub use sync::{ClockSyncEstimator, SharedOffset};

// Scheduling exports
pub use driver::{Driver, ScheduleHandle};
pub use scheduler::{
    AnimationEvent, AnimationScheduler, AnimationSink, ChannelSink, ScheduleDecision,
    SchedulerConfig,
};
pub use stream::EventStream;

// Source exports
pub use source::{ActiveConfig, AnimationDocument, PackageSource, UserFrames, user_key};

/// Unified entry point for animation scheduling.
///
/// The pieces compose by hand when more control is wanted (a shared
/// [`SharedOffset`] across schedulers, a custom [`SchedulerConfig`], a
/// passive offset feed); these constructors cover the common case.
pub struct Unison;

impl Unison {
    /// Build a scheduler over a server clock with default configuration
    /// and a fresh offset cache.
    pub fn scheduler<C: ServerClock>(clock: C) -> AnimationScheduler<C> {
        AnimationScheduler::new(ClockSyncEstimator::new(clock, SharedOffset::new()))
    }

    /// Schedule one package as an owned task and stream its events.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// # use unison::{ColorFrame, FramePackage, Result, ServerClock, Unison};
    /// # struct Clock;
    /// # #[async_trait::async_trait]
    /// # impl ServerClock for Clock {
    /// #     async fn server_time_millis(&mut self) -> Result<i64> { Ok(0) }
    /// # }
    /// # #[tokio::main]
    /// # async fn main() -> Result<()> {
    /// let package = FramePackage::new(vec![ColorFrame::BLACK], 1, "2025-06-15T20:30Z")?;
    /// let handle = Unison::spawn(Clock, package);
    /// # Ok(())
    /// # }
    /// ```
    pub fn spawn<C: ServerClock>(clock: C, package: FramePackage) -> ScheduleHandle {
        Driver::spawn(Self::scheduler(clock), package)
    }
}
