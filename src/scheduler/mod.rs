//! Wait-then-play scheduling for one animation package.
//!
//! One [`AnimationScheduler::schedule`] call is one independent,
//! cancellable unit of work: parse the start time, take a fresh clock-sync
//! measurement, decide between waiting, starting late and rejecting, then
//! drive the frame callbacks at the package's cadence. Nothing escapes the
//! call as an error; every failure path ends in a terminal `on_error`.

mod sink;

use std::time::Duration;

use chrono::Utc;
use tokio::time::{Instant, sleep};
use tracing::{debug, trace, warn};

use crate::UnisonError;
use crate::clock::ServerClock;
use crate::sync::ClockSyncEstimator;
use crate::types::{FramePackage, SyncAccuracy, parse_start_time};

pub use sink::{AnimationEvent, AnimationSink, ChannelSink};

/// How far in the past a start time may lie and still play immediately.
///
/// Normal clock and network slack puts a freshly-discovered start time a
/// little behind; anything older than this belongs to a show the rest of
/// the crowd already finished.
pub const DEFAULT_LATE_GRACE: Duration = Duration::from_secs(10);

/// Pre-start waits longer than this under a low-accuracy sync get logged
/// as fallback timing. Informational only; the wait mechanics are
/// identical.
pub const DEFAULT_FALLBACK_THRESHOLD: Duration = Duration::from_secs(5);

/// Tunables for one scheduler.
#[derive(Debug, Clone, Copy)]
pub struct SchedulerConfig {
    /// Lateness tolerated before a schedule is rejected as stale.
    pub late_grace: Duration,

    /// Wait length beyond which a low-accuracy sync is called out in logs.
    pub fallback_threshold: Duration,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self { late_grace: DEFAULT_LATE_GRACE, fallback_threshold: DEFAULT_FALLBACK_THRESHOLD }
    }
}

/// Outcome of comparing the start instant against synchronized "now".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleDecision {
    /// The start instant is ahead; wait `delay_ms` then play.
    Future { delay_ms: i64 },

    /// The start instant passed within the grace window; play right away.
    ImmediateLate { late_by_ms: i64 },

    /// The start instant passed too long ago; reject instead of flashing
    /// out of sync with everyone who already finished.
    TooLate { late_by_ms: i64 },
}

impl ScheduleDecision {
    /// Pure decision function over the signed delay until start.
    pub fn decide(delay_ms: i64, late_grace: Duration) -> Self {
        if delay_ms > 0 {
            ScheduleDecision::Future { delay_ms }
        } else if -delay_ms < late_grace.as_millis() as i64 {
            ScheduleDecision::ImmediateLate { late_by_ms: -delay_ms }
        } else {
            ScheduleDecision::TooLate { late_by_ms: -delay_ms }
        }
    }
}

/// Drives the wait-then-play sequence for animation packages.
///
/// Holds the clock-sync estimator it consults once per invocation.
/// Concurrent invocations (separate scheduler instances over clones of the
/// same [`crate::SharedOffset`]) are independent; callers de-duplicate by
/// animation identity and ignore callbacks from superseded invocations.
pub struct AnimationScheduler<C: ServerClock> {
    estimator: ClockSyncEstimator<C>,
    config: SchedulerConfig,
}

impl<C: ServerClock> AnimationScheduler<C> {
    /// Scheduler with default thresholds.
    pub fn new(estimator: ClockSyncEstimator<C>) -> Self {
        Self::with_config(estimator, SchedulerConfig::default())
    }

    /// Scheduler with explicit thresholds.
    pub fn with_config(estimator: ClockSyncEstimator<C>, config: SchedulerConfig) -> Self {
        Self { estimator, config }
    }

    /// Cheap server-time estimate from the underlying estimator's cache.
    pub fn server_time_estimate(&self) -> i64 {
        self.estimator.server_time_estimate()
    }

    /// Schedule one package, emitting lifecycle callbacks on `sink`.
    ///
    /// Suspends across the clock round trip, the pre-start wait and every
    /// inter-frame gap; dropping the enclosing task at any of those points
    /// stops further callbacks. Never returns an error and never panics.
    pub async fn schedule<S: AnimationSink>(&mut self, package: &FramePackage, sink: &mut S) {
        if !package.is_playable() {
            warn!("animation package has no frames, nothing to schedule");
            sink.on_error(UnisonError::EmptyAnimation).await;
            return;
        }

        let start = match parse_start_time(&package.start_time) {
            Ok(start) => start,
            Err(error) => {
                warn!(start_time = %package.start_time, "unparseable start time");
                sink.on_error(error).await;
                return;
            }
        };

        let sync = self.estimator.synchronize().await;
        let now = Utc::now().timestamp_millis();
        let delay_ms = start.timestamp_millis() - (now + sync.offset_millis);

        debug!(
            start_time = %package.start_time,
            delay_ms,
            accuracy = ?sync.accuracy,
            network_delay_ms = sync.network_delay_millis,
            frames = package.frames.len(),
            frame_rate_hz = package.frame_rate_hz,
            "animation scheduling"
        );

        match ScheduleDecision::decide(delay_ms, self.config.late_grace) {
            ScheduleDecision::TooLate { late_by_ms } => {
                warn!(late_by_ms, "animation start time has passed too long ago, skipping");
                sink.on_error(UnisonError::StartTimePassed { late_by_ms }).await;
            }
            ScheduleDecision::ImmediateLate { late_by_ms } => {
                warn!(late_by_ms, "animation start time has passed recently, starting immediately");
                self.play(package, sink).await;
            }
            ScheduleDecision::Future { delay_ms } => {
                let fallback = delay_ms as u128 > self.config.fallback_threshold.as_millis()
                    && sync.accuracy == SyncAccuracy::Low;
                if fallback {
                    warn!(delay_ms, "using fallback timing due to poor synchronization");
                } else {
                    debug!(delay_ms, "using precise timing");
                }
                sleep(Duration::from_millis(delay_ms as u64)).await;
                self.play(package, sink).await;
            }
        }
    }

    /// Emit `on_start`, the frames at the package cadence, then `on_end`.
    ///
    /// Time spent inside each `on_frame` is subtracted from that frame's
    /// nominal slot. A callback that overruns its slot makes that frame
    /// run long and the next start immediately; there is no catch-up
    /// across overruns.
    async fn play<S: AnimationSink>(&mut self, package: &FramePackage, sink: &mut S) {
        sink.on_start().await;

        let frame_duration_ms = package.frame_duration_millis();
        let last = package.frames.len() - 1;

        for (index, frame) in package.frames.iter().enumerate() {
            let frame_started = Instant::now();
            sink.on_frame(*frame).await;

            if index < last {
                let processing_ms = frame_started.elapsed().as_millis() as i64;
                let remaining_ms = (frame_duration_ms - processing_ms).max(0);
                trace!(index, processing_ms, remaining_ms, "frame emitted");
                if remaining_ms > 0 {
                    sleep(Duration::from_millis(remaining_ms as u64)).await;
                }
            }
        }

        debug!(frames = package.frames.len(), "animation complete");
        sink.on_end().await;
    }
}
