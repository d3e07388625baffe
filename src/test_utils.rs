//! Shared helpers for unit tests: deterministic server clocks and a
//! recording sink.

use std::time::Duration;

use chrono::Utc;
use tokio::time::Instant;

use crate::clock::ServerClock;
use crate::scheduler::{AnimationEvent, AnimationSink};
use crate::types::ColorFrame;
use crate::{Result, UnisonError};

/// Server clock that runs at a fixed skew from the local clock.
///
/// A positive skew puts the server ahead of the device, which makes a
/// "now" start time look stale by that much in server time.
pub struct SkewedServerClock {
    pub skew_millis: i64,
}

#[async_trait::async_trait]
impl ServerClock for SkewedServerClock {
    async fn server_time_millis(&mut self) -> Result<i64> {
        Ok(Utc::now().timestamp_millis() + self.skew_millis)
    }
}

/// Server clock whose round trip always fails.
pub struct FailingServerClock;

#[async_trait::async_trait]
impl ServerClock for FailingServerClock {
    async fn server_time_millis(&mut self) -> Result<i64> {
        Err(UnisonError::connection_failed("server clock unreachable"))
    }
}

/// Server clock whose round trip never completes, for the timeout path.
pub struct StalledServerClock;

#[async_trait::async_trait]
impl ServerClock for StalledServerClock {
    async fn server_time_millis(&mut self) -> Result<i64> {
        std::future::pending().await
    }
}

/// A start-time string `seconds_ahead` from the local wall clock, in the
/// seconds-precision `Z` encoding.
pub fn start_time_from_now(seconds_ahead: i64) -> String {
    (Utc::now() + chrono::Duration::seconds(seconds_ahead))
        .format("%Y-%m-%dT%H:%M:%SZ")
        .to_string()
}

/// Sink that records every event plus the instant each frame arrived,
/// optionally simulating per-frame processing cost.
#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AnimationEvent>,
    pub frame_times: Vec<Instant>,
    frame_cost: Option<Duration>,
}

impl RecordingSink {
    /// Sink whose `on_frame` burns `cost` of (tokio) time before
    /// returning.
    pub fn with_frame_cost(cost: Duration) -> Self {
        Self { frame_cost: Some(cost), ..Self::default() }
    }

    /// The frames received, in order.
    pub fn frames(&self) -> Vec<ColorFrame> {
        self.events
            .iter()
            .filter_map(|event| match event {
                AnimationEvent::Frame(frame) => Some(*frame),
                _ => None,
            })
            .collect()
    }

    /// Gaps between successive frame arrivals, in milliseconds.
    pub fn frame_gaps_millis(&self) -> Vec<i64> {
        self.frame_times
            .windows(2)
            .map(|pair| (pair[1] - pair[0]).as_millis() as i64)
            .collect()
    }
}

#[async_trait::async_trait]
impl AnimationSink for RecordingSink {
    async fn on_start(&mut self) {
        self.events.push(AnimationEvent::Started);
    }

    async fn on_frame(&mut self, frame: ColorFrame) {
        self.frame_times.push(Instant::now());
        self.events.push(AnimationEvent::Frame(frame));
        if let Some(cost) = self.frame_cost {
            tokio::time::sleep(cost).await;
        }
    }

    async fn on_end(&mut self) {
        self.events.push(AnimationEvent::Ended);
    }

    async fn on_error(&mut self, error: UnisonError) {
        self.events.push(AnimationEvent::Failed(error.to_string()));
    }
}
