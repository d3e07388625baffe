//! Frame packages: the playable unit resolved for one device.

use chrono::{Duration as ChronoDuration, Utc};
use tracing::warn;

use super::color::ColorFrame;
use super::start_time::{END_TIME_FORMAT, parse_start_time};
use crate::{Result, UnisonError};

/// The ordered color sequence, playback rate and start time that define
/// one playable animation for one recipient.
///
/// An empty `frames` list is a valid "no animation" value; the scheduler
/// refuses to play it. The start time stays a string here because the
/// scheduler owns parsing and its error path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FramePackage {
    /// Ordered full-screen colors, one per frame.
    pub frames: Vec<ColorFrame>,

    /// Playback rate in frames per second.
    pub frame_rate_hz: u32,

    /// Wall-clock start instant, in one of the accepted string encodings.
    pub start_time: String,
}

impl FramePackage {
    /// Create a package, rejecting a zero frame rate.
    pub fn new(
        frames: Vec<ColorFrame>,
        frame_rate_hz: u32,
        start_time: impl Into<String>,
    ) -> Result<Self> {
        if frame_rate_hz == 0 {
            return Err(UnisonError::InvalidFrameRate { value: frame_rate_hz });
        }
        Ok(Self { frames, frame_rate_hz, start_time: start_time.into() })
    }

    /// Whether there is anything to play.
    pub fn is_playable(&self) -> bool {
        !self.frames.is_empty()
    }

    /// Nominal duration of one frame slot in milliseconds.
    ///
    /// Computed once per playback, not per frame.
    pub fn frame_duration_millis(&self) -> i64 {
        (1000.0 / self.frame_rate_hz as f64).round() as i64
    }

    /// Total playback duration in seconds.
    pub fn total_duration_secs(&self) -> f64 {
        self.frames.len() as f64 / self.frame_rate_hz as f64
    }

    /// End instant derived from the start time and frame count, formatted
    /// as `YYYY-MM-DDTHH:MM:SS`.
    pub fn end_time(&self) -> Result<String> {
        let start = parse_start_time(&self.start_time)?;
        let duration_ms = (self.total_duration_secs() * 1000.0).round() as i64;
        let end = start + ChronoDuration::milliseconds(duration_ms);
        Ok(end.format(END_TIME_FORMAT).to_string())
    }

    /// Whether the whole animation already lies in the past.
    ///
    /// An unparseable start time degrades to "not expired"; the scheduler
    /// reports the parse failure properly when asked to play.
    pub fn is_expired(&self) -> bool {
        match self.end_time().as_deref().map(parse_start_time) {
            Ok(Ok(end)) => end < Utc::now(),
            _ => {
                warn!(start_time = %self.start_time, "could not derive end time, treating as not expired");
                false
            }
        }
    }
}
