//! Core types for synchronized animation playback.
//!
//! - [`ColorFrame`] is one full-screen color; a show is an ordered list of them
//! - [`FramePackage`] bundles the frames, rate and start time resolved for one device
//! - [`ClockSync`] is a fresh (server − local) offset estimate with a confidence bucket
//! - [`parse_start_time`] implements the four-encoding start-time contract

mod clock_sync;
mod color;
mod package;
mod start_time;

pub use clock_sync::{ClockSync, HIGH_ACCURACY_DELAY_MS, SyncAccuracy};
pub use color::ColorFrame;
pub use package::FramePackage;
pub use start_time::{parse_start_time, start_time_millis};
