//! Error types for animation scheduling.
//!
//! Every failure in the scheduling core stays inside the `schedule()`
//! boundary: parse and staleness failures end in a terminal `on_error`
//! callback, clock failures degrade to a cached offset. [`UnisonError`]
//! exists for those callbacks and for the collaborator traits
//! ([`crate::ServerClock`], [`crate::PackageSource`]) whose implementations
//! do cross a network.
//!
//! Errors carry enough context to decide whether a retry makes sense:
//!
//! ```rust
//! use unison::UnisonError;
//!
//! let error = UnisonError::connection_failed("server clock unreachable");
//! assert!(error.is_retryable());
//! ```

use std::time::Duration;
use thiserror::Error;

/// Result type alias for scheduling operations.
pub type Result<T, E = UnisonError> = std::result::Result<T, E>;

/// Main error type for animation scheduling.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum UnisonError {
    /// The server clock or document store could not be reached.
    #[error("Failed to reach backend: {reason}")]
    Connection {
        reason: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A bounded operation exceeded its deadline.
    #[error("Operation timed out after {duration:?}")]
    Timeout { duration: Duration },

    /// The start-time string matched none of the accepted encodings.
    #[error("Invalid start time format: {value}")]
    InvalidStartTime { value: String },

    /// The start instant is further in the past than the late grace window.
    #[error("Animation start time has passed {late_by_ms}ms ago, waiting for next scheduled start time")]
    StartTimePassed { late_by_ms: i64 },

    /// The package carries no frames; there is nothing to play.
    #[error("Animation package has no frames")]
    EmptyAnimation,

    /// The frame rate must be a positive number of frames per second.
    #[error("Invalid frame rate: {value}Hz")]
    InvalidFrameRate { value: u32 },

    /// A backend document did not have the expected shape.
    #[error("Malformed animation document in {context}: {details}")]
    Document { context: String, details: String },
}

impl UnisonError {
    /// Returns whether this error is potentially recoverable through retry.
    ///
    /// Transport problems are transient; everything else describes the data
    /// itself and will not change on a second attempt.
    pub fn is_retryable(&self) -> bool {
        match self {
            UnisonError::Connection { .. } => true,
            UnisonError::Timeout { .. } => true,
            UnisonError::InvalidStartTime { .. } => false,
            UnisonError::StartTimePassed { .. } => false,
            UnisonError::EmptyAnimation => false,
            UnisonError::InvalidFrameRate { .. } => false,
            UnisonError::Document { .. } => false,
        }
    }

    /// Helper constructor for connection errors.
    pub fn connection_failed(reason: impl Into<String>) -> Self {
        UnisonError::Connection { reason: reason.into(), source: None }
    }

    /// Helper constructor for connection errors with an underlying cause.
    pub fn connection_failed_with_source(
        reason: impl Into<String>,
        source: Box<dyn std::error::Error + Send + Sync>,
    ) -> Self {
        UnisonError::Connection { reason: reason.into(), source: Some(source) }
    }

    /// Helper constructor for start-time parse failures.
    pub fn invalid_start_time(value: impl Into<String>) -> Self {
        UnisonError::InvalidStartTime { value: value.into() }
    }

    /// Helper constructor for malformed-document errors.
    pub fn document_error(context: impl Into<String>, details: impl Into<String>) -> Self {
        UnisonError::Document { context: context.into(), details: details.into() }
    }
}
