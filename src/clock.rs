//! Server clock collaborator trait.

use crate::Result;

/// Trait for authoritative server time sources.
///
/// Implementations abstract over however the deployment obtains one
/// authoritative timestamp per call: a write-marker-then-read-back round
/// trip against a document store, a dedicated time endpoint, anything with
/// request/response shape. The estimator measures the round trip around
/// this call and bounds it with a timeout, so implementations should not
/// retry internally.
#[async_trait::async_trait]
pub trait ServerClock: Send + 'static {
    /// One authoritative "now" in milliseconds since the Unix epoch.
    ///
    /// Returns:
    /// - `Ok(millis)` - server timestamp obtained
    /// - `Err(e)` - transport failure; the estimator degrades to its
    ///   cached offset rather than propagating this
    async fn server_time_millis(&mut self) -> Result<i64>;
}
