//! Driver spawns one schedule invocation as an owned task.

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace};

use crate::clock::ServerClock;
use crate::scheduler::{AnimationScheduler, ChannelSink};
use crate::stream::EventStream;
use crate::types::FramePackage;

/// Handle to one in-flight schedule invocation.
///
/// Dropping the handle cancels the invocation at whichever suspension
/// point it is in (the clock round trip, the pre-start wait, an
/// inter-frame gap); the fused [`EventStream`] then simply ends. Two
/// handles are never coordinated against each other; callers discard the
/// superseded one when a newer notification arrives for the same
/// animation.
pub struct ScheduleHandle {
    /// Lifecycle events for this invocation.
    pub events: EventStream,

    cancel: CancellationToken,
}

impl ScheduleHandle {
    /// Stop the invocation; no further events will be produced.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    /// Token for tying the invocation into a wider shutdown tree.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }
}

impl Drop for ScheduleHandle {
    fn drop(&mut self) {
        debug!("dropping schedule handle");
        self.cancel.cancel();
    }
}

/// Driver spawns and manages schedule tasks.
///
/// Any number of invocations may be in flight concurrently; each owns its
/// scheduler (and thereby its clock collaborator) for the duration.
pub struct Driver;

impl Driver {
    /// Run one schedule invocation as a tokio task.
    ///
    /// Returns the event stream for the invocation plus its cancellation
    /// handle.
    pub fn spawn<C>(mut scheduler: AnimationScheduler<C>, package: FramePackage) -> ScheduleHandle
    where
        C: ServerClock,
    {
        let (mut sink, events) = ChannelSink::channel();
        let cancel = CancellationToken::new();
        let cancel_task = cancel.clone();

        tokio::spawn(async move {
            trace!(
                frames = package.frames.len(),
                start_time = %package.start_time,
                "schedule task started"
            );
            tokio::select! {
                _ = cancel_task.cancelled() => {
                    info!("schedule task cancelled");
                }
                _ = scheduler.schedule(&package, &mut sink) => {
                    trace!("schedule task finished");
                }
            }
        });

        ScheduleHandle { events: EventStream::new(events), cancel }
    }
}
