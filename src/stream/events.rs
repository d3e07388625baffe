//! Stream surface over one schedule invocation's events.

use futures::{Stream, ready};
use pin_project_lite::pin_project;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;

use crate::scheduler::AnimationEvent;

pin_project! {
    /// `Stream` of [`AnimationEvent`]s for one schedule invocation.
    ///
    /// Fuses after the terminal event (`Ended` or `Failed`), so consumers
    /// see exactly one terminal item and nothing after it even if the
    /// producing task lingers.
    pub struct EventStream {
        #[pin]
        inner: UnboundedReceiverStream<AnimationEvent>,
        terminated: bool,
    }
}

impl EventStream {
    /// Wrap a schedule invocation's event receiver.
    pub fn new(receiver: mpsc::UnboundedReceiver<AnimationEvent>) -> Self {
        Self { inner: UnboundedReceiverStream::new(receiver), terminated: false }
    }
}

impl Stream for EventStream {
    type Item = AnimationEvent;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.project();

        if *this.terminated {
            return Poll::Ready(None);
        }

        match ready!(this.inner.poll_next(cx)) {
            Some(event) => {
                if event.is_terminal() {
                    *this.terminated = true;
                }
                Poll::Ready(Some(event))
            }
            None => Poll::Ready(None),
        }
    }
}
