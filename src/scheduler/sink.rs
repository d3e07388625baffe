//! Event delivery for one schedule invocation.

use tokio::sync::mpsc;
use tracing::debug;

use crate::UnisonError;
use crate::types::ColorFrame;

/// Listener for one schedule invocation's lifecycle.
///
/// Within an invocation the calls arrive strictly in order
/// `on_start → on_frame(0..N) → on_end`, with exactly one terminal call
/// (`on_end` or `on_error`) and nothing after it. Methods are async so a
/// sink may paint and await; time spent inside `on_frame` is subtracted
/// from the following inter-frame wait.
#[async_trait::async_trait]
pub trait AnimationSink: Send {
    /// Playback is beginning now.
    async fn on_start(&mut self);

    /// Paint this frame.
    async fn on_frame(&mut self, frame: ColorFrame);

    /// The last frame has been delivered.
    async fn on_end(&mut self);

    /// The invocation terminated without playing (or could not finish).
    async fn on_error(&mut self, error: UnisonError);
}

/// One lifecycle event, the channel-borne form of the sink calls.
#[derive(Debug, Clone, PartialEq)]
pub enum AnimationEvent {
    /// Playback began.
    Started,

    /// One frame to paint.
    Frame(ColorFrame),

    /// Playback completed.
    Ended,

    /// The invocation terminated with the given reason.
    Failed(String),
}

impl AnimationEvent {
    /// Whether this event ends the invocation's stream.
    pub fn is_terminal(&self) -> bool {
        matches!(self, AnimationEvent::Ended | AnimationEvent::Failed(_))
    }
}

/// Sink that forwards events over an unbounded channel.
///
/// Unbounded so a slow consumer never distorts the frame cadence and no
/// frame is dropped; a dropped receiver just stops delivery.
pub struct ChannelSink {
    events: mpsc::UnboundedSender<AnimationEvent>,
}

impl ChannelSink {
    /// Wrap an existing sender.
    pub fn new(events: mpsc::UnboundedSender<AnimationEvent>) -> Self {
        Self { events }
    }

    /// Create a sink together with its receiver.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<AnimationEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }

    fn send(&self, event: AnimationEvent) {
        if self.events.send(event).is_err() {
            debug!("animation event receiver dropped");
        }
    }
}

#[async_trait::async_trait]
impl AnimationSink for ChannelSink {
    async fn on_start(&mut self) {
        self.send(AnimationEvent::Started);
    }

    async fn on_frame(&mut self, frame: ColorFrame) {
        self.send(AnimationEvent::Frame(frame));
    }

    async fn on_end(&mut self) {
        self.send(AnimationEvent::Ended);
    }

    async fn on_error(&mut self, error: UnisonError) {
        self.send(AnimationEvent::Failed(error.to_string()));
    }
}
