//! Stream utilities for event delivery.

mod events;

pub use events::EventStream;
