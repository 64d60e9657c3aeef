//! Handle to an in-flight event stream.

use std::pin::Pin;
use std::task::{Context, Poll};

use futures::Stream;

use crate::error::ChatError;
use crate::event::ChatEvent;

/// Handle to a streaming chat response.
///
/// Yields decoded events in order. A transport failure is yielded once as
/// `Err` and ends the stream. Dropping the handle cancels delivery.
pub struct EventStream {
    /// The stream of events. Consume with `StreamExt::next()`.
    pub receiver: Pin<Box<dyn Stream<Item = Result<ChatEvent, ChatError>> + Send>>,
}

impl EventStream {
    /// Wrap any compatible stream.
    pub fn new(stream: impl Stream<Item = Result<ChatEvent, ChatError>> + Send + 'static) -> Self {
        Self {
            receiver: Box::pin(stream),
        }
    }
}

impl Stream for EventStream {
    type Item = Result<ChatEvent, ChatError>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.receiver.as_mut().poll_next(cx)
    }
}

impl std::fmt::Debug for EventStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventStream").finish_non_exhaustive()
    }
}
