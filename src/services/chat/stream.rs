//! Streaming support for Chat service.

use super::events::{ChatResponseEvent, StreamEnd, StreamEvent};
use crate::errors::{ToolkitError, ToolkitResult};
use crate::types::GenerationId;
use futures::stream::Stream;
use std::pin::Pin;
use std::task::{Context, Poll};

/// Raw event stream produced by a chat backend
pub type EventStream = Pin<Box<dyn Stream<Item = ToolkitResult<ChatResponseEvent>> + Send>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    AwaitingStart,
    Streaming,
    Ended,
}

/// A stream of chat events with ordering enforced.
///
/// `stream-start` must come first and exactly one `stream-end` must come
/// last. Everything in between may interleave freely. The first violation is
/// yielded as an error and terminates the stream.
pub struct ChatStream {
    inner: EventStream,
    phase: Phase,
    done: bool,
    accumulated_text: String,
    generation_id: Option<GenerationId>,
}

impl ChatStream {
    /// Create a new chat stream
    pub fn new(inner: EventStream) -> Self {
        Self {
            inner,
            phase: Phase::AwaitingStart,
            done: false,
            accumulated_text: String::new(),
            generation_id: None,
        }
    }

    /// Get accumulated text so far
    pub fn accumulated_text(&self) -> &str {
        &self.accumulated_text
    }

    /// Get the generation ID once the stream has started
    pub fn generation_id(&self) -> Option<&GenerationId> {
        self.generation_id.as_ref()
    }

    /// Whether `stream-end` has been seen
    pub fn is_finished(&self) -> bool {
        self.phase == Phase::Ended
    }

    fn check_order(&mut self, event: &ChatResponseEvent) -> ToolkitResult<()> {
        match (self.phase, event) {
            (_, ChatResponseEvent::NonStreamedChatResponse(_)) => Err(out_of_order(
                "non-streamed-chat-response cannot be part of a stream",
            )),
            (Phase::AwaitingStart, ChatResponseEvent::StreamStart(start)) => {
                self.generation_id = Some(start.generation_id.clone());
                self.phase = Phase::Streaming;
                Ok(())
            }
            (Phase::AwaitingStart, other) => Err(out_of_order(format!(
                "expected {} but received {}",
                StreamEvent::StreamStart,
                other.event()
            ))),
            (Phase::Streaming, ChatResponseEvent::StreamStart(_)) => {
                Err(out_of_order("duplicate stream-start"))
            }
            (Phase::Streaming, ChatResponseEvent::TextGeneration(chunk)) => {
                self.accumulated_text.push_str(&chunk.text);
                Ok(())
            }
            (Phase::Streaming, ChatResponseEvent::StreamEnd(_)) => {
                self.phase = Phase::Ended;
                Ok(())
            }
            (Phase::Streaming, _) => Ok(()),
            (Phase::Ended, other) => Err(out_of_order(format!(
                "received {} after stream-end",
                other.event()
            ))),
        }
    }
}

fn out_of_order(message: impl Into<String>) -> ToolkitError {
    ToolkitError::Stream {
        message: message.into(),
    }
}

impl Stream for ChatStream {
    type Item = ToolkitResult<ChatResponseEvent>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        if self.done {
            return Poll::Ready(None);
        }

        match self.inner.as_mut().poll_next(cx) {
            Poll::Ready(Some(Ok(event))) => match self.check_order(&event) {
                Ok(()) => Poll::Ready(Some(Ok(event))),
                Err(e) => {
                    self.done = true;
                    Poll::Ready(Some(Err(e)))
                }
            },
            Poll::Ready(Some(Err(e))) => {
                self.done = true;
                Poll::Ready(Some(Err(e)))
            }
            Poll::Ready(None) => {
                self.done = true;
                if self.phase == Phase::Ended {
                    Poll::Ready(None)
                } else {
                    Poll::Ready(Some(Err(out_of_order(
                        "stream closed before stream-end",
                    ))))
                }
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

/// Drain a chat stream and return its terminal event
pub async fn collect_stream_end(mut stream: ChatStream) -> ToolkitResult<StreamEnd> {
    use futures::StreamExt;

    let mut end = None;
    while let Some(event) = stream.next().await {
        if let ChatResponseEvent::StreamEnd(stream_end) = event? {
            end = Some(stream_end);
        }
    }

    end.ok_or_else(|| out_of_order("stream closed before stream-end"))
}
