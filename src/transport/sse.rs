//! Server-Sent Events (SSE) framing for chat response events.

use crate::errors::{ToolkitError, ToolkitResult};
use crate::services::chat::ChatResponseEvent;
use bytes::Bytes;

/// Event name used for errors raised mid-stream
pub const ERROR_EVENT: &str = "error";

/// A parsed SSE event
#[derive(Debug, Clone, PartialEq)]
pub struct SseEvent {
    /// Event type (from "event:" field)
    pub event: Option<String>,
    /// Event data (from "data:" field)
    pub data: String,
    /// Event ID (from "id:" field)
    pub id: Option<String>,
    /// Retry timeout in milliseconds (from "retry:" field)
    pub retry: Option<u64>,
}

impl SseEvent {
    /// Create a new SSE event with just data
    pub fn new(data: impl Into<String>) -> Self {
        Self {
            event: None,
            data: data.into(),
            id: None,
            retry: None,
        }
    }

    /// Create a new SSE event with event type and data
    pub fn with_event(event: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            event: Some(event.into()),
            data: data.into(),
            id: None,
            retry: None,
        }
    }

    /// Frame a chat response event; the SSE event name is the event tag
    pub fn from_chat_event(event: &ChatResponseEvent) -> ToolkitResult<Self> {
        let data = serde_json::to_string(event)?;
        Ok(Self::with_event(event.event().as_str(), data))
    }

    /// Frame an error raised while streaming
    pub fn error(error: &ToolkitError) -> Self {
        let data = serde_json::json!({ "detail": error.to_string() }).to_string();
        Self::with_event(ERROR_EVENT, data)
    }

    /// Check if this is an error event
    pub fn is_error(&self) -> bool {
        self.event.as_deref() == Some(ERROR_EVENT)
    }

    /// Decode the data back into a chat response event.
    ///
    /// The SSE event name, when present, must agree with the payload tag.
    pub fn decode_chat_event(&self) -> ToolkitResult<ChatResponseEvent> {
        let event: ChatResponseEvent =
            serde_json::from_str(&self.data).map_err(|e| ToolkitError::Stream {
                message: format!("Failed to parse SSE event data: {}", e),
            })?;

        match self.event.as_deref() {
            Some(name) if name != event.event().as_str() => Err(ToolkitError::Stream {
                message: format!(
                    "SSE event name {} does not match payload tag {}",
                    name,
                    event.event()
                ),
            }),
            _ => Ok(event),
        }
    }

    /// Render the event in wire format, terminated by a blank line
    pub fn to_frame(&self) -> String {
        let mut frame = String::new();
        if let Some(ref event) = self.event {
            frame.push_str("event: ");
            frame.push_str(event);
            frame.push('\n');
        }
        if let Some(ref id) = self.id {
            frame.push_str("id: ");
            frame.push_str(id);
            frame.push('\n');
        }
        if let Some(retry) = self.retry {
            frame.push_str(&format!("retry: {}\n", retry));
        }
        for line in self.data.split('\n') {
            frame.push_str("data: ");
            frame.push_str(line);
            frame.push('\n');
        }
        frame.push('\n');
        frame
    }

    /// Wire format as bytes
    pub fn to_bytes(&self) -> Bytes {
        Bytes::from(self.to_frame())
    }
}

/// Parser for SSE stream data
pub struct SseParser {
    buffer: String,
    current_event: Option<String>,
    current_data: Vec<String>,
    current_id: Option<String>,
    current_retry: Option<u64>,
}

impl SseParser {
    /// Create a new SSE parser
    pub fn new() -> Self {
        Self {
            buffer: String::new(),
            current_event: None,
            current_data: Vec::new(),
            current_id: None,
            current_retry: None,
        }
    }

    /// Feed data into the parser and get any complete events
    pub fn feed(&mut self, data: &[u8]) -> Vec<SseEvent> {
        let text = String::from_utf8_lossy(data);
        self.buffer.push_str(&text);

        let mut events = Vec::new();

        while let Some(pos) = self.buffer.find('\n') {
            let line: String = self.buffer.drain(..=pos).collect();
            let line = line.trim_end_matches('\n').trim_end_matches('\r');

            if line.is_empty() {
                // blank line ends the event
                if let Some(event) = self.take_event() {
                    events.push(event);
                }
            } else if let Some(value) = line.strip_prefix("event:") {
                self.current_event = Some(value.trim().to_string());
            } else if let Some(value) = line.strip_prefix("data:") {
                self.current_data.push(value.strip_prefix(' ').unwrap_or(value).to_string());
            } else if let Some(value) = line.strip_prefix("id:") {
                self.current_id = Some(value.trim().to_string());
            } else if let Some(value) = line.strip_prefix("retry:") {
                if let Ok(retry) = value.trim().parse() {
                    self.current_retry = Some(retry);
                }
            }
            // ':' comment lines are ignored
        }

        events
    }

    /// Flush any remaining data as a final event
    pub fn flush(&mut self) -> Option<SseEvent> {
        self.take_event()
    }

    fn take_event(&mut self) -> Option<SseEvent> {
        if self.current_data.is_empty() {
            self.current_event = None;
            return None;
        }
        let event = SseEvent {
            event: self.current_event.take(),
            data: self.current_data.join("\n"),
            id: self.current_id.take(),
            retry: self.current_retry.take(),
        };
        self.current_data.clear();
        Some(event)
    }
}

impl Default for SseParser {
    fn default() -> Self {
        Self::new()
    }
}
