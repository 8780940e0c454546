//! Wire framing for streamed responses.

pub mod sse;

pub use sse::{SseEvent, SseParser, ERROR_EVENT};
