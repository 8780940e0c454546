//! Chat service for conversational AI.
//!
//! This module provides:
//! - Validated request schemas for single-turn and multi-turn chats
//! - The tagged union of streamed and non-streamed response events
//! - Ordering enforcement over backend event streams
//! - The backend seam the requests are proxied through

mod events;
mod service;
mod stream;
mod types;
mod validation;

pub use events::{
    ChatResponseEvent, Finished, NonStreamedChatResponse, StreamCitationGeneration, StreamEnd,
    StreamEvent, StreamQueryGeneration, StreamSearchQueriesGeneration, StreamSearchResults,
    StreamStart, StreamTextGeneration, StreamToolInput, StreamToolResult,
};
pub use service::{ChatBackend, ChatService, ChatServiceImpl};
pub use stream::{collect_stream_end, ChatStream, EventStream};
pub use types::{
    BaseChatRequest, ChatCitationQuality, ChatMessage, ChatRole, Citation, CohereChatRequest,
    CohereChatRequestBuilder, Document, PromptTruncation, SearchQuery, Tool, ToolCall,
    ToolInputType, DEFAULT_CHAT_MODEL,
};
pub use validation::{validate_chat_request, MAX_K, MAX_P, MAX_STOP_SEQUENCES};
