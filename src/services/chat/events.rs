//! Response events for the Chat service.
//!
//! A chat response is delivered as a sequence of [`ChatResponseEvent`]s, each
//! a `{"event": <tag>, "data": <payload>}` record. The tag fixes the payload
//! shape, so decoding is a single exhaustive match.

use super::types::{ChatMessage, Citation, Document, SearchQuery, ToolCall, ToolInputType};
use crate::types::{FinishReason, GenerationId};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Tag identifying the kind of a stream event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StreamEvent {
    /// First event of every stream
    StreamStart,
    /// Search queries generated for retrieval
    SearchQueriesGeneration,
    /// Retrieval results and their documents
    SearchResults,
    /// Input sent to a tool
    ToolInput,
    /// Output returned by a tool
    ToolResult,
    /// A chunk of generated text
    TextGeneration,
    /// Citations for generated text
    CitationGeneration,
    /// A single search query used for grounding
    QueryGeneration,
    /// Terminal event of every stream
    StreamEnd,
    /// Whole response of a non-streamed chat
    NonStreamedChatResponse,
}

impl StreamEvent {
    /// Wire name of the tag
    pub fn as_str(&self) -> &'static str {
        match self {
            StreamEvent::StreamStart => "stream-start",
            StreamEvent::SearchQueriesGeneration => "search-queries-generation",
            StreamEvent::SearchResults => "search-results",
            StreamEvent::ToolInput => "tool-input",
            StreamEvent::ToolResult => "tool-result",
            StreamEvent::TextGeneration => "text-generation",
            StreamEvent::CitationGeneration => "citation-generation",
            StreamEvent::QueryGeneration => "query-generation",
            StreamEvent::StreamEnd => "stream-end",
            StreamEvent::NonStreamedChatResponse => "non-streamed-chat-response",
        }
    }
}

impl fmt::Display for StreamEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StreamEvent {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        serde_json::from_value(Value::String(s.to_string()))
            .map_err(|_| format!("unknown stream event: {}", s))
    }
}

/// `is_finished` flag that is always `true`.
///
/// Serializes as `true`; any boolean supplied on input is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Finished;

impl Serialize for Finished {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_bool(true)
    }
}

impl<'de> Deserialize<'de> for Finished {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        bool::deserialize(deserializer)?;
        Ok(Finished)
    }
}

/// Stream start event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamStart {
    /// Whether the chat stream has finished
    #[serde(default)]
    pub is_finished: bool,
    /// Generation this stream belongs to
    pub generation_id: GenerationId,
    /// Conversation the generation is stored under
    #[serde(default)]
    pub conversation_id: Option<String>,
}

/// Stream text generation event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamTextGeneration {
    /// Whether the chat stream has finished
    #[serde(default)]
    pub is_finished: bool,
    /// Chunk of the chat message
    pub text: String,
}

/// Stream citation generation event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamCitationGeneration {
    /// Whether the chat stream has finished
    #[serde(default)]
    pub is_finished: bool,
    /// Citations for the chat message
    #[serde(default)]
    pub citations: Vec<Citation>,
}

/// Stream query generation event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamQueryGeneration {
    /// Whether the chat stream has finished
    #[serde(default)]
    pub is_finished: bool,
    /// Search query used to ground the response
    pub query: String,
}

/// Stream search results event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamSearchResults {
    /// Whether the chat stream has finished
    #[serde(default)]
    pub is_finished: bool,
    /// Raw search results
    #[serde(default)]
    pub search_results: Vec<Map<String, Value>>,
    /// Documents used to ground the response
    #[serde(default)]
    pub documents: Vec<Document>,
}

/// Stream tool input event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamToolInput {
    /// Whether the chat stream has finished
    #[serde(default)]
    pub is_finished: bool,
    /// Kind of input
    pub input_type: ToolInputType,
    /// Tool receiving the input
    pub tool_name: String,
    /// The input itself
    pub input: String,
    /// Text shown to the user while the tool runs
    pub text: String,
}

/// Stream tool result event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamToolResult {
    /// Whether the chat stream has finished
    #[serde(default)]
    pub is_finished: bool,
    /// Tool output, if any
    pub result: Option<String>,
    /// Documents produced by the tool
    #[serde(default)]
    pub documents: Vec<Document>,
}

/// Stream search queries generation event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamSearchQueriesGeneration {
    /// Whether the chat stream has finished
    #[serde(default)]
    pub is_finished: bool,
    /// Generated search queries
    #[serde(default)]
    pub search_queries: Vec<SearchQuery>,
}

/// Terminal stream event carrying the aggregate response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StreamEnd {
    /// Unique identifier for the response
    pub response_id: String,
    /// Always true
    #[serde(default)]
    pub is_finished: Finished,
    /// Generation this stream belongs to
    pub generation_id: GenerationId,
    /// Conversation the generation is stored under
    pub conversation_id: Option<String>,
    /// Full text of the chat message
    pub text: String,
    /// Citations for the chat message
    #[serde(default)]
    pub citations: Vec<Citation>,
    /// Documents used to ground the response
    #[serde(default)]
    pub documents: Vec<Document>,
    /// Raw search results
    #[serde(default)]
    pub search_results: Vec<Map<String, Value>>,
    /// Generated search queries
    #[serde(default)]
    pub search_queries: Vec<SearchQuery>,
    /// Why generation stopped
    pub finish_reason: FinishReason,
}

impl StreamEnd {
    /// Always true for the terminal event
    pub fn is_finished(&self) -> bool {
        true
    }
}

/// Response of a non-streamed chat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NonStreamedChatResponse {
    /// Whether the chat has finished
    #[serde(default)]
    pub is_finished: bool,
    /// Unique identifier for the response
    pub response_id: Option<String>,
    /// Unique identifier for the generation
    pub generation_id: Option<GenerationId>,
    /// History including this exchange
    pub chat_history: Option<Vec<ChatMessage>>,
    /// Why generation stopped
    pub finish_reason: FinishReason,
    /// Contents of the chat message
    pub text: String,
    /// Citations for the chat message
    #[serde(default)]
    pub citations: Vec<Citation>,
    /// Documents used to ground the response
    #[serde(default)]
    pub documents: Vec<Document>,
    /// Raw search results
    #[serde(default)]
    pub search_results: Vec<Map<String, Value>>,
    /// Generated search queries
    #[serde(default)]
    pub search_queries: Vec<SearchQuery>,
    /// Conversation the exchange is stored under
    pub conversation_id: Option<String>,
    /// Tool calls generated for custom tools
    #[serde(default)]
    pub tool_calls: Vec<ToolCall>,
}

/// A single event of a chat response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ChatResponseEvent {
    /// Stream started
    StreamStart(StreamStart),
    /// Text generated
    TextGeneration(StreamTextGeneration),
    /// Citations generated
    CitationGeneration(StreamCitationGeneration),
    /// Search query generated
    QueryGeneration(StreamQueryGeneration),
    /// Search results received
    SearchResults(StreamSearchResults),
    /// Tool invoked
    ToolInput(StreamToolInput),
    /// Tool returned
    ToolResult(StreamToolResult),
    /// Search queries generated
    SearchQueriesGeneration(StreamSearchQueriesGeneration),
    /// Stream ended
    StreamEnd(StreamEnd),
    /// Whole response of a non-streamed chat
    NonStreamedChatResponse(NonStreamedChatResponse),
}

impl ChatResponseEvent {
    /// The tag of this event
    pub fn event(&self) -> StreamEvent {
        match self {
            ChatResponseEvent::StreamStart(_) => StreamEvent::StreamStart,
            ChatResponseEvent::TextGeneration(_) => StreamEvent::TextGeneration,
            ChatResponseEvent::CitationGeneration(_) => StreamEvent::CitationGeneration,
            ChatResponseEvent::QueryGeneration(_) => StreamEvent::QueryGeneration,
            ChatResponseEvent::SearchResults(_) => StreamEvent::SearchResults,
            ChatResponseEvent::ToolInput(_) => StreamEvent::ToolInput,
            ChatResponseEvent::ToolResult(_) => StreamEvent::ToolResult,
            ChatResponseEvent::SearchQueriesGeneration(_) => StreamEvent::SearchQueriesGeneration,
            ChatResponseEvent::StreamEnd(_) => StreamEvent::StreamEnd,
            ChatResponseEvent::NonStreamedChatResponse(_) => StreamEvent::NonStreamedChatResponse,
        }
    }

    /// Whether this event reports the chat as finished
    pub fn is_finished(&self) -> bool {
        match self {
            ChatResponseEvent::StreamStart(e) => e.is_finished,
            ChatResponseEvent::TextGeneration(e) => e.is_finished,
            ChatResponseEvent::CitationGeneration(e) => e.is_finished,
            ChatResponseEvent::QueryGeneration(e) => e.is_finished,
            ChatResponseEvent::SearchResults(e) => e.is_finished,
            ChatResponseEvent::ToolInput(e) => e.is_finished,
            ChatResponseEvent::ToolResult(e) => e.is_finished,
            ChatResponseEvent::SearchQueriesGeneration(e) => e.is_finished,
            ChatResponseEvent::StreamEnd(e) => e.is_finished(),
            ChatResponseEvent::NonStreamedChatResponse(e) => e.is_finished,
        }
    }

    /// Shorthand for a text chunk
    pub fn text(text: impl Into<String>) -> Self {
        ChatResponseEvent::TextGeneration(StreamTextGeneration {
            is_finished: false,
            text: text.into(),
        })
    }
}

macro_rules! impl_from_payload {
    ($($payload:ident => $variant:ident),* $(,)?) => {
        $(
            impl From<$payload> for ChatResponseEvent {
                fn from(payload: $payload) -> Self {
                    ChatResponseEvent::$variant(payload)
                }
            }
        )*
    };
}

impl_from_payload! {
    StreamStart => StreamStart,
    StreamTextGeneration => TextGeneration,
    StreamCitationGeneration => CitationGeneration,
    StreamQueryGeneration => QueryGeneration,
    StreamSearchResults => SearchResults,
    StreamToolInput => ToolInput,
    StreamToolResult => ToolResult,
    StreamSearchQueriesGeneration => SearchQueriesGeneration,
    StreamEnd => StreamEnd,
    NonStreamedChatResponse => NonStreamedChatResponse,
}
