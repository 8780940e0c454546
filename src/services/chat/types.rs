//! Types for the Chat service.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Default model used when a request does not name one
pub const DEFAULT_CHAT_MODEL: &str = "command-r";

/// Role in a chat conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChatRole {
    /// Assistant/chatbot response
    Chatbot,
    /// User message
    User,
}

/// Approach taken to generating citations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChatCitationQuality {
    /// Faster, less precise citations
    Fast,
    /// Precise citations
    #[default]
    Accurate,
}

/// Kind of input passed to a tool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ToolInputType {
    /// Natural-language search query
    Query,
    /// Code to execute
    Code,
}

/// How the prompt is fitted into the model's context window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PromptTruncation {
    /// No truncation; oversized prompts fail
    Off,
    /// Drop the oldest history and documents first, keeping order
    #[default]
    AutoPreserveOrder,
}

/// A previous message between the user and the model.
///
/// Serializes to exactly `{"role": ..., "message": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Who the message is coming from
    pub role: ChatRole,
    /// Contents of the chat message
    pub message: String,
}

impl ChatMessage {
    /// Create a user message
    pub fn user(message: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            message: message.into(),
        }
    }

    /// Create a chatbot/assistant message
    pub fn chatbot(message: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Chatbot,
            message: message.into(),
        }
    }
}

/// A tool the model may call.
///
/// Managed tools only need a name; custom tools also carry a description and
/// parameter definitions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tool {
    /// Name of the tool
    pub name: String,
    /// Human-readable name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    /// Description of what the tool does
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Parameter definitions keyed by parameter name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameter_definitions: Option<Map<String, Value>>,
}

impl Tool {
    /// Reference a managed tool by name
    pub fn managed(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            display_name: None,
            description: None,
            parameter_definitions: None,
        }
    }

    /// Define a custom tool
    pub fn custom(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            description: Some(description.into()),
            ..Self::managed(name)
        }
    }

    /// Add parameter definitions
    pub fn with_parameters(mut self, params: Map<String, Value>) -> Self {
        self.parameter_definitions = Some(params);
        self
    }
}

/// A tool call generated by the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Name of the tool to call
    pub name: String,
    /// Parameters for the tool
    #[serde(default)]
    pub parameters: Value,
}

/// A document used to ground a response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Unique document ID
    pub document_id: String,
    /// Document text content
    pub text: String,
    /// Document title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Document URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Additional fields returned by the retriever
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<Map<String, Value>>,
    /// Tool that produced the document
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_name: Option<String>,
}

impl Document {
    /// Create a new document
    pub fn new(document_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            document_id: document_id.into(),
            text: text.into(),
            title: None,
            url: None,
            fields: None,
            tool_name: None,
        }
    }

    /// Add a title
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Add a URL
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Record the tool that produced this document
    pub fn with_tool_name(mut self, tool_name: impl Into<String>) -> Self {
        self.tool_name = Some(tool_name.into());
        self
    }
}

/// Search query generated for retrieval
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchQuery {
    /// Search text
    pub text: String,
    /// Generation this query belongs to
    pub generation_id: String,
}

/// Citation in a response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Citation {
    /// Text being cited
    pub text: String,
    /// Start position in the text
    pub start: u32,
    /// End position in the text
    pub end: u32,
    /// Document IDs that support this citation
    pub document_ids: Vec<String>,
}

fn new_conversation_id() -> String {
    Uuid::new_v4().to_string()
}

/// Fields shared by every chat request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaseChatRequest {
    /// The message to send to the chatbot
    pub message: String,
    /// Entries used to construct the conversation. When present, the
    /// conversation is not stored under `conversation_id`.
    #[serde(default)]
    pub chat_history: Option<Vec<ChatMessage>>,
    /// Identifier correlating related requests
    #[serde(default = "new_conversation_id")]
    pub conversation_id: String,
}

impl BaseChatRequest {
    /// Create a request with a freshly generated conversation ID
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            chat_history: None,
            conversation_id: new_conversation_id(),
        }
    }

    /// Whether the exchange should be persisted under `conversation_id`.
    ///
    /// A caller-supplied history takes precedence: the conversation is then
    /// stateless and nothing is stored.
    pub fn should_store_conversation(&self) -> bool {
        self.chat_history.is_none()
    }
}

/// Request shape for a Cohere chat, streamed or not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CohereChatRequest {
    /// Message, history and conversation ID
    #[serde(flatten)]
    pub base: BaseChatRequest,
    /// Free-form documents used to ground the response
    #[serde(default)]
    pub documents: Vec<Map<String, Value>>,
    /// The model to use for generating the response
    #[serde(default = "default_model")]
    pub model: Option<String>,
    /// Degree of randomness in generation, non-negative
    #[serde(default)]
    pub temperature: Option<f64>,
    /// Top-k sampling, 0 to 500
    #[serde(default)]
    pub k: Option<i64>,
    /// Top-p sampling, 0 to 0.99
    #[serde(default)]
    pub p: Option<f64>,
    /// Preamble override
    #[serde(default)]
    pub preamble: Option<String>,
    /// File IDs for PDFs used in RAG; accepted but never sent onward
    #[serde(default, skip_serializing)]
    pub file_ids: Option<Vec<String>>,
    /// Custom or managed tools available to the model
    #[serde(default)]
    pub tools: Vec<Tool>,
    /// Only generate search queries, without replying
    #[serde(default)]
    pub search_queries_only: bool,
    /// Maximum number of tokens to generate, at least 1
    #[serde(default)]
    pub max_tokens: Option<i64>,
    /// Seed for best-effort deterministic sampling
    #[serde(default)]
    pub seed: Option<f64>,
    /// Up to 5 sequences that stop generation
    #[serde(default)]
    pub stop_sequences: Option<Vec<String>>,
    /// Penalty applied equally to all tokens already present, 0 to 1
    #[serde(default)]
    pub presence_penalty: Option<f64>,
    /// Penalty proportional to token frequency, 0 to 1
    #[serde(default)]
    pub frequency_penalty: Option<f64>,
    /// How the prompt is constructed
    #[serde(default)]
    pub prompt_truncation: PromptTruncation,
}

fn default_model() -> Option<String> {
    Some(DEFAULT_CHAT_MODEL.to_string())
}

impl CohereChatRequest {
    /// Create a new chat request with defaults
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            base: BaseChatRequest::new(message),
            documents: Vec::new(),
            model: default_model(),
            temperature: None,
            k: None,
            p: None,
            preamble: None,
            file_ids: None,
            tools: Vec::new(),
            search_queries_only: false,
            max_tokens: None,
            seed: None,
            stop_sequences: None,
            presence_penalty: None,
            frequency_penalty: None,
            prompt_truncation: PromptTruncation::default(),
        }
    }

    /// Create a builder
    pub fn builder(message: impl Into<String>) -> CohereChatRequestBuilder {
        CohereChatRequestBuilder::new(message)
    }

    /// The user message
    pub fn message(&self) -> &str {
        &self.base.message
    }

    /// The conversation identifier
    pub fn conversation_id(&self) -> &str {
        &self.base.conversation_id
    }
}

/// Builder for CohereChatRequest
#[derive(Debug, Clone)]
pub struct CohereChatRequestBuilder {
    request: CohereChatRequest,
}

impl CohereChatRequestBuilder {
    /// Create a new builder
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            request: CohereChatRequest::new(message),
        }
    }

    /// Set the chat history
    pub fn chat_history(mut self, history: Vec<ChatMessage>) -> Self {
        self.request.base.chat_history = Some(history);
        self
    }

    /// Set the conversation ID
    pub fn conversation_id(mut self, id: impl Into<String>) -> Self {
        self.request.base.conversation_id = id.into();
        self
    }

    /// Set the model
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.request.model = Some(model.into());
        self
    }

    /// Set the preamble
    pub fn preamble(mut self, preamble: impl Into<String>) -> Self {
        self.request.preamble = Some(preamble.into());
        self
    }

    /// Set temperature
    pub fn temperature(mut self, temp: f64) -> Self {
        self.request.temperature = Some(temp);
        self
    }

    /// Set top-k
    pub fn k(mut self, k: i64) -> Self {
        self.request.k = Some(k);
        self
    }

    /// Set top-p
    pub fn p(mut self, p: f64) -> Self {
        self.request.p = Some(p);
        self
    }

    /// Set max tokens
    pub fn max_tokens(mut self, max: i64) -> Self {
        self.request.max_tokens = Some(max);
        self
    }

    /// Set seed
    pub fn seed(mut self, seed: f64) -> Self {
        self.request.seed = Some(seed);
        self
    }

    /// Set stop sequences
    pub fn stop_sequences(mut self, sequences: Vec<String>) -> Self {
        self.request.stop_sequences = Some(sequences);
        self
    }

    /// Set presence penalty
    pub fn presence_penalty(mut self, penalty: f64) -> Self {
        self.request.presence_penalty = Some(penalty);
        self
    }

    /// Set frequency penalty
    pub fn frequency_penalty(mut self, penalty: f64) -> Self {
        self.request.frequency_penalty = Some(penalty);
        self
    }

    /// Add tools
    pub fn tools(mut self, tools: Vec<Tool>) -> Self {
        self.request.tools = tools;
        self
    }

    /// Add documents
    pub fn documents(mut self, docs: Vec<Map<String, Value>>) -> Self {
        self.request.documents = docs;
        self
    }

    /// Set the prompt truncation mode
    pub fn prompt_truncation(mut self, mode: PromptTruncation) -> Self {
        self.request.prompt_truncation = mode;
        self
    }

    /// Only generate search queries
    pub fn search_queries_only(mut self) -> Self {
        self.request.search_queries_only = true;
        self
    }

    /// Build the request
    pub fn build(self) -> CohereChatRequest {
        self.request
    }
}
