//! Test fixtures for the toolkit.
//!
//! This module provides pre-built test data for use in tests.

use crate::services::chat::{
    ChatMessage, ChatResponseEvent, Citation, CohereChatRequest, Document, Finished,
    NonStreamedChatResponse, SearchQuery, StreamCitationGeneration, StreamEnd,
    StreamSearchQueriesGeneration, StreamStart, StreamToolInput, ToolInputType,
};
use crate::services::deployments::{DeploymentDefinition, DeploymentRegistry};
use crate::types::{FinishReason, GenerationId};

const GENERATION_ID: &str = "gen-123";
const CONVERSATION_ID: &str = "conv-123";
const EVEREST_ANSWER: &str = "Mount Everest is 29,035 feet tall.";

/// Registry with two small deployments:
/// `Cohere Platform` needs `COHERE_VAR_1` and `COHERE_VAR_2`,
/// `SageMaker` needs `SAGEMAKER_VAR_1` and `SAGEMAKER_VAR_2`.
pub fn test_registry() -> DeploymentRegistry {
    let definitions = vec![
        DeploymentDefinition::new("Cohere Platform")
            .with_models(["test"])
            .with_env_vars(["COHERE_VAR_1", "COHERE_VAR_2"]),
        DeploymentDefinition::new("SageMaker")
            .with_models(["test"])
            .with_env_vars(["SAGEMAKER_VAR_1", "SAGEMAKER_VAR_2"]),
    ];
    match DeploymentRegistry::new(definitions) {
        Ok(registry) => registry,
        Err(e) => panic!("test registry is invalid: {}", e),
    }
}

/// A single-turn chat request
pub fn chat_request() -> CohereChatRequest {
    CohereChatRequest::builder("How tall is Mount Everest?")
        .conversation_id(CONVERSATION_ID)
        .temperature(0.3)
        .build()
}

/// Opening event of a stream
pub fn stream_start_event() -> ChatResponseEvent {
    StreamStart {
        is_finished: false,
        generation_id: GenerationId::new(GENERATION_ID),
        conversation_id: Some(CONVERSATION_ID.to_string()),
    }
    .into()
}

/// Closing event of a stream carrying the full `text`
pub fn stream_end_event(text: &str) -> ChatResponseEvent {
    StreamEnd {
        response_id: "resp-123".to_string(),
        is_finished: Finished,
        generation_id: GenerationId::new(GENERATION_ID),
        conversation_id: Some(CONVERSATION_ID.to_string()),
        text: text.to_string(),
        citations: Vec::new(),
        documents: Vec::new(),
        search_results: Vec::new(),
        search_queries: Vec::new(),
        finish_reason: FinishReason::Complete,
    }
    .into()
}

/// A web search tool invocation
pub fn tool_input_event() -> ChatResponseEvent {
    StreamToolInput {
        is_finished: false,
        input_type: ToolInputType::Query,
        tool_name: "web_search".to_string(),
        input: "height of Mount Everest".to_string(),
        text: "Searching the web".to_string(),
    }
    .into()
}

fn everest_document() -> Document {
    Document::new("doc-1", "Mount Everest is 29,035 feet (8,849 m) tall.")
        .with_title("Mount Everest")
        .with_url("https://en.wikipedia.org/wiki/Mount_Everest")
        .with_tool_name("web_search")
}

fn everest_citation() -> Citation {
    Citation {
        text: "29,035 feet".to_string(),
        start: 17,
        end: 28,
        document_ids: vec!["doc-1".to_string()],
    }
}

/// A complete, well-ordered stream answering the Everest question
pub fn stream_events() -> Vec<ChatResponseEvent> {
    vec![
        stream_start_event(),
        StreamSearchQueriesGeneration {
            is_finished: false,
            search_queries: vec![SearchQuery {
                text: "height of Mount Everest".to_string(),
                generation_id: GENERATION_ID.to_string(),
            }],
        }
        .into(),
        tool_input_event(),
        ChatResponseEvent::text("Mount Everest"),
        ChatResponseEvent::text(" is 29,035"),
        ChatResponseEvent::text(" feet tall."),
        StreamCitationGeneration {
            is_finished: false,
            citations: vec![everest_citation()],
        }
        .into(),
        stream_end_event(EVEREST_ANSWER),
    ]
}

/// The non-streamed equivalent of [`stream_events`]
pub fn non_streamed_response() -> NonStreamedChatResponse {
    NonStreamedChatResponse {
        is_finished: true,
        response_id: Some("resp-123".to_string()),
        generation_id: Some(GenerationId::new(GENERATION_ID)),
        chat_history: Some(vec![
            ChatMessage::user("How tall is Mount Everest?"),
            ChatMessage::chatbot(EVEREST_ANSWER),
        ]),
        finish_reason: FinishReason::Complete,
        text: EVEREST_ANSWER.to_string(),
        citations: vec![everest_citation()],
        documents: vec![everest_document()],
        search_results: Vec::new(),
        search_queries: Vec::new(),
        conversation_id: Some(CONVERSATION_ID.to_string()),
        tool_calls: Vec::new(),
    }
}
