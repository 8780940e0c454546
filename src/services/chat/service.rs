//! Chat service implementation.

use super::events::NonStreamedChatResponse;
use super::stream::{ChatStream, EventStream};
use super::types::CohereChatRequest;
use super::validation::validate_chat_request;
use crate::errors::ToolkitResult;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Language-model backend the chat requests are proxied to.
///
/// Requests handed to a backend have already been validated.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Generate a complete response
    async fn chat(&self, request: CohereChatRequest) -> ToolkitResult<NonStreamedChatResponse>;

    /// Generate a response as a stream of events
    async fn chat_stream(&self, request: CohereChatRequest) -> ToolkitResult<EventStream>;
}

/// Chat service trait for testability
#[async_trait]
pub trait ChatService: Send + Sync {
    /// Send a chat message and get a response
    async fn chat(&self, request: CohereChatRequest) -> ToolkitResult<NonStreamedChatResponse>;

    /// Send a chat message and get a streaming response
    async fn chat_stream(&self, request: CohereChatRequest) -> ToolkitResult<ChatStream>;
}

/// Implementation of the Chat service
pub struct ChatServiceImpl {
    backend: Arc<dyn ChatBackend>,
}

impl ChatServiceImpl {
    /// Create a new Chat service over a backend
    pub fn new(backend: Arc<dyn ChatBackend>) -> Self {
        Self { backend }
    }

    fn prepare(&self, request: &CohereChatRequest) -> ToolkitResult<()> {
        if let Err(e) = validate_chat_request(request) {
            warn!(
                conversation_id = %request.conversation_id(),
                error = %e,
                "Rejected chat request"
            );
            return Err(e);
        }

        debug!(
            conversation_id = %request.conversation_id(),
            model = request.model.as_deref().unwrap_or("<default>"),
            store_conversation = request.base.should_store_conversation(),
            tools = request.tools.len(),
            documents = request.documents.len(),
            "Forwarding chat request"
        );
        Ok(())
    }
}

#[async_trait]
impl ChatService for ChatServiceImpl {
    async fn chat(&self, request: CohereChatRequest) -> ToolkitResult<NonStreamedChatResponse> {
        self.prepare(&request)?;
        let conversation_id = request.conversation_id().to_string();

        let response = self.backend.chat(request).await?;
        info!(
            conversation_id = %conversation_id,
            finish_reason = ?response.finish_reason,
            "Chat completed"
        );
        Ok(response)
    }

    async fn chat_stream(&self, request: CohereChatRequest) -> ToolkitResult<ChatStream> {
        self.prepare(&request)?;
        let conversation_id = request.conversation_id().to_string();

        let events = self.backend.chat_stream(request).await?;
        info!(conversation_id = %conversation_id, "Chat stream opened");
        Ok(ChatStream::new(events))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ToolkitError;
    use crate::fixtures::{non_streamed_response, stream_events};
    use crate::mocks::MockChatBackend;
    use futures::StreamExt;

    #[tokio::test]
    async fn test_chat_forwards_valid_request() {
        let backend = Arc::new(MockChatBackend::new().with_response(non_streamed_response()));
        let service = ChatServiceImpl::new(backend.clone());

        let request = CohereChatRequest::builder("Hello").conversation_id("conv-1").build();
        let response = service.chat(request).await.unwrap();

        assert_eq!(response.text, non_streamed_response().text);
        let requests = backend.get_requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].conversation_id(), "conv-1");
    }

    #[tokio::test]
    async fn test_invalid_request_never_reaches_backend() {
        let backend = Arc::new(MockChatBackend::new().with_response(non_streamed_response()));
        let service = ChatServiceImpl::new(backend.clone());

        let request = CohereChatRequest::builder("Hello").k(501).build();
        let result = service.chat(request).await;

        assert!(matches!(result, Err(ToolkitError::Validation { .. })));
        assert!(backend.get_requests().is_empty());
    }

    #[tokio::test]
    async fn test_chat_stream_is_ordered() {
        let backend = Arc::new(MockChatBackend::new().with_events(stream_events()));
        let service = ChatServiceImpl::new(backend);

        let mut stream = service
            .chat_stream(CohereChatRequest::new("Hello"))
            .await
            .unwrap();
        while let Some(event) = stream.next().await {
            event.unwrap();
        }

        assert!(stream.is_finished());
        assert_eq!(stream.accumulated_text(), "Mount Everest is 29,035 feet tall.");
    }
}
