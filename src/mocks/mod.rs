//! Mock implementations for testing.
//!
//! Test doubles for the chat backend and the configuration store, for use in
//! unit and integration tests.

use crate::config::ConfigStore;
use crate::errors::{ToolkitError, ToolkitResult};
use crate::services::chat::{
    ChatBackend, ChatResponseEvent, CohereChatRequest, EventStream, NonStreamedChatResponse,
};
use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use secrecy::{ExposeSecret, SecretString};
use std::collections::BTreeMap;

/// Scripted chat backend that records every request it receives
#[derive(Default)]
pub struct MockChatBackend {
    response: Mutex<Option<NonStreamedChatResponse>>,
    events: Mutex<Vec<ToolkitResult<ChatResponseEvent>>>,
    error: Mutex<Option<ToolkitError>>,
    requests: Mutex<Vec<CohereChatRequest>>,
}

impl MockChatBackend {
    /// Create a backend with nothing scripted
    pub fn new() -> Self {
        Self::default()
    }

    /// Response returned by `chat`
    pub fn with_response(self, response: NonStreamedChatResponse) -> Self {
        *self.response.lock() = Some(response);
        self
    }

    /// Events yielded by `chat_stream`
    pub fn with_events(self, events: Vec<ChatResponseEvent>) -> Self {
        self.events.lock().extend(events.into_iter().map(Ok));
        self
    }

    /// Append an error after the scripted events
    pub fn with_stream_error(self, error: ToolkitError) -> Self {
        self.events.lock().push(Err(error));
        self
    }

    /// Fail both calls up front
    pub fn with_error(self, error: ToolkitError) -> Self {
        *self.error.lock() = Some(error);
        self
    }

    /// Get recorded requests
    pub fn get_requests(&self) -> Vec<CohereChatRequest> {
        self.requests.lock().clone()
    }

    /// Get the last request
    pub fn last_request(&self) -> Option<CohereChatRequest> {
        self.requests.lock().last().cloned()
    }

    fn record(&self, request: CohereChatRequest) -> ToolkitResult<()> {
        self.requests.lock().push(request);
        match self.error.lock().clone() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl ChatBackend for MockChatBackend {
    async fn chat(&self, request: CohereChatRequest) -> ToolkitResult<NonStreamedChatResponse> {
        self.record(request)?;
        self.response.lock().clone().ok_or_else(|| ToolkitError::Backend {
            message: "No mock response configured".to_string(),
        })
    }

    async fn chat_stream(&self, request: CohereChatRequest) -> ToolkitResult<EventStream> {
        self.record(request)?;
        let events = self.events.lock().clone();
        Ok(Box::pin(futures::stream::iter(events)))
    }
}

/// In-memory configuration store that records writes in order
#[derive(Default)]
pub struct MockConfigStore {
    values: RwLock<BTreeMap<String, String>>,
    writes: Mutex<Vec<(String, String)>>,
    fail_writes: bool,
}

impl MockConfigStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Preset a variable without recording a write
    pub fn with_var(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.write().insert(key.into(), value.into());
        self
    }

    /// Make every `set` fail with an I/O error
    pub fn failing_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    /// Writes received so far, as `(key, value)`
    pub fn writes(&self) -> Vec<(String, String)> {
        self.writes.lock().clone()
    }
}

#[async_trait]
impl ConfigStore for MockConfigStore {
    async fn get(&self, key: &str) -> ToolkitResult<Option<String>> {
        Ok(self.values.read().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &SecretString) -> ToolkitResult<()> {
        if self.fail_writes {
            return Err(ToolkitError::Io {
                message: format!("mock store refused to write {}", key),
            });
        }
        let value = value.expose_secret().clone();
        self.writes.lock().push((key.to_string(), value.clone()));
        self.values.write().insert(key.to_string(), value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{non_streamed_response, stream_events};
    use futures::StreamExt;

    #[tokio::test]
    async fn test_mock_chat_backend() {
        let backend = MockChatBackend::new()
            .with_response(non_streamed_response())
            .with_events(stream_events());

        let response = backend.chat(CohereChatRequest::new("Hi")).await.unwrap();
        assert_eq!(response, non_streamed_response());

        let events: Vec<_> = backend
            .chat_stream(CohereChatRequest::new("Hi again"))
            .await
            .unwrap()
            .collect()
            .await;
        assert_eq!(events.len(), stream_events().len());

        let requests = backend.get_requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(backend.last_request().unwrap().message(), "Hi again");
    }

    #[tokio::test]
    async fn test_mock_chat_backend_error() {
        let backend = MockChatBackend::new().with_error(ToolkitError::Backend {
            message: "down".to_string(),
        });
        assert!(backend.chat(CohereChatRequest::new("Hi")).await.is_err());
        assert_eq!(backend.get_requests().len(), 1);
    }

    #[tokio::test]
    async fn test_mock_config_store() {
        let store = MockConfigStore::new().with_var("COHERE_VAR_1", "preset");
        assert!(store.is_set("COHERE_VAR_1").await.unwrap());
        assert!(store.writes().is_empty());

        store
            .set("COHERE_VAR_2", &SecretString::new("v".to_string()))
            .await
            .unwrap();
        assert_eq!(store.writes(), vec![("COHERE_VAR_2".to_string(), "v".to_string())]);
        assert!(store.is_set("COHERE_VAR_2").await.unwrap());

        let failing = MockConfigStore::new().failing_writes();
        let result = failing.set("X", &SecretString::new("v".to_string())).await;
        assert!(matches!(result, Err(ToolkitError::Io { .. })));
    }
}
