//! # Cohere Toolkit Backend
//!
//! Chat request/response schemas and the deployment configuration service of
//! the Cohere toolkit, served over HTTP.
//!
//! ## Features
//!
//! - Validated chat request schemas with conversation ids generated up front
//! - Tagged union of streamed chat events with ordering enforcement
//! - Server-Sent Events framing and parsing
//! - Deployment listing and environment-variable updates behind a
//!   [`ConfigStore`] with `.env`, in-memory and mock backings
//! - Secure handling of deployment variables with `SecretString`
//! - Structured logging with `tracing`
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use integrations_cohere_toolkit::{
//!     router, AppState, DeploymentRegistry, DeploymentServiceImpl, InMemoryConfigStore,
//! };
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = Arc::new(InMemoryConfigStore::new().with_var("COHERE_API_KEY", "key"));
//!     let deployments = DeploymentServiceImpl::new(Arc::new(DeploymentRegistry::builtin()), store);
//!
//!     let app = router(AppState::new(Arc::new(deployments)));
//!     let listener = tokio::net::TcpListener::bind("127.0.0.1:8000").await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! - `config` - Server configuration and configuration stores
//! - `errors` - Error types and taxonomy
//! - `observability` - Logging setup
//! - `server` - HTTP routes and error responses
//! - `services` - Chat and deployment services
//! - `transport` - SSE framing
//! - `types` - Common types (GenerationId, FinishReason)

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod errors;
pub mod observability;
pub mod server;
pub mod services;
pub mod transport;
pub mod types;

// Test doubles and sample data, shared with the integration tests
pub mod fixtures;
pub mod mocks;

pub use config::{ConfigStore, EnvFileStore, InMemoryConfigStore, ServerConfig, ServerConfigBuilder};
pub use errors::{ErrorCategory, ToolkitError, ToolkitResult, ValidationDetail};
pub use observability::{LogFormat, LogLevel, LoggingConfig};
pub use server::{router, serve, ApiError, AppState, ServerError};
pub use transport::{SseEvent, SseParser};
pub use types::{FinishReason, GenerationId};

pub use services::chat::{
    BaseChatRequest, ChatBackend, ChatMessage, ChatResponseEvent, ChatRole, ChatService,
    ChatServiceImpl, ChatStream, CohereChatRequest, Document, NonStreamedChatResponse,
    PromptTruncation, StreamEnd, StreamEvent, Tool, ToolCall,
};
pub use services::deployments::{
    Deployment, DeploymentDefinition, DeploymentRegistry, DeploymentService,
    DeploymentServiceImpl, ModelDeploymentName, UpdateDeploymentEnv,
};

/// The default address the server listens on
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";

/// File name of the environment file deployment variables are persisted to
pub const ENV_FILE_NAME: &str = ".env";
