//! HTTP server exposing the deployments and chat endpoints.

mod error;
mod handlers;

pub use error::ApiError;
pub use handlers::{decode_deployment_name, ListDeploymentsQuery};

use crate::config::ServerConfig;
use crate::services::chat::ChatService;
use crate::services::deployments::DeploymentService;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

/// Shared state for the HTTP handlers.
pub struct AppState {
    /// Deployment listing and configuration
    pub deployments: Arc<dyn DeploymentService>,
    /// Chat proxy; chat routes are only mounted when present
    pub chat: Option<Arc<dyn ChatService>>,
}

impl AppState {
    /// State without a chat backend
    pub fn new(deployments: Arc<dyn DeploymentService>) -> Self {
        Self {
            deployments,
            chat: None,
        }
    }

    /// Attach a chat service
    pub fn with_chat(mut self, chat: Arc<dyn ChatService>) -> Self {
        self.chat = Some(chat);
        self
    }
}

/// Create the router for the toolkit endpoints.
pub fn router(state: AppState) -> Router {
    let has_chat = state.chat.is_some();
    let mut router = Router::new()
        .route("/health", get(handlers::health))
        .route("/deployments", get(handlers::list_deployments))
        .route("/deployments/{name}/set_env_vars", post(handlers::set_env_vars));

    if has_chat {
        router = router
            .route("/chat", post(handlers::chat))
            .route("/chat-stream", post(handlers::chat_stream));
    }

    router.with_state(Arc::new(state))
}

/// Bind and serve until the process receives Ctrl-C.
pub async fn serve(config: &ServerConfig, state: AppState) -> Result<(), ServerError> {
    let chat_enabled = state.chat.is_some();
    let app = router(state);

    let listener = TcpListener::bind(config.bind_addr)
        .await
        .map_err(|e| ServerError::Bind(e.to_string()))?;

    info!(
        addr = %config.bind_addr,
        env_file = %config.env_file.display(),
        chat_enabled = chat_enabled,
        "Toolkit server listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ServerError::Serve(e.to_string()))?;

    info!("Toolkit server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}

/// Server error types.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// The listener could not be bound
    #[error("Failed to bind to address: {0}")]
    Bind(String),
    /// The server loop failed
    #[error("Server error: {0}")]
    Serve(String),
}
