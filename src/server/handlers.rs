//! Route handlers.

use super::error::ApiError;
use super::AppState;
use crate::errors::{ToolkitError, ValidationDetail};
use crate::services::chat::{ChatService, CohereChatRequest, NonStreamedChatResponse};
use crate::services::deployments::{Deployment, UpdateDeploymentEnv};
use crate::transport::SseEvent;
use axum::body::Body;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use futures::StreamExt;
use serde::Deserialize;
use serde_json::{json, Value};
use std::convert::Infallible;
use std::sync::Arc;
use tracing::{debug, warn};

/// Query string of `GET /deployments`
#[derive(Debug, Default, Deserialize)]
pub struct ListDeploymentsQuery {
    /// `0`, `1`, `true` or `false`
    pub all: Option<String>,
}

impl ListDeploymentsQuery {
    /// Whether unavailable deployments are requested too
    pub fn show_all(&self) -> Result<bool, ToolkitError> {
        match self.all.as_deref().map(str::trim) {
            None | Some("") => Ok(false),
            Some(raw) => parse_flag(raw).ok_or_else(|| {
                ToolkitError::validation(
                    "Query string",
                    vec![ValidationDetail::with_value(
                        "all",
                        "value could not be parsed to a boolean",
                        raw,
                    )],
                )
            }),
        }
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.to_ascii_lowercase().as_str() {
        "1" | "true" => Some(true),
        "0" | "false" => Some(false),
        _ => None,
    }
}

/// Deployment names arrive form-encoded, so `+` stands for a space.
///
/// Runs on the segment after axum has percent-decoded it, so an escaped
/// `%2B` also ends up as a space. Deployment names never contain `+`.
pub fn decode_deployment_name(raw: &str) -> String {
    raw.replace('+', " ")
}

/// GET /health
pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// GET /deployments
pub async fn list_deployments(
    State(state): State<Arc<AppState>>,
    query: Result<Query<ListDeploymentsQuery>, QueryRejection>,
) -> Result<Json<Vec<Deployment>>, ApiError> {
    let Query(query) = query?;
    let show_all = query.show_all()?;
    let deployments = state.deployments.list_deployments(show_all).await?;
    Ok(Json(deployments))
}

/// POST /deployments/{name}/set_env_vars
pub async fn set_env_vars(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
    body: Result<Json<UpdateDeploymentEnv>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(update) = body?;
    let name = decode_deployment_name(&name);
    debug!(deployment = %name, count = update.env_vars.len(), "Setting deployment variables");

    state.deployments.set_env_vars(&name, update.env_vars).await?;
    Ok(Json(json!({})))
}

fn chat_service(state: &AppState) -> Result<Arc<dyn ChatService>, ApiError> {
    state.chat.clone().ok_or_else(|| {
        ApiError(ToolkitError::Configuration {
            message: "No chat backend configured".to_string(),
        })
    })
}

/// POST /chat
pub async fn chat(
    State(state): State<Arc<AppState>>,
    body: Result<Json<CohereChatRequest>, JsonRejection>,
) -> Result<Json<NonStreamedChatResponse>, ApiError> {
    let Json(request) = body?;
    let response = chat_service(&state)?.chat(request).await?;
    Ok(Json(response))
}

/// POST /chat-stream
///
/// Events are relayed as SSE frames. A failure after the stream has started
/// is sent as a final `error` frame since the status line is already out.
pub async fn chat_stream(
    State(state): State<Arc<AppState>>,
    body: Result<Json<CohereChatRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(request) = body?;
    let conversation_id = request.conversation_id().to_string();
    let mut events = chat_service(&state)?.chat_stream(request).await?;

    let frames = async_stream::stream! {
        while let Some(item) = events.next().await {
            match item.and_then(|event| SseEvent::from_chat_event(&event)) {
                Ok(frame) => yield Ok::<_, Infallible>(frame.to_bytes()),
                Err(e) => {
                    warn!(conversation_id = %conversation_id, error = %e, "Chat stream failed");
                    yield Ok(SseEvent::error(&e).to_bytes());
                    break;
                }
            }
        }
    };

    Ok((
        [
            (header::CONTENT_TYPE, "text/event-stream"),
            (header::CACHE_CONTROL, "no-cache"),
        ],
        Body::from_stream(frames),
    )
        .into_response())
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(None, false; "absent")]
    #[test_case(Some("0"), false; "zero")]
    #[test_case(Some("1"), true; "one")]
    #[test_case(Some("true"), true; "true")]
    #[test_case(Some("False"), false; "false")]
    fn test_show_all_flag(all: Option<&str>, expected: bool) {
        let query = ListDeploymentsQuery {
            all: all.map(str::to_string),
        };
        assert_eq!(query.show_all().unwrap(), expected);
    }

    #[test]
    fn test_show_all_rejects_other_values() {
        let query = ListDeploymentsQuery {
            all: Some("yes please".to_string()),
        };
        assert!(matches!(query.show_all(), Err(ToolkitError::Validation { .. })));
    }

    #[test]
    fn test_decode_deployment_name() {
        assert_eq!(decode_deployment_name("Cohere+Platform"), "Cohere Platform");
        assert_eq!(decode_deployment_name("SageMaker"), "SageMaker");
        // `%2B` reaches here already decoded to `+`
        assert_eq!(decode_deployment_name("Cohere+Platform"), decode_deployment_name("Cohere Platform"));
    }
}
