//! HTTP error responses.

use crate::errors::{ToolkitError, ValidationDetail};
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};
use tracing::{debug, error};

/// Error returned by handlers, rendered as `{"detail": ...}`
#[derive(Debug)]
pub struct ApiError(pub ToolkitError);

impl ApiError {
    /// HTTP status for the wrapped error
    pub fn status(&self) -> StatusCode {
        StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// JSON value placed under `detail`
    pub fn detail(&self) -> Value {
        match &self.0 {
            ToolkitError::NoAvailableDeployments => json!([self.0.to_string()]),
            ToolkitError::Validation { details, .. } => json!(details),
            ToolkitError::NotFound { message, .. } => json!(message),
            other => json!(other.to_string()),
        }
    }
}

impl From<ToolkitError> for ApiError {
    fn from(err: ToolkitError) -> Self {
        ApiError(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError(ToolkitError::validation(
            "Request body",
            vec![ValidationDetail::new("body", rejection.body_text())],
        ))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError(ToolkitError::validation(
            "Query string",
            vec![ValidationDetail::new("query", rejection.body_text())],
        ))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let category = self.0.category();
        if category.is_client_error() {
            debug!(status = status.as_u16(), category = category.description(), "Request rejected");
        } else {
            error!(
                status = status.as_u16(),
                category = category.description(),
                error = %self.0,
                "Request failed"
            );
        }
        (status, Json(json!({ "detail": self.detail() }))).into_response()
    }
}
