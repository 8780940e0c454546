//! Error types for the toolkit backend.

use crate::errors::categories::{ErrorCategory, ValidationDetail};
use thiserror::Error;

/// Result type alias for toolkit operations
pub type ToolkitResult<T> = Result<T, ToolkitError>;

/// Remediation message returned when no deployment has its environment configured.
pub const NO_AVAILABLE_DEPLOYMENTS_MESSAGE: &str = "No available deployments found. Please ensure that the required environment variables are set up correctly. Refer to the README.md for detailed instructions.";

/// Main error type for the toolkit backend.
///
/// Every variant maps onto exactly one HTTP status in the server layer; none of
/// them are retried internally.
#[derive(Error, Debug, Clone)]
pub enum ToolkitError {
    /// Configuration error (invalid settings, missing required fields)
    #[error("Configuration error: {message}")]
    Configuration {
        /// Error message describing the configuration issue
        message: String,
    },

    /// Validation error (request fields out of range or malformed)
    #[error("Validation error: {message}")]
    Validation {
        /// Error message describing the validation issue
        message: String,
        /// List of specific validation failures
        details: Vec<ValidationDetail>,
    },

    /// Resource not found error
    #[error("Not found: {resource_type} {message}")]
    NotFound {
        /// Error message
        message: String,
        /// Type of resource that was not found
        resource_type: String,
    },

    /// No deployment has all of its required environment variables set
    #[error("{}", NO_AVAILABLE_DEPLOYMENTS_MESSAGE)]
    NoAvailableDeployments,

    /// Argument does not apply to the targeted resource
    #[error("{message}")]
    InvalidArgument {
        /// Error message naming the rejected argument(s)
        message: String,
    },

    /// Streaming error (out-of-order events, malformed frames)
    #[error("Stream error: {message}")]
    Stream {
        /// Error message describing the stream issue
        message: String,
    },

    /// Error reported by the language-model backend
    #[error("Backend error: {message}")]
    Backend {
        /// Error message from the backend
        message: String,
    },

    /// I/O error while reading or writing the configuration store
    #[error("IO error: {message}")]
    Io {
        /// Error message describing the I/O failure
        message: String,
    },

    /// Internal error (unexpected conditions, library bugs)
    #[error("Internal error: {message}")]
    Internal {
        /// Error message describing the internal issue
        message: String,
    },
}

impl ToolkitError {
    /// Build a validation error from a list of field failures.
    pub fn validation(context: &str, details: Vec<ValidationDetail>) -> Self {
        ToolkitError::Validation {
            message: format!("{} validation failed: {} error(s)", context, details.len()),
            details,
        }
    }

    /// Build a not-found error for a named resource.
    pub fn not_found(resource_type: impl Into<String>, message: impl Into<String>) -> Self {
        ToolkitError::NotFound {
            message: message.into(),
            resource_type: resource_type.into(),
        }
    }

    /// Get the category of this error
    pub fn category(&self) -> ErrorCategory {
        match self {
            ToolkitError::Configuration { .. } => ErrorCategory::Configuration,
            ToolkitError::Validation { .. } => ErrorCategory::Validation,
            ToolkitError::NotFound { .. } | ToolkitError::NoAvailableDeployments => {
                ErrorCategory::NotFound
            }
            ToolkitError::InvalidArgument { .. } => ErrorCategory::InvalidArgument,
            ToolkitError::Stream { .. } => ErrorCategory::Streaming,
            ToolkitError::Backend { .. } => ErrorCategory::Backend,
            ToolkitError::Io { .. } | ToolkitError::Internal { .. } => ErrorCategory::Internal,
        }
    }

    /// Get the HTTP status code this error is surfaced with
    pub fn status_code(&self) -> u16 {
        match self {
            ToolkitError::Validation { .. } => 422,
            ToolkitError::NotFound { .. } | ToolkitError::NoAvailableDeployments => 404,
            ToolkitError::InvalidArgument { .. } => 400,
            ToolkitError::Backend { .. } => 502,
            ToolkitError::Configuration { .. }
            | ToolkitError::Stream { .. }
            | ToolkitError::Io { .. }
            | ToolkitError::Internal { .. } => 500,
        }
    }
}

impl From<serde_json::Error> for ToolkitError {
    fn from(err: serde_json::Error) -> Self {
        ToolkitError::Internal {
            message: format!("JSON serialization/deserialization error: {}", err),
        }
    }
}

impl From<std::io::Error> for ToolkitError {
    fn from(err: std::io::Error) -> Self {
        ToolkitError::Io {
            message: err.to_string(),
        }
    }
}
