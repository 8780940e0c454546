//! Error categories and validation details for the toolkit backend.

use serde::{Deserialize, Serialize};

/// Detailed information about a validation failure.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ValidationDetail {
    /// The field that failed validation
    pub field: String,
    /// The error message for this field
    pub message: String,
    /// The invalid value (if available and safe to include)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl ValidationDetail {
    /// Create a new validation detail
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            value: None,
        }
    }

    /// Create a new validation detail with a value
    pub fn with_value(
        field: impl Into<String>,
        message: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            value: Some(value.into()),
        }
    }
}

/// Error category for classification and handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Service configuration errors
    Configuration,
    /// Request validation errors
    Validation,
    /// Resource not found
    NotFound,
    /// Argument rejected for the targeted resource
    InvalidArgument,
    /// Streaming errors
    Streaming,
    /// Failures reported by the language-model backend
    Backend,
    /// Internal errors (I/O, serialization, library bugs)
    Internal,
}

impl ErrorCategory {
    /// Check if errors in this category were caused by the caller
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ErrorCategory::Validation | ErrorCategory::NotFound | ErrorCategory::InvalidArgument
        )
    }

    /// Get a human-readable description of this category
    pub fn description(&self) -> &'static str {
        match self {
            ErrorCategory::Configuration => "Configuration error",
            ErrorCategory::Validation => "Validation error",
            ErrorCategory::NotFound => "Resource not found",
            ErrorCategory::InvalidArgument => "Invalid argument",
            ErrorCategory::Streaming => "Streaming error",
            ErrorCategory::Backend => "Backend error",
            ErrorCategory::Internal => "Internal error",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_detail() {
        let detail = ValidationDetail::new("message", "Message is required");
        assert_eq!(detail.field, "message");
        assert_eq!(detail.message, "Message is required");
        assert!(detail.value.is_none());

        let detail_with_value =
            ValidationDetail::with_value("k", "k must be between 0 and 500", "501");
        assert_eq!(detail_with_value.field, "k");
        assert_eq!(detail_with_value.value, Some("501".to_string()));
    }

    #[test]
    fn test_validation_detail_omits_missing_value() {
        let detail = ValidationDetail::new("tools[0].name", "Tool name cannot be empty");
        let json = serde_json::to_value(&detail).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"field": "tools[0].name", "message": "Tool name cannot be empty"})
        );
    }

    #[test]
    fn test_error_category_client_errors() {
        assert!(ErrorCategory::Validation.is_client_error());
        assert!(ErrorCategory::NotFound.is_client_error());
        assert!(ErrorCategory::InvalidArgument.is_client_error());
        assert!(!ErrorCategory::Backend.is_client_error());
        assert!(!ErrorCategory::Internal.is_client_error());
    }
}
