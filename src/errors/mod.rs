//! Error types for the toolkit backend.
//!
//! This module provides the error taxonomy shared by the chat schemas, the
//! deployment service and the HTTP layer.

mod error;
mod categories;

pub use error::{ToolkitError, ToolkitResult, NO_AVAILABLE_DEPLOYMENTS_MESSAGE};
pub use categories::{ValidationDetail, ErrorCategory};
