//! Service implementations for the toolkit backend.
//!
//! - `chat` - Chat request/response schemas, streaming, and the backend seam
//! - `deployments` - Deployment listing and environment configuration

pub mod chat;
pub mod deployments;
