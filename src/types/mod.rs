//! Common types used across the toolkit backend.

use serde::{Deserialize, Serialize};

/// Unique generation ID assigned by the model backend
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct GenerationId(pub String);

impl GenerationId {
    /// Create a new generation ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl std::fmt::Display for GenerationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for GenerationId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for GenerationId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl AsRef<str> for GenerationId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Reason a generation stopped.
///
/// Reasons this crate does not know are kept verbatim in [`FinishReason::Other`]
/// so they are relayed unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FinishReason {
    /// Generation completed naturally
    Complete,
    /// Reached maximum tokens
    MaxTokens,
    /// Stopped by stop sequence
    StopSequence,
    /// Stopped due to error
    Error,
    /// Stopped because the output was flagged as toxic
    ErrorToxic,
    /// Stopped because the context limit was hit
    ErrorLimit,
    /// User requested stop
    UserCancel,
    /// Any other reason reported by the backend
    Other(String),
}

impl FinishReason {
    /// Wire value of the reason
    pub fn as_str(&self) -> &str {
        match self {
            FinishReason::Complete => "COMPLETE",
            FinishReason::MaxTokens => "MAX_TOKENS",
            FinishReason::StopSequence => "STOP_SEQUENCE",
            FinishReason::Error => "ERROR",
            FinishReason::ErrorToxic => "ERROR_TOXIC",
            FinishReason::ErrorLimit => "ERROR_LIMIT",
            FinishReason::UserCancel => "USER_CANCEL",
            FinishReason::Other(reason) => reason,
        }
    }

    /// Whether the generation ran to completion without truncation or error
    pub fn is_complete(&self) -> bool {
        matches!(self, FinishReason::Complete | FinishReason::StopSequence)
    }
}

impl From<&str> for FinishReason {
    fn from(s: &str) -> Self {
        match s {
            "COMPLETE" => FinishReason::Complete,
            "MAX_TOKENS" => FinishReason::MaxTokens,
            "STOP_SEQUENCE" => FinishReason::StopSequence,
            "ERROR" => FinishReason::Error,
            "ERROR_TOXIC" => FinishReason::ErrorToxic,
            "ERROR_LIMIT" => FinishReason::ErrorLimit,
            "USER_CANCEL" => FinishReason::UserCancel,
            other => FinishReason::Other(other.to_string()),
        }
    }
}

impl std::fmt::Display for FinishReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for FinishReason {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for FinishReason {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(FinishReason::from(raw.as_str()))
    }
}
