//! Validation for chat requests.

use super::types::CohereChatRequest;
use crate::errors::{ToolkitError, ToolkitResult, ValidationDetail};

/// Upper bound for top-k sampling
pub const MAX_K: i64 = 500;
/// Upper bound for top-p sampling
pub const MAX_P: f64 = 0.99;
/// Maximum number of stop sequences
pub const MAX_STOP_SEQUENCES: usize = 5;

/// Validate a chat request before it reaches the backend.
///
/// Every violated bound is reported, not only the first one.
pub fn validate_chat_request(request: &CohereChatRequest) -> ToolkitResult<()> {
    let mut errors = Vec::new();

    if let Some(temp) = request.temperature {
        // `!(x >= 0.0)` also rejects NaN
        if !(temp >= 0.0) || temp.is_infinite() {
            errors.push(ValidationDetail::with_value(
                "temperature",
                "temperature must be a non-negative number",
                temp.to_string(),
            ));
        }
    }

    if let Some(k) = request.k {
        if !(0..=MAX_K).contains(&k) {
            errors.push(ValidationDetail::with_value(
                "k",
                format!("k must be between 0 and {}", MAX_K),
                k.to_string(),
            ));
        }
    }

    if let Some(p) = request.p {
        if !(0.0..=MAX_P).contains(&p) {
            errors.push(ValidationDetail::with_value(
                "p",
                format!("p must be between 0 and {}", MAX_P),
                p.to_string(),
            ));
        }
    }

    if let Some(max) = request.max_tokens {
        if max < 1 {
            errors.push(ValidationDetail::with_value(
                "max_tokens",
                "max_tokens must be greater than or equal to 1",
                max.to_string(),
            ));
        }
    }

    if let Some(ref seqs) = request.stop_sequences {
        if seqs.len() > MAX_STOP_SEQUENCES {
            errors.push(ValidationDetail::with_value(
                "stop_sequences",
                format!("Cannot have more than {} stop sequences", MAX_STOP_SEQUENCES),
                seqs.len().to_string(),
            ));
        }
    }

    check_penalty(&mut errors, "presence_penalty", request.presence_penalty);
    check_penalty(&mut errors, "frequency_penalty", request.frequency_penalty);

    if let Some(seed) = request.seed {
        if !seed.is_finite() {
            errors.push(ValidationDetail::with_value(
                "seed",
                "seed must be a finite number",
                seed.to_string(),
            ));
        }
    }

    for (i, tool) in request.tools.iter().enumerate() {
        if tool.name.trim().is_empty() {
            errors.push(ValidationDetail::new(
                format!("tools[{}].name", i),
                "Tool name cannot be empty",
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ToolkitError::validation("Chat request", errors))
    }
}

fn check_penalty(errors: &mut Vec<ValidationDetail>, field: &str, value: Option<f64>) {
    if let Some(penalty) = value {
        if !(0.0..=1.0).contains(&penalty) {
            errors.push(ValidationDetail::with_value(
                field,
                format!("{} must be between 0 and 1", field),
                penalty.to_string(),
            ));
        }
    }
}
