//! The single rendering chokepoint for tool results
//!
//! Every handler outcome, success or failure, becomes one text block here.
//! No handler formats its own error text, and upstream failure bodies never
//! reach the caller.

use serde_json::Value;

use crate::errors::AppError;

const FALLBACK_FAILURE: &str = "An unexpected error occurred.";

/// Action label plus a pretty-printed payload. Object keys render in sorted
/// order (serde_json maps are ordered), so identical payloads produce
/// identical text.
pub fn success(label: &str, payload: &Value) -> String {
    let rendered =
        serde_json::to_string_pretty(payload).unwrap_or_else(|_| payload.to_string());
    format!("{label}: {rendered}")
}

pub fn failure(error: &AppError) -> String {
    match error {
        AppError::Api { status, reason } => format!("API error {status}: {reason}"),
        AppError::Validation { message, .. }
        | AppError::Transport { message }
        | AppError::Unexpected { message } => message_or_fallback(message),
        AppError::Unauthorized { message, .. } => message_or_fallback(message),
    }
}

fn message_or_fallback(message: &str) -> String {
    if message.trim().is_empty() {
        FALLBACK_FAILURE.to_string()
    } else {
        format!("Error: {message}")
    }
}
