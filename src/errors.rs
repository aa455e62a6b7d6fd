use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

/// Failure taxonomy for one tool invocation.
///
/// `Api` carries only the upstream status and reason phrase; response bodies
/// of failed upstream calls are never parsed or forwarded. `Transport` covers
/// network-level faults (DNS, connection refused, timeout) where no status
/// exists. Everything else that is not a caller mistake lands in `Unexpected`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("validation failed: {message}")]
    Validation {
        code: &'static str,
        message: String,
    },
    #[error("API error {status}: {reason}")]
    Api { status: u16, reason: String },
    #[error("transport failure: {message}")]
    Transport { message: String },
    #[error("unauthorized: {message}")]
    Unauthorized {
        code: &'static str,
        message: &'static str,
    },
    #[error("unexpected failure: {message}")]
    Unexpected { message: String },
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    pub details: serde_json::Value,
}

impl AppError {
    pub fn validation(code: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            code,
            message: message.into(),
        }
    }

    pub fn api(status: u16, reason: impl Into<String>) -> Self {
        Self::Api {
            status,
            reason: reason.into(),
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    pub fn unauthorized(code: &'static str, message: &'static str) -> Self {
        Self::Unauthorized { code, message }
    }

    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::Unexpected {
            message: message.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            Self::Validation { code, message } => (StatusCode::BAD_REQUEST, code, message),
            Self::Unauthorized { code, message } => {
                (StatusCode::UNAUTHORIZED, code, message.to_string())
            }
            Self::Api { status, reason } => {
                tracing::error!(status, reason = %reason, "upstream api failure reached http layer");
                (
                    StatusCode::BAD_GATEWAY,
                    "upstream_error",
                    "upstream api failure".to_string(),
                )
            }
            Self::Transport { message } => {
                tracing::error!(error = %message, "upstream transport failure reached http layer");
                (
                    StatusCode::BAD_GATEWAY,
                    "upstream_unreachable",
                    "upstream api unreachable".to_string(),
                )
            }
            Self::Unexpected { message } => {
                tracing::error!(error = %message, "request failed with unexpected error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "internal server error".to_string(),
                )
            }
        };

        (
            status,
            Json(ErrorResponse {
                code: code.to_string(),
                message,
                details: json!({}),
            }),
        )
            .into_response()
    }
}
