use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::llm::LlmError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unsupported document format: {0}")]
    UnsupportedFormat(String),

    #[error("LLM error: {0}")]
    Llm(String),

    #[error("LLM quota exhausted: {0}")]
    LlmQuota(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<LlmError> for AppError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::MissingCredentials => AppError::Validation(
                "No AI credential configured. Set OPENAI_API_KEY, ANTHROPIC_API_KEY or GEMINI_API_KEY."
                    .to_string(),
            ),
            LlmError::Quota(message) => AppError::LlmQuota(message),
            other => AppError::Llm(other.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::UnsupportedFormat(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "UNSUPPORTED_FORMAT",
                msg.clone(),
            ),
            AppError::Llm(msg) => {
                tracing::error!("LLM error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "LLM_ERROR",
                    "Could not extract information from the document. Check the AI configuration and try again."
                        .to_string(),
                )
            }
            AppError::LlmQuota(msg) => {
                tracing::warn!("LLM quota exhausted: {msg}");
                // The remediation text is user-facing by design.
                (StatusCode::TOO_MANY_REQUESTS, "LLM_QUOTA", msg.clone())
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "A database error occurred. Please try again.".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quota_error_keeps_remediation_text() {
        let err: AppError = LlmError::Quota("wait for the limit window".to_string()).into();
        assert!(matches!(err, AppError::LlmQuota(ref m) if m.contains("limit window")));
    }

    #[test]
    fn test_missing_credentials_is_a_validation_error() {
        let err: AppError = LlmError::MissingCredentials.into();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_transport_error_maps_to_llm_error() {
        let err: AppError = LlmError::EmptyContent.into();
        assert!(matches!(err, AppError::Llm(_)));
    }
}
