use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use help_common::api::{ChatResponse, ErrorResponse};

/// Reply sent when answering a chat message fails unexpectedly.
pub const CHAT_FAILURE_RESPONSE: &str = "Sorry, something went wrong while looking that up. \
Please try again in a moment, or contact our support team and we'll help you directly.";

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(String),

    #[error("failed to read dataset {path}: {source}")]
    DatasetRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid dataset: {0}")]
    DatasetParse(#[from] serde_json::Error),

    #[error("{0}")]
    Validation(String),

    #[error("article not found: {0}")]
    NotFound(String),

    #[error("unknown topic: '{id}'. Available topics: {available}")]
    UnknownTopic { id: String, available: String },
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) | AppError::UnknownTopic { .. } => StatusCode::NOT_FOUND,
            AppError::Config(_) | AppError::DatasetRead { .. } | AppError::DatasetParse(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        let body = Json(ErrorResponse {
            error: self.to_string(),
        });
        (status, body).into_response()
    }
}

/// Failures of `POST /api/ai-chat`. Internal failures keep the chat reply shape
/// so the widget can still render a message and offer the contact form.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("Message is required")]
    MessageRequired,

    #[error("Too many requests, please try again in {retry_after_ms}ms")]
    RateLimited { retry_after_ms: u64 },

    #[error("internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ChatError {
    fn into_response(self) -> Response {
        match self {
            ChatError::MessageRequired => (
                StatusCode::BAD_REQUEST,
                Json(ErrorResponse {
                    error: self.to_string(),
                }),
            )
                .into_response(),
            ChatError::RateLimited { .. } => (
                StatusCode::TOO_MANY_REQUESTS,
                Json(ErrorResponse {
                    error: self.to_string(),
                }),
            )
                .into_response(),
            ChatError::Internal(detail) => {
                tracing::error!(error = %detail, "chat request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ChatResponse {
                        response: CHAT_FAILURE_RESPONSE.to_string(),
                        needs_contact: true,
                    }),
                )
                    .into_response()
            }
        }
    }
}
