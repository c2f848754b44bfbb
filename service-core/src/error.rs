use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

/// Message returned for every failure whose details must stay server-side.
pub const INTERNAL_ERROR_MESSAGE: &str = "An internal server error occurred.";

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Method Not Allowed")]
    MethodNotAllowed,

    #[error("Bad request: {0}")]
    BadRequest(anyhow::Error),

    /// A server-held secret is missing. The message is safe to return to the caller.
    #[error("Not configured: {0}")]
    NotConfigured(String),

    /// A third-party API answered with a non-success status.
    #[error("{service} API error {status}: {body}")]
    Upstream {
        service: &'static str,
        status: StatusCode,
        body: String,
    },

    #[error("Internal server error: {0}")]
    InternalError(#[from] anyhow::Error),

    #[error("Configuration error: {0}")]
    ConfigError(anyhow::Error),
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::ConfigError(anyhow::Error::new(err))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::InternalError(anyhow::Error::new(err))
    }
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::MethodNotAllowed => (
                StatusCode::METHOD_NOT_ALLOWED,
                "Method Not Allowed".to_string(),
            ),
            AppError::BadRequest(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            AppError::NotConfigured(msg) => {
                tracing::error!(error = %msg, "Required secret is not configured");
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
            AppError::Upstream {
                service,
                status,
                body,
            } => {
                tracing::error!(service, status = %status, body = %body, "Upstream API error");
                (status, format!("{} API error: {}", service, body))
            }
            AppError::InternalError(err) => {
                tracing::error!(error = ?err, "Unhandled error while serving request");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    INTERNAL_ERROR_MESSAGE.to_string(),
                )
            }
            AppError::ConfigError(err) => {
                tracing::error!(error = %err, "Configuration error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    INTERNAL_ERROR_MESSAGE.to_string(),
                )
            }
        };

        (
            status,
            Json(ErrorResponse {
                error: error_message,
            }),
        )
            .into_response()
    }
}
