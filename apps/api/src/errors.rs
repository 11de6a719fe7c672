use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::generation::gateway::GenerationError;
use crate::preferences::model::PreferenceError;
use crate::recipes::store::StoreError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Conflict: {0}")]
    Conflict(String),

    /// The model call or its answer was unusable. `needs_credentials` asks the
    /// client to offer credential reconfiguration.
    #[error("Generation error: {message}")]
    Generation {
        message: String,
        needs_credentials: bool,
    },

    #[error("Storage full")]
    StorageFull,

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<PreferenceError> for AppError {
    fn from(e: PreferenceError) -> Self {
        AppError::Validation(e.to_string())
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::StorageFull => AppError::StorageFull,
            other => AppError::Storage(other.to_string()),
        }
    }
}

impl From<GenerationError> for AppError {
    fn from(e: GenerationError) -> Self {
        match e {
            GenerationError::Configuration(message) => AppError::Generation {
                message,
                needs_credentials: true,
            },
            GenerationError::Failure(message) => AppError::Generation {
                message,
                needs_credentials: false,
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "Sign in first".to_string(),
            ),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
            AppError::Generation {
                message,
                needs_credentials,
            } => {
                tracing::error!("Generation error: {message}");
                if *needs_credentials {
                    (
                        StatusCode::BAD_GATEWAY,
                        "CREDENTIALS_REQUIRED",
                        "Could not generate recipes. Check the API key and try again.".to_string(),
                    )
                } else {
                    (
                        StatusCode::BAD_GATEWAY,
                        "GENERATION_FAILED",
                        "Could not generate recipes. Please try again.".to_string(),
                    )
                }
            }
            AppError::StorageFull => (
                StatusCode::INSUFFICIENT_STORAGE,
                "STORAGE_FULL",
                "Storage is full. Delete some saved recipes and try again.".to_string(),
            ),
            AppError::Storage(msg) => {
                tracing::error!("Storage error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "STORAGE_ERROR",
                    "Could not save your changes".to_string(),
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
