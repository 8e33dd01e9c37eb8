//! Error handling

use axum::{
    extract::rejection::{FormRejection, JsonRejection},
    response::{IntoResponse, Response},
    http::StatusCode,
    Json,
};
use serde_json::json;
use severity_core::{InferenceError, RecordError};

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug)]
pub enum AppError {
    // Validation errors
    ValidationError(String),

    // Model errors
    PredictionError(String),

    // Generic errors
    InternalError(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            AppError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg.as_str()),
            AppError::PredictionError(msg) => {
                tracing::error!("Prediction error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Prediction failed")
            }
            AppError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        };

        let body = Json(json!({
            "error": error_message,
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}

impl From<InferenceError> for AppError {
    fn from(err: InferenceError) -> Self {
        AppError::PredictionError(err.to_string())
    }
}

impl From<RecordError> for AppError {
    fn from(err: RecordError) -> Self {
        AppError::ValidationError(err.to_string())
    }
}

// Body extraction failures (unknown category, non-numeric age, ...)
impl From<FormRejection> for AppError {
    fn from(err: FormRejection) -> Self {
        AppError::ValidationError(err.body_text())
    }
}

impl From<JsonRejection> for AppError {
    fn from(err: JsonRejection) -> Self {
        AppError::ValidationError(err.body_text())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::ValidationError(err.to_string())
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(err: tokio::task::JoinError) -> Self {
        AppError::InternalError(err.to_string())
    }
}
