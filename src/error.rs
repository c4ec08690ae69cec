use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::api::ApiError;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Upstream API errors
    #[error("{0}")]
    Api(#[from] ApiError),

    // Details view errors
    #[error("Another action is still in progress")]
    ActionInProgress,

    #[error("Invalid resolution")]
    InvalidResolution,

    // Template errors
    #[error("Template error: {0}")]
    Template(#[from] askama::Error),

    // Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            AppError::Api(e) => match e.status() {
                Some(
                    status @ (StatusCode::BAD_REQUEST
                    | StatusCode::UNAUTHORIZED
                    | StatusCode::FORBIDDEN
                    | StatusCode::NOT_FOUND
                    | StatusCode::CONFLICT
                    | StatusCode::UNPROCESSABLE_ENTITY),
                ) => status,
                _ => StatusCode::BAD_GATEWAY,
            },
            AppError::ActionInProgress => StatusCode::CONFLICT,
            AppError::InvalidResolution | AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AppError::Template(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let message = match &self {
            AppError::Template(_) => {
                tracing::error!("Internal error: {}", self);
                "Internal server error".to_string()
            }
            AppError::Api(e) if status == StatusCode::BAD_GATEWAY => {
                tracing::error!("Upstream API error: {}", e);
                format!("Museo API unavailable: {}", e)
            }
            _ => self.to_string(),
        };

        (status, message).into_response()
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;
