/// Error types for social-api
///
/// Store, graph and feed code return `StoreError`/`AppError` values and never
/// write responses themselves. The conversion to an HTTP response happens
/// once, in `ResponseError::error_response`, which runs inside the request's
/// tracing span and logs the underlying cause there.
use crate::db::StoreError;
use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use std::time::Duration;
use thiserror::Error;

/// Result type for social-api operations
pub type Result<T> = std::result::Result<T, AppError>;

const NOT_FOUND_MESSAGE: &str = "not found";
const CONFLICT_MESSAGE: &str = "already exists";
const INTERNAL_MESSAGE: &str = "the server encountered a problem";

#[derive(Error, Debug)]
pub enum AppError {
    /// Malformed input or failed validation; the message is returned verbatim
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Deadline exceeded after {0:?}")]
    Timeout(Duration),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Message safe to show to the client.
    pub fn public_message(&self) -> String {
        match self {
            AppError::BadRequest(msg) => msg.clone(),
            AppError::NotFound(_) => NOT_FOUND_MESSAGE.to_string(),
            AppError::Conflict(_) => CONFLICT_MESSAGE.to_string(),
            AppError::Timeout(_) | AppError::Internal(_) => INTERNAL_MESSAGE.to_string(),
        }
    }

    fn log(&self) {
        match self {
            AppError::Internal(_) | AppError::Timeout(_) => {
                tracing::error!(error = %self, "Request failed");
            }
            AppError::Conflict(_) | AppError::NotFound(_) => {
                tracing::warn!(error = %self, "Request rejected");
            }
            AppError::BadRequest(_) => {
                tracing::info!(error = %self, "Invalid request");
            }
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Timeout(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        self.log();

        HttpResponse::build(self.status_code()).json(serde_json::json!({
            "error": self.public_message(),
        }))
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => AppError::NotFound(err.to_string()),
            StoreError::Conflict => AppError::Conflict(err.to_string()),
            StoreError::Timeout(limit) => AppError::Timeout(limit),
            StoreError::Database(e) => AppError::Internal(format!("Database error: {}", e)),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::BadRequest(errors.to_string())
    }
}
