//! Application error types.

use axum::Json;
use axum::extract::multipart::MultipartError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

use crate::file::{StorageError, UploadError};
use crate::services::NotifyError;

/// Prefix for every failure that happens before the object is stored.
const STORAGE_PREFIX: &str = "Error occurred while saving to S3.";

/// Application errors.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid form data: {0}")]
    InvalidForm(String),

    #[error("Invalid multipart body: {}", .0.body_text())]
    Multipart(#[from] MultipartError),

    #[error(transparent)]
    Upload(#[from] UploadError),

    #[error(transparent)]
    Notify(#[from] NotifyError),
}

impl AppError {
    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidForm(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Multipart(e) => e.status(),
            AppError::Upload(UploadError::UnsupportedType { .. }) => StatusCode::BAD_REQUEST,
            AppError::Upload(UploadError::Storage(StorageError::Credentials)) => {
                StatusCode::FORBIDDEN
            }
            AppError::Upload(UploadError::Storage(StorageError::Failed(_))) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            AppError::Notify(NotifyError::Status { status, .. }) => *status,
            AppError::Notify(NotifyError::Connection(_)) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::Notify(NotifyError::Timeout(_)) => StatusCode::GATEWAY_TIMEOUT,
            AppError::Notify(NotifyError::Request(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Human-readable detail returned to the client.
    pub fn detail(&self) -> String {
        match self {
            AppError::InvalidForm(_) | AppError::Multipart(_) => self.to_string(),
            AppError::Upload(UploadError::Storage(StorageError::Failed(e))) => {
                format!("{STORAGE_PREFIX}File upload failed: {e}")
            }
            AppError::Upload(e) => format!("{STORAGE_PREFIX} {e}"),
            AppError::Notify(NotifyError::Status { message, .. }) => {
                format!("HTTP error occurred while saving to database: {message}")
            }
            AppError::Notify(NotifyError::Connection(e)) => {
                format!("Connection error occurred while saving to database: {e}")
            }
            AppError::Notify(NotifyError::Timeout(e)) => {
                format!("Timeout error occurred while saving to database: {e}")
            }
            AppError::Notify(NotifyError::Request(e)) => {
                format!("An error occurred while saving to database: {e}")
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let detail = self.detail();

        if status.is_server_error() {
            tracing::warn!(status = status.as_u16(), detail = %detail, "upload request failed");
        } else {
            tracing::debug!(status = status.as_u16(), detail = %detail, "upload request rejected");
        }

        (status, Json(json!({ "detail": detail }))).into_response()
    }
}

/// Result type alias using AppError.
pub type AppResult<T> = Result<T, AppError>;
