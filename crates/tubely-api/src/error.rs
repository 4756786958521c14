//! HTTP error response conversion
//!
//! Handlers return `Result<impl IntoResponse, HttpAppError>`. Domain errors from the
//! storage and processing crates convert into [`HttpAppError`] through `From`, so `?`
//! renders every failure with the same status, body and log line.
//!
//! The rendered body never carries `details` or `error_type`. For non-sensitive errors a
//! detailed copy rides along as an [`ErrorDetails`] response extension, which
//! [`crate::middleware::error_details_middleware`] exposes outside production.

use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tubely_core::{AppError, ErrorMetadata, LogLevel};
use tubely_processing::{ProcessingError, ValidationError};
use tubely_storage::StorageError;

#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
    /// Machine-readable error code for programmatic handling
    pub code: String,
    /// Whether this error is recoverable (can be retried)
    pub recoverable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_action: Option<String>,
}

/// Wrapper type for AppError to implement IntoResponse
/// (orphan rules: both IntoResponse and AppError are foreign to this crate)
#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

/// Detailed error body for non-sensitive errors, attached as a response extension.
#[derive(Debug, Clone)]
pub struct ErrorDetails(pub ErrorResponse);

fn log_error(error: &AppError) {
    let error_type = error.error_type();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %error, error_type = error_type, "Error occurred");
        }
        LogLevel::Error => {
            tracing::error!(
                error = %error.detailed_message(),
                error_type = error_type,
                "Error occurred"
            );
        }
    }
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let app_error = &self.0;

        let status = StatusCode::from_u16(app_error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        log_error(app_error);

        let body = ErrorResponse {
            error: app_error.client_message(),
            details: None,
            error_type: None,
            code: app_error.error_code().to_string(),
            recoverable: app_error.is_recoverable(),
            suggested_action: app_error.suggested_action().map(String::from),
        };

        let detailed = (!app_error.is_sensitive()).then(|| {
            ErrorDetails(ErrorResponse {
                details: Some(app_error.detailed_message()),
                error_type: Some(app_error.error_type().to_string()),
                ..body.clone()
            })
        });

        let mut response = (status, Json(body)).into_response();
        if let Some(detailed) = detailed {
            response.extensions_mut().insert(detailed);
        }
        response
    }
}

// Convert domain errors to HttpAppError (avoids orphan rule: we impl for local HttpAppError)

impl From<StorageError> for HttpAppError {
    fn from(err: StorageError) -> Self {
        let app = match err {
            StorageError::UploadFailed(msg) => AppError::Storage(msg),
            // Keys are generated server-side, so a rejected key is our bug.
            StorageError::InvalidKey(msg) => AppError::Internal(format!("Invalid key: {}", msg)),
            StorageError::IoError(err) => AppError::Internal(format!("IO error: {}", err)),
            StorageError::ConfigError(msg) => AppError::Internal(msg),
        };
        HttpAppError(app)
    }
}

impl From<ValidationError> for HttpAppError {
    fn from(err: ValidationError) -> Self {
        HttpAppError(AppError::UnsupportedMediaType(err.to_string()))
    }
}

impl From<ProcessingError> for HttpAppError {
    fn from(err: ProcessingError) -> Self {
        let app = match err {
            ProcessingError::Staging(err) => AppError::Internal(format!("Staging failed: {}", err)),
            other => AppError::MediaProcessing(other.to_string()),
        };
        HttpAppError(app)
    }
}

impl From<MultipartError> for HttpAppError {
    fn from(err: MultipartError) -> Self {
        let app = if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge("Request body exceeds the upload limit".to_string())
        } else {
            AppError::InvalidInput(format!("Malformed multipart body: {}", err.body_text()))
        };
        HttpAppError(app)
    }
}
