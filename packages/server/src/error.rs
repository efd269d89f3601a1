use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use common::media::MediaError;
use sea_orm::DbErr;
use serde::Serialize;

/// Structured error response returned by all endpoints on failure.
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorBody {
    /// Machine-readable error code. One of: `VALIDATION_ERROR`,
    /// `SIZE_EXCEEDED`, `UPLOAD_ERROR`, `NOT_FOUND`, `INTERNAL_ERROR`.
    #[schema(example = "VALIDATION_ERROR")]
    pub code: &'static str,
    /// Human-readable error description.
    #[schema(example = "Title must be 1-100 characters")]
    pub message: String,
}

/// Application-level error type.
///
/// Every failure a handler can hit maps to exactly one variant, so nothing
/// unstructured ever crosses the handler boundary.
#[derive(Debug)]
pub enum AppError {
    /// Bad input: missing title, neither content nor media, malformed form.
    Validation(String),
    /// Unknown post id or media filename.
    NotFound(String),
    /// Upload larger than the configured cap.
    SizeExceeded { limit: u64 },
    /// Filesystem write failure while storing media.
    Upload(String),
    /// Database failure or other unexpected condition.
    Internal(String),
}

impl AppError {
    fn status_and_body(self) -> (StatusCode, ErrorBody) {
        match self {
            AppError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorBody {
                    code: "VALIDATION_ERROR",
                    message: msg,
                },
            ),
            AppError::NotFound(msg) => (
                StatusCode::NOT_FOUND,
                ErrorBody {
                    code: "NOT_FOUND",
                    message: msg,
                },
            ),
            AppError::SizeExceeded { limit } => (
                StatusCode::PAYLOAD_TOO_LARGE,
                ErrorBody {
                    code: "SIZE_EXCEEDED",
                    message: format!("Upload exceeds the maximum size of {limit} bytes"),
                },
            ),
            AppError::Upload(detail) => {
                tracing::error!("Upload error: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        code: "UPLOAD_ERROR",
                        message: "Failed to store the uploaded file".into(),
                    },
                )
            }
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody {
                        code: "INTERNAL_ERROR",
                        message: "An unexpected error occurred".into(),
                    },
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = self.status_and_body();
        (status, Json(body)).into_response()
    }
}

impl From<DbErr> for AppError {
    fn from(err: DbErr) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<MediaError> for AppError {
    fn from(err: MediaError) -> Self {
        match err {
            MediaError::InvalidFilename => AppError::Validation("Invalid filename".into()),
            MediaError::UnsupportedType(ext) => {
                AppError::Validation(format!("Unsupported media type: '{ext}'"))
            }
            MediaError::SizeExceeded { actual, limit } => {
                tracing::warn!(actual, limit, "upload rejected: size limit exceeded");
                AppError::SizeExceeded { limit }
            }
            MediaError::NotFound(name) => AppError::NotFound(format!("Media '{name}' not found")),
            MediaError::Io(e) => AppError::Upload(e.to_string()),
        }
    }
}
