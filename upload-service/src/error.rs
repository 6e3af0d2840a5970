use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use service_core::error::AppError;
use thiserror::Error;

/// Request-level failures returned by the upload API.
///
/// Every variant renders as a JSON body with a `message` summary and, where
/// useful, an `error` detail plus pagination context.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Category filter value missing or outside the label set.
    #[error("Invalid or missing category")]
    InvalidCategory,

    /// Upload form whose category is missing or outside the label set.
    #[error("Invalid or missing category")]
    InvalidUploadCategory,

    #[error("Invalid file type. Only JPEG and PNG are allowed.")]
    InvalidFileType,

    #[error("File exceeds the maximum size of {limit} bytes")]
    PayloadTooLarge { limit: usize },

    #[error("No file uploaded")]
    MissingFile,

    #[error("Malformed multipart request: {0}")]
    MalformedMultipart(String),

    #[error("Page and limit must be positive numbers")]
    InvalidPaginationParams,

    #[error("Requested page {page} exceeds total pages {total_pages}")]
    PageOutOfRange {
        page: u64,
        total: u64,
        total_pages: u64,
    },

    #[error("No items found for page {page}")]
    NoItemsForPage { page: u64, limit: u64 },

    #[error("No upload with id {0}")]
    RecordNotFound(String),

    #[error("{context}: {source}")]
    StorageFailure {
        context: &'static str,
        #[source]
        source: AppError,
    },

    #[error("{0}")]
    UnhandledFault(String),
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    total: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    total_pages: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    page: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    limit: Option<u64>,
}

impl ErrorBody {
    fn new(message: &'static str, error: Option<String>) -> Self {
        Self {
            message,
            error,
            total: None,
            total_pages: None,
            page: None,
            limit: None,
        }
    }
}

impl ApiError {
    /// Wraps a store failure with the summary reported to the client.
    pub fn storage(context: &'static str) -> impl FnOnce(AppError) -> ApiError {
        move |source| ApiError::StorageFailure { context, source }
    }

    /// Maps a multipart stream failure. Body-limit overruns surface as 413.
    pub fn from_multipart(err: MultipartError, limit: usize) -> ApiError {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::PayloadTooLarge { limit }
        } else {
            ApiError::MalformedMultipart(err.body_text())
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidCategory
            | ApiError::InvalidUploadCategory
            | ApiError::InvalidFileType
            | ApiError::MissingFile
            | ApiError::MalformedMultipart(_)
            | ApiError::InvalidPaginationParams => StatusCode::BAD_REQUEST,
            ApiError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::PageOutOfRange { .. }
            | ApiError::NoItemsForPage { .. }
            | ApiError::RecordNotFound(_) => StatusCode::NOT_FOUND,
            ApiError::StorageFailure { .. } | ApiError::UnhandledFault(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn body(&self) -> ErrorBody {
        match self {
            ApiError::InvalidCategory => ErrorBody::new("Invalid category", None),
            ApiError::InvalidUploadCategory
            | ApiError::InvalidFileType
            | ApiError::PayloadTooLarge { .. }
            | ApiError::MissingFile
            | ApiError::MalformedMultipart(_) => {
                ErrorBody::new("Upload failed", Some(self.to_string()))
            }
            ApiError::InvalidPaginationParams => {
                ErrorBody::new("Invalid pagination parameters", Some(self.to_string()))
            }
            ApiError::PageOutOfRange {
                total, total_pages, ..
            } => ErrorBody {
                total: Some(*total),
                total_pages: Some(*total_pages),
                ..ErrorBody::new("No items left", Some(self.to_string()))
            },
            ApiError::NoItemsForPage { page, limit } => ErrorBody {
                page: Some(*page),
                limit: Some(*limit),
                ..ErrorBody::new("No items found for this page", None)
            },
            ApiError::RecordNotFound(_) => {
                ErrorBody::new("Upload not found", Some(self.to_string()))
            }
            ApiError::StorageFailure { context, source } => {
                ErrorBody::new(*context, Some(source.to_string()))
            }
            ApiError::UnhandledFault(detail) => {
                ErrorBody::new("Internal server error", Some(detail.clone()))
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::debug!(error = %self, status = %status, "Request rejected");
        }

        (status, Json(self.body())).into_response()
    }
}
