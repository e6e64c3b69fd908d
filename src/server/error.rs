//! JSON failure responses.

use crate::analysis::AnalysisError;
use crate::covers::CoverError;
use crate::genai::GenAiError;
use crate::upload::UploadError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::error;

#[derive(Debug, Serialize)]
struct ErrorBody {
    success: bool,
    error: String,
    code: &'static str,
    #[serde(rename = "mimeType", skip_serializing_if = "Option::is_none")]
    mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    raw: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

/// A failed request, rendered as `{ success: false, error, code, ... }`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: &'static str,
    pub message: String,
    pub mime_type: Option<String>,
    pub raw: Option<String>,
    pub details: Option<String>,
}

impl ApiError {
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
            mime_type: None,
            raw: None,
            details: None,
        }
    }

    pub fn with_raw(mut self, raw: impl Into<String>) -> Self {
        self.raw = Some(raw.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn server_error(details: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, "server_error", "Server error")
            .with_details(details)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            success: false,
            error: self.message,
            code: self.code,
            mime_type: self.mime_type,
            raw: self.raw,
            details: self.details,
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<UploadError> for ApiError {
    fn from(err: UploadError) -> Self {
        match err {
            UploadError::MissingFile => {
                ApiError::new(StatusCode::BAD_REQUEST, "missing_file", "File not received")
            }
            UploadError::FileTooLarge { max_bytes } => ApiError::new(
                StatusCode::PAYLOAD_TOO_LARGE,
                "file_too_large",
                "File too large",
            )
            .with_details(format!(
                "Maximum upload size is {:#}",
                byte_unit::Byte::from(max_bytes)
            )),
            UploadError::UnsupportedType(mime_type) => {
                let mut api_error = ApiError::new(
                    StatusCode::BAD_REQUEST,
                    "unsupported_type",
                    "Unsupported file type",
                );
                api_error.mime_type = Some(mime_type);
                api_error
            }
            UploadError::Multipart(details) => ApiError::new(
                StatusCode::BAD_REQUEST,
                "invalid_multipart",
                "Invalid upload",
            )
            .with_details(details),
            UploadError::Io(e) => {
                error!("Upload IO error: {}", e);
                ApiError::server_error(e.to_string())
            }
        }
    }
}

impl From<GenAiError> for ApiError {
    fn from(err: GenAiError) -> Self {
        match err {
            GenAiError::Timeout => ApiError::new(
                StatusCode::GATEWAY_TIMEOUT,
                "upstream_timeout",
                "Analysis service timed out",
            ),
            other => ApiError::new(
                StatusCode::BAD_GATEWAY,
                "analysis_failed",
                "Analysis service failed",
            )
            .with_details(other.to_string()),
        }
    }
}

impl From<AnalysisError> for ApiError {
    fn from(err: AnalysisError) -> Self {
        match err {
            AnalysisError::InvalidJson { raw, source } => ApiError::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "invalid_json",
                "Invalid JSON response",
            )
            .with_raw(raw)
            .with_details(source.to_string()),
            AnalysisError::InvalidAnalysis { raw, reason } => ApiError::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "invalid_analysis",
                "Invalid analysis response",
            )
            .with_raw(raw)
            .with_details(reason),
            AnalysisError::Backend(e) => e.into(),
            AnalysisError::Io(e) => {
                error!("Failed to read stored upload: {}", e);
                ApiError::server_error(e.to_string())
            }
        }
    }
}

impl From<CoverError> for ApiError {
    fn from(err: CoverError) -> Self {
        match err {
            CoverError::MissingAnalysisData => ApiError::new(
                StatusCode::BAD_REQUEST,
                "missing_analysis",
                "Missing analysis data",
            ),
            CoverError::NoImagesGenerated {
                attempted,
                last_error,
            } => {
                let details = match last_error {
                    Some(e) => format!("All {} image requests failed; last error: {}", attempted, e),
                    None => format!("All {} image requests failed", attempted),
                };
                ApiError::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "no_images",
                    "No images generated",
                )
                .with_details(details)
            }
        }
    }
}
