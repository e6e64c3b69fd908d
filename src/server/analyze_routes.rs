//! Audio analysis HTTP route.

use axum::{
    extract::{multipart::{MultipartError, MultipartRejection}, Multipart, State},
    http::StatusCode,
    Json,
};
use futures::StreamExt;
use serde::Serialize;
use tracing::{debug, info, warn};

use super::error::ApiError;
use super::metrics::record_upload;
use super::state::{GuardedAnalysisRequestor, GuardedUploadStore};
use crate::analysis::AnalysisResult;
use crate::upload::mime::forward_mime_for;
use crate::upload::{StoredUpload, UploadError};

/// Multipart field carrying the audio file.
pub const AUDIO_FIELD: &str = "audio";

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub success: bool,
    pub analysis: AnalysisResult,
}

impl AnalyzeResponse {
    fn ok(analysis: AnalysisResult) -> Json<Self> {
        Json(Self {
            success: true,
            analysis,
        })
    }
}

fn multipart_error(err: MultipartError, max_bytes: u64) -> UploadError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        UploadError::FileTooLarge { max_bytes }
    } else {
        UploadError::Multipart(err.body_text())
    }
}

fn upload_outcome(err: &UploadError) -> &'static str {
    match err {
        UploadError::MissingFile => "missing",
        UploadError::FileTooLarge { .. } => "too_large",
        UploadError::UnsupportedType(_) => "unsupported_type",
        UploadError::Multipart(_) => "invalid_multipart",
        UploadError::Io(_) => "io_error",
    }
}

/// Streams the `audio` field to disk; every other field is skipped.
async fn receive_audio(
    store: &GuardedUploadStore,
    mut multipart: Multipart,
) -> Result<Option<StoredUpload>, UploadError> {
    let max_bytes = store.max_bytes();
    let mut stored = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, max_bytes))?
    {
        if field.name() != Some(AUDIO_FIELD) || stored.is_some() {
            debug!("Skipping multipart field {:?}", field.name());
            continue;
        }

        let original_name = field.file_name().unwrap_or_default().to_string();
        let content_type = field.content_type().map(str::to_string);
        let chunks = field.map(|chunk| chunk.map_err(|e| multipart_error(e, max_bytes)));

        stored = Some(
            store
                .receive(&original_name, content_type.as_deref(), chunks)
                .await?,
        );
    }

    Ok(stored)
}

/// POST /analyze - Analyze an uploaded audio file (multipart/form-data)
pub async fn analyze(
    State(store): State<GuardedUploadStore>,
    State(requestor): State<GuardedAnalysisRequestor>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    let offline_sample = requestor.offline_sample();

    let multipart = match (multipart, &offline_sample) {
        (Ok(multipart), _) => multipart,
        (Err(rejection), Some(sample)) => {
            info!(
                mode = "offline",
                "Request is not a multipart upload ({}), returning sample analysis",
                rejection.body_text()
            );
            return Ok(AnalyzeResponse::ok(sample.clone()));
        }
        (Err(rejection), None) => {
            record_upload("invalid_multipart");
            return Err(UploadError::Multipart(rejection.body_text()).into());
        }
    };

    let upload = match receive_audio(&store, multipart).await {
        Ok(upload) => upload,
        // an empty file part is no file at all
        Err(UploadError::MissingFile) if offline_sample.is_some() => None,
        Err(e) => {
            warn!("Upload rejected: {}", e);
            record_upload(upload_outcome(&e));
            return Err(e.into());
        }
    };

    let upload = match (upload, offline_sample) {
        (_, Some(sample)) => {
            info!(
                mode = "offline",
                "Skipping type check and analysis, returning sample analysis"
            );
            return Ok(AnalyzeResponse::ok(sample));
        }
        (None, None) => {
            record_upload("missing");
            return Err(UploadError::MissingFile.into());
        }
        (Some(upload), None) => upload,
    };

    info!(
        "Received {:?} ({}, {:#})",
        upload.original_name,
        upload.declared_mime_type,
        byte_unit::Byte::from(upload.size_bytes)
    );

    let forward_mime = match forward_mime_for(&upload.declared_mime_type) {
        Ok(mime) => mime,
        Err(e) => {
            warn!("Rejecting upload: {}", e);
            record_upload(upload_outcome(&e));
            return Err(e.into());
        }
    };
    record_upload("accepted");

    let analysis = requestor.analyze(upload.audio(), &forward_mime).await?;

    info!("Analysis complete: genre={} mood={}", analysis.genre, analysis.mood);
    Ok(AnalyzeResponse::ok(analysis))
}
