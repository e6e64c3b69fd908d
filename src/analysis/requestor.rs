use super::prompt::analysis_instruction;
use super::{AnalysisError, AnalysisResult, ResponseNormalizer};
use crate::genai::{AudioPayload, GenAiError, ServiceMode};
use crate::server::metrics::record_analysis;
use crate::upload::UploadedAudio;
use std::time::Duration;
use tracing::{info, warn};

/// Sends uploaded audio to the backend and normalizes the answer.
pub struct AnalysisRequestor {
    mode: ServiceMode,
    normalizer: ResponseNormalizer,
    call_timeout: Duration,
}

impl AnalysisRequestor {
    pub fn new(mode: ServiceMode, call_timeout: Duration) -> Self {
        Self::with_normalizer(mode, ResponseNormalizer::default(), call_timeout)
    }

    pub fn with_normalizer(
        mode: ServiceMode,
        normalizer: ResponseNormalizer,
        call_timeout: Duration,
    ) -> Self {
        Self {
            mode,
            normalizer,
            call_timeout,
        }
    }

    pub fn mode(&self) -> &ServiceMode {
        &self.mode
    }

    /// The canned analysis, when running offline.
    pub fn offline_sample(&self) -> Option<AnalysisResult> {
        match self.mode {
            ServiceMode::Offline => Some(AnalysisResult::offline_sample()),
            ServiceMode::Live(_) => None,
        }
    }

    /// Analyze a stored upload, forwarding it under `forward_mime`.
    ///
    /// A single attempt: backend failures are returned as-is.
    pub async fn analyze(
        &self,
        upload: &UploadedAudio,
        forward_mime: &str,
    ) -> Result<AnalysisResult, AnalysisError> {
        let backend = match &self.mode {
            ServiceMode::Live(backend) => backend,
            ServiceMode::Offline => {
                info!(mode = "offline", "Skipping analysis call, returning sample analysis");
                record_analysis("offline");
                return Ok(AnalysisResult::offline_sample());
            }
        };

        let bytes = tokio::fs::read(&upload.storage_path).await?;
        let instruction = analysis_instruction();

        info!(
            backend = backend.name(),
            bytes = bytes.len(),
            mime_sent = forward_mime,
            "Sending audio to model"
        );

        let audio = AudioPayload {
            bytes: &bytes,
            mime_type: forward_mime,
        };
        let response = match tokio::time::timeout(
            self.call_timeout,
            backend.analyze_audio(audio, &instruction),
        )
        .await
        {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => {
                warn!("Analysis call failed: {}", e);
                record_analysis("backend_error");
                return Err(e.into());
            }
            Err(_) => {
                warn!("Analysis call timed out after {:?}", self.call_timeout);
                record_analysis("timeout");
                return Err(GenAiError::Timeout.into());
            }
        };

        let result = self.normalizer.normalize(&response);
        record_analysis(if result.is_ok() { "success" } else { "invalid_response" });
        result
    }
}
