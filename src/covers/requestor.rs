use super::prompts::{cover_prompts, placeholder_covers};
use super::{CoverError, CoverImage};
use crate::analysis::AnalysisResult;
use crate::genai::{GenAiError, ImageSpec, ServiceMode};
use crate::server::metrics::record_cover_generation;
use futures::future::join_all;
use std::time::Duration;
use tracing::{error, info};

/// Fans out one image generation call per cover style.
pub struct CoverRequestor {
    mode: ServiceMode,
    call_timeout: Duration,
}

impl CoverRequestor {
    pub fn new(mode: ServiceMode, call_timeout: Duration) -> Self {
        Self { mode, call_timeout }
    }

    pub fn mode(&self) -> &ServiceMode {
        &self.mode
    }

    /// Generate covers for an analysis.
    ///
    /// Calls run concurrently and independently. Failed ones are logged and
    /// left out; the operation only fails when none succeeded.
    pub async fn generate(&self, analysis: &AnalysisResult) -> Result<Vec<CoverImage>, CoverError> {
        if analysis.topic.trim().is_empty() {
            return Err(CoverError::MissingAnalysisData);
        }

        let backend = match &self.mode {
            ServiceMode::Live(backend) => backend.as_ref(),
            ServiceMode::Offline => {
                info!(mode = "offline", "Skipping image generation, returning placeholder covers");
                return Ok(placeholder_covers());
            }
        };

        let prompts = cover_prompts(analysis);
        let attempted = prompts.len();
        let call_timeout = self.call_timeout;

        let calls = prompts.into_iter().map(|(style, prompt)| async move {
            let outcome = match tokio::time::timeout(
                call_timeout,
                backend.generate_image(&prompt.prompt_text, &ImageSpec::SQUARE_2K),
            )
            .await
            {
                Ok(result) => result,
                Err(_) => Err(GenAiError::Timeout),
            };
            (style, prompt, outcome)
        });

        let mut covers = Vec::with_capacity(attempted);
        let mut last_error = None;

        for (style, prompt, outcome) in join_all(calls).await {
            match outcome {
                Ok(image) => {
                    record_cover_generation(style.slug(), "success");
                    covers.push(CoverImage {
                        title: prompt.title,
                        image_bytes: image.bytes,
                    });
                }
                Err(e) => {
                    error!("Error generating image for prompt \"{}\": {}", prompt.title, e);
                    record_cover_generation(style.slug(), "failure");
                    last_error = Some(e.to_string());
                }
            }
        }

        if covers.is_empty() {
            return Err(CoverError::NoImagesGenerated {
                attempted,
                last_error,
            });
        }

        info!("Generated {}/{} covers", covers.len(), attempted);
        Ok(covers)
    }
}
