//! Generative backend trait definition.

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur when talking to the generative backend.
#[derive(Debug, Error)]
pub enum GenAiError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Rate limited")]
    RateLimited,

    #[error("Request timeout")]
    Timeout,
}

/// Raw audio sent inline with an analysis request.
#[derive(Debug, Clone, Copy)]
pub struct AudioPayload<'a> {
    pub bytes: &'a [u8],
    /// MIME type forwarded to the model, possibly remapped from the declared one.
    pub mime_type: &'a str,
}

/// Requested output geometry for image generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageSpec {
    pub aspect_ratio: &'static str,
    pub image_size: &'static str,
}

impl ImageSpec {
    /// 2048x2048 square artwork.
    pub const SQUARE_2K: ImageSpec = ImageSpec {
        aspect_ratio: "1:1",
        image_size: "2K",
    };
}

/// A decoded image returned by the backend.
#[derive(Debug, Clone)]
pub struct GeneratedImage {
    pub bytes: Vec<u8>,
    pub mime_type: Option<String>,
}

/// Trait for generative backends.
///
/// Both calls are single attempts: implementations must not retry.
#[async_trait]
pub trait GenAiBackend: Send + Sync {
    /// Get the backend's name (e.g., "gemini").
    fn name(&self) -> &str;

    /// Send audio plus an instruction and return the raw response document.
    ///
    /// The response is returned untouched; extracting text from it is the
    /// caller's concern.
    async fn analyze_audio(
        &self,
        audio: AudioPayload<'_>,
        instruction: &str,
    ) -> Result<serde_json::Value, GenAiError>;

    /// Generate one image for the given prompt.
    async fn generate_image(
        &self,
        prompt: &str,
        spec: &ImageSpec,
    ) -> Result<GeneratedImage, GenAiError>;
}
