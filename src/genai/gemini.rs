//! Google Gemini backend implementation.
//!
//! Talks to the `generateContent` REST endpoint for both audio analysis and
//! image generation.

use super::backend::{AudioPayload, GenAiBackend, GenAiError, GeneratedImage, ImageSpec};
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

/// Gemini REST backend.
pub struct GeminiBackend {
    client: Client,
    base_url: String,
    api_key: String,
    analysis_model: String,
    image_model: String,
}

impl GeminiBackend {
    /// Create a new Gemini backend.
    ///
    /// # Arguments
    /// * `base_url` - Base URL of the API (e.g., "https://generativelanguage.googleapis.com/v1beta").
    /// * `api_key` - API key sent with every request.
    /// * `analysis_model` - Model used for audio analysis.
    /// * `image_model` - Model used for cover generation.
    /// * `timeout` - Transport-level timeout for each request.
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        analysis_model: impl Into<String>,
        image_model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, GenAiError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GenAiError::Connection(format!("Failed to create HTTP client: {}", e)))?;

        let base_url = base_url.into().trim_end_matches('/').to_string();

        Ok(Self {
            client,
            base_url,
            api_key: api_key.into(),
            analysis_model: analysis_model.into(),
            image_model: image_model.into(),
        })
    }

    fn endpoint_for_model(&self, model: &str) -> String {
        let trimmed = model.trim();
        let model_path = if trimmed.starts_with("models/") {
            trimmed.to_string()
        } else {
            format!("models/{}", trimmed)
        };
        format!("{}/{}:generateContent", self.base_url, model_path)
    }

    async fn post_generate(
        &self,
        model: &str,
        request: &GenerateContentRequest<'_>,
    ) -> Result<Value, GenAiError> {
        let url = self.endpoint_for_model(model);

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GenAiError::Timeout
                } else {
                    GenAiError::Connection(e.to_string())
                }
            })?;

        let status = response.status();
        if status.as_u16() == 429 {
            return Err(GenAiError::RateLimited);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GenAiError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        response.json().await.map_err(|e| {
            GenAiError::InvalidResponse(format!("Failed to parse Gemini response: {}", e))
        })
    }
}

#[async_trait]
impl GenAiBackend for GeminiBackend {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn analyze_audio(
        &self,
        audio: AudioPayload<'_>,
        instruction: &str,
    ) -> Result<Value, GenAiError> {
        let request = GenerateContentRequest::audio_analysis(audio, instruction);

        debug!(
            model = %self.analysis_model,
            bytes = audio.bytes.len(),
            mime_type = audio.mime_type,
            "Sending analysis request to Gemini"
        );

        self.post_generate(&self.analysis_model, &request).await
    }

    async fn generate_image(
        &self,
        prompt: &str,
        spec: &ImageSpec,
    ) -> Result<GeneratedImage, GenAiError> {
        let request = GenerateContentRequest::image(prompt, spec);

        debug!(
            model = %self.image_model,
            aspect_ratio = spec.aspect_ratio,
            image_size = spec.image_size,
            "Sending image generation request to Gemini"
        );

        let response = self.post_generate(&self.image_model, &request).await?;
        first_inline_image(&response)?
            .ok_or_else(|| GenAiError::InvalidResponse("No image in Gemini response".to_string()))
    }
}

/// Returns the first inline image part of a `generateContent` response.
fn first_inline_image(response: &Value) -> Result<Option<GeneratedImage>, GenAiError> {
    let candidates = response
        .get("candidates")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();

    for candidate in candidates {
        let parts = candidate
            .get("content")
            .and_then(|content| content.get("parts"))
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default();

        for part in parts {
            let Some(inline) = part.get("inlineData").or_else(|| part.get("inline_data")) else {
                continue;
            };
            let data = inline.get("data").and_then(Value::as_str).unwrap_or_default();
            if data.is_empty() {
                continue;
            }
            let bytes = BASE64.decode(data.as_bytes()).map_err(|e| {
                GenAiError::InvalidResponse(format!("Image base64 decode failed: {}", e))
            })?;
            let mime_type = inline
                .get("mimeType")
                .or_else(|| inline.get("mime_type"))
                .and_then(Value::as_str)
                .map(str::to_string);
            return Ok(Some(GeneratedImage { bytes, mime_type }));
        }
    }

    Ok(None)
}

// Gemini API types

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig<'a>>,
}

impl<'a> GenerateContentRequest<'a> {
    fn audio_analysis(audio: AudioPayload<'a>, instruction: &'a str) -> Self {
        Self {
            contents: vec![Content {
                role: "user",
                parts: vec![
                    Part::Inline {
                        inline_data: InlineData {
                            mime_type: audio.mime_type,
                            data: BASE64.encode(audio.bytes),
                        },
                    },
                    Part::Text { text: instruction },
                ],
            }],
            generation_config: Some(GenerationConfig {
                response_mime_type: Some("application/json"),
                response_modalities: None,
                image_config: None,
            }),
        }
    }

    fn image(prompt: &'a str, spec: &ImageSpec) -> Self {
        Self {
            contents: vec![Content {
                role: "user",
                parts: vec![Part::Text { text: prompt }],
            }],
            generation_config: Some(GenerationConfig {
                response_mime_type: None,
                response_modalities: Some(vec!["IMAGE"]),
                image_config: Some(ImageConfig {
                    aspect_ratio: spec.aspect_ratio,
                    image_size: spec.image_size,
                }),
            }),
        }
    }
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part<'a> {
    Inline {
        #[serde(rename = "inlineData")]
        inline_data: InlineData<'a>,
    },
    Text {
        text: &'a str,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData<'a> {
    mime_type: &'a str,
    data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_modalities: Option<Vec<&'a str>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    image_config: Option<ImageConfig<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ImageConfig<'a> {
    aspect_ratio: &'a str,
    image_size: &'a str,
}
