//! Test fixtures: a scripted generative backend and fake audio payloads

use async_trait::async_trait;
use cover_studio_server::genai::{
    AudioPayload, GenAiBackend, GenAiError, GeneratedImage, ImageSpec,
};
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Generative backend double for end-to-end tests.
///
/// Analysis returns a fixed response document. Image generation succeeds only
/// for prompts containing one of the configured markers and returns the prompt
/// bytes as the "image".
pub struct FakeBackend {
    analysis_response: Value,
    image_success_markers: Vec<&'static str>,
    analysis_calls: AtomicUsize,
    image_calls: AtomicUsize,
    seen_mime_types: Mutex<Vec<String>>,
    seen_audio: Mutex<Vec<Vec<u8>>>,
}

impl FakeBackend {
    /// Analysis answers with `text` as the model output.
    pub fn answering(text: &str) -> Self {
        Self::with_response(json!({
            "candidates": [{ "content": { "parts": [{ "text": text }] } }]
        }))
    }

    /// Analysis answers with a well-formed analysis about `topic`.
    pub fn with_analysis(topic: &str) -> Self {
        let text = json!({
            "topic": topic,
            "mood": "calm",
            "genre": "business",
            "audience": "Founders",
            "keywords": ["startups", "funding", "growth"]
        })
        .to_string();
        Self::answering(&text)
    }

    pub fn with_response(analysis_response: Value) -> Self {
        Self {
            analysis_response,
            image_success_markers: vec![""],
            analysis_calls: AtomicUsize::new(0),
            image_calls: AtomicUsize::new(0),
            seen_mime_types: Mutex::new(Vec::new()),
            seen_audio: Mutex::new(Vec::new()),
        }
    }

    /// Only prompts containing one of `markers` produce an image.
    pub fn images_succeeding_for(mut self, markers: Vec<&'static str>) -> Self {
        self.image_success_markers = markers;
        self
    }

    pub fn analysis_calls(&self) -> usize {
        self.analysis_calls.load(Ordering::SeqCst)
    }

    pub fn image_calls(&self) -> usize {
        self.image_calls.load(Ordering::SeqCst)
    }

    pub fn seen_mime_types(&self) -> Vec<String> {
        self.seen_mime_types.lock().unwrap().clone()
    }

    pub fn seen_audio(&self) -> Vec<Vec<u8>> {
        self.seen_audio.lock().unwrap().clone()
    }
}

#[async_trait]
impl GenAiBackend for FakeBackend {
    fn name(&self) -> &str {
        "fake"
    }

    async fn analyze_audio(
        &self,
        audio: AudioPayload<'_>,
        _instruction: &str,
    ) -> Result<Value, GenAiError> {
        self.analysis_calls.fetch_add(1, Ordering::SeqCst);
        self.seen_mime_types
            .lock()
            .unwrap()
            .push(audio.mime_type.to_string());
        self.seen_audio.lock().unwrap().push(audio.bytes.to_vec());
        Ok(self.analysis_response.clone())
    }

    async fn generate_image(
        &self,
        prompt: &str,
        _spec: &ImageSpec,
    ) -> Result<GeneratedImage, GenAiError> {
        self.image_calls.fetch_add(1, Ordering::SeqCst);
        if self
            .image_success_markers
            .iter()
            .any(|marker| prompt.contains(marker))
        {
            Ok(GeneratedImage {
                bytes: prompt.as_bytes().to_vec(),
                mime_type: Some("image/png".to_string()),
            })
        } else {
            Err(GenAiError::InvalidResponse(
                "No image data in response".to_string(),
            ))
        }
    }
}

/// Bytes that sniff as MP3 (ID3 tag header) followed by filler.
pub fn fake_mp3_bytes(len: usize) -> Vec<u8> {
    let mut bytes = b"ID3\x03\x00\x00\x00\x00\x00\x00".to_vec();
    bytes.resize(len.max(bytes.len()), 0x55);
    bytes
}

/// Bytes that sniff as an MP4 container (`ftypisom` box) followed by filler.
pub fn fake_mp4_bytes(len: usize) -> Vec<u8> {
    let mut bytes = vec![0x00, 0x00, 0x00, 0x18];
    bytes.extend_from_slice(b"ftypisom");
    bytes.extend_from_slice(&[0x00, 0x00, 0x02, 0x00]);
    bytes.extend_from_slice(b"isomiso2mp41");
    bytes.resize(len.max(bytes.len()), 0xaa);
    bytes
}
