//! HTTP client for end-to-end tests
//!
//! Wraps reqwest and provides methods for all cover studio endpoints.
//! When API routes or request formats change, update only this file.

use super::constants::*;
use reqwest::multipart::{Form, Part};
use reqwest::Response;
use serde_json::Value;
use std::time::Duration;

pub struct TestClient {
    /// The underlying reqwest client (public for custom requests in tests)
    pub client: reqwest::Client,
    /// The base URL of the test server
    pub base_url: String,
}

impl TestClient {
    pub fn new(base_url: String) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .expect("Failed to build reqwest client");

        Self { client, base_url }
    }

    // ========================================================================
    // Health
    // ========================================================================

    /// GET /health
    pub async fn health(&self) -> Response {
        self.client
            .get(format!("{}/health", self.base_url))
            .send()
            .await
            .expect("Health request failed")
    }

    // ========================================================================
    // Analysis
    // ========================================================================

    /// POST /analyze with an `audio` file part
    ///
    /// `mime_type: None` sends the part without a Content-Type header.
    pub async fn analyze(&self, file_name: &str, mime_type: Option<&str>, data: Vec<u8>) -> Response {
        let mut part = Part::bytes(data).file_name(file_name.to_string());
        if let Some(mime) = mime_type {
            part = part.mime_str(mime).expect("Invalid test MIME type");
        }
        self.post_form(Form::new().text("note", "from tests").part("audio", part))
            .await
    }

    /// POST /analyze with a multipart body that has no `audio` field
    pub async fn analyze_without_file(&self) -> Response {
        self.post_form(Form::new().text("note", "no file here")).await
    }

    async fn post_form(&self, form: Form) -> Response {
        self.client
            .post(format!("{}/analyze", self.base_url))
            .multipart(form)
            .send()
            .await
            .expect("Analyze request failed")
    }

    // ========================================================================
    // Covers
    // ========================================================================

    /// POST /generate-covers with a JSON body
    pub async fn generate_covers(&self, body: &Value) -> Response {
        self.client
            .post(format!("{}/generate-covers", self.base_url))
            .json(body)
            .send()
            .await
            .expect("Generate covers request failed")
    }

    /// POST /generate-covers with an arbitrary JSON-typed body
    pub async fn generate_covers_raw(&self, body: &'static str) -> Response {
        self.client
            .post(format!("{}/generate-covers", self.base_url))
            .header("content-type", "application/json")
            .body(body)
            .send()
            .await
            .expect("Generate covers request failed")
    }
}
