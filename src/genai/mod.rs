//! Generative AI backend abstraction layer.
//!
//! This module provides a trait-based abstraction for the hosted model that
//! analyzes audio and synthesizes cover images, plus the Gemini implementation
//! used in production.

mod backend;
mod gemini;

pub use backend::{AudioPayload, GenAiBackend, GenAiError, GeneratedImage, ImageSpec};
pub use gemini::GeminiBackend;

use std::sync::Arc;

/// How the pipeline talks to the outside world.
///
/// `Offline` short-circuits every external call with deterministic sample data,
/// so the server can run without credentials.
#[derive(Clone)]
pub enum ServiceMode {
    Live(Arc<dyn GenAiBackend>),
    Offline,
}

impl ServiceMode {
    /// Label used in logs and the health endpoint.
    pub fn label(&self) -> &'static str {
        match self {
            ServiceMode::Live(_) => "live",
            ServiceMode::Offline => "offline",
        }
    }
}

impl std::fmt::Debug for ServiceMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ServiceMode::Live(backend) => write!(f, "Live({})", backend.name()),
            ServiceMode::Offline => write!(f, "Offline"),
        }
    }
}
