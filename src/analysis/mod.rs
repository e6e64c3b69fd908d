//! Audio content analysis.

mod models;
pub mod normalizer;
pub mod prompt;
mod requestor;

pub use models::AnalysisResult;
pub use normalizer::{ResponseAdapter, ResponseNormalizer};
pub use requestor::AnalysisRequestor;

use crate::genai::GenAiError;
use thiserror::Error;

/// Errors that can occur while analyzing an upload.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Invalid JSON response: {source}")]
    InvalidJson {
        raw: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid analysis response: {reason}")]
    InvalidAnalysis { raw: String, reason: String },

    #[error("Failed to read uploaded audio: {0}")]
    Io(#[from] std::io::Error),

    #[error("Analysis backend error: {0}")]
    Backend(#[from] GenAiError),
}
