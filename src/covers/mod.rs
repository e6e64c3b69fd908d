//! Cover art generation.

mod models;
pub mod prompts;
mod requestor;

pub use models::{CoverImage, CoverPrompt};
pub use prompts::{cover_prompts, CoverStyle};
pub use requestor::CoverRequestor;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoverError {
    #[error("Missing analysis data")]
    MissingAnalysisData,

    #[error("No images generated ({attempted} prompts failed)")]
    NoImagesGenerated {
        attempted: usize,
        last_error: Option<String>,
    },
}
