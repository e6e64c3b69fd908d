//! Cover Studio Server Library
//!
//! This library exposes the internal modules for testing and potential reuse.

pub mod analysis;
pub mod config;
pub mod covers;
pub mod genai;
pub mod server;
pub mod upload;

// Re-export commonly used types for convenience
pub use analysis::{AnalysisRequestor, AnalysisResult};
pub use covers::{CoverImage, CoverRequestor};
pub use genai::{GenAiBackend, ServiceMode};
pub use server::{run_server, RequestsLoggingLevel};
pub use upload::UploadStore;
