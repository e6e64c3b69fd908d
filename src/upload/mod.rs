//! Audio upload handling.
//!
//! Receives the uploaded file into the upload directory and decides which MIME
//! type, if any, can be forwarded to the analysis backend.

pub mod mime;
mod store;

pub use store::{StoredUpload, UploadStore, UploadedAudio};

use thiserror::Error;

/// Errors that can occur while receiving an upload.
#[derive(Debug, Error)]
pub enum UploadError {
    #[error("File not received")]
    MissingFile,

    #[error("File too large (max: {max_bytes} bytes)")]
    FileTooLarge { max_bytes: u64 },

    #[error("Unsupported file type: {0}")]
    UnsupportedType(String),

    #[error("Invalid multipart body: {0}")]
    Multipart(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
