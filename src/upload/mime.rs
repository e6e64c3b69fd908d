//! MIME classification for uploaded audio.

use super::UploadError;
use tracing::info;

/// Audio types accepted as-is.
pub const ALLOWED_AUDIO_TYPES: &[&str] = &[
    "audio/mpeg",
    "audio/mp3",
    "audio/wav",
    "audio/x-wav",
    "audio/mp4",
    "audio/x-m4a",
    "audio/aac",
    "audio/ogg",
    "audio/webm",
    "audio/flac",
    "application/ogg",
];

/// What MP4-family video uploads are forwarded as.
pub const REMAPPED_VIDEO_AUDIO_TYPE: &str = "audio/mp4";

/// Declared type used when the upload carries none and sniffing fails.
pub const FALLBACK_DECLARED_TYPE: &str = "audio/mpeg";

const OCTET_STREAM: &str = "application/octet-stream";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MimeClass {
    /// Acceptable audio, forwarded unchanged.
    Audio(String),
    /// A video container carrying audio, forwarded under an audio type.
    VideoAsAudio {
        declared: String,
        forwarded: &'static str,
    },
    /// Anything else.
    Unsupported(String),
}

/// Lowercased type/subtype with parameters removed.
fn essence(declared: &str) -> String {
    declared
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

pub fn classify(declared: &str) -> MimeClass {
    let mime = essence(declared);

    if let Some(subtype) = mime.strip_prefix("video/") {
        if subtype.contains("mp4") || subtype.contains("x-m4v") {
            return MimeClass::VideoAsAudio {
                declared: mime,
                forwarded: REMAPPED_VIDEO_AUDIO_TYPE,
            };
        }
    }

    if mime.starts_with("audio/") || ALLOWED_AUDIO_TYPES.contains(&mime.as_str()) {
        return MimeClass::Audio(mime);
    }

    MimeClass::Unsupported(mime)
}

/// Resolves the forwarded MIME type, rejecting unsupported uploads with the
/// declared type as received.
pub fn forward_mime_for(declared: &str) -> Result<String, UploadError> {
    match classify(declared) {
        MimeClass::Audio(mime) => Ok(mime),
        MimeClass::VideoAsAudio {
            declared: video,
            forwarded,
        } => {
            info!("Forwarding {} upload as {}", video, forwarded);
            Ok(forwarded.to_string())
        }
        MimeClass::Unsupported(_) => Err(UploadError::UnsupportedType(declared.to_string())),
    }
}

/// Picks the declared MIME type of an upload.
///
/// A missing or generic declaration is replaced by what the leading bytes look
/// like. A part with no content type at all falls back to `audio/mpeg`.
pub fn resolve_declared_mime(declared: Option<&str>, head: &[u8]) -> String {
    let declared = declared.map(str::trim).filter(|s| !s.is_empty());

    match declared {
        Some(mime) if !mime.eq_ignore_ascii_case(OCTET_STREAM) => mime.to_string(),
        _ => match infer::get(head) {
            Some(kind) => kind.mime_type().to_string(),
            None => declared.unwrap_or(FALLBACK_DECLARED_TYPE).to_string(),
        },
    }
}
