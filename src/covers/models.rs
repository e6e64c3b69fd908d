/// One image generation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverPrompt {
    /// Display label shown to the user.
    pub title: String,
    pub prompt_text: String,
}

/// A generated cover; base64 only at the HTTP boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverImage {
    pub title: String,
    pub image_bytes: Vec<u8>,
}
