//! Image and video generation seams.

use async_trait::async_trait;
use herald_error::HeraldResult;

/// Output of an image generation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeneratedImage {
    /// Hosted image to download
    Url(String),
    /// Inline image bytes
    Bytes(Vec<u8>),
}

/// Text-to-image service.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    /// Generate one image for `prompt`.
    ///
    /// Returns `GenerationErrorKind::EmptyOutput` when the service answers
    /// without usable image data.
    async fn generate_image(&self, prompt: &str) -> HeraldResult<GeneratedImage>;
}

/// Text-to-video service.
#[async_trait]
pub trait VideoGenerator: Send + Sync {
    /// Generate one video for `prompt` and return its download URL.
    async fn generate_video(&self, prompt: &str) -> HeraldResult<String>;
}
