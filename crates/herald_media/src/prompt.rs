//! Prompt enrichment for image generation.

use herald_core::{ContentType, Platform};

/// Aspect-ratio instruction appended to generation prompts.
///
/// Pairs without a dedicated hint get an empty string.
pub fn aspect_hint(platform: Platform, content_type: ContentType) -> &'static str {
    match (platform, content_type) {
        (Platform::Instagram, ContentType::FeedImage | ContentType::ImagePost) => {
            "Square aspect ratio (1:1)"
        }
        (Platform::Instagram, ContentType::Story | ContentType::Reel) => {
            "Vertical aspect ratio (9:16)"
        }
        (Platform::Facebook, ContentType::ImagePost | ContentType::VideoPost) => "4:5 aspect ratio",
        (Platform::LinkedIn, ContentType::ImagePost | ContentType::VideoPost) => {
            "Portrait aspect ratio (4:5)"
        }
        _ => "",
    }
}

/// Build the prompt sent to the image generator.
///
/// # Examples
///
/// ```
/// use herald_core::{ContentType, Platform};
/// use herald_media::enhanced_prompt;
///
/// let prompt = enhanced_prompt(
///     "A sunlit bakery counter",
///     "Use warm orange tones",
///     Platform::Instagram,
///     ContentType::FeedImage,
/// );
/// assert_eq!(
///     prompt,
///     "A sunlit bakery counter - IMPORTANT: Use warm orange tones. Square aspect ratio (1:1)"
/// );
/// ```
pub fn enhanced_prompt(
    image_prompt: &str,
    logo_description: &str,
    platform: Platform,
    content_type: ContentType,
) -> String {
    format!(
        "{} - IMPORTANT: {}. {}",
        image_prompt.trim(),
        logo_description.trim(),
        aspect_hint(platform, content_type)
    )
}
