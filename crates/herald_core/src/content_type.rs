//! Closed set of post formats.

use crate::Platform;
use herald_error::{ContentError, ContentErrorKind};
use serde::{Deserialize, Serialize};

/// Post format of a content item.
///
/// Content rows written by the strategy generator carry free-form labels
/// such as `"Feed Image Posts"` or `"Text Posts (Status Updates / Announcements)"`.
/// Those labels are parsed into this enum; an unrecognised label is an error.
///
/// # Examples
///
/// ```
/// use herald_core::ContentType;
///
/// let story: ContentType = "Instagram Stories".parse().unwrap();
/// assert_eq!(story, ContentType::Story);
/// assert!("Carousel".parse::<ContentType>().is_err());
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    strum::EnumIter,
    derive_more::Display,
)]
pub enum ContentType {
    /// Square feed image
    FeedImage,
    /// Vertical story image
    Story,
    /// Vertical short video
    Reel,
    /// Portrait image post
    ImagePost,
    /// Video post
    VideoPost,
    /// Text-only status update
    TextPost,
}

/// Which content item field holds the media that gets published.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum MediaField {
    /// `media_link`
    #[display("media_link")]
    MediaLink,
    /// `video_placeholder`
    #[display("video_placeholder")]
    VideoPlaceholder,
}

impl ContentType {
    /// True for formats published as a still image.
    pub fn is_image(&self) -> bool {
        matches!(
            self,
            ContentType::FeedImage | ContentType::Story | ContentType::ImagePost
        )
    }

    /// True for formats published as a video.
    pub fn is_video(&self) -> bool {
        matches!(self, ContentType::Reel | ContentType::VideoPost)
    }

    /// The field that is authoritative for published media, if any.
    pub fn media_field(&self) -> Option<MediaField> {
        if self.is_image() {
            Some(MediaField::MediaLink)
        } else if self.is_video() {
            Some(MediaField::VideoPlaceholder)
        } else {
            None
        }
    }

    /// Canonical label, matching what the strategy generator writes.
    pub fn label(&self) -> &'static str {
        match self {
            ContentType::FeedImage => "Feed Image Posts",
            ContentType::Story => "Instagram Stories",
            ContentType::Reel => "Instagram Reels",
            ContentType::ImagePost => "Image Posts",
            ContentType::VideoPost => "Video Posts",
            ContentType::TextPost => "Text Posts",
        }
    }

    /// Label the strategy generator writes for this format on `platform`.
    ///
    /// LinkedIn image and video rows carry a platform prefix.
    ///
    /// ```
    /// use herald_core::{ContentType, Platform};
    ///
    /// assert_eq!(ContentType::ImagePost.label_for(Platform::LinkedIn), "LinkedIn Image Posts");
    /// assert_eq!(ContentType::ImagePost.label_for(Platform::Facebook), "Image Posts");
    /// ```
    pub fn label_for(&self, platform: Platform) -> &'static str {
        match (platform, self) {
            (Platform::LinkedIn, ContentType::ImagePost) => "LinkedIn Image Posts",
            (Platform::LinkedIn, ContentType::VideoPost) => "LinkedIn Video Posts",
            _ => self.label(),
        }
    }

    /// Lowercase, underscore-separated [`Self::label_for`], used in artifact names.
    pub fn slug_for(&self, platform: Platform) -> String {
        self.label_for(platform).to_lowercase().replace(' ', "_")
    }
}

impl std::str::FromStr for ContentType {
    type Err = ContentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        let parsed = match normalized.as_str() {
            "feedimage" | "feed" | "feed image" | "feed image posts" => ContentType::FeedImage,
            "story" | "stories" | "instagram stories" => ContentType::Story,
            "reel" | "reels" | "instagram reels" => ContentType::Reel,
            "imagepost" | "image" | "image posts" | "facebook image posts"
            | "linkedin image posts" => ContentType::ImagePost,
            "videopost" | "videos" | "video post" | "video posts" | "facebook videos"
            | "linkedin videos" | "linkedin video posts" => ContentType::VideoPost,
            "textpost" | "text" | "status" | "article" | "articles" | "text posts"
            | "text posts (status updates / announcements)" => ContentType::TextPost,
            _ => {
                return Err(ContentError::new(ContentErrorKind::UnknownContentType(
                    s.to_string(),
                )));
            }
        };
        Ok(parsed)
    }
}
