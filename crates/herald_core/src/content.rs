//! Scheduled social posts.

use crate::{ContentStatus, ContentType, MediaField, Platform};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One scheduled social post.
///
/// # Examples
///
/// ```
/// use herald_core::{ContentItemBuilder, ContentStatus, ContentType, Platform};
///
/// let item = ContentItemBuilder::default()
///     .id(7)
///     .company_id(1)
///     .strategy_id(3)
///     .user_id(42)
///     .platform(Platform::Facebook)
///     .content_type(ContentType::ImagePost)
///     .caption("Spring sale")
///     .hashtags(Some("#sale #spring".to_string()))
///     .best_time("Monday 9AM")
///     .status(ContentStatus::Approved)
///     .build()
///     .unwrap();
///
/// assert_eq!(item.full_caption(), "Spring sale #sale #spring");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_builder::Builder)]
#[builder(setter(into))]
pub struct ContentItem {
    /// Row id
    pub id: i32,
    /// Owning company
    pub company_id: i32,
    /// Owning strategy
    pub strategy_id: i32,
    /// Owning user
    pub user_id: i32,
    /// Target platform
    pub platform: Platform,
    /// Post format
    pub content_type: ContentType,
    /// Caption without hashtags
    #[builder(default)]
    pub caption: String,
    /// Space-separated hashtags
    #[builder(default)]
    pub hashtags: Option<String>,
    /// Prompt for the image generator
    #[builder(default)]
    pub image_prompt: Option<String>,
    /// Published image URL
    #[builder(default)]
    pub media_link: Option<String>,
    /// Video prompt before rendering, video URL after
    #[builder(default)]
    pub video_placeholder: Option<String>,
    /// Weekday and hour, e.g. "Monday 9AM"
    pub best_time: String,
    /// Lifecycle state
    pub status: ContentStatus,
    /// Set when a reviewer rejects the item
    #[builder(default)]
    pub rejected_at: Option<DateTime<Utc>>,
}

impl ContentItem {
    /// Caption followed by hashtags, as published.
    pub fn full_caption(&self) -> String {
        match self.hashtags.as_deref().map(str::trim) {
            Some(tags) if !tags.is_empty() => format!("{} {}", self.caption, tags),
            _ => self.caption.clone(),
        }
    }

    /// Caption and hashtags separated by a blank line, for text-only posts.
    pub fn text_body(&self) -> String {
        match self.hashtags.as_deref().map(str::trim) {
            Some(tags) if !tags.is_empty() => format!("{}\n\n{}", self.caption, tags),
            _ => self.caption.clone(),
        }
    }

    /// URL of the media that would be published, if present.
    ///
    /// Video formats only count `video_placeholder` once it holds an
    /// http(s) URL rather than a prompt.
    pub fn published_media_url(&self) -> Option<&str> {
        match self.content_type.media_field()? {
            MediaField::MediaLink => self
                .media_link
                .as_deref()
                .filter(|url| !url.trim().is_empty()),
            MediaField::VideoPlaceholder => self
                .video_placeholder
                .as_deref()
                .filter(|value| is_http_url(value)),
        }
    }

    /// Prompt for video generation, when `video_placeholder` is not yet a URL.
    pub fn video_prompt(&self) -> Option<&str> {
        self.video_placeholder
            .as_deref()
            .filter(|value| !value.trim().is_empty() && !is_http_url(value))
    }
}

/// True when the value looks like an http(s) URL.
pub fn is_http_url(value: &str) -> bool {
    let value = value.trim();
    value.starts_with("https://") || value.starts_with("http://")
}
