//! Names for rendered media artifacts.

use crate::{ContentType, Platform};
use chrono::NaiveDateTime;

/// Unique name for a rendered image or video.
///
/// Formatted as `{platform}_{content_type_slug}_{company_id}_{YYYYMMDD_HHMMSS}_{8 hex}`.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use herald_core::{ArtifactName, ContentType, Platform};
///
/// let at = NaiveDate::from_ymd_opt(2025, 3, 3).unwrap().and_hms_opt(9, 5, 0).unwrap();
/// let name = ArtifactName::with_id(Platform::Instagram, ContentType::FeedImage, 12, at, "a1b2c3d4");
/// assert_eq!(name.to_string(), "instagram_feed_image_posts_12_20250303_090500_a1b2c3d4");
/// assert_eq!(name.file_name("png"), "instagram_feed_image_posts_12_20250303_090500_a1b2c3d4.png");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
#[display("{}_{}_{}_{}_{}", platform.account_key(), content_type.slug_for(*platform), company_id, created_at.format("%Y%m%d_%H%M%S"), id)]
pub struct ArtifactName {
    platform: Platform,
    content_type: ContentType,
    company_id: i32,
    created_at: NaiveDateTime,
    id: String,
}

impl ArtifactName {
    /// Name an artifact created at `created_at` with a fresh random suffix.
    pub fn new(
        platform: Platform,
        content_type: ContentType,
        company_id: i32,
        created_at: NaiveDateTime,
    ) -> Self {
        let id = uuid::Uuid::new_v4().simple().to_string()[..8].to_string();
        Self::with_id(platform, content_type, company_id, created_at, id)
    }

    /// Name an artifact with an explicit suffix.
    pub fn with_id(
        platform: Platform,
        content_type: ContentType,
        company_id: i32,
        created_at: NaiveDateTime,
        id: impl Into<String>,
    ) -> Self {
        Self {
            platform,
            content_type,
            company_id,
            created_at,
            id: id.into(),
        }
    }

    /// Name with a file extension appended.
    pub fn file_name(&self, extension: &str) -> String {
        format!("{}.{}", self, extension)
    }
}
