//! Mapping from (platform, content type) to the adapter call that publishes it.

use herald_core::{ContentItem, ContentType, Platform};
use herald_error::{HeraldResult, PublishError, PublishErrorKind};
use herald_interface::{PlatformPublisher, PostId, PublishTarget};

/// Adapter call used to publish an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum PublishAction {
    /// `publish_text`
    #[display("text")]
    Text,
    /// `publish_image`
    #[display("image")]
    Image,
    /// `publish_story`
    #[display("story")]
    Story,
    /// `publish_video`
    #[display("video")]
    Video,
    /// `publish_reel`
    #[display("reel")]
    Reel,
}

impl PublishAction {
    /// Whether the action needs a media URL.
    pub fn needs_media(&self) -> bool {
        !matches!(self, PublishAction::Text)
    }
}

/// Resolve the publish action for a platform and content type.
///
/// Every pair is covered; Instagram text posts are rejected explicitly.
///
/// # Examples
///
/// ```
/// use herald_core::{ContentType, Platform};
/// use herald_schedule::{PublishAction, publish_action};
///
/// assert_eq!(
///     publish_action(Platform::Instagram, ContentType::Story).unwrap(),
///     PublishAction::Story
/// );
/// assert!(publish_action(Platform::Instagram, ContentType::TextPost).is_err());
/// ```
pub fn publish_action(
    platform: Platform,
    content_type: ContentType,
) -> Result<PublishAction, PublishError> {
    use ContentType::*;
    let action = match (platform, content_type) {
        (Platform::Facebook, ImagePost | FeedImage | Story) => PublishAction::Image,
        (Platform::Facebook, VideoPost | Reel) => PublishAction::Video,
        (Platform::Facebook, TextPost) => PublishAction::Text,

        (Platform::Instagram, FeedImage | ImagePost) => PublishAction::Image,
        (Platform::Instagram, Story) => PublishAction::Story,
        (Platform::Instagram, Reel | VideoPost) => PublishAction::Reel,
        (Platform::Instagram, TextPost) => {
            return Err(PublishError::new(PublishErrorKind::Unsupported {
                platform: platform.to_string(),
                content_type: content_type.to_string(),
            }));
        }

        (Platform::LinkedIn, FeedImage | Story | ImagePost) => PublishAction::Image,
        (Platform::LinkedIn, Reel | VideoPost) => PublishAction::Video,
        (Platform::LinkedIn, TextPost) => PublishAction::Text,
    };
    Ok(action)
}

/// Publish `item` through `publisher`.
///
/// Missing media is reported before any network call.
pub async fn dispatch(
    publisher: &dyn PlatformPublisher,
    target: &PublishTarget,
    token: &str,
    item: &ContentItem,
) -> HeraldResult<(PublishAction, PostId)> {
    let action = publish_action(item.platform, item.content_type)?;
    let caption = item.full_caption();

    let media = if action.needs_media() {
        let field = item
            .content_type
            .media_field()
            .map(|f| f.to_string())
            .unwrap_or_else(|| "media_link".to_string());
        Some(item.published_media_url().ok_or_else(|| {
            PublishError::new(PublishErrorKind::MissingMedia { id: item.id, field })
        })?)
    } else {
        None
    };

    let post = match (action, media) {
        (PublishAction::Text, _) => publisher.publish_text(target, token, &caption).await?,
        (PublishAction::Image, Some(url)) => {
            publisher.publish_image(target, token, url, &caption).await?
        }
        (PublishAction::Story, Some(url)) => publisher.publish_story(target, token, url).await?,
        (PublishAction::Video, Some(url)) => {
            publisher.publish_video(target, token, url, &caption).await?
        }
        (PublishAction::Reel, Some(url)) => {
            publisher.publish_reel(target, token, url, &caption).await?
        }
        (_, None) => {
            return Err(PublishError::new(PublishErrorKind::MissingMedia {
                id: item.id,
                field: "media_link".to_string(),
            })
            .into());
        }
    };
    Ok((action, post))
}
