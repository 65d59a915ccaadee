//! Publishing seam for social platforms.

use async_trait::async_trait;
use herald_core::{LinkedAccount, Platform};
use herald_error::{HeraldResult, PublishError, PublishErrorKind};
use serde::{Deserialize, Serialize};

/// Platform-side identity that receives a post: page id, Instagram business
/// account id or LinkedIn author URN.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
#[display("{}", _0)]
pub struct PublishTarget(pub String);

/// Platform-specific post identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, derive_more::Display)]
#[display("{}", _0)]
pub struct PostId(pub String);

/// A social platform adapter.
///
/// Every method either returns the id of the created post or an error
/// describing why the platform did not accept it. Implementations bound every
/// network call with a timeout.
#[async_trait]
pub trait PlatformPublisher: Send + Sync {
    /// Platform this adapter publishes to.
    fn platform(&self) -> Platform;

    /// Resolve the publishing identity from a linked account.
    fn target_for(&self, account: &LinkedAccount) -> Result<PublishTarget, PublishError>;

    /// Publish a text-only post.
    async fn publish_text(
        &self,
        target: &PublishTarget,
        token: &str,
        text: &str,
    ) -> HeraldResult<PostId>;

    /// Publish an image from a public URL.
    async fn publish_image(
        &self,
        target: &PublishTarget,
        token: &str,
        image_url: &str,
        caption: &str,
    ) -> HeraldResult<PostId>;

    /// Publish a video from a public URL.
    async fn publish_video(
        &self,
        target: &PublishTarget,
        token: &str,
        video_url: &str,
        caption: &str,
    ) -> HeraldResult<PostId>;

    /// Publish an ephemeral story image.
    async fn publish_story(
        &self,
        _target: &PublishTarget,
        _token: &str,
        _image_url: &str,
    ) -> HeraldResult<PostId> {
        Err(PublishError::new(PublishErrorKind::Unsupported {
            platform: self.platform().to_string(),
            content_type: "Story".to_string(),
        })
        .into())
    }

    /// Publish a short vertical video.
    async fn publish_reel(
        &self,
        target: &PublishTarget,
        token: &str,
        video_url: &str,
        caption: &str,
    ) -> HeraldResult<PostId> {
        self.publish_video(target, token, video_url, caption).await
    }
}
