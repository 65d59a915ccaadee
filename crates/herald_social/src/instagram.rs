//! Instagram business account publishing.
//!
//! Every Instagram post is two calls: create a media container, then publish
//! it. Reel containers are processed asynchronously and polled until ready.

use crate::graph::{GraphClient, GraphRequest, created_id};
use async_trait::async_trait;
use herald_core::{LinkedAccount, Platform};
use herald_error::{HeraldResult, HttpError, PublishError, PublishErrorKind};
use herald_interface::{PlatformPublisher, PostId, PublishTarget};
use serde_json::Value;
use std::time::Duration;
use tokio::time::{Instant, sleep};
use tracing::{debug, info, instrument, warn};

/// Interval between container status checks.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Give up on a container after this long.
pub const DEFAULT_POLL_TIMEOUT: Duration = Duration::from_secs(60);

/// Processing state of a media container.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum ContainerStatus {
    /// Ready to publish
    #[display("FINISHED")]
    Finished,
    /// Still processing
    #[display("IN_PROGRESS")]
    InProgress,
    /// Processing failed
    #[display("ERROR")]
    Error,
    /// Not published within the container's lifetime
    #[display("EXPIRED")]
    Expired,
    /// Already published
    #[display("PUBLISHED")]
    Published,
    /// Anything else the API reports
    #[display("{}", _0)]
    Other(String),
}

impl ContainerStatus {
    /// Read `status_code` from a status response. A missing field counts as
    /// still in progress.
    pub fn from_response(body: &Value) -> Self {
        match body.get("status_code").and_then(Value::as_str) {
            Some("FINISHED") => ContainerStatus::Finished,
            Some("IN_PROGRESS") | None => ContainerStatus::InProgress,
            Some("ERROR") => ContainerStatus::Error,
            Some("EXPIRED") => ContainerStatus::Expired,
            Some("PUBLISHED") => ContainerStatus::Published,
            Some(other) => ContainerStatus::Other(other.to_string()),
        }
    }
}

/// Publishes to an Instagram business account through the Graph API.
#[derive(Debug, Clone)]
pub struct InstagramPublisher {
    graph: GraphClient,
    poll_interval: Duration,
    poll_timeout: Duration,
}

impl InstagramPublisher {
    /// Create a publisher with the given request timeout.
    pub fn new(timeout: Duration) -> Result<Self, HttpError> {
        Ok(Self::with_client(GraphClient::new(timeout)?))
    }

    /// Create a publisher around an existing Graph client.
    pub fn with_client(graph: GraphClient) -> Self {
        Self {
            graph,
            poll_interval: DEFAULT_POLL_INTERVAL,
            poll_timeout: DEFAULT_POLL_TIMEOUT,
        }
    }

    /// Override container polling.
    pub fn with_polling(mut self, interval: Duration, timeout: Duration) -> Self {
        self.poll_interval = interval;
        self.poll_timeout = timeout;
        self
    }

    /// Container for a feed image.
    pub fn image_container(account: &PublishTarget, image_url: &str, caption: &str) -> GraphRequest {
        GraphRequest::new(format!("{}/media", account.0))
            .param("image_url", image_url)
            .param("caption", caption)
    }

    /// Container for a story image. Stories carry no caption.
    pub fn story_container(account: &PublishTarget, image_url: &str) -> GraphRequest {
        GraphRequest::new(format!("{}/media", account.0))
            .param("image_url", image_url)
            .param("media_type", "STORIES")
    }

    /// Container for a reel, shared to the main feed.
    pub fn reel_container(account: &PublishTarget, video_url: &str, caption: &str) -> GraphRequest {
        GraphRequest::new(format!("{}/media", account.0))
            .param("media_type", "REELS")
            .param("video_url", video_url)
            .param("caption", caption)
            .param("share_to_feed", "true")
    }

    /// Status query for a container.
    pub fn status_request(container: &str) -> GraphRequest {
        GraphRequest::new(container.to_string()).param("fields", "status_code")
    }

    /// Publish a finished container.
    pub fn publish_request(account: &PublishTarget, container: &str) -> GraphRequest {
        GraphRequest::new(format!("{}/media_publish", account.0)).param("creation_id", container)
    }

    async fn create_container(&self, request: GraphRequest, token: &str) -> HeraldResult<String> {
        let body = self.graph.post(&request, token).await?;
        let container = created_id(&body)?;
        debug!(container = %container, "Created Instagram media container");
        Ok(container)
    }

    /// Poll until the container is `FINISHED`.
    async fn wait_until_ready(&self, container: &str, token: &str) -> HeraldResult<()> {
        let started = Instant::now();
        loop {
            sleep(self.poll_interval).await;
            let body = self
                .graph
                .get(&Self::status_request(container), token)
                .await?;
            match ContainerStatus::from_response(&body) {
                ContainerStatus::Finished => return Ok(()),
                ContainerStatus::Error | ContainerStatus::Expired => {
                    return Err(PublishError::new(PublishErrorKind::ProcessingFailed(
                        container.to_string(),
                    ))
                    .into());
                }
                status => debug!(container, %status, "Container not ready"),
            }
            if started.elapsed() >= self.poll_timeout {
                warn!(container, "Container polling timed out");
                return Err(PublishError::new(PublishErrorKind::ProcessingTimeout {
                    container: container.to_string(),
                    seconds: self.poll_timeout.as_secs(),
                })
                .into());
            }
        }
    }

    async fn publish_container(
        &self,
        account: &PublishTarget,
        container: &str,
        token: &str,
    ) -> HeraldResult<PostId> {
        let body = self
            .graph
            .post(&Self::publish_request(account, container), token)
            .await?;
        let id = created_id(&body)?;
        info!(post_id = %id, "Instagram media published");
        Ok(PostId(id))
    }

    /// Image containers need a moment before they can be published.
    async fn settle_then_publish(
        &self,
        account: &PublishTarget,
        container: &str,
        token: &str,
    ) -> HeraldResult<PostId> {
        sleep(self.poll_interval).await;
        self.publish_container(account, container, token).await
    }
}

#[async_trait]
impl PlatformPublisher for InstagramPublisher {
    fn platform(&self) -> Platform {
        Platform::Instagram
    }

    fn target_for(&self, account: &LinkedAccount) -> Result<PublishTarget, PublishError> {
        account
            .instagram_id()
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(|id| PublishTarget(id.to_string()))
            .ok_or_else(|| {
                PublishError::new(PublishErrorKind::MissingAccountField(
                    "instagram_id".to_string(),
                ))
            })
    }

    async fn publish_text(
        &self,
        _target: &PublishTarget,
        _token: &str,
        _text: &str,
    ) -> HeraldResult<PostId> {
        Err(PublishError::new(PublishErrorKind::Unsupported {
            platform: Platform::Instagram.to_string(),
            content_type: "TextPost".to_string(),
        })
        .into())
    }

    #[instrument(skip(self, token, caption), fields(account = %target))]
    async fn publish_image(
        &self,
        target: &PublishTarget,
        token: &str,
        image_url: &str,
        caption: &str,
    ) -> HeraldResult<PostId> {
        let container = self
            .create_container(Self::image_container(target, image_url, caption), token)
            .await?;
        self.settle_then_publish(target, &container, token).await
    }

    /// Instagram publishes videos as reels.
    async fn publish_video(
        &self,
        target: &PublishTarget,
        token: &str,
        video_url: &str,
        caption: &str,
    ) -> HeraldResult<PostId> {
        self.publish_reel(target, token, video_url, caption).await
    }

    #[instrument(skip(self, token), fields(account = %target))]
    async fn publish_story(
        &self,
        target: &PublishTarget,
        token: &str,
        image_url: &str,
    ) -> HeraldResult<PostId> {
        let container = self
            .create_container(Self::story_container(target, image_url), token)
            .await?;
        self.settle_then_publish(target, &container, token).await
    }

    #[instrument(skip(self, token, caption), fields(account = %target))]
    async fn publish_reel(
        &self,
        target: &PublishTarget,
        token: &str,
        video_url: &str,
        caption: &str,
    ) -> HeraldResult<PostId> {
        let container = self
            .create_container(Self::reel_container(target, video_url, caption), token)
            .await?;
        self.wait_until_ready(&container, token).await?;
        self.publish_container(target, &container, token).await
    }
}
