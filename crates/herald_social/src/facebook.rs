//! Facebook page publishing.

use crate::graph::{GraphClient, GraphRequest, created_id};
use async_trait::async_trait;
use herald_core::{LinkedAccount, Platform};
use herald_error::{HeraldResult, HttpError, PublishError, PublishErrorKind};
use herald_interface::{PlatformPublisher, PostId, PublishTarget};
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Publishes to a Facebook page through the Graph API.
#[derive(Debug, Clone)]
pub struct FacebookPublisher {
    graph: GraphClient,
}

impl FacebookPublisher {
    /// Create a publisher with the given request timeout.
    pub fn new(timeout: Duration) -> Result<Self, HttpError> {
        Ok(Self {
            graph: GraphClient::new(timeout)?,
        })
    }

    /// Create a publisher around an existing Graph client.
    pub fn with_client(graph: GraphClient) -> Self {
        Self { graph }
    }

    /// `POST /{page}/feed`.
    pub fn text_request(page: &PublishTarget, message: &str) -> GraphRequest {
        GraphRequest::new(format!("{}/feed", page.0)).param("message", message)
    }

    /// `POST /{page}/photos`. Empty captions are omitted.
    pub fn image_request(page: &PublishTarget, image_url: &str, caption: &str) -> GraphRequest {
        let request = GraphRequest::new(format!("{}/photos", page.0)).param("url", image_url);
        if caption.trim().is_empty() {
            request
        } else {
            request.param("caption", caption)
        }
    }

    /// `POST /{page}/videos`. Empty descriptions are omitted.
    pub fn video_request(page: &PublishTarget, video_url: &str, description: &str) -> GraphRequest {
        let request = GraphRequest::new(format!("{}/videos", page.0)).param("file_url", video_url);
        if description.trim().is_empty() {
            request
        } else {
            request.param("description", description)
        }
    }

    async fn send(&self, request: GraphRequest, token: &str) -> HeraldResult<PostId> {
        debug!(path = %request.path(), "Sending Facebook request");
        let body = self.graph.post(&request, token).await?;
        let id = created_id(&body)?;
        info!(post_id = %id, "Facebook post published");
        Ok(PostId(id))
    }
}

#[async_trait]
impl PlatformPublisher for FacebookPublisher {
    fn platform(&self) -> Platform {
        Platform::Facebook
    }

    fn target_for(&self, account: &LinkedAccount) -> Result<PublishTarget, PublishError> {
        account
            .page_id()
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(|id| PublishTarget(id.to_string()))
            .ok_or_else(|| {
                PublishError::new(PublishErrorKind::MissingAccountField("page_id".to_string()))
            })
    }

    #[instrument(skip(self, token, text), fields(page = %target))]
    async fn publish_text(
        &self,
        target: &PublishTarget,
        token: &str,
        text: &str,
    ) -> HeraldResult<PostId> {
        self.send(Self::text_request(target, text), token).await
    }

    #[instrument(skip(self, token, caption), fields(page = %target))]
    async fn publish_image(
        &self,
        target: &PublishTarget,
        token: &str,
        image_url: &str,
        caption: &str,
    ) -> HeraldResult<PostId> {
        self.send(Self::image_request(target, image_url, caption), token)
            .await
    }

    #[instrument(skip(self, token, caption), fields(page = %target))]
    async fn publish_video(
        &self,
        target: &PublishTarget,
        token: &str,
        video_url: &str,
        caption: &str,
    ) -> HeraldResult<PostId> {
        self.send(Self::video_request(target, video_url, caption), token)
            .await
    }
}
