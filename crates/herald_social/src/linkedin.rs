//! LinkedIn member publishing via UGC posts.
//!
//! Media posts register an upload asset, push the binary to the returned
//! upload URL, then reference the asset from the post.

use async_trait::async_trait;
use herald_core::{LinkedAccount, Platform};
use herald_error::{HeraldResult, HttpError, PublishError, PublishErrorKind};
use herald_interface::{PlatformPublisher, PostId, PublishTarget};
use herald_storage::{RetryPolicy, retry_with_backoff};
use serde_json::{Value, json};
use std::time::Duration;
use tracing::{debug, info, instrument};

/// LinkedIn REST root.
pub const LINKEDIN_API_BASE: &str = "https://api.linkedin.com/v2";

/// Pinned `LinkedIn-Version` header.
const LINKEDIN_VERSION: &str = "202402";

const PERSON_URN_PREFIX: &str = "urn:li:person:";

/// Media descriptions are truncated to this many characters.
const MEDIA_DESCRIPTION_CHARS: usize = 200;

/// Kind of media attached to a UGC post.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkedInMedia {
    /// Still image
    Image,
    /// Video
    Video,
}

impl LinkedInMedia {
    /// Upload recipe for asset registration.
    pub fn recipe(&self) -> &'static str {
        match self {
            LinkedInMedia::Image => "urn:li:digitalmediaRecipe:feedshare-image",
            LinkedInMedia::Video => "urn:li:digitalmediaRecipe:feedshare-video",
        }
    }

    /// `shareMediaCategory` value.
    pub fn category(&self) -> &'static str {
        match self {
            LinkedInMedia::Image => "IMAGE",
            LinkedInMedia::Video => "VIDEO",
        }
    }

    fn title(&self) -> &'static str {
        match self {
            LinkedInMedia::Image => "Shared Image",
            LinkedInMedia::Video => "Shared Video",
        }
    }
}

/// Upload slot returned by asset registration.
#[derive(Debug, Clone, PartialEq, Eq, derive_getters::Getters)]
pub struct RegisteredUpload {
    upload_url: String,
    asset: String,
}

impl RegisteredUpload {
    /// Parse a `registerUpload` response.
    pub fn from_response(body: &Value) -> Result<Self, PublishError> {
        let value = &body["value"];
        let upload_url = value["uploadMechanism"]
            ["com.linkedin.digitalmedia.uploading.MediaUploadHttpRequest"]["uploadUrl"]
            .as_str();
        let asset = value["asset"].as_str();
        match (upload_url, asset) {
            (Some(upload_url), Some(asset)) => Ok(Self {
                upload_url: upload_url.to_string(),
                asset: asset.to_string(),
            }),
            _ => Err(PublishError::new(PublishErrorKind::UnexpectedResponse(
                "registerUpload response lacks uploadUrl or asset".to_string(),
            ))),
        }
    }
}

/// Body of an asset registration request.
pub fn register_upload_body(author: &PublishTarget, media: LinkedInMedia) -> Value {
    json!({
        "registerUploadRequest": {
            "recipes": [media.recipe()],
            "owner": author.0,
            "serviceRelationships": [{
                "relationshipType": "OWNER",
                "identifier": "urn:li:userGeneratedContent"
            }]
        }
    })
}

/// Body of a public UGC post, optionally referencing an uploaded asset.
pub fn ugc_post_body(author: &PublishTarget, text: &str, media: Option<(LinkedInMedia, &str)>) -> Value {
    let mut content = json!({
        "shareCommentary": { "text": text },
        "shareMediaCategory": "NONE"
    });
    if let Some((kind, asset)) = media {
        let description: String = text.chars().take(MEDIA_DESCRIPTION_CHARS).collect();
        content["shareMediaCategory"] = json!(kind.category());
        content["media"] = json!([{
            "status": "READY",
            "description": { "text": description },
            "media": asset,
            "title": { "text": kind.title() }
        }]);
    }
    json!({
        "author": author.0,
        "lifecycleState": "PUBLISHED",
        "specificContent": { "com.linkedin.ugc.ShareContent": content },
        "visibility": { "com.linkedin.ugc.MemberNetworkVisibility": "PUBLIC" }
    })
}

/// Author URN for a linked account id; bare ids get the person prefix.
pub fn person_urn(account_id: &str) -> String {
    let id = account_id.trim();
    if id.starts_with("urn:li:") {
        id.to_string()
    } else {
        format!("{}{}", PERSON_URN_PREFIX, id)
    }
}

/// Publishes UGC posts for a LinkedIn member.
#[derive(Debug, Clone)]
pub struct LinkedInPublisher {
    client: reqwest::Client,
    base_url: String,
    upload_retry: RetryPolicy,
}

impl LinkedInPublisher {
    /// Create a publisher with the given request timeout.
    pub fn new(timeout: Duration) -> Result<Self, HttpError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| HttpError::client_build("linkedin", e))?;
        Ok(Self {
            client,
            base_url: LINKEDIN_API_BASE.to_string(),
            upload_retry: RetryPolicy::default(),
        })
    }

    /// Override the API root.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Override the retry policy for binary uploads.
    pub fn with_upload_retry(mut self, policy: RetryPolicy) -> Self {
        self.upload_retry = policy;
        self
    }

    fn api_post(&self, path: &str, token: &str, body: &Value) -> reqwest::RequestBuilder {
        self.client
            .post(format!("{}/{}", self.base_url, path))
            .bearer_auth(token)
            .header("X-Restli-Protocol-Version", "2.0.0")
            .header("LinkedIn-Version", LINKEDIN_VERSION)
            .json(body)
    }

    async fn register_upload(
        &self,
        author: &PublishTarget,
        token: &str,
        media: LinkedInMedia,
    ) -> Result<RegisteredUpload, PublishError> {
        let response = self
            .api_post(
                "assets?action=registerUpload",
                token,
                &register_upload_body(author, media),
            )
            .send()
            .await
            .map_err(|e| PublishError::new(PublishErrorKind::Http(e.to_string())))?;
        let response = ensure_success(response).await?;
        let body: Value = response
            .json()
            .await
            .map_err(|e| PublishError::new(PublishErrorKind::UnexpectedResponse(e.to_string())))?;
        RegisteredUpload::from_response(&body)
    }

    /// Fetch the public media and push it to the upload slot.
    async fn transfer(
        &self,
        media_url: &str,
        upload: &RegisteredUpload,
        token: &str,
    ) -> Result<(), PublishError> {
        let source = self
            .client
            .get(media_url)
            .send()
            .await
            .map_err(|e| PublishError::new(PublishErrorKind::Http(e.to_string())))?;
        let bytes = ensure_success(source)
            .await?
            .bytes()
            .await
            .map_err(|e| PublishError::new(PublishErrorKind::Http(e.to_string())))?;

        debug!(bytes = bytes.len(), asset = %upload.asset, "Uploading media to LinkedIn");
        let response = self
            .client
            .put(&upload.upload_url)
            .bearer_auth(token)
            .body(bytes)
            .send()
            .await
            .map_err(|e| PublishError::new(PublishErrorKind::Http(e.to_string())))?;
        ensure_success(response).await?;
        Ok(())
    }

    async fn create_post(&self, token: &str, body: &Value) -> HeraldResult<PostId> {
        let response = self
            .api_post("ugcPosts", token, body)
            .send()
            .await
            .map_err(|e| PublishError::new(PublishErrorKind::Http(e.to_string())))?;
        let response = ensure_success(response).await?;

        let header_id = response
            .headers()
            .get("x-restli-id")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let id = match header_id {
            Some(id) => id,
            None => {
                let body: Value = response.json().await.unwrap_or(Value::Null);
                body.get("id")
                    .and_then(Value::as_str)
                    .map(str::to_string)
                    .ok_or_else(|| {
                        PublishError::new(PublishErrorKind::UnexpectedResponse(
                            "ugcPosts response has no post id".to_string(),
                        ))
                    })?
            }
        };
        info!(post_id = %id, "LinkedIn post published");
        Ok(PostId(id))
    }

    async fn publish_media(
        &self,
        target: &PublishTarget,
        token: &str,
        media_url: &str,
        text: &str,
        media: LinkedInMedia,
    ) -> HeraldResult<PostId> {
        let upload = self.register_upload(target, token, media).await?;
        retry_with_backoff(self.upload_retry, "linkedin_upload", || {
            self.transfer(media_url, &upload, token)
        })
        .await?;
        self.create_post(token, &ugc_post_body(target, text, Some((media, &upload.asset))))
            .await
    }
}

async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, PublishError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        let message = response.text().await.unwrap_or_default();
        Err(PublishError::new(PublishErrorKind::Rejected {
            status_code: status.as_u16(),
            message,
        }))
    }
}

#[async_trait]
impl PlatformPublisher for LinkedInPublisher {
    fn platform(&self) -> Platform {
        Platform::LinkedIn
    }

    fn target_for(&self, account: &LinkedAccount) -> Result<PublishTarget, PublishError> {
        account
            .account_id()
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(|id| PublishTarget(person_urn(id)))
            .ok_or_else(|| {
                PublishError::new(PublishErrorKind::MissingAccountField(
                    "account_id".to_string(),
                ))
            })
    }

    #[instrument(skip(self, token, text), fields(author = %target))]
    async fn publish_text(
        &self,
        target: &PublishTarget,
        token: &str,
        text: &str,
    ) -> HeraldResult<PostId> {
        self.create_post(token, &ugc_post_body(target, text, None))
            .await
    }

    #[instrument(skip(self, token, caption), fields(author = %target))]
    async fn publish_image(
        &self,
        target: &PublishTarget,
        token: &str,
        image_url: &str,
        caption: &str,
    ) -> HeraldResult<PostId> {
        self.publish_media(target, token, image_url, caption, LinkedInMedia::Image)
            .await
    }

    #[instrument(skip(self, token, caption), fields(author = %target))]
    async fn publish_video(
        &self,
        target: &PublishTarget,
        token: &str,
        video_url: &str,
        caption: &str,
    ) -> HeraldResult<PostId> {
        self.publish_media(target, token, video_url, caption, LinkedInMedia::Video)
            .await
    }
}
