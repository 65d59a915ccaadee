//! Rendering of content items into published media.

use crate::audio::mix_background_audio;
use crate::fetch::MediaFetcher;
use crate::prompt::enhanced_prompt;
use crate::video::{FfmpegTools, postprocess_video};
use chrono::Local;
use derive_builder::Builder;
use derive_getters::Getters;
use herald_core::{ArtifactName, Company, ContentItem, ContentType, MediaField};
use herald_error::{HeraldResult, MediaError, MediaErrorKind};
use herald_frame::{FrameComposer, FrameRequest, clamp_overlay_text};
use herald_interface::{ContentRepository, GeneratedImage, ImageGenerator, VideoGenerator};
use herald_storage::{ObjectStorage, ResourceType, RetryPolicy, upload_with_retry};
use image::RgbaImage;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, instrument, warn};

/// Tunables for the media pipeline.
#[derive(Debug, Clone, Builder, Getters)]
#[builder(setter(into))]
pub struct PipelineSettings {
    /// ffmpeg and ffprobe locations
    #[builder(default)]
    tools: FfmpegTools,
    /// Music laid under generated videos, when present
    #[builder(default)]
    background_audio: Option<PathBuf>,
    /// Timeout for downloading generated media and logos
    #[builder(default = "Duration::from_secs(30)")]
    download_timeout: Duration,
    /// Backoff for uploads
    #[builder(default)]
    upload_retry: RetryPolicy,
    /// Parent of per-render scratch directories; the system temp dir when unset
    #[builder(default)]
    scratch_root: Option<PathBuf>,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            tools: FfmpegTools::default(),
            background_audio: None,
            download_timeout: Duration::from_secs(30),
            upload_retry: RetryPolicy::default(),
            scratch_root: None,
        }
    }
}

/// What to render.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderRequest {
    /// Content item to render
    pub content_id: i32,
    /// Requesting user; must own the item
    pub user_id: i32,
    /// Short copy drawn over images
    pub overlay_text: Option<String>,
    /// Brand guidance appended to the image prompt
    pub logo_description: Option<String>,
}

/// An uploaded image or video.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct RenderedMedia {
    /// Public URL, also stored on the content item
    url: String,
    /// Pixel width
    width: u32,
    /// Pixel height
    height: u32,
    /// Artifact name used as the storage key
    artifact: String,
}

/// A user-supplied file attached to a content item.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct AttachedMedia {
    /// Public URL, also stored on the content item
    url: String,
    /// Storage key
    public_id: String,
    /// Image or video
    resource_type: ResourceType,
}

/// Result of rendering one content item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderOutcome {
    /// Uploaded image or video
    Media(RenderedMedia),
    /// Text posts need no media; the body to publish
    Text(String),
}

/// Turns content items into uploaded, branded media.
///
/// Images are generated, framed with the company's brand and uploaded; the
/// URL lands in `media_link`. Videos are generated, faded out, extended with
/// a logo scene, optionally scored with background music and uploaded; the
/// URL lands in `video_placeholder`.
pub struct MediaPipeline {
    repository: Arc<dyn ContentRepository>,
    images: Arc<dyn ImageGenerator>,
    videos: Arc<dyn VideoGenerator>,
    storage: Arc<dyn ObjectStorage>,
    composer: Arc<FrameComposer>,
    fetcher: MediaFetcher,
    settings: PipelineSettings,
}

impl std::fmt::Debug for MediaPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaPipeline")
            .field("storage", &self.storage.backend_name())
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl MediaPipeline {
    /// Assemble a pipeline.
    ///
    /// # Errors
    ///
    /// Returns an error if the download client cannot be built.
    pub fn new(
        repository: Arc<dyn ContentRepository>,
        images: Arc<dyn ImageGenerator>,
        videos: Arc<dyn VideoGenerator>,
        storage: Arc<dyn ObjectStorage>,
        composer: FrameComposer,
        settings: PipelineSettings,
    ) -> HeraldResult<Self> {
        let fetcher = MediaFetcher::new(settings.download_timeout)?;
        Ok(Self {
            repository,
            images,
            videos,
            storage,
            composer: Arc::new(composer),
            fetcher,
            settings,
        })
    }

    /// Render the media for a content item and store its URL.
    #[instrument(skip(self, request), fields(content_id = request.content_id, user_id = request.user_id))]
    pub async fn render(&self, request: &RenderRequest) -> HeraldResult<RenderOutcome> {
        let item = self
            .repository
            .content_item(request.content_id, request.user_id)
            .await?;

        if item.content_type == ContentType::TextPost {
            info!("Text post, no media to render");
            return Ok(RenderOutcome::Text(item.text_body()));
        }

        let company = self
            .repository
            .company(item.company_id, request.user_id)
            .await?;

        let media = if item.content_type.is_video() {
            self.render_video(&item, &company).await?
        } else {
            self.render_image(&item, &company, request).await?
        };

        info!(url = %media.url, width = media.width, height = media.height, "Rendered media");
        Ok(RenderOutcome::Media(media))
    }

    /// Upload a user-supplied file as the item's media.
    ///
    /// See [`attach_custom_media`].
    pub async fn attach_custom_media(
        &self,
        content_id: i32,
        user_id: i32,
        path: &Path,
        resource_type: ResourceType,
    ) -> HeraldResult<AttachedMedia> {
        attach_custom_media(
            self.repository.as_ref(),
            self.storage.as_ref(),
            self.settings.upload_retry,
            content_id,
            user_id,
            path,
            resource_type,
        )
        .await
    }

    async fn fetch_logo(&self, company: &Company) -> HeraldResult<Option<Vec<u8>>> {
        match company.logo_url().as_deref() {
            Some(url) if !url.trim().is_empty() => Ok(Some(self.fetcher.fetch(url).await?)),
            _ => Ok(None),
        }
    }

    #[instrument(skip_all, fields(platform = %item.platform, content_type = %item.content_type))]
    async fn render_image(
        &self,
        item: &ContentItem,
        company: &Company,
        request: &RenderRequest,
    ) -> HeraldResult<RenderedMedia> {
        let prompt = item
            .image_prompt
            .as_deref()
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .ok_or_else(|| {
                MediaError::new(MediaErrorKind::MissingPrompt {
                    id: item.id,
                    kind: "image".to_string(),
                })
            })?;
        let prompt = enhanced_prompt(
            prompt,
            request.logo_description.as_deref().unwrap_or(""),
            item.platform,
            item.content_type,
        );

        let main_bytes = match self.images.generate_image(&prompt).await? {
            GeneratedImage::Url(url) => self.fetcher.fetch(&url).await?,
            GeneratedImage::Bytes(bytes) => bytes,
        };
        let logo_bytes = self.fetch_logo(company).await?;

        let composer = Arc::clone(&self.composer);
        let overlay_text = clamp_overlay_text(request.overlay_text.as_deref().unwrap_or(""));
        let footer = company.footer_text().to_string();
        let (platform, content_type) = (item.platform, item.content_type);

        let (png, width, height) = tokio::task::spawn_blocking(move || {
            let main = decode_rgba(&main_bytes)?;
            let logo = match logo_bytes {
                Some(bytes) => decode_rgba(&bytes)?,
                // Transparent placeholder; the palette falls back to brand defaults.
                None => RgbaImage::new(1, 1),
            };
            let frame = composer.compose(&FrameRequest {
                main: &main,
                logo: &logo,
                platform,
                content_type,
                overlay_text: &overlay_text,
                footer: &footer,
            });
            let png = encode_png(&frame)?;
            Ok::<_, MediaError>((png, frame.width(), frame.height()))
        })
        .await
        .map_err(|e| MediaError::new(MediaErrorKind::Join(e.to_string())))??;

        let artifact = ArtifactName::new(
            platform,
            content_type,
            item.company_id,
            Local::now().naive_local(),
        )
        .to_string();

        let stored = upload_with_retry(
            self.storage.as_ref(),
            self.settings.upload_retry,
            &png,
            &artifact,
            ResourceType::Image,
        )
        .await?;

        self.repository
            .set_media_url(item.id, MediaField::MediaLink, stored.url())
            .await?;

        Ok(RenderedMedia {
            url: stored.url().clone(),
            width,
            height,
            artifact,
        })
    }

    #[instrument(skip_all, fields(platform = %item.platform, content_type = %item.content_type))]
    async fn render_video(&self, item: &ContentItem, company: &Company) -> HeraldResult<RenderedMedia> {
        let prompt = item.video_prompt().ok_or_else(|| {
            MediaError::new(MediaErrorKind::MissingPrompt {
                id: item.id,
                kind: "video".to_string(),
            })
        })?;

        let generated_url = self.videos.generate_video(prompt).await?;
        let video_bytes = self.fetcher.fetch(&generated_url).await?;
        let logo_bytes = match self.fetch_logo(company).await {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(error = %e, "Could not download logo, skipping logo scene");
                None
            }
        };

        // Removed on drop, whichever way this function exits.
        let scratch = match &self.settings.scratch_root {
            Some(root) => tempfile::TempDir::new_in(root),
            None => tempfile::TempDir::new(),
        }
        .map_err(|e| MediaError::new(MediaErrorKind::Io(e.to_string())))?;
        let dir = scratch.path().to_path_buf();
        let original = dir.join("original.mp4");
        tokio::fs::write(&original, &video_bytes)
            .await
            .map_err(|e| MediaError::new(MediaErrorKind::Io(e.to_string())))?;

        let tools = self.settings.tools.clone();
        let background_audio = self.settings.background_audio.clone();

        let (bytes, info) = tokio::task::spawn_blocking(move || {
            let logo = logo_bytes.and_then(|bytes| match decode_rgba(&bytes) {
                Ok(logo) => Some(logo),
                Err(e) => {
                    warn!(error = %e, "Logo is not a readable image, skipping logo scene");
                    None
                }
            });

            let enhanced = dir.join("enhanced.mp4");
            let report = postprocess_video(&tools, &original, &enhanced, logo.as_ref())?;

            let final_path = match background_audio {
                Some(audio) => {
                    let mixed = dir.join("final.mp4");
                    // The re-encoded stream carries no audio of its own.
                    mix_background_audio(
                        &tools,
                        &enhanced,
                        &audio,
                        &mixed,
                        report.duration_secs(),
                        false,
                    )?;
                    mixed
                }
                None => enhanced,
            };

            let bytes = std::fs::read(&final_path)
                .map_err(|e| MediaError::new(MediaErrorKind::Io(e.to_string())))?;
            Ok::<_, MediaError>((bytes, *report.info()))
        })
        .await
        .map_err(|e| MediaError::new(MediaErrorKind::Join(e.to_string())))??;

        let artifact = ArtifactName::new(
            item.platform,
            item.content_type,
            item.company_id,
            Local::now().naive_local(),
        )
        .to_string();

        let stored = upload_with_retry(
            self.storage.as_ref(),
            self.settings.upload_retry,
            &bytes,
            &artifact,
            ResourceType::Video,
        )
        .await?;

        self.repository
            .set_media_url(item.id, MediaField::VideoPlaceholder, stored.url())
            .await?;
        drop(scratch);

        Ok(RenderedMedia {
            url: stored.url().clone(),
            width: *info.width(),
            height: *info.height(),
            artifact,
        })
    }
}

/// Upload a user-supplied file as a content item's media.
///
/// Images are re-encoded as PNG and stored in `media_link`. Videos are
/// uploaded as-is and stored in both `media_link` and `video_placeholder`.
#[instrument(skip(repository, storage, upload_retry), fields(path = %path.display()))]
pub async fn attach_custom_media(
    repository: &dyn ContentRepository,
    storage: &dyn ObjectStorage,
    upload_retry: RetryPolicy,
    content_id: i32,
    user_id: i32,
    path: &Path,
    resource_type: ResourceType,
) -> HeraldResult<AttachedMedia> {
    let item = repository.content_item(content_id, user_id).await?;
    let raw = tokio::fs::read(path).await.map_err(|e| {
        MediaError::new(MediaErrorKind::Io(format!("{}: {}", path.display(), e)))
    })?;

    let bytes = match resource_type {
        ResourceType::Image => {
            tokio::task::spawn_blocking(move || encode_png(&decode_rgba(&raw)?))
                .await
                .map_err(|e| MediaError::new(MediaErrorKind::Join(e.to_string())))??
        }
        ResourceType::Video => raw,
    };

    let public_id = format!(
        "custom_{}_{}_{}",
        resource_type,
        item.id,
        Local::now().format("%Y%m%d_%H%M%S")
    );
    let stored =
        upload_with_retry(storage, upload_retry, &bytes, &public_id, resource_type).await?;

    repository
        .set_media_url(item.id, MediaField::MediaLink, stored.url())
        .await?;
    if resource_type == ResourceType::Video {
        repository
            .set_media_url(item.id, MediaField::VideoPlaceholder, stored.url())
            .await?;
    }

    info!(url = %stored.url(), "Attached custom media");
    Ok(AttachedMedia {
        url: stored.url().clone(),
        public_id,
        resource_type,
    })
}

fn decode_rgba(bytes: &[u8]) -> Result<RgbaImage, MediaError> {
    image::load_from_memory(bytes)
        .map(|img| img.to_rgba8())
        .map_err(|e| MediaError::new(MediaErrorKind::Decode(e.to_string())))
}

fn encode_png(frame: &RgbaImage) -> Result<Vec<u8>, MediaError> {
    let mut out = Cursor::new(Vec::new());
    frame
        .write_to(&mut out, image::ImageFormat::Png)
        .map_err(|e| MediaError::new(MediaErrorKind::Encode(e.to_string())))?;
    Ok(out.into_inner())
}
