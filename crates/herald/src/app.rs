//! Assembly of the runtime components from configuration.

use crate::config::{HeraldConfig, StorageBackend, StorageConfig};
use herald_core::{ContentType, Platform};
use herald_database::{PostgresContentRepository, pool_from_env};
use herald_error::{BuilderError, HeraldResult, MediaError, MediaErrorKind};
use herald_frame::{FrameComposer, FrameLayout, FrameRequest};
use herald_interface::ContentRepository;
use herald_media::{
    FfmpegTools, MediaPipeline, PipelineSettingsBuilder, ReplicateVideoClient,
    TogetherImageClient,
};
use herald_schedule::{
    OrchestratorSettingsBuilder, PostingOrchestrator, ScheduleEvaluator, SystemClock,
};
use herald_social::{FernetCipher, PublisherRegistry};
use herald_storage::{CloudinaryStorage, FileSystemStorage, ObjectStorage};
use image::RgbaImage;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, instrument};

/// Object storage for the configured backend.
///
/// # Errors
///
/// Returns an error if Cloudinary credentials are missing or the filesystem
/// root cannot be created.
pub fn build_storage(config: &StorageConfig) -> HeraldResult<Arc<dyn ObjectStorage>> {
    let storage: Arc<dyn ObjectStorage> = match config.backend {
        StorageBackend::Cloudinary => Arc::new(CloudinaryStorage::from_env()?),
        StorageBackend::Filesystem => Arc::new(FileSystemStorage::new(
            &config.root,
            config.public_base_url.clone(),
        )?),
    };
    info!(backend = storage.backend_name(), "Object storage ready");
    Ok(storage)
}

/// PostgreSQL repository over a pool built from `DATABASE_URL`.
///
/// # Errors
///
/// Returns an error if `DATABASE_URL` is unset or the pool cannot connect.
pub fn build_repository(config: &HeraldConfig) -> HeraldResult<Arc<dyn ContentRepository>> {
    let pool = pool_from_env(config.database.pool_size)?;
    Ok(Arc::new(PostgresContentRepository::new(pool)))
}

/// Frame composer using the configured font, or the system fallbacks.
pub fn build_composer(config: &HeraldConfig) -> FrameComposer {
    FrameComposer::with_font_path(FrameLayout::default(), config.media.font_path.as_deref())
}

/// Media pipeline with the Together image client, the Replicate video client
/// and the configured storage.
///
/// # Errors
///
/// Returns an error if an API key is missing or a client cannot be built.
pub fn build_pipeline(
    config: &HeraldConfig,
    repository: Arc<dyn ContentRepository>,
) -> HeraldResult<MediaPipeline> {
    let timeout = config.http.timeout();
    let images =
        TogetherImageClient::from_env(&config.media.image_model, config.media.image_steps, timeout)?;
    let videos = ReplicateVideoClient::from_env(&config.media.video_model, timeout)?;
    let storage = build_storage(&config.storage)?;

    let settings = PipelineSettingsBuilder::default()
        .tools(FfmpegTools::new(&config.media.ffmpeg, &config.media.ffprobe))
        .background_audio(config.media.background_audio.clone())
        .scratch_root(config.media.scratch_dir.clone())
        .download_timeout(config.http.download_timeout())
        .upload_retry(config.media.upload_retry())
        .build()
        .map_err(|e| BuilderError::from(e.to_string()))?;

    MediaPipeline::new(
        repository,
        Arc::new(images),
        Arc::new(videos),
        storage,
        build_composer(config),
        settings,
    )
}

/// Posting orchestrator with every platform publisher and the Fernet cipher
/// keyed from `ENCRYPTION_KEY`.
///
/// # Errors
///
/// Returns an error if `ENCRYPTION_KEY` is missing or invalid or an HTTP
/// client cannot be built.
pub fn build_orchestrator(
    config: &HeraldConfig,
    repository: Arc<dyn ContentRepository>,
) -> HeraldResult<PostingOrchestrator> {
    let publishers = PublisherRegistry::with_defaults(config.http.timeout())?;
    let cipher = FernetCipher::from_env()?;
    let clock = SystemClock::from_config(config.schedule.utc_offset_minutes);
    let settings = OrchestratorSettingsBuilder::default()
        .past_due_delay(config.schedule.past_due_delay())
        .build()
        .map_err(|e| BuilderError::from(e.to_string()))?;

    Ok(PostingOrchestrator::new(
        repository,
        publishers,
        Arc::new(cipher),
        ScheduleEvaluator::new(Arc::new(clock)),
        settings,
    ))
}

/// Inputs for composing a frame from local files.
#[derive(Debug, Clone)]
pub struct LocalFrame {
    /// Generated artwork
    pub main: PathBuf,
    /// Company logo
    pub logo: PathBuf,
    /// Target platform
    pub platform: Platform,
    /// Post format
    pub content_type: ContentType,
    /// Copy drawn over the artwork
    pub overlay_text: String,
    /// Footer text
    pub footer: String,
    /// Where the PNG is written
    pub output: PathBuf,
}

/// Compose a branded frame from files on disk and write it as PNG.
///
/// Returns the frame dimensions.
///
/// # Errors
///
/// Returns an error if an input cannot be decoded or the output cannot be
/// written.
#[instrument(skip(composer, frame), fields(platform = %frame.platform, content_type = %frame.content_type))]
pub fn compose_local_frame(composer: &FrameComposer, frame: &LocalFrame) -> HeraldResult<(u32, u32)> {
    let main = open_rgba(&frame.main)?;
    let logo = open_rgba(&frame.logo)?;

    let composed = composer.compose(&FrameRequest {
        main: &main,
        logo: &logo,
        platform: frame.platform,
        content_type: frame.content_type,
        overlay_text: &frame.overlay_text,
        footer: &frame.footer,
    });

    if let Some(parent) = frame.output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| {
            MediaError::new(MediaErrorKind::Io(format!("{}: {}", parent.display(), e)))
        })?;
    }
    composed
        .save_with_format(&frame.output, image::ImageFormat::Png)
        .map_err(|e| {
            MediaError::new(MediaErrorKind::Encode(format!(
                "{}: {}",
                frame.output.display(),
                e
            )))
        })?;

    info!(output = %frame.output.display(), width = composed.width(), height = composed.height(), "Frame written");
    Ok(composed.dimensions())
}

fn open_rgba(path: &Path) -> HeraldResult<RgbaImage> {
    let image = image::open(path).map_err(|e| {
        MediaError::new(MediaErrorKind::Decode(format!("{}: {}", path.display(), e)))
    })?;
    Ok(image.to_rgba8())
}
