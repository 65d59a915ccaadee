//! Media command handlers.

use super::commands::OutputFormat;
use super::output::print_json;
use crate::app::{
    LocalFrame, build_composer, build_pipeline, build_repository, build_storage,
    compose_local_frame,
};
use crate::config::HeraldConfig;
use herald_core::{ContentType, Platform};
use herald_error::{HeraldResult, MediaError, MediaErrorKind};
use herald_media::{RenderOutcome, RenderRequest, attach_custom_media};
use herald_storage::ResourceType;
use serde_json::json;
use std::path::{Path, PathBuf};

/// Render and upload media for one content item.
pub async fn handle_render(
    config: &HeraldConfig,
    request: RenderRequest,
    format: OutputFormat,
) -> HeraldResult<()> {
    let repository = build_repository(config)?;
    let pipeline = build_pipeline(config, repository)?;
    let outcome = pipeline.render(&request).await?;

    match (format, outcome) {
        (OutputFormat::Json, RenderOutcome::Media(media)) => print_json(&json!({
            "content_id": request.content_id,
            "url": media.url(),
            "width": media.width(),
            "height": media.height(),
            "artifact": media.artifact(),
        }))?,
        (OutputFormat::Json, RenderOutcome::Text(body)) => print_json(&json!({
            "content_id": request.content_id,
            "text": body,
        }))?,
        (OutputFormat::Human, RenderOutcome::Media(media)) => {
            println!(
                "Rendered content item #{} ({}x{}): {}",
                request.content_id,
                media.width(),
                media.height(),
                media.url()
            );
        }
        (OutputFormat::Human, RenderOutcome::Text(body)) => {
            println!(
                "Content item #{} is a text post; nothing to render.\n\n{}",
                request.content_id, body
            );
        }
    }
    Ok(())
}

/// Upload a local file as a content item's media.
pub async fn handle_attach_media(
    config: &HeraldConfig,
    content_id: i32,
    user_id: i32,
    file: &Path,
    video: bool,
    format: OutputFormat,
) -> HeraldResult<()> {
    let repository = build_repository(config)?;
    let storage = build_storage(&config.storage)?;
    let resource_type = if video {
        ResourceType::Video
    } else {
        ResourceType::Image
    };

    let attached = attach_custom_media(
        repository.as_ref(),
        storage.as_ref(),
        config.media.upload_retry(),
        content_id,
        user_id,
        file,
        resource_type,
    )
    .await?;

    match format {
        OutputFormat::Json => print_json(&json!({
            "content_id": content_id,
            "url": attached.url(),
            "public_id": attached.public_id(),
            "resource_type": resource_type.as_str(),
        }))?,
        OutputFormat::Human => println!(
            "Attached {} to content item #{}: {}",
            resource_type,
            content_id,
            attached.url()
        ),
    }
    Ok(())
}

/// Compose a branded frame from local files.
#[allow(clippy::too_many_arguments)]
pub async fn handle_frame(
    config: &HeraldConfig,
    main: PathBuf,
    logo: PathBuf,
    platform: Platform,
    content_type: ContentType,
    overlay_text: String,
    footer: String,
    output: Option<PathBuf>,
) -> HeraldResult<()> {
    let composer = build_composer(config);
    let output = output.unwrap_or_else(|| config.media.render_dir.join("frame.png"));
    let frame = LocalFrame {
        main,
        logo,
        platform,
        content_type,
        overlay_text,
        footer,
        output,
    };

    let written = frame.output.clone();
    let (width, height) =
        tokio::task::spawn_blocking(move || compose_local_frame(&composer, &frame))
            .await
            .map_err(|e| MediaError::new(MediaErrorKind::Join(e.to_string())))??;

    println!("Wrote {}x{} frame to {}", width, height, written.display());
    Ok(())
}
