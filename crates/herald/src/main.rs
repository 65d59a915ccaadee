//! Herald CLI binary.
//!
//! This binary provides command-line access to Herald's functionality:
//! - Sweep companies and publish content that is due
//! - Review, approve, reject and immediately publish content items
//! - Render media for content items, attach custom media and compose frames offline

use clap::Parser;
use herald::cli::{
    Cli, Commands, handle_approve, handle_approve_strategy, handle_attach_media, handle_frame,
    handle_publish_now, handle_reject, handle_render, handle_review, handle_sweep, handle_watch,
};
use herald::{
    HeraldConfig, ObservabilityConfig, RenderRequest, init_observability_with_config,
    shutdown_observability,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Secrets may live in .env during development
    let _ = dotenvy::dotenv();

    // Parse command-line arguments
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => HeraldConfig::from_file(path)?,
        None => HeraldConfig::load()?,
    };

    // Initialize tracing
    let mut observability = ObservabilityConfig::from_logging(&config.logging);
    if cli.verbose {
        observability = observability.with_log_level("debug");
    }
    init_observability_with_config(observability)?;

    // Execute the requested command
    let result = match cli.command {
        Commands::Sweep { company, format } => handle_sweep(&config, company, format).await,

        Commands::Watch { interval, company } => handle_watch(&config, interval, company).await,

        Commands::Review { company, format } => handle_review(&config, company, format).await,

        Commands::Render {
            content_id,
            user_id,
            overlay_text,
            logo_description,
            format,
        } => {
            let request = RenderRequest {
                content_id,
                user_id,
                overlay_text,
                logo_description,
            };
            handle_render(&config, request, format).await
        }

        Commands::Frame {
            main,
            logo,
            platform,
            content_type,
            overlay_text,
            footer,
            output,
        } => {
            handle_frame(
                &config,
                main,
                logo,
                platform,
                content_type,
                overlay_text,
                footer,
                output,
            )
            .await
        }

        Commands::Approve {
            content_id,
            user_id,
            caption,
        } => handle_approve(&config, content_id, user_id, caption).await,

        Commands::PublishNow {
            content_id,
            user_id,
            caption,
            format,
        } => handle_publish_now(&config, content_id, user_id, caption, format).await,

        Commands::AttachMedia {
            content_id,
            user_id,
            file,
            video,
            format,
        } => handle_attach_media(&config, content_id, user_id, &file, video, format).await,

        Commands::Reject {
            content_id,
            user_id,
        } => handle_reject(&config, content_id, user_id).await,

        Commands::ApproveStrategy {
            strategy_id,
            user_id,
        } => handle_approve_strategy(&config, strategy_id, user_id).await,
    };

    shutdown_observability();
    result?;
    Ok(())
}
