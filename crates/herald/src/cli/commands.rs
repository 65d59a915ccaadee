//! CLI command definitions.

use clap::{Parser, Subcommand, ValueEnum};
use herald_core::{ContentType, Platform};
use std::path::PathBuf;

/// Herald - branded social content rendering and scheduled auto-posting
#[derive(Parser, Debug)]
#[command(name = "herald")]
#[command(about = "Branded social content rendering and scheduled auto-posting", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Read configuration from this file only
    #[arg(long, global = true, env = "HERALD_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Publish approved content whose slot has arrived
    Sweep {
        /// Sweep one company instead of every company
        #[arg(long)]
        company: Option<i32>,

        /// Output format
        #[arg(long, default_value = "human")]
        format: OutputFormat,
    },

    /// Sweep repeatedly until interrupted
    Watch {
        /// Seconds between sweeps (defaults to schedule.poll_interval_secs)
        #[arg(long)]
        interval: Option<u64>,

        /// Watch one company instead of every company
        #[arg(long)]
        company: Option<i32>,
    },

    /// List items awaiting review, most urgent first
    Review {
        /// Company to list
        #[arg(long)]
        company: i32,

        /// Output format
        #[arg(long, default_value = "human")]
        format: OutputFormat,
    },

    /// Generate, brand and upload media for a content item
    Render {
        /// Content item id
        #[arg(long)]
        content_id: i32,

        /// Requesting user; must own the item
        #[arg(long)]
        user_id: i32,

        /// Short copy drawn over images
        #[arg(long)]
        overlay_text: Option<String>,

        /// Brand guidance appended to the image prompt
        #[arg(long)]
        logo_description: Option<String>,

        /// Output format
        #[arg(long, default_value = "human")]
        format: OutputFormat,
    },

    /// Compose a branded frame from local image files
    Frame {
        /// Generated artwork
        #[arg(long)]
        main: PathBuf,

        /// Company logo
        #[arg(long)]
        logo: PathBuf,

        /// Target platform
        #[arg(long, default_value = "Instagram")]
        platform: Platform,

        /// Post format
        #[arg(long, default_value = "FeedImage")]
        content_type: ContentType,

        /// Copy drawn over the artwork
        #[arg(long, default_value = "")]
        overlay_text: String,

        /// Footer text, normally the company website
        #[arg(long, default_value = "")]
        footer: String,

        /// Output PNG (defaults to media.render_dir/frame.png)
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Approve a content item, optionally replacing its caption
    Approve {
        /// Content item id
        #[arg(long)]
        content_id: i32,

        /// Reviewing user; must own the item
        #[arg(long)]
        user_id: i32,

        /// Edited caption; hashtags are split out
        #[arg(long)]
        caption: Option<String>,
    },

    /// Publish a content item now instead of waiting for its slot
    PublishNow {
        /// Content item id
        #[arg(long)]
        content_id: i32,

        /// Requesting user; must own the item
        #[arg(long)]
        user_id: i32,

        /// Edited caption; hashtags are split out
        #[arg(long)]
        caption: Option<String>,

        /// Output format
        #[arg(long, default_value = "human")]
        format: OutputFormat,
    },

    /// Upload your own image or video as a content item's media
    AttachMedia {
        /// Content item id
        #[arg(long)]
        content_id: i32,

        /// Requesting user; must own the item
        #[arg(long)]
        user_id: i32,

        /// Image or video file to upload
        #[arg(long)]
        file: PathBuf,

        /// Upload as a video (also replaces video_placeholder)
        #[arg(long)]
        video: bool,

        /// Output format
        #[arg(long, default_value = "human")]
        format: OutputFormat,
    },

    /// Reject a content item
    Reject {
        /// Content item id
        #[arg(long)]
        content_id: i32,

        /// Reviewing user; must own the item
        #[arg(long)]
        user_id: i32,
    },

    /// Approve a strategy, archiving the company's previous one
    ApproveStrategy {
        /// Strategy id
        #[arg(long)]
        strategy_id: i32,

        /// Approving user; must own the company
        #[arg(long)]
        user_id: i32,
    },
}

/// Output format options
#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable format
    Human,
    /// JSON format
    Json,
}
