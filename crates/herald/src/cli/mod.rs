//! Command-line interface module.
//!
//! This module provides the CLI structure and command handlers for the herald binary.

mod commands;
mod media;
mod output;
mod schedule;

pub use commands::{Cli, Commands, OutputFormat};
pub use media::{handle_attach_media, handle_frame, handle_render};
pub use schedule::{
    handle_approve, handle_approve_strategy, handle_publish_now, handle_reject, handle_review,
    handle_sweep, handle_watch,
};
